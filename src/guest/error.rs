use std::fmt;

/// Errors raised by the guest runtime and by bridged operations the guest
/// initiated.
///
/// Variants mirror the guest language's own condition names where one exists
/// (`NameError`, `AttributeError`, ...). `Foreign` wraps a failure that
/// originated on the host side, carrying the host runtime's rendered message
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum GuestError {
    AttributeError { type_name: String, attr: String },
    NameError(String),
    NotCallable { type_name: &'static str },
    KeyError(String),
    IndexError { index: i64, len: usize },
    ImportError(String),
    TypeError(String),
    /// A host-side operation failed during a bridged call.
    Foreign(String),
    /// Any other guest runtime failure.
    Runtime(String),
}

impl fmt::Display for GuestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestError::AttributeError { type_name, attr } => {
                write!(f, "'{}' object has no attribute '{}'", type_name, attr)
            }
            GuestError::NameError(name) => write!(f, "name '{}' is not defined", name),
            GuestError::NotCallable { type_name } => {
                write!(f, "'{}' object is not callable", type_name)
            }
            GuestError::KeyError(key) => write!(f, "KeyError: {}", key),
            GuestError::IndexError { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            GuestError::ImportError(name) => write!(f, "no module named '{}'", name),
            GuestError::TypeError(message) => write!(f, "{}", message),
            GuestError::Foreign(message) => write!(f, "host operation failed: {}", message),
            GuestError::Runtime(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for GuestError {}
