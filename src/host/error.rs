use std::fmt;

/// Errors raised by the host runtime and by bridged operations the host
/// initiated.
///
/// `MissingMember` and `NotCallable` are fatal conditions: they abort the
/// calling script rather than being caught and retried. `Foreign` wraps a
/// failure that originated on the guest side, carrying the guest runtime's
/// rendered message unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// A module member was looked up and does not exist. Fatal.
    MissingMember { member: String, owner: String },
    /// A value was invoked but is not callable in its own runtime. Fatal.
    NotCallable { type_name: &'static str },
    /// Name resolution exhausted every visible scope without a match.
    UndefinedName(String),
    /// A guest-side operation failed during a bridged call.
    Foreign(String),
    /// Any other host runtime failure.
    Runtime(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::MissingMember { member, owner } => {
                write!(f, "Fatal error: no such member {} in {}", member, owner)
            }
            HostError::NotCallable { type_name } => {
                write!(f, "Fatal error: value of type {} is not callable", type_name)
            }
            HostError::UndefinedName(name) => write!(f, "undefined name '{}'", name),
            HostError::Foreign(message) => write!(f, "guest operation failed: {}", message),
            HostError::Runtime(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for HostError {}
