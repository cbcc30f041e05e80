use std::{cell::RefCell, fmt, rc::Rc};

use crate::bridge::host_proxies::{
    GuestDictProxy, GuestFuncProxy, GuestListProxy, GuestModuleProxy, GuestObjectProxy,
};
use crate::host::{
    array::HostArray, builtin::HostBuiltin, class::HostInstance, function::HostFunction,
};

/// Runtime value of the host language.
///
/// Primitives are unboxed; containers, objects, and callables are `Rc`-shared
/// handles, so cloning a value shares the underlying storage. The `Guest*`
/// variants are proxies around values owned by the guest runtime; the bridge
/// never copies the wrapped value, only refers to it.
#[derive(Debug, Clone)]
pub enum HostValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    Null,
    Array(Rc<RefCell<HostArray>>),
    Object(Rc<HostInstance>),
    Function(Rc<HostFunction>),
    Builtin(HostBuiltin),
    GuestObject(Rc<GuestObjectProxy>),
    GuestFunc(Rc<GuestFuncProxy>),
    GuestModule(Rc<GuestModuleProxy>),
    GuestList(Rc<GuestListProxy>),
    GuestDict(Rc<GuestDictProxy>),
}

impl HostValue {
    /// Canonical host type label used in diagnostics.
    ///
    /// Proxies report the host-side shape they wear, not what they wrap.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Int(_) => "integer",
            HostValue::Float(_) => "double",
            HostValue::Bool(_) => "boolean",
            HostValue::Str(_) => "string",
            HostValue::Null => "NULL",
            HostValue::Array(_) => "array",
            HostValue::Object(_) => "object",
            HostValue::Function(_) => "function",
            HostValue::Builtin(_) => "function",
            HostValue::GuestObject(_) => "object",
            HostValue::GuestFunc(_) => "function",
            HostValue::GuestModule(_) => "module",
            HostValue::GuestList(_) => "array",
            HostValue::GuestDict(_) => "array",
        }
    }

    /// Whether invoking this value can succeed. A generic proxy is callable
    /// exactly when the wrapped guest value is callable in its own runtime.
    pub fn is_callable(&self) -> bool {
        match self {
            HostValue::Function(_) | HostValue::Builtin(_) | HostValue::GuestFunc(_) => true,
            HostValue::GuestObject(proxy) => proxy.value().is_callable(),
            _ => false,
        }
    }

    /// Text form used by string conversion; unlike `Display`, strings are
    /// returned without quotes and null as empty text.
    pub fn to_text(&self) -> String {
        match self {
            HostValue::Str(v) => v.to_string(),
            HostValue::Null => String::new(),
            HostValue::Bool(true) => "1".to_string(),
            HostValue::Bool(false) => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Int(v) => write!(f, "{}", v),
            HostValue::Float(v) => write!(f, "{}", v),
            HostValue::Bool(v) => write!(f, "{}", v),
            HostValue::Str(v) => write!(f, "\"{}\"", v),
            HostValue::Null => write!(f, "null"),
            HostValue::Array(array) => {
                let array = array.borrow();
                let mut items = Vec::with_capacity(array.len());
                for pos in 0..array.len() {
                    if let Some((key, value)) = array.entry_at(pos) {
                        items.push(format!("{} => {}", key, value));
                    }
                }
                write!(f, "[{}]", items.join(", "))
            }
            HostValue::Object(instance) => write!(f, "<{} object>", instance.class.name),
            HostValue::Function(func) => write!(f, "<function {}>", func.decl.name),
            HostValue::Builtin(builtin) => write!(f, "<function {}>", builtin.name),
            HostValue::GuestObject(_) => write!(f, "<guest object>"),
            HostValue::GuestFunc(_) => write!(f, "<guest function>"),
            HostValue::GuestModule(proxy) => write!(f, "<guest module {}>", proxy.module().name),
            HostValue::GuestList(_) => write!(f, "<guest list>"),
            HostValue::GuestDict(_) => write!(f, "<guest dict>"),
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::Int(a), HostValue::Int(b)) => a == b,
            (HostValue::Float(a), HostValue::Float(b)) => a == b,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::Str(a), HostValue::Str(b)) => a == b,
            (HostValue::Null, HostValue::Null) => true,
            (HostValue::Array(a), HostValue::Array(b)) => Rc::ptr_eq(a, b),
            (HostValue::Object(a), HostValue::Object(b)) => Rc::ptr_eq(a, b),
            (HostValue::Function(a), HostValue::Function(b)) => Rc::ptr_eq(a, b),
            (HostValue::Builtin(a), HostValue::Builtin(b)) => a == b,
            (HostValue::GuestObject(a), HostValue::GuestObject(b)) => Rc::ptr_eq(a, b),
            (HostValue::GuestFunc(a), HostValue::GuestFunc(b)) => Rc::ptr_eq(a, b),
            (HostValue::GuestModule(a), HostValue::GuestModule(b)) => Rc::ptr_eq(a, b),
            (HostValue::GuestList(a), HostValue::GuestList(b)) => Rc::ptr_eq(a, b),
            (HostValue::GuestDict(a), HostValue::GuestDict(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
