use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::bridge::guest_proxies::{
    HostArrayProxy, HostFuncProxy, HostNamespaceProxy, HostObjectProxy,
};
use crate::guest::builtin::GuestBuiltin;
use crate::guest::function::GuestFunction;
use crate::guest::module::GuestModule;

/// Runtime value of the guest language.
///
/// Primitives are unboxed; lists, dicts, objects, and callables are
/// `Rc`-shared handles. The `Host*` variants are proxies around values owned
/// by the host runtime, referenced rather than copied.
#[derive(Debug, Clone)]
pub enum GuestValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    None,
    List(Rc<RefCell<Vec<GuestValue>>>),
    Dict(Rc<RefCell<GuestDict>>),
    Object(Rc<GuestInstance>),
    Function(Rc<GuestFunction>),
    Builtin(GuestBuiltin),
    Module(Rc<GuestModule>),
    HostObject(Rc<HostObjectProxy>),
    HostFunc(Rc<HostFuncProxy>),
    HostMap(Rc<HostArrayProxy>),
    HostNamespace(Rc<HostNamespaceProxy>),
}

impl GuestValue {
    /// Canonical guest type label used in diagnostics. Proxies report the
    /// guest-side shape they wear.
    pub fn type_name(&self) -> &'static str {
        match self {
            GuestValue::Int(_) => "int",
            GuestValue::Float(_) => "float",
            GuestValue::Bool(_) => "bool",
            GuestValue::Str(_) => "str",
            GuestValue::None => "NoneType",
            GuestValue::List(_) => "list",
            GuestValue::Dict(_) => "dict",
            GuestValue::Object(_) => "object",
            GuestValue::Function(_) => "function",
            GuestValue::Builtin(_) => "builtin",
            GuestValue::Module(_) => "module",
            GuestValue::HostObject(_) => "object",
            GuestValue::HostFunc(_) => "function",
            GuestValue::HostMap(_) => "dict",
            GuestValue::HostNamespace(_) => "module",
        }
    }

    /// Whether invoking this value can succeed. A generic proxy is callable
    /// exactly when the wrapped host value is callable in its own runtime.
    pub fn is_callable(&self) -> bool {
        match self {
            GuestValue::Function(_) | GuestValue::Builtin(_) | GuestValue::HostFunc(_) => true,
            GuestValue::HostObject(proxy) => proxy.value().is_callable(),
            _ => false,
        }
    }

    /// Text form used by string conversion; strings come back without quotes.
    pub fn to_text(&self) -> String {
        match self {
            GuestValue::Str(v) => v.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for GuestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestValue::Int(v) => write!(f, "{}", v),
            GuestValue::Float(v) => write!(f, "{}", v),
            GuestValue::Bool(true) => write!(f, "True"),
            GuestValue::Bool(false) => write!(f, "False"),
            GuestValue::Str(v) => write!(f, "'{}'", v),
            GuestValue::None => write!(f, "None"),
            GuestValue::List(items) => {
                let items: Vec<String> = items.borrow().iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            GuestValue::Dict(dict) => {
                let dict = dict.borrow();
                let mut items = Vec::with_capacity(dict.len());
                for pos in 0..dict.len() {
                    if let Some((key, value)) = dict.entry_at(pos) {
                        items.push(format!("{}: {}", key, value));
                    }
                }
                write!(f, "{{{}}}", items.join(", "))
            }
            GuestValue::Object(instance) => write!(f, "<{} object>", instance.type_name),
            GuestValue::Function(func) => write!(f, "<function {}>", func.decl.name),
            GuestValue::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            GuestValue::Module(module) => write!(f, "<module {}>", module.name),
            GuestValue::HostObject(_) => write!(f, "<host object>"),
            GuestValue::HostFunc(_) => write!(f, "<host function>"),
            GuestValue::HostMap(_) => write!(f, "<host array>"),
            GuestValue::HostNamespace(_) => write!(f, "<host namespace>"),
        }
    }
}

impl PartialEq for GuestValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GuestValue::Int(a), GuestValue::Int(b)) => a == b,
            (GuestValue::Float(a), GuestValue::Float(b)) => a == b,
            (GuestValue::Bool(a), GuestValue::Bool(b)) => a == b,
            (GuestValue::Str(a), GuestValue::Str(b)) => a == b,
            (GuestValue::None, GuestValue::None) => true,
            (GuestValue::List(a), GuestValue::List(b)) => Rc::ptr_eq(a, b),
            (GuestValue::Dict(a), GuestValue::Dict(b)) => Rc::ptr_eq(a, b),
            (GuestValue::Object(a), GuestValue::Object(b)) => Rc::ptr_eq(a, b),
            (GuestValue::Function(a), GuestValue::Function(b)) => Rc::ptr_eq(a, b),
            (GuestValue::Builtin(a), GuestValue::Builtin(b)) => a == b,
            (GuestValue::Module(a), GuestValue::Module(b)) => Rc::ptr_eq(a, b),
            (GuestValue::HostObject(a), GuestValue::HostObject(b)) => Rc::ptr_eq(a, b),
            (GuestValue::HostFunc(a), GuestValue::HostFunc(b)) => Rc::ptr_eq(a, b),
            (GuestValue::HostMap(a), GuestValue::HostMap(b)) => Rc::ptr_eq(a, b),
            (GuestValue::HostNamespace(a), GuestValue::HostNamespace(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Key of a guest dict entry. The bridge only crosses integer and text keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DictKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for DictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictKey::Int(v) => write!(f, "{}", v),
            DictKey::Str(v) => write!(f, "'{}'", v),
        }
    }
}

impl DictKey {
    pub fn to_value(&self) -> GuestValue {
        match self {
            DictKey::Int(v) => GuestValue::Int(*v),
            DictKey::Str(v) => GuestValue::Str(v.as_str().into()),
        }
    }
}

/// The guest runtime's associative collection. Iteration order is insertion
/// order, which the guest language guarantees.
#[derive(Debug, Default)]
pub struct GuestDict {
    entries: Vec<(DictKey, GuestValue)>,
    index: HashMap<DictKey, usize>,
}

impl GuestDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (DictKey, GuestValue)>) -> Self {
        let mut dict = Self::new();
        for (key, value) in pairs {
            dict.insert(key, value);
        }
        dict
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &DictKey) -> Option<GuestValue> {
        self.index.get(key).map(|&pos| self.entries[pos].1.clone())
    }

    /// Inserts or overwrites; an overwrite keeps the entry's original position.
    pub fn insert(&mut self, key: DictKey, value: GuestValue) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn entry_at(&self, pos: usize) -> Option<(DictKey, GuestValue)> {
        self.entries.get(pos).cloned()
    }
}

/// The guest's entries cursor, obtained once per iteration. This is the
/// "advance" handle the mapping iteration bridge caches at construction.
pub struct GuestDictCursor {
    dict: Rc<RefCell<GuestDict>>,
    pos: usize,
}

impl GuestDictCursor {
    pub fn new(dict: Rc<RefCell<GuestDict>>) -> Self {
        Self { dict, pos: 0 }
    }

    pub fn next_entry(&mut self) -> Option<(DictKey, GuestValue)> {
        let entry = self.dict.borrow().entry_at(self.pos)?;
        self.pos += 1;
        Some(entry)
    }
}

/// A guest object: a type label plus a case-sensitive attribute table.
/// Methods are attribute values that happen to be callable.
pub struct GuestInstance {
    pub type_name: String,
    attrs: RefCell<HashMap<String, GuestValue>>,
}

impl GuestInstance {
    pub fn new(type_name: &str) -> Rc<Self> {
        Rc::new(Self {
            type_name: type_name.to_string(),
            attrs: RefCell::new(HashMap::new()),
        })
    }

    pub fn attr(&self, name: &str) -> Option<GuestValue> {
        self.attrs.borrow().get(name).cloned()
    }

    pub fn set_attr(&self, name: &str, value: GuestValue) {
        self.attrs.borrow_mut().insert(name.to_string(), value);
    }
}

impl fmt::Debug for GuestInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} object>", self.type_name)
    }
}
