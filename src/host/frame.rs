use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::bridge::convert;
use crate::bridge::scope::{Resolved, ScopeChain};
use crate::host::value::HostValue;

/// One host lexical frame: the variables of a single function invocation, or
/// the program's top-level variable scope.
///
/// Frames are shared (`Rc`) so a captured scope chain observes later
/// assignments; capture never snapshots.
pub struct HostFrame {
    vars: RefCell<HashMap<String, HostValue>>,
    parent: Option<Rc<HostFrame>>,
    fallback: Option<ScopeChain>,
}

impl HostFrame {
    pub fn new(parent: Option<Rc<HostFrame>>, fallback: Option<ScopeChain>) -> Rc<Self> {
        Rc::new(Self {
            vars: RefCell::new(HashMap::new()),
            parent,
            fallback,
        })
    }

    pub fn root() -> Rc<Self> {
        Self::new(None, None)
    }

    /// This frame's own variables only. Variable names are case-sensitive.
    pub fn get(&self, name: &str) -> Option<HostValue> {
        self.vars.borrow().get(name).cloned()
    }

    pub fn set(&self, name: &str, value: HostValue) {
        self.vars.borrow_mut().insert(name.to_string(), value);
    }

    /// Full lookup: own variables, enclosing frames outward, then the fallback
    /// resolver installed by an embedding, converting any guest hit across the
    /// boundary.
    pub fn resolve(&self, name: &str) -> Option<HostValue> {
        if let Some(value) = self.get(name) {
            return Some(value);
        }
        if let Some(parent) = &self.parent {
            if let Some(value) = parent.resolve(name) {
                return Some(value);
            }
        }
        if let Some(chain) = &self.fallback {
            return chain.resolve(name).map(|resolved| match resolved {
                Resolved::Host(value) => value,
                Resolved::Guest(value) => convert::to_host(value),
            });
        }
        None
    }

    pub(crate) fn parent(&self) -> Option<&Rc<HostFrame>> {
        self.parent.as_ref()
    }

    pub(crate) fn fallback(&self) -> Option<&ScopeChain> {
        self.fallback.as_ref()
    }
}

impl fmt::Debug for HostFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostFrame({} vars)", self.vars.borrow().len())
    }
}
