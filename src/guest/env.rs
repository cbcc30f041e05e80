use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::bridge::convert;
use crate::bridge::scope::{Resolved, ScopeChain};
use crate::guest::error::GuestError;
use crate::guest::value::GuestValue;

/// A guest lexical environment: one level of the closure chain.
///
/// An environment created by an embedding carries the scope chain captured at
/// the embedding call site as its fallback resolver; lookups that miss the
/// whole environment chain consult it, converting hits across the boundary.
/// Environments are shared (`Rc`) and mutable, so outer rebindings stay
/// visible to already-created closures.
pub struct GuestEnv {
    bindings: RefCell<HashMap<String, GuestValue>>,
    parent: Option<Rc<GuestEnv>>,
    fallback: Option<ScopeChain>,
}

impl GuestEnv {
    pub fn new(parent: Option<Rc<GuestEnv>>, fallback: Option<ScopeChain>) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(HashMap::new()),
            parent,
            fallback,
        })
    }

    pub fn root() -> Rc<Self> {
        Self::new(None, None)
    }

    pub fn with_fallback(fallback: ScopeChain) -> Rc<Self> {
        Self::new(None, Some(fallback))
    }

    pub fn child(parent: &Rc<GuestEnv>) -> Rc<Self> {
        Self::new(Some(parent.clone()), None)
    }

    pub fn define(&self, name: &str, value: GuestValue) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    /// Resolution without the undefined-name condition: own bindings, parents
    /// outward, then the fallback chain.
    pub fn resolve(&self, name: &str) -> Option<GuestValue> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            if let Some(value) = parent.resolve(name) {
                return Some(value);
            }
        }
        if let Some(chain) = &self.fallback {
            return chain.resolve(name).map(|resolved| match resolved {
                Resolved::Guest(value) => value,
                Resolved::Host(value) => convert::to_guest(value),
            });
        }
        None
    }

    /// Full lookup, raising the guest's own undefined-name condition on miss.
    pub fn lookup(&self, name: &str) -> Result<GuestValue, GuestError> {
        self.resolve(name)
            .ok_or_else(|| GuestError::NameError(name.to_string()))
    }
}

impl fmt::Debug for GuestEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestEnv({} bindings)", self.bindings.borrow().len())
    }
}
