//! The guest object space: the case-sensitive, lexically scoped runtime being
//! bridged to.
//!
//! As with the host side, only the interface the bridge relies on exists here:
//! values, environments, the module registry, and call/attribute/item
//! primitives. Front-end compilation is a collaborator behind
//! [`crate::bridge::embed::GuestFrontEnd`].

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::guest::error::GuestError;
use crate::guest::module::GuestModule;
use crate::guest::value::GuestValue;
use crate::interp::Interp;

pub mod builtin;
pub mod builtins;
pub mod env;
pub mod error;
pub mod function;
pub mod module;
pub mod value;


pub type GuestBuiltinFn = fn(&mut Interp, Vec<GuestValue>) -> Result<GuestValue, GuestError>;

/// The guest runtime's global state: the module registry and the builtin
/// namespace.
pub struct GuestSpace {
    modules: RefCell<HashMap<String, Rc<GuestModule>>>,
    pub builtins: Rc<GuestModule>,
}

impl GuestSpace {
    pub fn new() -> Self {
        let builtins = builtins::builtins_module();
        let mut modules = HashMap::new();
        modules.insert(builtins.name.clone(), builtins.clone());
        Self {
            modules: RefCell::new(modules),
            builtins,
        }
    }

    /// Registers a top-level module under its own name. Module names are
    /// case-sensitive.
    pub fn register_module(&self, module: Rc<GuestModule>) {
        self.modules
            .borrow_mut()
            .insert(module.name.clone(), module);
    }

    pub fn module(&self, name: &str) -> Option<Rc<GuestModule>> {
        self.modules.borrow().get(name).cloned()
    }
}

impl Default for GuestSpace {
    fn default() -> Self {
        Self::new()
    }
}
