//! Scope capture and cross-runtime name resolution.
//!
//! A [`ScopeChain`] is the lexical environment visible at an embedding call
//! site, captured as live references and threaded explicitly through every
//! embedding — never ambient state. The embedded code's runtime consults it
//! whenever its own scope lookup fails, and because a captured guest
//! environment carries its own fallback chain, lookups transitively reach
//! ancestor scopes across any number of language switches.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::guest::env::GuestEnv;
use crate::guest::value::GuestValue;
use crate::host::frame::HostFrame;
use crate::host::value::HostValue;
use crate::host::FunctionEntry;
use crate::interp::Interp;

/// A value found by chain resolution, still in its owning runtime's
/// representation. The consumer converts it across the boundary.
#[derive(Debug, Clone)]
pub enum Resolved {
    Host(HostValue),
    Guest(GuestValue),
}

#[derive(Clone)]
pub(crate) enum ScopeLayer {
    /// One host frame's own variables (case-sensitive).
    HostFrame(Rc<HostFrame>),
    /// The host program scope: top-level variables, then the
    /// case-insensitive global function table.
    HostGlobals {
        frame: Rc<HostFrame>,
        functions: Rc<RefCell<HashMap<String, FunctionEntry>>>,
    },
    /// Host global constants, case-insensitive, read-only.
    HostConstants(Rc<RefCell<HashMap<String, HostValue>>>),
    /// A guest environment chain; its own fallback makes nesting transitive.
    GuestEnv(Rc<GuestEnv>),
}

impl ScopeLayer {
    fn resolve(&self, name: &str) -> Option<Resolved> {
        match self {
            ScopeLayer::HostFrame(frame) => frame.get(name).map(Resolved::Host),
            ScopeLayer::HostGlobals { frame, functions } => frame
                .get(name)
                .or_else(|| {
                    functions
                        .borrow()
                        .get(&name.to_lowercase())
                        .map(|entry| entry.value.clone())
                })
                .map(Resolved::Host),
            ScopeLayer::HostConstants(constants) => constants
                .borrow()
                .get(&name.to_lowercase())
                .cloned()
                .map(Resolved::Host),
            ScopeLayer::GuestEnv(env) => env.resolve(name).map(Resolved::Guest),
        }
    }
}

/// An ordered list of lexical environments, innermost first. Layers hold live
/// references, so rebinding an outer variable after capture stays visible.
#[derive(Clone)]
pub struct ScopeChain {
    layers: Rc<[ScopeLayer]>,
}

impl ScopeChain {
    /// Captures the scope visible at a host call site: the current frame and
    /// its enclosing frames innermost-first, then the program scope, then
    /// constants. A frame that itself belongs to embedded code contributes
    /// the chain it was bound to, which is what makes nested embeddings
    /// resolve transitively.
    pub fn capture_host(interp: &Interp, frame: Option<&Rc<HostFrame>>) -> Self {
        let mut layers = Vec::new();
        let mut current = frame.cloned();
        while let Some(frame) = current {
            layers.push(ScopeLayer::HostFrame(frame.clone()));
            if let Some(chain) = frame.fallback() {
                layers.extend(chain.layers.iter().cloned());
            }
            current = frame.parent().cloned();
        }
        layers.push(ScopeLayer::HostGlobals {
            frame: interp.host.globals.clone(),
            functions: interp.host.functions_handle(),
        });
        layers.push(ScopeLayer::HostConstants(interp.host.constants_handle()));
        Self {
            layers: layers.into(),
        }
    }

    /// Captures the scope visible at a guest call site. The environment chain
    /// resolves its own enclosing scopes and fallback internally, so a single
    /// layer suffices.
    pub fn capture_guest(env: &Rc<GuestEnv>) -> Self {
        Self {
            layers: vec![ScopeLayer::GuestEnv(env.clone())].into(),
        }
    }

    /// Walks the chain innermost-first; first match wins. A miss at every
    /// layer is reported by the *consuming* runtime as its own undefined-name
    /// condition, not here.
    pub fn resolve(&self, name: &str) -> Option<Resolved> {
        self.layers.iter().find_map(|layer| layer.resolve(name))
    }
}

impl fmt::Debug for ScopeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeChain({} layers)", self.layers.len())
    }
}
