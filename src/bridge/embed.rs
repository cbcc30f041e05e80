//! Embedding entry points: compile foreign source at a call site, bind it to
//! the scope captured there, and hand back a callable proxy.
//!
//! Compilation itself is a collaborator behind the front-end traits. Compiled
//! declarations are environment-free templates, memoized per interpreter under
//! a SHA-256 key of the source text; binding to the captured scope happens per
//! embedding call, after cache lookup, so cached templates never leak scope.

use std::{collections::HashMap, rc::Rc};

use sha2::{Digest, Sha256};

use crate::bridge::guest_err_to_host;
use crate::bridge::guest_proxies::{HostFuncProxy, HostNamespaceProxy};
use crate::bridge::host_err_to_guest;
use crate::bridge::host_proxies::{GuestFuncProxy, GuestModuleProxy, GuestObjectProxy};
use crate::bridge::scope::ScopeChain;
use crate::guest::env::GuestEnv;
use crate::guest::error::GuestError;
use crate::guest::function::{GuestDecl, GuestFunction};
use crate::guest::value::GuestValue;
use crate::host::error::HostError;
use crate::host::frame::HostFrame;
use crate::host::function::{HostDecl, HostFunction};
use crate::host::value::HostValue;
use crate::interp::Interp;

/// The guest language's front end: source text in, environment-free function
/// declarations out. An external collaborator; tests install native stubs.
pub trait GuestFrontEnd {
    fn compile(&self, source: &str) -> Result<Vec<GuestDecl>, GuestError>;
}

/// The host language's front end, mirror of [`GuestFrontEnd`].
pub trait HostFrontEnd {
    fn compile(&self, source: &str) -> Result<Vec<HostDecl>, HostError>;
}

/// Adapter turning a closure into a [`GuestFrontEnd`].
pub struct FnGuestFrontEnd<F>(pub F);

impl<F> GuestFrontEnd for FnGuestFrontEnd<F>
where
    F: Fn(&str) -> Result<Vec<GuestDecl>, GuestError>,
{
    fn compile(&self, source: &str) -> Result<Vec<GuestDecl>, GuestError> {
        (self.0)(source)
    }
}

/// Adapter turning a closure into a [`HostFrontEnd`].
pub struct FnHostFrontEnd<F>(pub F);

impl<F> HostFrontEnd for FnHostFrontEnd<F>
where
    F: Fn(&str) -> Result<Vec<HostDecl>, HostError>,
{
    fn compile(&self, source: &str) -> Result<Vec<HostDecl>, HostError> {
        (self.0)(source)
    }
}

type SourceKey = [u8; 32];

/// Front ends and the per-interpreter compile caches.
pub struct EmbedState {
    pub guest_front_end: Option<Rc<dyn GuestFrontEnd>>,
    pub host_front_end: Option<Rc<dyn HostFrontEnd>>,
    guest_cache: HashMap<SourceKey, Rc<Vec<GuestDecl>>>,
    host_cache: HashMap<SourceKey, Rc<Vec<HostDecl>>>,
    guest_cache_hits: usize,
    host_cache_hits: usize,
}

impl EmbedState {
    pub fn new() -> Self {
        Self {
            guest_front_end: None,
            host_front_end: None,
            guest_cache: HashMap::new(),
            host_cache: HashMap::new(),
            guest_cache_hits: 0,
            host_cache_hits: 0,
        }
    }

    pub fn guest_cache_hits(&self) -> usize {
        self.guest_cache_hits
    }

    pub fn host_cache_hits(&self) -> usize {
        self.host_cache_hits
    }
}

impl Default for EmbedState {
    fn default() -> Self {
        Self::new()
    }
}

fn source_key(source: &str) -> SourceKey {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.finalize().into()
}

fn compile_guest_cached(
    interp: &mut Interp,
    source: &str,
) -> Result<Rc<Vec<GuestDecl>>, GuestError> {
    let key = source_key(source);
    if let Some(decls) = interp.embed.guest_cache.get(&key) {
        interp.embed.guest_cache_hits += 1;
        return Ok(decls.clone());
    }
    let front_end = interp
        .embed
        .guest_front_end
        .clone()
        .ok_or_else(|| GuestError::Runtime("no guest front end installed".to_string()))?;
    let decls = Rc::new(front_end.compile(source)?);
    interp.embed.guest_cache.insert(key, decls.clone());
    Ok(decls)
}

fn compile_host_cached(interp: &mut Interp, source: &str) -> Result<Rc<Vec<HostDecl>>, HostError> {
    let key = source_key(source);
    if let Some(decls) = interp.embed.host_cache.get(&key) {
        interp.embed.host_cache_hits += 1;
        return Ok(decls.clone());
    }
    let front_end = interp
        .embed
        .host_front_end
        .clone()
        .ok_or_else(|| HostError::Runtime("no host front end installed".to_string()))?;
    let decls = Rc::new(front_end.compile(source)?);
    interp.embed.host_cache.insert(key, decls.clone());
    Ok(decls)
}

/// Embeds guest source at a host call site.
///
/// The host scope visible at `frame` is captured and bound as the fallback
/// resolver of a fresh guest environment; every declared function lands in
/// that environment (so siblings see each other) and — because the host's own
/// rule makes function declarations global — is also registered in the host
/// global function table as a callable proxy. Returns the proxy for the first
/// declaration.
pub fn embed_guest_func(
    interp: &mut Interp,
    frame: Option<&Rc<HostFrame>>,
    source: &str,
) -> Result<HostValue, HostError> {
    let chain = ScopeChain::capture_host(interp, frame);
    let decls = compile_guest_cached(interp, source).map_err(guest_err_to_host)?;
    let env = GuestEnv::with_fallback(chain);
    let mut first = None;
    for decl in decls.iter() {
        let func = GuestFunction::new(decl.clone(), env.clone());
        env.define(&decl.name, GuestValue::Function(func.clone()));
        let proxy = HostValue::GuestFunc(Rc::new(GuestFuncProxy::new(GuestValue::Function(func))));
        interp.trace_event("embed guest", &decl.name);
        interp.host.declare_function(&decl.name, proxy.clone());
        if first.is_none() {
            first = Some(proxy);
        }
    }
    first.ok_or_else(|| HostError::Runtime("embedded source declared no functions".to_string()))
}

/// Embeds host source at a guest call site: the mirror of
/// [`embed_guest_func`], except that nothing is installed globally — the
/// declared functions are returned as callable proxies and visible nowhere
/// else, so embedding cannot pollute the host namespace.
pub fn embed_host_func(
    interp: &mut Interp,
    env: &Rc<GuestEnv>,
    source: &str,
) -> Result<GuestValue, GuestError> {
    let chain = ScopeChain::capture_guest(env);
    let decls = compile_host_cached(interp, source).map_err(host_err_to_guest)?;
    let mut first = None;
    for decl in decls.iter() {
        let func = HostFunction::new(decl.clone(), Some(chain.clone()));
        interp.trace_event("embed host", &decl.name);
        let proxy =
            GuestValue::HostFunc(Rc::new(HostFuncProxy::new(HostValue::Function(func))));
        if first.is_none() {
            first = Some(proxy);
        }
    }
    first.ok_or_else(|| GuestError::Runtime("embedded source declared no functions".to_string()))
}

/// Imports a guest module into the host by dotted name, hopping through
/// submodule attributes; every hop is individually proxied and a missing hop
/// is the module proxy's fatal missing-member condition.
pub fn import_guest_module(interp: &mut Interp, dotted: &str) -> Result<HostValue, HostError> {
    let mut parts = dotted.split('.');
    let root = parts.next().unwrap_or(dotted);
    let module = interp
        .guest
        .module(root)
        .ok_or_else(|| guest_err_to_host(GuestError::ImportError(root.to_string())))?;
    interp.trace_event("import guest module", dotted);
    let mut current = Rc::new(GuestModuleProxy::new(module));
    for part in parts {
        match current.get_attr(part)? {
            HostValue::GuestModule(next) => current = next,
            other => {
                return Err(HostError::Foreign(format!(
                    "'{}' is not a module ({} found)",
                    part,
                    other.type_name()
                )));
            }
        }
    }
    Ok(HostValue::GuestModule(current))
}

/// The guest's global/builtin namespace, worn by the host as a generic proxy.
pub fn guest_global_ns(interp: &Interp) -> HostValue {
    HostValue::GuestObject(Rc::new(GuestObjectProxy::new(GuestValue::Module(
        interp.guest.builtins.clone(),
    ))))
}

/// The host's global namespace, worn by the guest as a generic proxy.
pub fn host_global_ns(interp: &Interp) -> GuestValue {
    GuestValue::HostNamespace(Rc::new(HostNamespaceProxy::new(
        interp.host.functions_handle(),
        interp.host.constants_handle(),
        interp.host.globals.clone(),
    )))
}
