use std::{fmt, rc::Rc};

use crate::bridge::guest_proxies::HostFuncProxy;
use crate::guest::env::GuestEnv;
use crate::guest::error::GuestError;
use crate::guest::value::GuestValue;
use crate::interp::Interp;

/// Body of a guest function. The front end (an external collaborator)
/// produces these; tests install native bodies directly.
pub type GuestBody = Rc<dyn Fn(&mut Interp, &GuestCallCtx) -> Result<GuestValue, GuestError>>;

/// A compiled, environment-free guest function declaration. Binding to an
/// environment happens per embedding, so a cached declaration never carries
/// scope.
#[derive(Clone)]
pub struct GuestDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: GuestBody,
}

impl GuestDecl {
    pub fn new<F>(name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&mut Interp, &GuestCallCtx) -> Result<GuestValue, GuestError> + 'static,
    {
        Self {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Rc::new(body),
        }
    }
}

impl fmt::Debug for GuestDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestDecl({}/{})", self.name, self.params.len())
    }
}

/// A guest function: a declaration closed over its defining environment.
#[derive(Clone)]
pub struct GuestFunction {
    pub decl: GuestDecl,
    pub env: Rc<GuestEnv>,
}

impl GuestFunction {
    pub fn new(decl: GuestDecl, env: Rc<GuestEnv>) -> Rc<Self> {
        Rc::new(Self { decl, env })
    }
}

impl fmt::Debug for GuestFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.decl.name)
    }
}

/// Per-invocation context handed to a guest function body. Parameters are
/// bound into `env`, a child of the function's defining environment.
pub struct GuestCallCtx {
    pub env: Rc<GuestEnv>,
}

impl GuestCallCtx {
    pub fn lookup(&self, name: &str) -> Result<GuestValue, GuestError> {
        self.env.lookup(name)
    }

    /// Call-by-name through the lexical chain. A hit that is not callable in
    /// its native runtime is an error, never a silent no-op.
    pub fn call_named(
        &self,
        interp: &mut Interp,
        name: &str,
        args: Vec<GuestValue>,
    ) -> Result<GuestValue, GuestError> {
        let callee = self.env.lookup(name)?;
        if !callee.is_callable() {
            return Err(GuestError::NotCallable {
                type_name: callee.type_name(),
            });
        }
        call_value(interp, &callee, args)
    }
}

/// Invokes any callable guest value.
pub fn call_value(
    interp: &mut Interp,
    callee: &GuestValue,
    args: Vec<GuestValue>,
) -> Result<GuestValue, GuestError> {
    match callee {
        GuestValue::Function(func) => call_function(interp, func, args),
        GuestValue::Builtin(builtin) => (builtin.func)(interp, args),
        GuestValue::HostFunc(proxy) => proxy.call(interp, args),
        GuestValue::HostObject(proxy) => proxy.call_as_function(interp, args),
        other => Err(GuestError::NotCallable {
            type_name: other.type_name(),
        }),
    }
}

pub fn call_function(
    interp: &mut Interp,
    func: &Rc<GuestFunction>,
    args: Vec<GuestValue>,
) -> Result<GuestValue, GuestError> {
    let decl = &func.decl;
    if args.len() != decl.params.len() {
        return Err(GuestError::TypeError(format!(
            "{}() takes {} arguments ({} given)",
            decl.name,
            decl.params.len(),
            args.len()
        )));
    }
    let env = GuestEnv::child(&func.env);
    for (param, arg) in decl.params.iter().zip(args) {
        env.define(param, arg);
    }
    let ctx = GuestCallCtx { env };
    let body = decl.body.clone();
    body(interp, &ctx)
}

/// Attribute lookup on a native or proxied guest value without invoking
/// anything. Pure; returns `None` on miss.
pub fn attr_lookup(target: &GuestValue, name: &str) -> Option<GuestValue> {
    match target {
        GuestValue::Object(instance) => instance.attr(name),
        GuestValue::Module(module) => module.attr(name),
        GuestValue::HostObject(proxy) => proxy.attr_lookup(name),
        GuestValue::HostNamespace(proxy) => proxy.resolve(name),
        _ => None,
    }
}

/// Attribute read. A miss on a proxied host object yields a lazily bound
/// callable (the generic-proxy rule: unknown identifiers are candidate method
/// calls); a miss anywhere else is the guest's attribute-miss condition.
pub fn get_attr(target: &GuestValue, name: &str) -> Result<GuestValue, GuestError> {
    if let Some(value) = attr_lookup(target, name) {
        return Ok(value);
    }
    match target {
        GuestValue::HostObject(proxy) => Ok(GuestValue::HostFunc(Rc::new(HostFuncProxy::member(
            proxy.value().clone(),
            name,
        )))),
        other => Err(GuestError::AttributeError {
            type_name: other.type_name().to_string(),
            attr: name.to_string(),
        }),
    }
}

/// Attribute write, mirrored across the boundary for proxied targets.
pub fn set_attr(target: &GuestValue, name: &str, value: GuestValue) -> Result<(), GuestError> {
    match target {
        GuestValue::Object(instance) => {
            instance.set_attr(name, value);
            Ok(())
        }
        GuestValue::Module(module) => {
            module.set_attr(name, value);
            Ok(())
        }
        GuestValue::HostObject(proxy) => proxy.set_attr(name, value),
        other => Err(GuestError::TypeError(format!(
            "cannot set attribute '{}' on '{}' object",
            name,
            other.type_name()
        ))),
    }
}

/// Indexed read on guest collections, used by the item-access primitives.
pub fn get_item(target: &GuestValue, index: &GuestValue) -> Result<GuestValue, GuestError> {
    match (target, index) {
        (GuestValue::List(items), GuestValue::Int(i)) => {
            let items = items.borrow();
            if *i < 0 || *i as usize >= items.len() {
                return Err(GuestError::IndexError {
                    index: *i,
                    len: items.len(),
                });
            }
            Ok(items[*i as usize].clone())
        }
        (GuestValue::Dict(dict), key) => {
            let key = value_to_dict_key(key)?;
            dict.borrow()
                .get(&key)
                .ok_or_else(|| GuestError::KeyError(key.to_string()))
        }
        (other, _) => Err(GuestError::TypeError(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

/// Indexed write on guest collections, the mirror of [`get_item`].
pub fn set_item(
    target: &GuestValue,
    index: &GuestValue,
    value: GuestValue,
) -> Result<(), GuestError> {
    match (target, index) {
        (GuestValue::List(items), GuestValue::Int(i)) => {
            let mut items = items.borrow_mut();
            if *i < 0 || *i as usize >= items.len() {
                return Err(GuestError::IndexError {
                    index: *i,
                    len: items.len(),
                });
            }
            items[*i as usize] = value;
            Ok(())
        }
        (GuestValue::Dict(dict), key) => {
            let key = value_to_dict_key(key)?;
            dict.borrow_mut().insert(key, value);
            Ok(())
        }
        (other, _) => Err(GuestError::TypeError(format!(
            "'{}' object does not support item assignment",
            other.type_name()
        ))),
    }
}

pub(crate) fn value_to_dict_key(value: &GuestValue) -> Result<crate::guest::value::DictKey, GuestError> {
    use crate::guest::value::DictKey;
    match value {
        GuestValue::Int(v) => Ok(DictKey::Int(*v)),
        GuestValue::Str(v) => Ok(DictKey::Str(v.to_string())),
        other => Err(GuestError::TypeError(format!(
            "unhashable key type: '{}'",
            other.type_name()
        ))),
    }
}
