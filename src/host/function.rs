use std::{fmt, rc::Rc};

use crate::bridge::scope::ScopeChain;
use crate::host::error::HostError;
use crate::host::frame::HostFrame;
use crate::host::value::HostValue;
use crate::interp::Interp;

/// Body of a host function. The front end (an external collaborator) produces
/// these; tests install native bodies directly.
pub type HostBody = Rc<dyn Fn(&mut Interp, &HostCallCtx) -> Result<HostValue, HostError>>;

/// A compiled, environment-free host function declaration.
#[derive(Clone)]
pub struct HostDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: HostBody,
}

impl HostDecl {
    pub fn new<F>(name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&mut Interp, &HostCallCtx) -> Result<HostValue, HostError> + 'static,
    {
        Self {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Rc::new(body),
        }
    }
}

impl fmt::Debug for HostDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostDecl({}/{})", self.name, self.params.len())
    }
}

/// A host function: a declaration bound, for embedded code, to the scope chain
/// captured at the embedding call site.
#[derive(Debug, Clone)]
pub struct HostFunction {
    pub decl: HostDecl,
    pub fallback: Option<ScopeChain>,
}

impl HostFunction {
    pub fn new(decl: HostDecl, fallback: Option<ScopeChain>) -> Rc<Self> {
        Rc::new(Self { decl, fallback })
    }
}

/// Per-invocation context handed to a host function body.
pub struct HostCallCtx {
    pub frame: Rc<HostFrame>,
    pub this: Option<HostValue>,
}

impl HostCallCtx {
    /// Variable lookup: the frame chain, then any embedding fallback chain.
    pub fn get(&self, name: &str) -> Result<HostValue, HostError> {
        self.frame
            .resolve(name)
            .ok_or_else(|| HostError::UndefinedName(name.to_string()))
    }

    pub fn set(&self, name: &str, value: HostValue) {
        self.frame.set(name, value);
    }

    /// Call-by-name: the global function table first (the host's own rule for
    /// bare calls), then the scope chain. A chain hit that is not callable in
    /// its native runtime is a fatal error, not a silent no-op.
    pub fn call_named(
        &self,
        interp: &mut Interp,
        name: &str,
        args: Vec<HostValue>,
    ) -> Result<HostValue, HostError> {
        if let Some(func) = interp.host.function(name) {
            return call_value(interp, &func, None, args);
        }
        match self.frame.resolve(name) {
            Some(value) if value.is_callable() => call_value(interp, &value, None, args),
            Some(value) => Err(HostError::NotCallable {
                type_name: value.type_name(),
            }),
            None => Err(HostError::UndefinedName(name.to_string())),
        }
    }
}

/// Invokes any callable host value. `this` is the receiver for method-form
/// calls; a native host function sees it as its call context, a bridged guest
/// function receives it converted and prepended to the arguments.
pub fn call_value(
    interp: &mut Interp,
    callee: &HostValue,
    this: Option<&HostValue>,
    args: Vec<HostValue>,
) -> Result<HostValue, HostError> {
    match callee {
        HostValue::Function(func) => call_function(interp, func, this, args),
        HostValue::Builtin(builtin) => (builtin.func)(interp, args),
        HostValue::GuestFunc(proxy) => proxy.call(interp, this, args),
        HostValue::GuestObject(proxy) => proxy.call_as_function(interp, args),
        other => Err(HostError::NotCallable {
            type_name: other.type_name(),
        }),
    }
}

pub fn call_function(
    interp: &mut Interp,
    func: &Rc<HostFunction>,
    this: Option<&HostValue>,
    args: Vec<HostValue>,
) -> Result<HostValue, HostError> {
    let decl = &func.decl;
    if args.len() != decl.params.len() {
        return Err(HostError::Runtime(format!(
            "wrong number of arguments: want={}, got={}",
            decl.params.len(),
            args.len()
        )));
    }
    let frame = HostFrame::new(None, func.fallback.clone());
    for (param, arg) in decl.params.iter().zip(args) {
        frame.set(param, arg);
    }
    let ctx = HostCallCtx {
        frame,
        this: this.cloned(),
    };
    let body = decl.body.clone();
    body(interp, &ctx)
}

/// Calls a function from the global table by (case-insensitive) name.
pub fn call_global(
    interp: &mut Interp,
    name: &str,
    args: Vec<HostValue>,
) -> Result<HostValue, HostError> {
    let func = interp
        .host
        .function(name)
        .ok_or_else(|| HostError::UndefinedName(name.to_string()))?;
    call_value(interp, &func, None, args)
}

/// Method-form call on any host value, dispatching through the proxy layer
/// for guest-owned receivers.
pub fn call_method(
    interp: &mut Interp,
    target: &HostValue,
    name: &str,
    args: Vec<HostValue>,
) -> Result<HostValue, HostError> {
    match target {
        HostValue::Object(instance) => {
            let method = instance.class.method(name).ok_or_else(|| {
                HostError::Runtime(format!(
                    "call to undefined method {}::{}",
                    instance.class.name, name
                ))
            })?;
            call_value(interp, &method, Some(target), args)
        }
        HostValue::GuestObject(proxy) => proxy.call_method(interp, name, args),
        HostValue::GuestModule(proxy) => {
            let func = proxy.get_attr(name)?;
            if !func.is_callable() {
                return Err(HostError::NotCallable {
                    type_name: func.type_name(),
                });
            }
            call_value(interp, &func, None, args)
        }
        other => Err(HostError::Runtime(format!(
            "cannot call a method on {}",
            other.type_name()
        ))),
    }
}

/// Member lookup on a native host value without invoking anything: property
/// first (case-sensitive), then class method (case-insensitive). Pure.
pub fn member_lookup(target: &HostValue, name: &str) -> Option<HostValue> {
    match target {
        HostValue::Object(instance) => instance
            .prop(name)
            .filter(|value| value.is_callable())
            .or_else(|| instance.class.method(name)),
        _ => None,
    }
}

/// Attribute read. Reading a missing property of a native object yields null,
/// the host language's own rule; proxies apply their own miss behavior.
pub fn get_attr(target: &HostValue, name: &str) -> Result<HostValue, HostError> {
    match target {
        HostValue::Object(instance) => Ok(instance.prop(name).unwrap_or(HostValue::Null)),
        HostValue::GuestObject(proxy) => Ok(proxy.get_attr(name)),
        HostValue::GuestModule(proxy) => proxy.get_attr(name),
        other => Err(HostError::Runtime(format!(
            "cannot read a property of {}",
            other.type_name()
        ))),
    }
}

/// Attribute write, mirrored across the boundary for proxied receivers.
pub fn set_attr(target: &HostValue, name: &str, value: HostValue) -> Result<(), HostError> {
    match target {
        HostValue::Object(instance) => {
            instance.set_prop(name, value);
            Ok(())
        }
        HostValue::GuestObject(proxy) => proxy.set_attr(name, value),
        HostValue::GuestModule(proxy) => {
            proxy.module().set_attr(name, crate::bridge::convert::to_guest(value));
            Ok(())
        }
        other => Err(HostError::Runtime(format!(
            "cannot write a property of {}",
            other.type_name()
        ))),
    }
}
