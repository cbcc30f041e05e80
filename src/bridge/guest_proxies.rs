//! Proxies the guest runtime wears around host-owned values.
//!
//! The mirror of [`crate::bridge::host_proxies`], implementing the guest's
//! native object contract per wrapped shape. Host arrays are canonically
//! associative, so their proxy wears the mapping shape.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::bridge::convert;
use crate::bridge::host_err_to_guest;
use crate::bridge::iterate::HostArrayIter;
use crate::guest::error::GuestError;
use crate::guest::value::{DictKey, GuestValue};
use crate::host::array::HostArray;
use crate::host::error::HostError;
use crate::host::frame::HostFrame;
use crate::host::function as host_fn;
use crate::host::value::HostValue;
use crate::host::FunctionEntry;
use crate::interp::Interp;

/// Generic proxy for any host object without a narrower shape.
pub struct HostObjectProxy {
    value: HostValue,
}

impl HostObjectProxy {
    pub fn new(value: HostValue) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &HostValue {
        &self.value
    }

    /// Pure member lookup: a property converts across; a method comes back as
    /// a function proxy with the receiver already bound. Host method names
    /// resolve case-insensitively, the host language's rule.
    pub(crate) fn attr_lookup(&self, name: &str) -> Option<GuestValue> {
        match &self.value {
            HostValue::Object(instance) => {
                if let Some(prop) = instance.prop(name) {
                    Some(convert::to_guest(prop))
                } else {
                    instance.class.method(name).map(|method| {
                        GuestValue::HostFunc(Rc::new(HostFuncProxy::bound(
                            method,
                            self.value.clone(),
                        )))
                    })
                }
            }
            _ => None,
        }
    }

    /// Attribute read with the generic-proxy miss rule: an unknown name
    /// becomes a lazily bound callable, erroring at call time if it never
    /// resolves.
    pub fn get_attr(&self, name: &str) -> GuestValue {
        match self.attr_lookup(name) {
            Some(value) => value,
            None => GuestValue::HostFunc(Rc::new(HostFuncProxy::member(self.value.clone(), name))),
        }
    }

    pub fn set_attr(&self, name: &str, value: GuestValue) -> Result<(), GuestError> {
        host_fn::set_attr(&self.value, name, convert::to_host(value)).map_err(host_err_to_guest)
    }

    /// Invocation as if the proxy were a callable: the wrapped host value
    /// itself is the call target.
    pub fn call_as_function(
        &self,
        interp: &mut Interp,
        args: Vec<GuestValue>,
    ) -> Result<GuestValue, GuestError> {
        if !self.value.is_callable() {
            return Err(GuestError::NotCallable {
                type_name: self.value.type_name(),
            });
        }
        let host_args = args.into_iter().map(convert::to_host).collect();
        interp.trace_event("guest->host call", self.value.type_name());
        let result =
            host_fn::call_value(interp, &self.value, None, host_args).map_err(host_err_to_guest)?;
        Ok(convert::to_guest(result))
    }
}

impl fmt::Debug for HostObjectProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostObjectProxy({})", self.value.type_name())
    }
}

enum HostFuncTarget {
    Value(HostValue),
    Member { owner: HostValue, name: String },
}

/// Proxy for a host callable, optionally carrying a bound receiver.
///
/// The receiver travels in the host's own receiver slot rather than being
/// prepended: host functions take their receiver implicitly. The prepend
/// convention lives on the mirror proxy, whose wrapped functions expect an
/// explicit receiver parameter.
pub struct HostFuncProxy {
    target: HostFuncTarget,
    receiver: Option<HostValue>,
}

impl HostFuncProxy {
    pub fn new(callee: HostValue) -> Self {
        Self {
            target: HostFuncTarget::Value(callee),
            receiver: None,
        }
    }

    pub fn bound(callee: HostValue, receiver: HostValue) -> Self {
        Self {
            target: HostFuncTarget::Value(callee),
            receiver: Some(receiver),
        }
    }

    pub fn member(owner: HostValue, name: &str) -> Self {
        Self {
            target: HostFuncTarget::Member {
                owner: owner.clone(),
                name: name.to_string(),
            },
            receiver: Some(owner),
        }
    }

    pub fn call(
        &self,
        interp: &mut Interp,
        args: Vec<GuestValue>,
    ) -> Result<GuestValue, GuestError> {
        let callee = self.resolve_target().map_err(host_err_to_guest)?;
        if !callee.is_callable() {
            return Err(GuestError::NotCallable {
                type_name: callee.type_name(),
            });
        }
        let host_args: Vec<HostValue> = args.into_iter().map(convert::to_host).collect();
        interp.trace_event("guest->host call", callee.type_name());
        let result = host_fn::call_value(interp, &callee, self.receiver.as_ref(), host_args)
            .map_err(host_err_to_guest)?;
        Ok(convert::to_guest(result))
    }

    fn resolve_target(&self) -> Result<HostValue, HostError> {
        match &self.target {
            HostFuncTarget::Value(value) => Ok(value.clone()),
            HostFuncTarget::Member { owner, name } => host_fn::member_lookup(owner, name)
                .ok_or_else(|| HostError::MissingMember {
                    member: name.clone(),
                    owner: owner.type_name().to_string(),
                }),
        }
    }

    /// Unwraps back to the host side for the conversion engine. The host has
    /// no bound-callable value, so a receiver binding exists only on the
    /// guest side; a member that still does not resolve converts to null.
    pub(crate) fn collapse(&self) -> HostValue {
        match &self.target {
            HostFuncTarget::Value(value) => value.clone(),
            HostFuncTarget::Member { owner, name } => {
                host_fn::member_lookup(owner, name).unwrap_or(HostValue::Null)
            }
        }
    }
}

impl fmt::Debug for HostFuncProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            HostFuncTarget::Value(value) => write!(f, "HostFuncProxy({})", value.type_name()),
            HostFuncTarget::Member { name, .. } => write!(f, "HostFuncProxy(.{})", name),
        }
    }
}

/// Proxy wearing a host array as a guest mapping: length, keyed get/set,
/// append, and forward iteration over (key, value) pairs in the host's
/// insertion order.
pub struct HostArrayProxy {
    array: Rc<RefCell<HostArray>>,
}

impl HostArrayProxy {
    pub fn new(array: Rc<RefCell<HostArray>>) -> Self {
        Self { array }
    }

    pub(crate) fn handle(&self) -> &Rc<RefCell<HostArray>> {
        &self.array
    }

    pub fn len(&self) -> usize {
        self.array.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.borrow().is_empty()
    }

    pub fn get(&self, key: &DictKey) -> Result<GuestValue, GuestError> {
        let key = convert::key_to_host(key);
        self.array
            .borrow()
            .get(&key)
            .map(convert::to_guest)
            .ok_or_else(|| {
                host_err_to_guest(HostError::Runtime(format!("undefined array key {}", key)))
            })
    }

    pub fn set(&self, key: &DictKey, value: GuestValue) {
        self.array
            .borrow_mut()
            .insert(convert::key_to_host(key), convert::to_host(value));
    }

    /// Appends under the host's next free integer key, in place.
    pub fn append(&self, value: GuestValue) {
        self.array.borrow_mut().append(convert::to_host(value));
    }

    pub fn create_iter(&self) -> HostArrayIter {
        HostArrayIter::new(&self.array)
    }
}

impl fmt::Debug for HostArrayProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostArrayProxy(len {})", self.len())
    }
}

/// Proxy over the host's global namespace, letting guest code reach host
/// functions, constants, and top-level variables by name.
pub struct HostNamespaceProxy {
    functions: Rc<RefCell<HashMap<String, FunctionEntry>>>,
    constants: Rc<RefCell<HashMap<String, HostValue>>>,
    globals: Rc<HostFrame>,
}

impl HostNamespaceProxy {
    pub(crate) fn new(
        functions: Rc<RefCell<HashMap<String, FunctionEntry>>>,
        constants: Rc<RefCell<HashMap<String, HostValue>>>,
        globals: Rc<HostFrame>,
    ) -> Self {
        Self {
            functions,
            constants,
            globals,
        }
    }

    /// Resolution order matches a host global scope: variables, then the
    /// (case-insensitive) function table, then constants.
    pub(crate) fn resolve(&self, name: &str) -> Option<GuestValue> {
        if let Some(value) = self.globals.get(name) {
            return Some(convert::to_guest(value));
        }
        if let Some(entry) = self.functions.borrow().get(&name.to_lowercase()) {
            return Some(convert::to_guest(entry.value.clone()));
        }
        self.constants
            .borrow()
            .get(&name.to_lowercase())
            .map(|value| convert::to_guest(value.clone()))
    }

    pub fn get_attr(&self, name: &str) -> Result<GuestValue, GuestError> {
        self.resolve(name).ok_or_else(|| GuestError::AttributeError {
            type_name: "module".to_string(),
            attr: name.to_string(),
        })
    }
}

impl fmt::Debug for HostNamespaceProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostNamespaceProxy")
    }
}
