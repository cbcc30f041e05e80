//! Proxies the host runtime wears around guest-owned values.
//!
//! Each variant implements the slice of the host's native object contract
//! that its shape supports (attribute access, invocation, indexing,
//! iteration), delegating to the wrapped guest value through the conversion
//! engine. The wrapped value is shared, never copied: mutation through a
//! proxy is immediately visible through the guest's own handle.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::bridge::convert;
use crate::bridge::guest_err_to_host;
use crate::bridge::iterate::{GuestDictIter, GuestListIter};
use crate::guest::error::GuestError;
use crate::guest::function as guest_fn;
use crate::guest::module::GuestModule;
use crate::guest::value::{GuestDict, GuestValue};
use crate::host::array::ArrayKey;
use crate::host::error::HostError;
use crate::host::value::HostValue;
use crate::interp::Interp;

/// Generic proxy for any guest object without a narrower shape.
pub struct GuestObjectProxy {
    value: GuestValue,
}

impl GuestObjectProxy {
    pub fn new(value: GuestValue) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &GuestValue {
        &self.value
    }

    /// Attribute read. A hit converts across the boundary; a miss yields a
    /// lazily bound function proxy, because from the host's point of view an
    /// unknown identifier on a guest object is a candidate method call. Any
    /// error therefore surfaces at call time, not here.
    pub fn get_attr(&self, name: &str) -> HostValue {
        match guest_fn::attr_lookup(&self.value, name) {
            Some(value) => convert::to_host(value),
            None => HostValue::GuestFunc(Rc::new(GuestFuncProxy::member(self.value.clone(), name))),
        }
    }

    pub fn set_attr(&self, name: &str, value: HostValue) -> Result<(), HostError> {
        guest_fn::set_attr(&self.value, name, convert::to_guest(value)).map_err(guest_err_to_host)
    }

    /// Method-form call: fetch the guest attribute of the same name and
    /// invoke it with the converted arguments.
    pub fn call_method(
        &self,
        interp: &mut Interp,
        name: &str,
        args: Vec<HostValue>,
    ) -> Result<HostValue, HostError> {
        let callee = guest_fn::attr_lookup(&self.value, name).ok_or_else(|| {
            guest_err_to_host(GuestError::AttributeError {
                type_name: self.value.type_name().to_string(),
                attr: name.to_string(),
            })
        })?;
        if !callee.is_callable() {
            return Err(HostError::NotCallable {
                type_name: callee.type_name(),
            });
        }
        let guest_args = args.into_iter().map(convert::to_guest).collect();
        interp.trace_event("host->guest method", name);
        let result =
            guest_fn::call_value(interp, &callee, guest_args).map_err(guest_err_to_host)?;
        Ok(convert::to_host(result))
    }

    /// Invocation as if the proxy were a closure: the wrapped guest value
    /// itself is the call target.
    pub fn call_as_function(
        &self,
        interp: &mut Interp,
        args: Vec<HostValue>,
    ) -> Result<HostValue, HostError> {
        if !self.value.is_callable() {
            return Err(HostError::NotCallable {
                type_name: self.value.type_name(),
            });
        }
        let guest_args = args.into_iter().map(convert::to_guest).collect();
        interp.trace_event("host->guest call", self.value.type_name());
        let result =
            guest_fn::call_value(interp, &self.value, guest_args).map_err(guest_err_to_host)?;
        Ok(convert::to_host(result))
    }

    /// The host's make-callable hook: a function proxy bound to a named
    /// attribute, resolved at invocation time.
    pub fn make_callable(&self, name: &str) -> GuestFuncProxy {
        GuestFuncProxy::member(self.value.clone(), name)
    }
}

impl fmt::Debug for GuestObjectProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestObjectProxy({})", self.value.type_name())
    }
}

enum GuestFuncTarget {
    Value(GuestValue),
    Member { owner: GuestValue, name: String },
}

/// Proxy for a guest callable, or for a named attribute bound lazily.
pub struct GuestFuncProxy {
    target: GuestFuncTarget,
}

impl GuestFuncProxy {
    pub fn new(callee: GuestValue) -> Self {
        Self {
            target: GuestFuncTarget::Value(callee),
        }
    }

    pub fn member(owner: GuestValue, name: &str) -> Self {
        Self {
            target: GuestFuncTarget::Member {
                owner,
                name: name.to_string(),
            },
        }
    }

    /// Invokes the wrapped guest callable. With a receiver (method-call
    /// form), the converted receiver is prepended as the first positional
    /// argument — the guest convention for functions serving as methods.
    pub fn call(
        &self,
        interp: &mut Interp,
        this: Option<&HostValue>,
        args: Vec<HostValue>,
    ) -> Result<HostValue, HostError> {
        let callee = self.resolve_target().map_err(guest_err_to_host)?;
        if !callee.is_callable() {
            return Err(HostError::NotCallable {
                type_name: callee.type_name(),
            });
        }
        let mut guest_args = Vec::with_capacity(args.len() + 1);
        if let Some(receiver) = this {
            guest_args.push(convert::to_guest(receiver.clone()));
        }
        guest_args.extend(args.into_iter().map(convert::to_guest));
        interp.trace_event("host->guest call", callee.type_name());
        let result =
            guest_fn::call_value(interp, &callee, guest_args).map_err(guest_err_to_host)?;
        Ok(convert::to_host(result))
    }

    fn resolve_target(&self) -> Result<GuestValue, GuestError> {
        match &self.target {
            GuestFuncTarget::Value(value) => Ok(value.clone()),
            GuestFuncTarget::Member { owner, name } => {
                guest_fn::attr_lookup(owner, name).ok_or_else(|| GuestError::AttributeError {
                    type_name: owner.type_name().to_string(),
                    attr: name.clone(),
                })
            }
        }
    }

    /// Unwraps back to the guest side for the conversion engine. A lazily
    /// bound member that still does not resolve converts to none; there is no
    /// guest value left to stand in for it.
    pub(crate) fn collapse(&self) -> GuestValue {
        match &self.target {
            GuestFuncTarget::Value(value) => value.clone(),
            GuestFuncTarget::Member { owner, name } => {
                guest_fn::attr_lookup(owner, name).unwrap_or(GuestValue::None)
            }
        }
    }
}

impl fmt::Debug for GuestFuncProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            GuestFuncTarget::Value(value) => write!(f, "GuestFuncProxy({})", value.type_name()),
            GuestFuncTarget::Member { name, .. } => write!(f, "GuestFuncProxy(.{})", name),
        }
    }
}

/// Proxy for a guest module. Unlike the generic proxy, a missing member here
/// is a fatal condition rather than a candidate method call.
pub struct GuestModuleProxy {
    module: Rc<GuestModule>,
}

impl GuestModuleProxy {
    pub fn new(module: Rc<GuestModule>) -> Self {
        Self { module }
    }

    pub fn module(&self) -> &Rc<GuestModule> {
        &self.module
    }

    pub fn get_attr(&self, name: &str) -> Result<HostValue, HostError> {
        self.module
            .attr(name)
            .map(convert::to_host)
            .ok_or_else(|| HostError::MissingMember {
                member: name.to_string(),
                owner: format!("module {}", self.module.name),
            })
    }
}

impl fmt::Debug for GuestModuleProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestModuleProxy({})", self.module.name)
    }
}

/// Proxy wearing a guest list as a host array: length, integer-indexed
/// get/set, append, and forward iteration.
pub struct GuestListProxy {
    list: Rc<RefCell<Vec<GuestValue>>>,
}

impl GuestListProxy {
    pub fn new(list: Rc<RefCell<Vec<GuestValue>>>) -> Self {
        Self { list }
    }

    pub(crate) fn handle(&self) -> &Rc<RefCell<Vec<GuestValue>>> {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.borrow().is_empty()
    }

    pub fn get(&self, index: i64) -> Result<HostValue, HostError> {
        let list = self.list.borrow();
        if index < 0 || index as usize >= list.len() {
            return Err(guest_err_to_host(GuestError::IndexError {
                index,
                len: list.len(),
            }));
        }
        Ok(convert::to_host(list[index as usize].clone()))
    }

    pub fn set(&self, index: i64, value: HostValue) -> Result<(), HostError> {
        let mut list = self.list.borrow_mut();
        if index < 0 || index as usize >= list.len() {
            return Err(guest_err_to_host(GuestError::IndexError {
                index,
                len: list.len(),
            }));
        }
        list[index as usize] = convert::to_guest(value);
        Ok(())
    }

    /// Appends to the wrapped guest list in place; the guest observes the new
    /// element through its own handle.
    pub fn append(&self, value: HostValue) {
        self.list.borrow_mut().push(convert::to_guest(value));
    }

    pub fn create_iter(&self) -> GuestListIter {
        GuestListIter::new(&self.list)
    }
}

impl fmt::Debug for GuestListProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestListProxy(len {})", self.len())
    }
}

/// Proxy wearing a guest dict as a host array: length, keyed get/set, and
/// forward iteration over (key, value) pairs in the guest's insertion order.
pub struct GuestDictProxy {
    dict: Rc<RefCell<GuestDict>>,
}

impl GuestDictProxy {
    pub fn new(dict: Rc<RefCell<GuestDict>>) -> Self {
        Self { dict }
    }

    pub(crate) fn handle(&self) -> &Rc<RefCell<GuestDict>> {
        &self.dict
    }

    pub fn len(&self) -> usize {
        self.dict.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.borrow().is_empty()
    }

    pub fn get(&self, key: &ArrayKey) -> Result<HostValue, HostError> {
        let key = convert::key_to_guest(key);
        self.dict
            .borrow()
            .get(&key)
            .map(convert::to_host)
            .ok_or_else(|| guest_err_to_host(GuestError::KeyError(key.to_string())))
    }

    pub fn set(&self, key: &ArrayKey, value: HostValue) {
        self.dict
            .borrow_mut()
            .insert(convert::key_to_guest(key), convert::to_guest(value));
    }

    pub fn create_iter(&self) -> GuestDictIter {
        GuestDictIter::new(&self.dict)
    }
}

impl fmt::Debug for GuestDictProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestDictProxy(len {})", self.len())
    }
}
