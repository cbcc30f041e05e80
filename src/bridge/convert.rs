use std::rc::Rc;

use crate::bridge::guest_proxies::{HostArrayProxy, HostFuncProxy, HostObjectProxy};
use crate::bridge::host_proxies::{
    GuestDictProxy, GuestFuncProxy, GuestListProxy, GuestModuleProxy, GuestObjectProxy,
};
use crate::guest::value::{DictKey, GuestValue};
use crate::host::array::ArrayKey;
use crate::host::value::HostValue;

/// Converts a guest value into the host's representation of it.
///
/// Primitives convert by value with no residual linkage between the copies.
/// A proxy wrapping a host value unwraps back to that value, so round trips
/// never nest proxies. Everything else is wrapped in the narrowest proxy for
/// its shape. Total: there is no unconvertible value.
pub fn to_host(value: GuestValue) -> HostValue {
    match value {
        GuestValue::Int(v) => HostValue::Int(v),
        GuestValue::Float(v) => HostValue::Float(v),
        GuestValue::Bool(v) => HostValue::Bool(v),
        GuestValue::Str(v) => HostValue::Str(v),
        GuestValue::None => HostValue::Null,
        GuestValue::List(items) => HostValue::GuestList(Rc::new(GuestListProxy::new(items))),
        GuestValue::Dict(dict) => HostValue::GuestDict(Rc::new(GuestDictProxy::new(dict))),
        GuestValue::Module(module) => {
            HostValue::GuestModule(Rc::new(GuestModuleProxy::new(module)))
        }
        GuestValue::Function(func) => HostValue::GuestFunc(Rc::new(GuestFuncProxy::new(
            GuestValue::Function(func),
        ))),
        GuestValue::Builtin(builtin) => HostValue::GuestFunc(Rc::new(GuestFuncProxy::new(
            GuestValue::Builtin(builtin),
        ))),
        GuestValue::HostObject(proxy) => proxy.value().clone(),
        GuestValue::HostFunc(proxy) => proxy.collapse(),
        GuestValue::HostMap(proxy) => HostValue::Array(proxy.handle().clone()),
        // A namespace view has no single host identity to unwrap to; the host
        // wears it as a generic proxy and attribute reads keep working.
        GuestValue::HostNamespace(proxy) => HostValue::GuestObject(Rc::new(
            GuestObjectProxy::new(GuestValue::HostNamespace(proxy)),
        )),
        GuestValue::Object(instance) => HostValue::GuestObject(Rc::new(GuestObjectProxy::new(
            GuestValue::Object(instance),
        ))),
    }
}

/// Converts a host value into the guest's representation of it.
/// The exact mirror of [`to_host`].
pub fn to_guest(value: HostValue) -> GuestValue {
    match value {
        HostValue::Int(v) => GuestValue::Int(v),
        HostValue::Float(v) => GuestValue::Float(v),
        HostValue::Bool(v) => GuestValue::Bool(v),
        HostValue::Str(v) => GuestValue::Str(v),
        HostValue::Null => GuestValue::None,
        // Host arrays are canonically associative, so they wear the mapping
        // shape on the guest side.
        HostValue::Array(array) => GuestValue::HostMap(Rc::new(HostArrayProxy::new(array))),
        HostValue::Object(instance) => GuestValue::HostObject(Rc::new(HostObjectProxy::new(
            HostValue::Object(instance),
        ))),
        HostValue::Function(func) => GuestValue::HostFunc(Rc::new(HostFuncProxy::new(
            HostValue::Function(func),
        ))),
        HostValue::Builtin(builtin) => GuestValue::HostFunc(Rc::new(HostFuncProxy::new(
            HostValue::Builtin(builtin),
        ))),
        HostValue::GuestObject(proxy) => proxy.value().clone(),
        HostValue::GuestFunc(proxy) => proxy.collapse(),
        HostValue::GuestModule(proxy) => GuestValue::Module(proxy.module().clone()),
        HostValue::GuestList(proxy) => GuestValue::List(proxy.handle().clone()),
        HostValue::GuestDict(proxy) => GuestValue::Dict(proxy.handle().clone()),
    }
}

pub fn key_to_guest(key: &ArrayKey) -> DictKey {
    match key {
        ArrayKey::Int(v) => DictKey::Int(*v),
        ArrayKey::Str(v) => DictKey::Str(v.clone()),
    }
}

pub fn key_to_host(key: &DictKey) -> ArrayKey {
    match key {
        DictKey::Int(v) => ArrayKey::Int(*v),
        DictKey::Str(v) => ArrayKey::Str(v.clone()),
    }
}
