//! Proxy layer behavior: aliasing, attribute and method dispatch across the
//! boundary, the lazy member rule, and the callability guard.

use std::cell::RefCell;
use std::rc::Rc;

use causeway::bridge::convert::{to_guest, to_host};
use causeway::bridge::host_proxies::GuestObjectProxy;
use causeway::guest::env::GuestEnv;
use causeway::guest::error::GuestError;
use causeway::guest::function::{self as guest_fn, GuestDecl, GuestFunction};
use causeway::guest::value::{DictKey, GuestDict, GuestInstance, GuestValue};
use causeway::host::array::{ArrayKey, HostArray};
use causeway::host::class::{HostClass, HostInstance};
use causeway::host::error::HostError;
use causeway::host::function::{self as host_fn, HostDecl, HostFunction};
use causeway::host::value::HostValue;
use causeway::interp::Interp;

mod common;
use common::{guest_int, host_int, host_str};

#[test]
fn test_append_through_proxy_aliases_the_guest_list() {
    let mut interp = Interp::new();
    let storage = Rc::new(RefCell::new(vec![GuestValue::Int(1)]));
    let crossed = to_host(GuestValue::List(storage.clone()));

    match &crossed {
        HostValue::GuestList(proxy) => proxy.append(HostValue::Int(2)),
        other => panic!("expected guest list proxy, got {}", other.type_name()),
    }

    // The guest's own handle observes the appended element: no copy was made.
    {
        let native = storage.borrow();
        assert_eq!(native.len(), 2);
        assert_eq!(native[1], GuestValue::Int(2));
    }

    // The host's own count builtin reads the live guest collection too.
    let count = host_fn::call_global(&mut interp, "count", vec![crossed]).unwrap();
    assert_eq!(host_int(&count), 2);
}

#[test]
fn test_sequence_proxy_indexing() {
    let storage = Rc::new(RefCell::new(vec![GuestValue::Int(1), GuestValue::Int(2)]));
    let proxy = match to_host(GuestValue::List(storage.clone())) {
        HostValue::GuestList(proxy) => proxy,
        other => panic!("expected guest list proxy, got {}", other.type_name()),
    };

    assert_eq!(proxy.len(), 2);
    assert_eq!(host_int(&proxy.get(0).unwrap()), 1);

    proxy.set(1, HostValue::Int(9)).unwrap();
    assert_eq!(storage.borrow()[1], GuestValue::Int(9));

    let err = proxy.get(5).unwrap_err();
    assert!(matches!(err, HostError::Foreign(_)));
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_mapping_proxy_keyed_access() {
    let storage = Rc::new(RefCell::new(GuestDict::from_pairs([
        (DictKey::Str("a".to_string()), GuestValue::Int(1)),
        (DictKey::Int(2), GuestValue::Str("two".into())),
    ])));
    let proxy = match to_host(GuestValue::Dict(storage.clone())) {
        HostValue::GuestDict(proxy) => proxy,
        other => panic!("expected guest dict proxy, got {}", other.type_name()),
    };

    assert_eq!(proxy.len(), 2);
    assert_eq!(
        host_int(&proxy.get(&ArrayKey::Str("a".to_string())).unwrap()),
        1
    );
    assert_eq!(host_str(&proxy.get(&ArrayKey::Int(2)).unwrap()), "two");

    proxy.set(&ArrayKey::Str("b".to_string()), HostValue::Int(3));
    assert_eq!(
        storage.borrow().get(&DictKey::Str("b".to_string())),
        Some(GuestValue::Int(3))
    );

    let err = proxy.get(&ArrayKey::Str("missing".to_string())).unwrap_err();
    assert!(matches!(err, HostError::Foreign(_)));
    assert!(err.to_string().contains("KeyError"));
}

#[test]
fn test_host_array_proxy_from_guest_side() {
    let storage = Rc::new(RefCell::new(HostArray::from_pairs([
        (ArrayKey::Str("name".to_string()), HostValue::Str("x".into())),
    ])));
    let proxy = match to_guest(HostValue::Array(storage.clone())) {
        GuestValue::HostMap(proxy) => proxy,
        other => panic!("expected host array proxy, got {}", other.type_name()),
    };

    assert_eq!(proxy.len(), 1);
    assert_eq!(
        proxy.get(&DictKey::Str("name".to_string())).unwrap(),
        GuestValue::Str("x".into())
    );

    proxy.set(&DictKey::Int(0), GuestValue::Int(5));
    proxy.append(GuestValue::Int(6));
    assert_eq!(
        storage.borrow().get(&ArrayKey::Int(1)),
        Some(HostValue::Int(6))
    );

    let err = proxy.get(&DictKey::Str("missing".to_string())).unwrap_err();
    assert!(matches!(err, GuestError::Foreign(_)));
    assert!(err.to_string().contains("undefined array key"));
}

fn host_object_with_method() -> HostValue {
    let class = HostClass::new("C");
    let method = HostDecl::new("m", &[], |_interp, ctx| match &ctx.this {
        Some(HostValue::Object(instance)) => {
            Ok(instance.prop("x").unwrap_or(HostValue::Null))
        }
        _ => Ok(HostValue::Null),
    });
    class.add_method("m", HostValue::Function(HostFunction::new(method, None)));
    let instance = HostInstance::new(class);
    instance.set_prop("x", HostValue::Int(2));
    HostValue::Object(instance)
}

#[test]
fn test_guest_reads_and_writes_host_attributes() {
    let obj = host_object_with_method();
    let crossed = to_guest(obj.clone());

    assert_eq!(guest_int(&guest_fn::get_attr(&crossed, "x").unwrap()), 2);

    guest_fn::set_attr(&crossed, "x", GuestValue::Int(3)).unwrap();
    match &obj {
        HostValue::Object(instance) => {
            assert_eq!(instance.prop("x"), Some(HostValue::Int(3)));
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_guest_calls_host_method_case_insensitively() {
    let mut interp = Interp::new();
    let crossed = to_guest(host_object_with_method());

    for spelling in ["m", "M"] {
        let method = guest_fn::get_attr(&crossed, spelling).unwrap();
        assert!(method.is_callable());
        let result = guest_fn::call_value(&mut interp, &method, vec![]).unwrap();
        assert_eq!(guest_int(&result), 2);
    }
}

#[test]
fn test_generic_attr_miss_becomes_lazy_callable() {
    let mut interp = Interp::new();
    let crossed = to_guest(host_object_with_method());

    // The miss itself is not an error: the unknown name is treated as a
    // candidate method call, and the failure surfaces at invocation time.
    let missing = guest_fn::get_attr(&crossed, "absent").unwrap();
    assert!(matches!(missing, GuestValue::HostFunc(_)));

    let err = guest_fn::call_value(&mut interp, &missing, vec![]).unwrap_err();
    assert!(matches!(err, GuestError::Foreign(_)));
    assert!(err.to_string().contains("no such member"));
}

#[test]
fn test_host_side_generic_attr_miss_is_lazy_too() {
    let mut interp = Interp::new();
    let instance = GuestInstance::new("Point");
    instance.set_attr("x", GuestValue::Int(1));
    let crossed = to_host(GuestValue::Object(instance));

    assert_eq!(host_int(&host_fn::get_attr(&crossed, "x").unwrap()), 1);

    let missing = host_fn::get_attr(&crossed, "absent").unwrap();
    assert!(matches!(missing, HostValue::GuestFunc(_)));

    let err = host_fn::call_value(&mut interp, &missing, None, vec![]).unwrap_err();
    assert!(matches!(err, HostError::Foreign(_)));
    assert!(err.to_string().contains("has no attribute"));
}

#[test]
fn test_method_receiver_is_prepended_for_guest_functions() {
    let mut interp = Interp::new();

    // A guest function installed as a host method expects an explicit
    // receiver parameter; the proxy prepends the converted receiver.
    let scale = GuestDecl::new("scale", &["self", "n"], |_interp, ctx| {
        let receiver = ctx.lookup("self")?;
        let x = guest_fn::get_attr(&receiver, "x")?;
        Ok(GuestValue::Int(guest_int(&x) * guest_int(&ctx.lookup("n")?)))
    });
    let scale = GuestValue::Function(GuestFunction::new(scale, GuestEnv::root()));

    let class = HostClass::new("C");
    class.add_method("scale", to_host(scale));
    let instance = HostInstance::new(class);
    instance.set_prop("x", HostValue::Int(2));
    let obj = HostValue::Object(instance);

    let result = host_fn::call_method(&mut interp, &obj, "scale", vec![HostValue::Int(10)]).unwrap();
    assert_eq!(host_int(&result), 20);
}

#[test]
fn test_calling_a_non_callable_generic_proxy_is_fatal() {
    let mut interp = Interp::new();
    let instance = GuestInstance::new("Plain");
    let crossed = to_host(GuestValue::Object(instance));

    let err = host_fn::call_value(&mut interp, &crossed, None, vec![]).unwrap_err();
    assert!(matches!(err, HostError::NotCallable { .. }));
}

#[test]
fn test_generic_proxy_around_callable_invokes_the_wrapped_value() {
    let mut interp = Interp::new();
    let decl = GuestDecl::new("g", &[], |_interp, _ctx| Ok(GuestValue::Int(42)));
    let callable = GuestValue::Function(GuestFunction::new(decl, GuestEnv::root()));

    let proxy = HostValue::GuestObject(Rc::new(GuestObjectProxy::new(callable)));
    assert!(proxy.is_callable());

    let result = host_fn::call_value(&mut interp, &proxy, None, vec![]).unwrap();
    assert_eq!(host_int(&result), 42);
}

#[test]
fn test_method_call_through_generic_proxy_fetches_attr_then_calls() {
    let mut interp = Interp::new();
    let instance = GuestInstance::new("Greeter");
    let greet = GuestDecl::new("greet", &[], |_interp, _ctx| {
        Ok(GuestValue::Str("hello".into()))
    });
    instance.set_attr(
        "greet",
        GuestValue::Function(GuestFunction::new(greet, GuestEnv::root())),
    );
    let crossed = to_host(GuestValue::Object(instance));

    let result = host_fn::call_method(&mut interp, &crossed, "greet", vec![]).unwrap();
    assert_eq!(host_str(&result), "hello");

    let err = host_fn::call_method(&mut interp, &crossed, "absent", vec![]).unwrap_err();
    assert!(matches!(err, HostError::Foreign(_)));
}

#[test]
fn test_foreign_failure_carries_the_original_message() {
    let mut interp = Interp::new();
    let failing = GuestDecl::new("boom", &[], |_interp, _ctx| {
        Err(GuestError::TypeError("unsupported operand".to_string()))
    });
    let crossed = to_host(GuestValue::Function(GuestFunction::new(
        failing,
        GuestEnv::root(),
    )));

    let err = host_fn::call_value(&mut interp, &crossed, None, vec![]).unwrap_err();
    match err {
        HostError::Foreign(message) => assert!(message.contains("unsupported operand")),
        other => panic!("expected a foreign failure, got {}", other),
    }
}
