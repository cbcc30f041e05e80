//! Module import and global-namespace bridging: dotted imports, nested
//! attribute hops, the fatal missing-member rule, and builtin call-through.

use causeway::bridge::embed::{guest_global_ns, host_global_ns, import_guest_module};
use causeway::guest::env::GuestEnv;
use causeway::guest::error::GuestError;
use causeway::guest::function::{self as guest_fn, GuestDecl, GuestFunction};
use causeway::guest::module::GuestModule;
use causeway::guest::value::GuestValue;
use causeway::host::error::HostError;
use causeway::host::function as host_fn;
use causeway::host::value::HostValue;
use causeway::interp::Interp;

mod common;
use common::{guest_int, guest_str, host_str};

fn register_geometry(interp: &Interp) {
    let geo = GuestModule::new("geo");
    geo.set_attr("pi", GuestValue::Float(std::f64::consts::PI));
    geo.set_attr("version", GuestValue::Int(1));

    let shapes = GuestModule::new("shapes");
    let join = GuestDecl::new("join", &["a", "b"], |_interp, ctx| {
        let a = guest_str(&ctx.lookup("a")?);
        let b = guest_str(&ctx.lookup("b")?);
        Ok(GuestValue::Str(format!("{}/{}", a, b).into()))
    });
    shapes.set_attr(
        "join",
        GuestValue::Function(GuestFunction::new(join, GuestEnv::root())),
    );
    geo.set_attr("shapes", GuestValue::Module(shapes));

    interp.guest.register_module(geo);
}

#[test]
fn test_imported_module_exposes_attributes() {
    let mut interp = Interp::new();
    register_geometry(&interp);

    let module = import_guest_module(&mut interp, "geo").unwrap();
    let pi = host_fn::get_attr(&module, "pi").unwrap();
    assert_eq!(pi, HostValue::Float(std::f64::consts::PI));
}

#[test]
fn test_dotted_import_resolves_nested_module() {
    let mut interp = Interp::new();
    register_geometry(&interp);

    let shapes = import_guest_module(&mut interp, "geo.shapes").unwrap();
    let result = host_fn::call_method(
        &mut interp,
        &shapes,
        "join",
        vec![HostValue::Str("a".into()), HostValue::Str("b".into())],
    )
    .unwrap();
    assert_eq!(host_str(&result), "a/b");
}

#[test]
fn test_submodule_reachable_through_attribute_hops() {
    let mut interp = Interp::new();
    register_geometry(&interp);

    let geo = import_guest_module(&mut interp, "geo").unwrap();
    let shapes = host_fn::get_attr(&geo, "shapes").unwrap();
    assert!(matches!(shapes, HostValue::GuestModule(_)));

    let result = host_fn::call_method(
        &mut interp,
        &shapes,
        "join",
        vec![HostValue::Str("x".into()), HostValue::Str("y".into())],
    )
    .unwrap();
    assert_eq!(host_str(&result), "x/y");
}

#[test]
fn test_import_of_unknown_module_fails() {
    let mut interp = Interp::new();
    let err = import_guest_module(&mut interp, "nope").unwrap_err();
    assert!(matches!(err, HostError::Foreign(_)));
    assert!(err.to_string().contains("no module named"));
}

#[test]
fn test_dotted_import_through_non_module_fails() {
    let mut interp = Interp::new();
    register_geometry(&interp);

    let err = import_guest_module(&mut interp, "geo.version").unwrap_err();
    assert!(matches!(err, HostError::Foreign(_)));
    assert!(err.to_string().contains("not a module"));
}

#[test]
fn test_module_attribute_miss_is_fatal() {
    let mut interp = Interp::new();
    register_geometry(&interp);
    let module = import_guest_module(&mut interp, "geo").unwrap();

    // Unlike the generic proxy, a module does not treat unknown names as
    // candidate method calls: the miss itself is the error.
    let err = host_fn::get_attr(&module, "absent").unwrap_err();
    assert!(matches!(err, HostError::MissingMember { .. }));
    assert!(err.to_string().contains("no such member absent"));
}

#[test]
fn test_host_namespace_resolves_builtins_from_guest() {
    let mut interp = Interp::new();
    let ns = host_global_ns(&interp);

    for spelling in ["strlen", "STRLEN"] {
        let strlen = guest_fn::get_attr(&ns, spelling).unwrap();
        assert!(strlen.is_callable());
        let result =
            guest_fn::call_value(&mut interp, &strlen, vec![GuestValue::Str("test".into())])
                .unwrap();
        assert_eq!(guest_int(&result), 4);
    }
}

#[test]
fn test_host_namespace_resolves_globals_and_constants() {
    let mut interp = Interp::new();
    interp.host.globals.set("version", HostValue::Int(7));
    interp.host.define_constant("LIMIT", HostValue::Int(99));

    let ns = host_global_ns(&interp);
    assert_eq!(guest_int(&guest_fn::get_attr(&ns, "version").unwrap()), 7);
    assert_eq!(guest_int(&guest_fn::get_attr(&ns, "limit").unwrap()), 99);

    let err = guest_fn::get_attr(&ns, "absent").unwrap_err();
    assert!(matches!(err, GuestError::AttributeError { .. }));
}

#[test]
fn test_guest_namespace_reaches_guest_builtins_from_host() {
    let mut interp = Interp::new();
    let ns = guest_global_ns(&interp);

    let result = host_fn::call_method(
        &mut interp,
        &ns,
        "len",
        vec![HostValue::Str("abcd".into())],
    )
    .unwrap();
    assert_eq!(common::host_int(&result), 4);
}

#[test]
fn test_builtin_call_through_both_namespaces() {
    let mut interp = Interp::new();

    let guest_ns = guest_global_ns(&interp);
    let text = host_fn::call_method(&mut interp, &guest_ns, "str", vec![HostValue::Int(7)])
        .unwrap();
    assert_eq!(host_str(&text), "7");
    let magnitude =
        host_fn::call_method(&mut interp, &guest_ns, "abs", vec![HostValue::Int(-3)]).unwrap();
    assert_eq!(common::host_int(&magnitude), 3);

    let host_ns = host_global_ns(&interp);
    let upper = guest_fn::get_attr(&host_ns, "strtoupper").unwrap();
    let result =
        guest_fn::call_value(&mut interp, &upper, vec![GuestValue::Str("abc".into())]).unwrap();
    assert_eq!(guest_str(&result), "ABC");
}

#[test]
fn test_guest_declared_function_lands_in_module_namespace_only_when_set() {
    // Module attribute writes go through the same set-attribute primitive the
    // proxies use, so a module can be extended from the host side.
    let mut interp = Interp::new();
    register_geometry(&interp);
    let module = import_guest_module(&mut interp, "geo").unwrap();

    host_fn::set_attr(&module, "flag", HostValue::Bool(true)).unwrap();
    let flag = host_fn::get_attr(&module, "flag").unwrap();
    assert_eq!(flag, HostValue::Bool(true));

    let native = interp.guest.module("geo").unwrap();
    assert_eq!(native.attr("flag"), Some(GuestValue::Bool(true)));
}

#[test]
fn test_imported_module_is_shared_not_copied() {
    let mut interp = Interp::new();
    register_geometry(&interp);

    let module = import_guest_module(&mut interp, "geo").unwrap();
    let native = interp.guest.module("geo").unwrap();
    native.set_attr("late", GuestValue::Int(5));

    // The proxy observes attributes added after import.
    assert_eq!(
        host_fn::get_attr(&module, "late").unwrap(),
        HostValue::Int(5)
    );
}
