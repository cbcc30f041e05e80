use std::rc::Rc;

use crate::bridge::scope::{Resolved, ScopeChain};
use crate::guest::env::GuestEnv;
use crate::guest::value::GuestValue;
use crate::host::frame::HostFrame;
use crate::host::value::HostValue;
use crate::interp::Interp;

fn resolved_host(resolved: Option<Resolved>) -> HostValue {
    match resolved {
        Some(Resolved::Host(value)) => value,
        Some(Resolved::Guest(value)) => panic!("expected host hit, got guest {}", value),
        None => panic!("expected a hit"),
    }
}

#[test]
fn test_inner_frame_shadows_globals() {
    let interp = Interp::new();
    interp.host.globals.set("x", HostValue::Int(1));
    let frame = HostFrame::root();
    frame.set("x", HostValue::Int(2));

    let chain = ScopeChain::capture_host(&interp, Some(&frame));
    assert_eq!(resolved_host(chain.resolve("x")), HostValue::Int(2));
}

#[test]
fn test_globals_resolve_before_constants() {
    let interp = Interp::new();
    interp.host.globals.set("x", HostValue::Int(1));
    interp.host.define_constant("x", HostValue::Int(9));

    let chain = ScopeChain::capture_host(&interp, None);
    assert_eq!(resolved_host(chain.resolve("x")), HostValue::Int(1));
}

#[test]
fn test_constants_resolve_when_nothing_shadows() {
    let interp = Interp::new();
    interp.host.define_constant("limit", HostValue::Int(10));

    let chain = ScopeChain::capture_host(&interp, None);
    assert_eq!(resolved_host(chain.resolve("limit")), HostValue::Int(10));
}

#[test]
fn test_function_table_hits_are_case_insensitive() {
    let interp = Interp::new();
    let chain = ScopeChain::capture_host(&interp, None);

    // strlen is a registered builtin; spelling must not matter.
    assert!(chain.resolve("strlen").is_some());
    assert!(chain.resolve("STRLEN").is_some());
}

#[test]
fn test_frame_variables_are_case_sensitive() {
    let interp = Interp::new();
    let frame = HostFrame::root();
    frame.set("Value", HostValue::Int(1));

    let chain = ScopeChain::capture_host(&interp, Some(&frame));
    assert!(chain.resolve("Value").is_some());
    assert!(chain.resolve("value").is_none());
}

#[test]
fn test_capture_observes_later_assignment() {
    let interp = Interp::new();
    let frame = HostFrame::root();
    frame.set("x", HostValue::Int(1));
    let chain = ScopeChain::capture_host(&interp, Some(&frame));

    frame.set("x", HostValue::Int(5));
    assert_eq!(resolved_host(chain.resolve("x")), HostValue::Int(5));
}

#[test]
fn test_guest_capture_resolves_through_env_chain() {
    let outer = GuestEnv::root();
    outer.define("a", GuestValue::Int(1));
    let inner = GuestEnv::child(&outer);
    inner.define("b", GuestValue::Int(2));

    let chain = ScopeChain::capture_guest(&inner);
    assert!(matches!(
        chain.resolve("a"),
        Some(Resolved::Guest(GuestValue::Int(1)))
    ));
    assert!(matches!(
        chain.resolve("b"),
        Some(Resolved::Guest(GuestValue::Int(2)))
    ));
    assert!(chain.resolve("c").is_none());
}

#[test]
fn test_enclosing_frames_resolve_innermost_first() {
    let interp = Interp::new();
    let outer = HostFrame::root();
    outer.set("x", HostValue::Int(1));
    outer.set("y", HostValue::Int(7));
    let inner = HostFrame::new(Some(Rc::clone(&outer)), None);
    inner.set("x", HostValue::Int(2));

    let chain = ScopeChain::capture_host(&interp, Some(&inner));
    assert_eq!(resolved_host(chain.resolve("x")), HostValue::Int(2));
    assert_eq!(resolved_host(chain.resolve("y")), HostValue::Int(7));
}
