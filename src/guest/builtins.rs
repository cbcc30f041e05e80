use std::rc::Rc;

use crate::guest::builtin::GuestBuiltin;
use crate::guest::error::GuestError;
use crate::guest::module::GuestModule;
use crate::guest::value::GuestValue;
use crate::interp::Interp;

fn check_arity(args: &[GuestValue], expected: usize, name: &str) -> Result<(), GuestError> {
    if args.len() != expected {
        return Err(GuestError::TypeError(format!(
            "{}() takes {} arguments ({} given)",
            name,
            expected,
            args.len()
        )));
    }
    Ok(())
}

/// Length of a native collection or of a proxied host array; the proxy path
/// reads the live host container.
fn builtin_len(_interp: &mut Interp, args: Vec<GuestValue>) -> Result<GuestValue, GuestError> {
    check_arity(&args, 1, "len")?;
    match &args[0] {
        GuestValue::Str(s) => Ok(GuestValue::Int(s.chars().count() as i64)),
        GuestValue::List(items) => Ok(GuestValue::Int(items.borrow().len() as i64)),
        GuestValue::Dict(dict) => Ok(GuestValue::Int(dict.borrow().len() as i64)),
        GuestValue::HostMap(proxy) => Ok(GuestValue::Int(proxy.len() as i64)),
        other => Err(GuestError::TypeError(format!(
            "object of type '{}' has no len()",
            other.type_name()
        ))),
    }
}

fn builtin_str(_interp: &mut Interp, args: Vec<GuestValue>) -> Result<GuestValue, GuestError> {
    check_arity(&args, 1, "str")?;
    Ok(GuestValue::Str(args[0].to_text().into()))
}

fn builtin_abs(_interp: &mut Interp, args: Vec<GuestValue>) -> Result<GuestValue, GuestError> {
    check_arity(&args, 1, "abs")?;
    match &args[0] {
        GuestValue::Int(v) => Ok(GuestValue::Int(v.abs())),
        GuestValue::Float(v) => Ok(GuestValue::Float(v.abs())),
        other => Err(GuestError::TypeError(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

/// Sum of a list of numbers, int unless any element is float.
fn builtin_sum(_interp: &mut Interp, args: Vec<GuestValue>) -> Result<GuestValue, GuestError> {
    check_arity(&args, 1, "sum")?;
    let items = match &args[0] {
        GuestValue::List(items) => items.borrow().clone(),
        other => {
            return Err(GuestError::TypeError(format!(
                "'{}' object is not iterable",
                other.type_name()
            )));
        }
    };
    let mut int_total = 0i64;
    let mut float_total = 0f64;
    let mut is_float = false;
    for item in items {
        match item {
            GuestValue::Int(v) => {
                int_total += v;
                float_total += v as f64;
            }
            GuestValue::Float(v) => {
                is_float = true;
                float_total += v;
            }
            other => {
                return Err(GuestError::TypeError(format!(
                    "unsupported operand type for sum: '{}'",
                    other.type_name()
                )));
            }
        }
    }
    if is_float {
        Ok(GuestValue::Float(float_total))
    } else {
        Ok(GuestValue::Int(int_total))
    }
}

static BUILTINS: &[GuestBuiltin] = &[
    GuestBuiltin {
        name: "len",
        func: builtin_len,
    },
    GuestBuiltin {
        name: "str",
        func: builtin_str,
    },
    GuestBuiltin {
        name: "abs",
        func: builtin_abs,
    },
    GuestBuiltin {
        name: "sum",
        func: builtin_sum,
    },
];

/// The guest's builtin namespace, exposed as an ordinary module so the host
/// can wear it as a proxy.
pub(crate) fn builtins_module() -> Rc<GuestModule> {
    let module = GuestModule::new("builtins");
    for builtin in BUILTINS {
        module.set_attr(builtin.name, GuestValue::Builtin(builtin.clone()));
    }
    module
}
