use crate::host::builtin::HostBuiltin;
use crate::host::error::HostError;
use crate::host::value::HostValue;
use crate::interp::Interp;

fn check_arity(args: &[HostValue], expected: usize, name: &str) -> Result<(), HostError> {
    if args.len() != expected {
        return Err(HostError::Runtime(format!(
            "wrong number of arguments: want={}, got={} in {}()",
            expected,
            args.len(),
            name
        )));
    }
    Ok(())
}

fn arg_str<'a>(args: &'a [HostValue], index: usize, name: &str) -> Result<&'a str, HostError> {
    match &args[index] {
        HostValue::Str(s) => Ok(s),
        other => Err(HostError::Runtime(format!(
            "{}() expects parameter {} to be string, {} given",
            name,
            index + 1,
            other.type_name()
        ))),
    }
}

fn builtin_strlen(_interp: &mut Interp, args: Vec<HostValue>) -> Result<HostValue, HostError> {
    check_arity(&args, 1, "strlen")?;
    let s = arg_str(&args, 0, "strlen")?;
    Ok(HostValue::Int(s.len() as i64))
}

fn builtin_strtoupper(_interp: &mut Interp, args: Vec<HostValue>) -> Result<HostValue, HostError> {
    check_arity(&args, 1, "strtoupper")?;
    let s = arg_str(&args, 0, "strtoupper")?;
    Ok(HostValue::Str(s.to_uppercase().into()))
}

fn builtin_strtolower(_interp: &mut Interp, args: Vec<HostValue>) -> Result<HostValue, HostError> {
    check_arity(&args, 1, "strtolower")?;
    let s = arg_str(&args, 0, "strtolower")?;
    Ok(HostValue::Str(s.to_lowercase().into()))
}

/// Element count of a native array or of a proxied guest collection; the
/// proxy path reads the live guest container, never a copy.
fn builtin_count(_interp: &mut Interp, args: Vec<HostValue>) -> Result<HostValue, HostError> {
    check_arity(&args, 1, "count")?;
    match &args[0] {
        HostValue::Array(array) => Ok(HostValue::Int(array.borrow().len() as i64)),
        HostValue::GuestList(proxy) => Ok(HostValue::Int(proxy.len() as i64)),
        HostValue::GuestDict(proxy) => Ok(HostValue::Int(proxy.len() as i64)),
        other => Err(HostError::Runtime(format!(
            "count() expects parameter 1 to be array, {} given",
            other.type_name()
        ))),
    }
}

fn builtin_strval(_interp: &mut Interp, args: Vec<HostValue>) -> Result<HostValue, HostError> {
    check_arity(&args, 1, "strval")?;
    Ok(HostValue::Str(args[0].to_text().into()))
}

/// All host builtins, registered into the global function table at startup.
pub static BUILTINS: &[HostBuiltin] = &[
    HostBuiltin {
        name: "strlen",
        func: builtin_strlen,
    },
    HostBuiltin {
        name: "strtoupper",
        func: builtin_strtoupper,
    },
    HostBuiltin {
        name: "strtolower",
        func: builtin_strtolower,
    },
    HostBuiltin {
        name: "count",
        func: builtin_count,
    },
    HostBuiltin {
        name: "strval",
        func: builtin_strval,
    },
];
