use causeway::guest::value::GuestValue;
use causeway::host::value::HostValue;

pub fn host_int(value: &HostValue) -> i64 {
    match value {
        HostValue::Int(v) => *v,
        other => panic!("expected host int, got {}", other.type_name()),
    }
}

pub fn host_str(value: &HostValue) -> String {
    match value {
        HostValue::Str(v) => v.to_string(),
        other => panic!("expected host string, got {}", other.type_name()),
    }
}

pub fn guest_int(value: &GuestValue) -> i64 {
    match value {
        GuestValue::Int(v) => *v,
        other => panic!("expected guest int, got {}", other.type_name()),
    }
}

pub fn guest_str(value: &GuestValue) -> String {
    match value {
        GuestValue::Str(v) => v.to_string(),
        other => panic!("expected guest string, got {}", other.type_name()),
    }
}
