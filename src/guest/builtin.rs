use std::fmt;

use crate::guest::GuestBuiltinFn;

#[derive(Clone)]
pub struct GuestBuiltin {
    pub name: &'static str,
    pub func: GuestBuiltinFn,
}

impl fmt::Debug for GuestBuiltin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestBuiltin({})", self.name)
    }
}

impl PartialEq for GuestBuiltin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
