use std::fmt;

use crate::host::HostBuiltinFn;

#[derive(Clone)]
pub struct HostBuiltin {
    pub name: &'static str,
    pub func: HostBuiltinFn,
}

impl fmt::Debug for HostBuiltin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostBuiltin({})", self.name)
    }
}

impl PartialEq for HostBuiltin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
