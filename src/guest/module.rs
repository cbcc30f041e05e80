use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::guest::value::GuestValue;

/// A guest module: a named attribute table. Submodules are attributes holding
/// `GuestValue::Module`, so nested access is repeated attribute lookup.
pub struct GuestModule {
    pub name: String,
    attrs: RefCell<HashMap<String, GuestValue>>,
}

impl GuestModule {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            attrs: RefCell::new(HashMap::new()),
        })
    }

    pub fn attr(&self, name: &str) -> Option<GuestValue> {
        self.attrs.borrow().get(name).cloned()
    }

    pub fn set_attr(&self, name: &str, value: GuestValue) {
        self.attrs.borrow_mut().insert(name.to_string(), value);
    }
}

impl fmt::Debug for GuestModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GuestModule({})", self.name)
    }
}
