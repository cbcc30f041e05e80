use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::host::value::HostValue;

/// A host class: a name plus a method table.
///
/// Method names resolve case-insensitively, following the host language's
/// global symbol rules. Method values must be callable; the bridge's
/// callability guard fires at invocation, not at registration.
pub struct HostClass {
    pub name: String,
    methods: RefCell<HashMap<String, HostValue>>,
}

impl HostClass {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            methods: RefCell::new(HashMap::new()),
        })
    }

    pub fn add_method(&self, name: &str, callable: HostValue) {
        self.methods
            .borrow_mut()
            .insert(name.to_lowercase(), callable);
    }

    pub fn method(&self, name: &str) -> Option<HostValue> {
        self.methods.borrow().get(&name.to_lowercase()).cloned()
    }
}

impl fmt::Debug for HostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostClass({})", self.name)
    }
}

/// An instance of a host class: a property table plus its class handle.
/// Property names are case-sensitive, unlike method names.
pub struct HostInstance {
    pub class: Rc<HostClass>,
    props: RefCell<HashMap<String, HostValue>>,
}

impl HostInstance {
    pub fn new(class: Rc<HostClass>) -> Rc<Self> {
        Rc::new(Self {
            class,
            props: RefCell::new(HashMap::new()),
        })
    }

    pub fn prop(&self, name: &str) -> Option<HostValue> {
        self.props.borrow().get(name).cloned()
    }

    pub fn set_prop(&self, name: &str, value: HostValue) {
        self.props.borrow_mut().insert(name.to_string(), value);
    }
}

impl fmt::Debug for HostInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} object>", self.class.name)
    }
}
