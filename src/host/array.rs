use std::{collections::HashMap, fmt};

use crate::host::value::HostValue;

/// Key of a host array entry. Host arrays accept integer and text keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(v) => write!(f, "{}", v),
            ArrayKey::Str(v) => write!(f, "\"{}\"", v),
        }
    }
}

impl ArrayKey {
    pub fn to_value(&self) -> HostValue {
        match self {
            ArrayKey::Int(v) => HostValue::Int(*v),
            ArrayKey::Str(v) => HostValue::Str(v.as_str().into()),
        }
    }
}

/// The host runtime's native collection: an insertion-ordered associative
/// array with integer and text keys.
///
/// Appending uses the next free integer key, tracked the host language's way:
/// inserting an explicit integer key bumps the auto-key counter past it.
#[derive(Debug, Default)]
pub struct HostArray {
    entries: Vec<(ArrayKey, HostValue)>,
    index: HashMap<ArrayKey, usize>,
    next_int: i64,
}

impl HostArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (ArrayKey, HostValue)>) -> Self {
        let mut array = Self::new();
        for (key, value) in pairs {
            array.insert(key, value);
        }
        array
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &ArrayKey) -> Option<HostValue> {
        self.index.get(key).map(|&pos| self.entries[pos].1.clone())
    }

    /// Inserts or overwrites; an overwrite keeps the entry's original position.
    pub fn insert(&mut self, key: ArrayKey, value: HostValue) {
        if let ArrayKey::Int(i) = key {
            if i >= self.next_int {
                self.next_int = i + 1;
            }
        }
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn append(&mut self, value: HostValue) {
        let key = ArrayKey::Int(self.next_int);
        self.insert(key, value);
    }

    /// Entry at iteration position `pos`, in insertion order.
    pub fn entry_at(&self, pos: usize) -> Option<(ArrayKey, HostValue)> {
        self.entries.get(pos).cloned()
    }
}
