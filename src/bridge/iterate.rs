//! Single-pass iteration adapters across the boundary.
//!
//! Each adapter is created by its collection proxy, drives the foreign
//! collection's own cursor, and re-exposes it under the consuming runtime's
//! iteration contract. Iterators are not restartable: once `finished`, any
//! further advancement is rejected.

use std::{cell::RefCell, rc::Rc};

use crate::bridge::convert;
use crate::guest::error::GuestError;
use crate::guest::value::{GuestDict, GuestDictCursor, GuestValue};
use crate::host::array::HostArray;
use crate::host::error::HostError;
use crate::host::value::HostValue;
use crate::host::HostIter;
use crate::interp::Interp;

/// Host-side iteration over a guest list. The positional view is captured at
/// construction, matching the sequence protocol's materialized snapshot.
pub struct GuestListIter {
    items: Vec<GuestValue>,
    index: usize,
    finished: bool,
}

impl GuestListIter {
    pub(crate) fn new(list: &Rc<RefCell<Vec<GuestValue>>>) -> Self {
        let items = list.borrow().clone();
        let finished = items.is_empty();
        Self {
            items,
            index: 0,
            finished,
        }
    }
}

impl HostIter for GuestListIter {
    fn next(&mut self, _interp: &mut Interp) -> Result<HostValue, HostError> {
        let (_, value) = advance_list(self)?;
        Ok(value)
    }

    fn next_item(&mut self, _interp: &mut Interp) -> Result<(HostValue, HostValue), HostError> {
        advance_list(self)
    }

    fn finished(&self) -> bool {
        self.finished
    }
}

fn advance_list(iter: &mut GuestListIter) -> Result<(HostValue, HostValue), HostError> {
    if iter.finished {
        return Err(HostError::Runtime(
            "cannot advance a finished iterator".to_string(),
        ));
    }
    let index = iter.index;
    let value = iter.items[index].clone();
    iter.index = index + 1;
    iter.finished = iter.index == iter.items.len();
    Ok((HostValue::Int(index as i64), convert::to_host(value)))
}

/// Host-side iteration over a guest dict.
///
/// The guest's entries cursor is obtained once at construction, along with a
/// `remaining` count; each advance decrements it, and order follows the
/// guest's native insertion order.
pub struct GuestDictIter {
    cursor: GuestDictCursor,
    remaining: usize,
    finished: bool,
}

impl GuestDictIter {
    pub(crate) fn new(dict: &Rc<RefCell<GuestDict>>) -> Self {
        let remaining = dict.borrow().len();
        Self {
            cursor: GuestDictCursor::new(dict.clone()),
            remaining,
            finished: remaining == 0,
        }
    }
}

impl HostIter for GuestDictIter {
    fn next(&mut self, _interp: &mut Interp) -> Result<HostValue, HostError> {
        let (_, value) = advance_dict(self)?;
        Ok(value)
    }

    fn next_item(&mut self, _interp: &mut Interp) -> Result<(HostValue, HostValue), HostError> {
        advance_dict(self)
    }

    fn finished(&self) -> bool {
        self.finished
    }
}

fn advance_dict(iter: &mut GuestDictIter) -> Result<(HostValue, HostValue), HostError> {
    if iter.finished {
        return Err(HostError::Runtime(
            "cannot advance a finished iterator".to_string(),
        ));
    }
    let (key, value) = iter.cursor.next_entry().ok_or_else(|| {
        HostError::Foreign("dictionary changed size during iteration".to_string())
    })?;
    iter.remaining -= 1;
    iter.finished = iter.remaining == 0;
    Ok((
        convert::key_to_host(&key).to_value(),
        convert::to_host(value),
    ))
}

/// Guest-side iteration over a host array, yielding (key, value) pairs in the
/// host's insertion order. The mirror of [`GuestDictIter`].
pub struct HostArrayIter {
    array: Rc<RefCell<HostArray>>,
    pos: usize,
    remaining: usize,
    finished: bool,
}

impl HostArrayIter {
    pub(crate) fn new(array: &Rc<RefCell<HostArray>>) -> Self {
        let remaining = array.borrow().len();
        Self {
            array: array.clone(),
            pos: 0,
            remaining,
            finished: remaining == 0,
        }
    }

    pub fn next_pair(&mut self) -> Result<(GuestValue, GuestValue), GuestError> {
        if self.finished {
            return Err(GuestError::Runtime(
                "cannot advance a finished iterator".to_string(),
            ));
        }
        let entry = self.array.borrow().entry_at(self.pos);
        let (key, value) = entry.ok_or_else(|| {
            GuestError::Foreign("array changed size during iteration".to_string())
        })?;
        self.pos += 1;
        self.remaining -= 1;
        self.finished = self.remaining == 0;
        Ok((
            convert::key_to_guest(&key).to_value(),
            convert::to_guest(value),
        ))
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}
