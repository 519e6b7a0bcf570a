//! Base-class field storage for a proxy instance
//!
//! Concrete accessors declared by a class contract operate on a [`BaseState`]:
//! the fields the base class would own. Getters receive `&BaseState` and may
//! still record side effects (a "was read" flag, a counter), so fields live
//! behind a `RefCell`. Borrows never outlive a single `get` or `set` call.
//!
//! `BaseState` is `Send` but not `Sync`, matching the single-writer model of
//! proxy instances.

use crate::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// Field storage for the base part of a proxy instance
#[derive(Debug, Default)]
pub struct BaseState {
    fields: RefCell<FxHashMap<String, Value>>,
}

impl BaseState {
    /// Empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with initial field values
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self {
            fields: RefCell::new(fields.into_iter().collect()),
        }
    }

    /// Current value of a field; `Null` if the field was never set
    pub fn get(&self, field: &str) -> Value {
        self.fields
            .borrow()
            .get(field)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Overwrite a field
    pub fn set(&self, field: &str, value: impl Into<Value>) {
        self.fields.borrow_mut().insert(field.to_string(), value.into());
    }

    /// Whether the field has a stored value
    pub fn contains(&self, field: &str) -> bool {
        self.fields.borrow().contains_key(field)
    }

    /// Number of stored fields
    pub fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    /// True if no field is stored
    pub fn is_empty(&self) -> bool {
        self.fields.borrow().is_empty()
    }

    /// All fields, sorted by name (for debugging/testing)
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        let mut fields: Vec<_> = self
            .fields
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
    }
}
