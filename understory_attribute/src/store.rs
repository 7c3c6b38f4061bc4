// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object sparse slot storage.
//!
//! This module provides [`SlotStore`], the named storage slots behind an
//! object's attributes. A slot that was never written reads as
//! [`Value::Nil`] through the accessors.
//!
//! # Implementation
//!
//! Slots live in a sorted vector searched with binary search rather than in a
//! hash map. Objects rarely hold more than a handful of attributes, so the
//! first few slots are stored inline via `SmallVec`.

use smallvec::SmallVec;

use crate::id::Name;
use crate::value::Value;

/// Default inline capacity for slots.
const INLINE_CAPACITY: usize = 8;

/// Per-object storage for attribute values, addressed by name.
///
/// Accessors generated by a [`ClassRegistry`](crate::ClassRegistry) read and
/// write these slots; reaching into the store directly bypasses coercion.
///
/// # Example
///
/// ```rust
/// use understory_attribute::{SlotStore, Value};
///
/// let mut slots = SlotStore::new();
/// assert!(slots.get("foo").is_none());
///
/// slots.set("foo", Value::from(1));
/// assert_eq!(slots.get("foo"), Some(&Value::from(1)));
///
/// assert!(slots.clear("foo"));
/// assert!(slots.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlotStore {
    /// Slots sorted by name for binary search lookup.
    entries: SmallVec<[(Name, Value); INLINE_CAPACITY]>,
}

impl SlotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no slot holds a value.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of slots holding a value.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the names of the slots holding a value, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &Name> + '_ {
        self.entries.iter().map(|(name, _)| name)
    }

    #[inline]
    fn find(&self, name: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(slot, _)| slot.as_str().cmp(name))
    }

    /// Gets the value of a slot, if set.
    #[must_use]
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.find(name).ok().map(|idx| &self.entries[idx].1)
    }

    /// Sets the value of a slot.
    ///
    /// Storing [`Value::Nil`] keeps the slot; use [`SlotStore::clear`] to
    /// remove it. Returns a reference to the stored value.
    pub fn set(&mut self, name: impl Into<Name>, value: Value) -> &Value {
        let name = name.into();
        let idx = match self.find(&name) {
            Ok(idx) => {
                self.entries[idx].1 = value;
                idx
            }
            Err(idx) => {
                self.entries.insert(idx, (name, value));
                idx
            }
        };
        &self.entries[idx].1
    }

    /// Removes a slot.
    ///
    /// Returns `true` if a value was removed.
    pub fn clear(&mut self, name: &str) -> bool {
        if let Ok(idx) = self.find(name) {
            self.entries.remove(idx);
            true
        } else {
            false
        }
    }

    /// Returns `true` if the slot holds a value, even [`Value::Nil`].
    #[must_use]
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;

    #[test]
    fn store_new() {
        let store = SlotStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn store_set_get() {
        let mut store = SlotStore::new();
        assert_eq!(store.set("width", Value::from(100)), &Value::from(100));
        assert_eq!(store.get("width"), Some(&Value::from(100)));
        assert_eq!(store.get("height"), None);

        store.set("width", Value::from("wide"));
        assert_eq!(store.get("width"), Some(&Value::from("wide")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_nil_is_a_stored_value() {
        let mut store = SlotStore::new();
        store.set("foo", Value::Nil);
        assert!(store.contains("foo"));
        assert_eq!(store.get("foo"), Some(&Value::Nil));
    }

    #[test]
    fn store_clear() {
        let mut store = SlotStore::new();
        store.set("foo", Value::from(1));
        assert!(store.clear("foo"));
        assert!(!store.clear("foo"));
        assert!(!store.contains("foo"));
    }

    #[test]
    fn store_sorted_order() {
        let mut store = SlotStore::new();
        for name in ["delta", "alpha", "charlie", "bravo"] {
            store.set(name, Value::from(name));
        }
        let names: Vec<&str> = store.names().map(|n| n.as_str()).collect();
        assert_eq!(names, ["alpha", "bravo", "charlie", "delta"]);
    }

    #[test]
    fn store_binary_search_correctness() {
        let mut store = SlotStore::new();
        let names: Vec<_> = (0..20).map(|i| format!("slot{i:02}")).collect();
        for (i, name) in names.iter().enumerate().rev() {
            store.set(name.as_str(), Value::from(i as i64));
        }
        for (i, name) in names.iter().enumerate() {
            assert_eq!(store.get(name), Some(&Value::from(i as i64)));
        }
        assert_eq!(store.len(), 20);
    }

    #[test]
    fn store_clone() {
        let mut store = SlotStore::new();
        store.set("foo", Value::from(1));
        let cloned = store.clone();
        assert_eq!(cloned, store);
    }
}
