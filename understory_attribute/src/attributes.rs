// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered attribute mappings.
//!
//! [`Attributes`] is what an export returns and what an import consumes.
//! Collecting into it normalizes keys to [`Name`]s.

use alloc::vec::Vec;

use crate::id::Name;
use crate::value::Value;

/// An insertion-ordered mapping from attribute names to values.
///
/// Inserting an existing key replaces its value in place, so the first
/// insertion decides the position.
///
/// # Example
///
/// ```rust
/// use understory_attribute::{Attributes, Value};
///
/// let attributes: Attributes = [("foo", Value::from(1)), ("bar", Value::from(2)), ("foo", Value::from(3))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(attributes.len(), 2);
/// assert_eq!(attributes.get("foo"), Some(&Value::from(3)));
/// assert_eq!(attributes.keys().map(|k| k.as_str()).collect::<Vec<_>>(), ["foo", "bar"]);
///
/// let sliced = attributes.slice(["bar", "baz"]);
/// assert_eq!(sliced.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(Name, Value)>,
}

impl Attributes {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name.as_str() == key)
    }

    /// Inserts a value, returning the previous one for that key.
    pub fn insert(&mut self, key: impl Into<Name>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Value)> + '_ {
        self.entries.iter().map(|(name, value)| (name, value))
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &Name> + '_ {
        self.entries.iter().map(|(name, _)| name)
    }

    /// Returns a mapping with only the given keys.
    ///
    /// Unknown keys are ignored; the result keeps this mapping's order.
    #[must_use]
    pub fn slice<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        let entries = self
            .entries
            .iter()
            .filter(|(name, _)| keys.iter().any(|k| k.as_ref() == name.as_str()))
            .cloned()
            .collect();
        Self { entries }
    }
}

impl<K: Into<Name>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        attributes.extend(iter);
        attributes
    }
}

impl<K: Into<Name>, V: Into<Value>> Extend<(K, V)> for Attributes {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Attributes {
    type Item = (Name, Value);
    type IntoIter = alloc::vec::IntoIter<(Name, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn collect_normalizes_keys() {
        let attributes: Attributes = vec![
            (String::from("foo"), Value::from("foo")),
            (String::from("bar"), Value::from("bar")),
        ]
        .into_iter()
        .collect();
        assert_eq!(attributes.get("foo"), Some(&Value::from("foo")));
        assert!(attributes.contains_key("bar"));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut attributes = Attributes::new();
        assert_eq!(attributes.insert("a", 1), None);
        attributes.insert("b", 2);
        assert_eq!(attributes.insert("a", 3), Some(Value::from(1)));

        let keys: Vec<&str> = attributes.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(attributes.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn slice_keeps_given_keys_only() {
        let attributes: Attributes = [("foo", "foo"), ("bar", "bar")].into_iter().collect();
        let sliced = attributes.slice(["foo"]);
        assert_eq!(sliced, [("foo", "foo")].into_iter().collect());
    }

    #[test]
    fn slice_ignores_unknown_keys() {
        let attributes: Attributes = [("foo", "foo"), ("bar", "bar")].into_iter().collect();
        assert!(attributes.slice(["baz"]).is_empty());
    }

    #[test]
    fn slice_keeps_mapping_order() {
        let attributes: Attributes = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let sliced = attributes.slice(["c", "a"]);
        let keys: Vec<&str> = sliced.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn remove_keeps_order() {
        let mut attributes: Attributes = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(attributes.remove("b"), Some(Value::from(2)));
        assert_eq!(attributes.remove("b"), None);
        let values: Vec<&Value> = attributes.iter().map(|(_, v)| v).collect();
        assert_eq!(values, [&Value::from(1), &Value::from(3)]);
    }
}
