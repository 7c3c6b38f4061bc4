// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Options for declaring a read/write attribute.

use crate::coercer::Coercion;
use crate::value::Value;

/// Options for [`ClassRegistry::declare_attribute`](crate::ClassRegistry::declare_attribute).
///
/// `coerce` is shared by both directions; `reader` and `writer` override it
/// for the getter and the setter respectively. `strict` applies to both.
///
/// # Example
///
/// ```rust
/// use understory_attribute::{AttributeOptions, Function, Value};
///
/// let to_s = Function::unary(|v| Value::from(v.to_string()));
/// let to_i = Function::unary(|v| Value::from(v.as_str().and_then(|s| s.parse::<i64>().ok())));
///
/// let options = AttributeOptions::new().coerce(to_s.clone()).writer(to_i).strict(true);
///
/// assert_eq!(options.reader_coercion().conversion(), Some(&Value::from(to_s)));
/// assert!(options.writer_coercion().is_strict());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AttributeOptions {
    coerce: Option<Value>,
    reader: Option<Value>,
    writer: Option<Value>,
    strict: bool,
}

impl AttributeOptions {
    /// Creates options with no conversions and strict mode off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the conversion shared by the getter and the setter.
    #[must_use]
    pub fn coerce(mut self, conversion: impl Into<Value>) -> Self {
        self.coerce = Some(conversion.into());
        self
    }

    /// Sets the conversion used by the getter only.
    #[must_use]
    pub fn reader(mut self, conversion: impl Into<Value>) -> Self {
        self.reader = Some(conversion.into());
        self
    }

    /// Sets the conversion used by the setter only.
    #[must_use]
    pub fn writer(mut self, conversion: impl Into<Value>) -> Self {
        self.writer = Some(conversion.into());
        self
    }

    /// Sets whether `nil` is coerced in both directions.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn coercion(&self, specific: Option<&Value>) -> Coercion {
        let coercion = Coercion::new().strict(self.strict);
        // A `nil` override falls back to the shared conversion.
        match specific.filter(|v| !v.is_nil()).or(self.coerce.as_ref()) {
            Some(conversion) => coercion.coerce(conversion.clone()),
            None => coercion,
        }
    }

    /// The options the getter is declared with.
    #[must_use]
    pub fn reader_coercion(&self) -> Coercion {
        self.coercion(self.reader.as_ref())
    }

    /// The options the setter is declared with.
    #[must_use]
    pub fn writer_coercion(&self) -> Coercion {
        self.coercion(self.writer.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Function;

    fn shared() -> Function {
        Function::unary(|v| v)
    }

    #[test]
    fn without_conversions() {
        let options = AttributeOptions::new();
        assert!(options.reader_coercion().conversion().is_none());
        assert!(options.writer_coercion().conversion().is_none());
        assert!(!options.reader_coercion().is_strict());
    }

    #[test]
    fn shared_conversion_goes_both_ways() {
        let f = shared();
        let options = AttributeOptions::new().coerce(f.clone()).strict(true);

        assert_eq!(options.reader_coercion().conversion(), Some(&Value::from(f.clone())));
        assert_eq!(options.writer_coercion().conversion(), Some(&Value::from(f)));
        assert!(options.reader_coercion().is_strict());
        assert!(options.writer_coercion().is_strict());
    }

    #[test]
    fn writer_overrides_shared() {
        let common = shared();
        let other = shared();
        let options = AttributeOptions::new()
            .coerce(common.clone())
            .writer(other.clone());

        assert_eq!(options.reader_coercion().conversion(), Some(&Value::from(common)));
        assert_eq!(options.writer_coercion().conversion(), Some(&Value::from(other)));
    }

    #[test]
    fn reader_overrides_shared() {
        let common = shared();
        let other = shared();
        let options = AttributeOptions::new()
            .coerce(common.clone())
            .reader(other.clone());

        assert_eq!(options.reader_coercion().conversion(), Some(&Value::from(other)));
        assert_eq!(options.writer_coercion().conversion(), Some(&Value::from(common)));
    }

    #[test]
    fn nil_override_falls_back_to_shared() {
        let common = shared();
        let options = AttributeOptions::new()
            .coerce(common.clone())
            .reader(Value::Nil);

        assert_eq!(options.reader_coercion().conversion(), Some(&Value::from(common)));
    }

    #[test]
    fn method_names_are_accepted_as_conversions() {
        let options = AttributeOptions::new().coerce("normalize");
        assert_eq!(
            options.reader_coercion().conversion(),
            Some(&Value::from("normalize"))
        );
    }
}
