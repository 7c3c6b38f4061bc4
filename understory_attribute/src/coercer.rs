// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coercion descriptors.
//!
//! This module provides [`Coercer`], the validated conversion wrapped by a
//! generated accessor, and [`Coercion`] for describing one before it is
//! validated.

use crate::error::{Error, Result};
use crate::id::Name;
use crate::object::AttributeObject;
use crate::registry::ClassRegistry;
use crate::value::{Function, Value};

/// What a [`Coercer`] invokes.
#[derive(Clone, Debug)]
pub enum Conversion {
    /// A one-argument function, called without the owning object.
    Function(Function),
    /// The name of a method defined on the owning object's class.
    Method(Name),
}

/// A validated conversion plus its `nil` policy.
///
/// A coercer only exists when a conversion was supplied; accessors declared
/// without one are plain pass-through accessors.
///
/// # Example
///
/// ```rust
/// use understory_attribute::{Coercer, Error, Function, Value};
///
/// let to_s = Function::unary(|v| Value::from(v.to_string()));
/// assert!(Coercer::new(Some(to_s.into()), false).unwrap().is_some());
///
/// // No conversion: no coercer.
/// assert!(Coercer::new(None, true).unwrap().is_none());
///
/// // Anything but a function, a string or a symbol is rejected.
/// let error = Coercer::new(Some(Value::from(1)), false).unwrap_err();
/// assert_eq!(error.to_string(), "1 is not a function, symbol, or string");
/// ```
#[derive(Clone, Debug)]
pub struct Coercer {
    conversion: Conversion,
    strict: bool,
}

impl Coercer {
    /// Validates `conversion` and wraps it.
    ///
    /// Returns `Ok(None)` when there is no conversion (`None` or
    /// [`Value::Nil`]).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConversionArity`] for a function whose arity is not 1.
    /// - [`Error::InvalidConversionType`] for any other non-name value.
    pub fn new(conversion: Option<Value>, strict: bool) -> Result<Option<Self>> {
        let conversion = match conversion {
            None | Some(Value::Nil) => return Ok(None),
            Some(Value::Function(f)) => {
                if f.arity() != 1 {
                    return Err(Error::InvalidConversionArity { arity: f.arity() });
                }
                Conversion::Function(f)
            }
            Some(Value::Str(name)) => Conversion::Method(Name::from(name)),
            Some(Value::Symbol(name)) => Conversion::Method(name),
            Some(other) => {
                return Err(Error::InvalidConversionType {
                    value: alloc::format!("{other}"),
                });
            }
        };
        Ok(Some(Self { conversion, strict }))
    }

    /// Returns the wrapped conversion.
    #[must_use]
    #[inline]
    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }

    /// Returns whether `nil` is passed through the conversion.
    #[must_use]
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Coerces `value` in the context of `owner`.
    ///
    /// A non-strict coercer returns [`Value::Nil`] without calling the
    /// conversion. Method conversions are looked up on the owner's class
    /// chain at call time.
    ///
    /// # Errors
    ///
    /// Returns whatever the conversion returns, or
    /// [`Error::UndefinedMethod`] if a method conversion names a method the
    /// class does not have.
    pub fn apply<O: AttributeObject>(
        &self,
        registry: &ClassRegistry<O>,
        owner: &O,
        value: Value,
    ) -> Result<Value> {
        if value.is_nil() && !self.strict {
            return Ok(value);
        }
        match &self.conversion {
            Conversion::Function(f) => f.call(core::slice::from_ref(&value)),
            Conversion::Method(name) => registry.invoke_method(owner, name, value),
        }
    }
}

/// The coercion options of a single reader or writer.
///
/// # Example
///
/// ```rust
/// use understory_attribute::{Coercion, Function, Value};
///
/// let options = Coercion::new()
///     .coerce(Function::unary(|v| Value::from(v.to_string())))
///     .strict(true);
/// assert!(options.is_strict());
/// assert!(options.build().unwrap().is_some());
///
/// // A method name works too.
/// assert!(Coercion::new().coerce("normalize").build().unwrap().is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Coercion {
    coerce: Option<Value>,
    strict: bool,
}

impl Coercion {
    /// Creates options with no conversion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the conversion: a [`Function`], or a method name as a string or
    /// symbol. Any other value is rejected when the accessor is declared.
    #[must_use]
    pub fn coerce(mut self, conversion: impl Into<Value>) -> Self {
        self.coerce = Some(conversion.into());
        self
    }

    /// Sets whether `nil` is coerced as well.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the configured conversion, if any.
    #[must_use]
    pub fn conversion(&self) -> Option<&Value> {
        self.coerce.as_ref()
    }

    /// Returns whether strict mode is on.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Validates the options into a coercer.
    ///
    /// # Errors
    ///
    /// See [`Coercer::new`].
    pub fn build(self) -> Result<Option<Coercer>> {
        Coercer::new(self.coerce, self.strict)
    }
}
