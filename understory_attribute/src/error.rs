// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while declaring or using attributes.

use alloc::string::String;
use thiserror::Error;

use crate::id::Name;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by declarations and accessors.
///
/// The first three variants are declaration errors: they are returned by
/// [`ClassRegistry::declare_reader`](crate::ClassRegistry::declare_reader) and
/// friends before anything is registered. The remaining variants only occur
/// while reading or writing attributes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The conversion is neither a function nor a method name.
    #[error("{value} is not a function, symbol, or string")]
    InvalidConversionType {
        /// The rendered offending value.
        value: String,
    },

    /// A function conversion does not take exactly one argument.
    #[error("coercer should take exactly one argument, but it takes {arity}")]
    InvalidConversionArity {
        /// The declared parameter count of the rejected function.
        arity: usize,
    },

    /// A declaration was made with an empty field name.
    #[error("an attribute declaration requires a field name")]
    MissingFieldName,

    /// No accessor or method with this name is reachable from the class.
    #[error("undefined method `{name}` for class `{class}`")]
    UndefinedMethod {
        /// The class the lookup started from.
        class: Name,
        /// The accessor or method name (setters carry a trailing `=`).
        name: Name,
    },

    /// Raised by a conversion function or method.
    #[error("{0}")]
    Coercion(String),
}

impl Error {
    /// Builds the error a failing conversion should return.
    ///
    /// ```rust
    /// use understory_attribute::Error;
    ///
    /// let error = Error::coercion("not a number");
    /// assert_eq!(error.to_string(), "not a number");
    /// ```
    pub fn coercion(message: impl Into<String>) -> Self {
        Self::Coercion(message.into())
    }

    /// Returns `true` for errors raised while declaring an attribute.
    #[must_use]
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConversionType { .. }
                | Self::InvalidConversionArity { .. }
                | Self::MissingFieldName
        )
    }
}
