// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic attribute values.
//!
//! This module provides [`Value`], the value held in an object's slots and
//! passed through conversions, and [`Function`], a callable value with a
//! declared parameter count.

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::fmt;

use crate::error::Result;
use crate::id::Name;

/// A dynamically typed attribute value.
///
/// [`Value::Nil`] is the absent/unset sentinel: unset slots read as `Nil`,
/// and non-strict coercers let it through untouched.
///
/// # Example
///
/// ```rust
/// use understory_attribute::Value;
///
/// let value = Value::from(1);
/// assert_eq!(value.as_int(), Some(1));
/// assert_eq!(value.to_string(), "1");
///
/// assert!(Value::default().is_nil());
/// assert_eq!(Value::Nil.to_string(), "");
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// The absent/unset sentinel.
    #[default]
    Nil,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// An owned string.
    Str(String),
    /// An interned name.
    Symbol(Name),
    /// A callable value.
    Function(Function),
}

impl Value {
    /// Returns `true` for the [`Value::Nil`] sentinel.
    #[must_use]
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the boolean, if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`Value::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number, if this is a [`Value::Float`].
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the text of a [`Value::Str`] or [`Value::Symbol`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the function, if this is a [`Value::Function`].
    #[must_use]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Returns a short name for the variant, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Function(_) => "function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("Nil"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Symbol(name) => f.debug_tuple("Symbol").field(name).finish(),
            Self::Function(func) => fmt::Debug::fmt(func, f),
        }
    }
}

/// Renders the value the way a string conversion would: `Nil` is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::Symbol(name) => f.write_str(name),
            Self::Function(func) => write!(f, "#<function/{}>", func.arity()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Name> for Value {
    fn from(value: Name) -> Self {
        Self::Symbol(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Self::Function(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

type Callable = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A callable value with a declared parameter count.
///
/// The arity is what a coercer validates at declaration time; the callable
/// itself receives its arguments as a slice.
///
/// # Example
///
/// ```rust
/// use understory_attribute::{Function, Value};
///
/// let to_s = Function::unary(|v| Value::from(v.to_string()));
/// assert_eq!(to_s.arity(), 1);
/// assert_eq!(to_s.call(&[Value::from(5)]).unwrap(), Value::from("5"));
///
/// let pair = Function::new(2, |_| Ok(Value::from(1)));
/// assert_eq!(pair.arity(), 2);
/// ```
#[derive(Clone)]
pub struct Function {
    arity: usize,
    callable: Arc<Callable>,
}

impl Function {
    /// Creates a function taking `arity` arguments.
    pub fn new<F>(arity: usize, callable: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            arity,
            callable: Arc::new(callable),
        }
    }

    /// Creates a one-argument function that cannot fail.
    pub fn unary<F>(callable: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::new(1, move |args| Ok(callable(first(args))))
    }

    /// Creates a one-argument function that may fail.
    ///
    /// Errors are returned unchanged from whichever accessor invoked it.
    pub fn try_unary<F>(callable: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(1, move |args| callable(first(args)))
    }

    /// Returns the declared parameter count.
    #[must_use]
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invokes the function.
    ///
    /// The argument count is not checked against the arity.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.callable)(args)
    }

    /// Returns `true` if both handles refer to the same callable.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callable, &other.callable)
    }
}

fn first(args: &[Value]) -> Value {
    args.first().cloned().unwrap_or_default()
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
