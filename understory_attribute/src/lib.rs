// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Attribute: declared, coercing attributes for runtime classes.
//!
//! This crate lets a class declare named attributes whose stored value is
//! transformed on read and/or on write by a conversion, and lets its
//! instances export and import those attributes in bulk.
//!
//! ## Core Concepts
//!
//! ### Classes and declarations
//!
//! [`ClassRegistry`] holds classes (optionally derived from a parent) and the
//! accessors declared on them:
//!
//! - `declare_reader(class, name, coercion)` - a getter, coerced on read
//! - `declare_writer(class, name, coercion)` - a setter, coerced on write
//! - `declare_attribute(class, name, options)` - both, with per-direction overrides
//!
//! ### Conversions
//!
//! A conversion is either a one-argument [`Function`] or the name of a method
//! defined on the class with [`ClassRegistry::define_method`]. It is validated
//! when the accessor is declared ([`Coercer::new`]). Unless the declaration is
//! strict, [`Value::Nil`] skips the conversion.
//!
//! ### Objects
//!
//! Any type implementing [`AttributeObject`] (or the ready-made [`Object`])
//! gets [`AttributeObjectExt`]: `read`, `write`, `attributes` (export), and
//! `assign_attributes` (import).
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_attribute::{
//!     AttributeObject, AttributeObjectExt, AttributeOptions, ClassRegistry, Function, Object,
//!     Value,
//! };
//!
//! let mut registry: ClassRegistry = ClassRegistry::new();
//! let label = registry.define_class("Label", None);
//!
//! // `text` is always a string, even when unset.
//! let to_s = Function::unary(|v| Value::from(v.to_string()));
//! registry
//!     .declare_attribute(label, "text", AttributeOptions::new().coerce(to_s).strict(true))
//!     .unwrap();
//!
//! let mut object = Object::new(label);
//! assert_eq!(object.read(&registry, "text").unwrap(), Value::from(""));
//!
//! // Unknown keys are ignored on import.
//! object
//!     .assign_attributes(&registry, [("text", Value::from(42)), ("color", Value::from("red"))])
//!     .unwrap();
//! assert_eq!(object.slots().get("text"), Some(&Value::from("42")));
//!
//! let exported = object.attributes(&registry).unwrap();
//! assert_eq!(exported.get("text"), Some(&Value::from("42")));
//! assert!(!exported.contains_key("color"));
//! ```
//!
//! ## Inheritance
//!
//! A derived class sees its parent's accessors and methods. Its reader and
//! writer name sets are copied from the parent the first time they are used,
//! and diverge from then on.
//!
//! ## Logging
//!
//! Declarations are logged at `debug` level and skipped import keys at
//! `trace` level through the [`log`] facade.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod attributes;
mod coercer;
mod error;
mod id;
mod object;
mod options;
mod registry;
mod store;
mod value;

pub use attributes::Attributes;
pub use coercer::{Coercer, Coercion, Conversion};
pub use error::{Error, Result};
pub use id::{ClassId, Name};
pub use object::{AttributeObject, AttributeObjectExt, Object};
pub use options::AttributeOptions;
pub use registry::{ClassRegistry, Method};
pub use store::SlotStore;
pub use value::{Function, Value};
