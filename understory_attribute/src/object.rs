// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute object traits.
//!
//! This module provides the [`AttributeObject`] trait for objects whose class
//! is registered in a [`ClassRegistry`], and [`AttributeObjectExt`] for
//! reading, writing, exporting, and importing their declared attributes.

use log::trace;

use crate::attributes::Attributes;
use crate::error::Result;
use crate::id::{ClassId, Name};
use crate::registry::ClassRegistry;
use crate::store::SlotStore;
use crate::value::Value;

/// A trait for objects that carry declared attributes.
///
/// The object names its class and exposes its slots; every other operation
/// comes from [`AttributeObjectExt`].
///
/// # Example
///
/// ```rust
/// use understory_attribute::{AttributeObject, ClassId, SlotStore};
///
/// struct Record {
///     class: ClassId,
///     slots: SlotStore,
/// }
///
/// impl AttributeObject for Record {
///     fn class_id(&self) -> ClassId {
///         self.class
///     }
///
///     fn slots(&self) -> &SlotStore {
///         &self.slots
///     }
///
///     fn slots_mut(&mut self) -> &mut SlotStore {
///         &mut self.slots
///     }
/// }
/// ```
pub trait AttributeObject {
    /// Returns the class this object is an instance of.
    fn class_id(&self) -> ClassId;

    /// Returns a reference to the object's slots.
    fn slots(&self) -> &SlotStore;

    /// Returns a mutable reference to the object's slots.
    fn slots_mut(&mut self) -> &mut SlotStore;
}

/// Extension methods for [`AttributeObject`].
///
/// All of these go through the accessors declared in the registry, so a
/// conversion applies whether a field is touched on its own or in bulk.
pub trait AttributeObjectExt: AttributeObject + Sized {
    /// Reads `name` through its getter.
    ///
    /// # Errors
    ///
    /// [`Error::UndefinedMethod`](crate::Error::UndefinedMethod) if the class
    /// has no getter for `name`; otherwise whatever the conversion returns.
    fn read(&self, registry: &ClassRegistry<Self>, name: &str) -> Result<Value> {
        registry.get(self, name)
    }

    /// Writes `value` to `name` through its setter.
    ///
    /// # Errors
    ///
    /// [`Error::UndefinedMethod`](crate::Error::UndefinedMethod) (naming
    /// `name=`) if the class has no setter for `name`; otherwise whatever the
    /// conversion returns. The slot is left untouched on error.
    fn write(
        &mut self,
        registry: &ClassRegistry<Self>,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        registry.set(self, name, value.into())
    }

    /// Returns `true` if the object has a getter for `name`.
    fn responds_to_reader(&self, registry: &ClassRegistry<Self>, name: &str) -> bool {
        registry.has_reader(self.class_id(), name)
    }

    /// Returns `true` if the object has a setter for `name`.
    fn responds_to_writer(&self, registry: &ClassRegistry<Self>, name: &str) -> bool {
        registry.has_writer(self.class_id(), name)
    }

    /// Exports every reader-declared attribute.
    ///
    /// The result is ordered like the class's reader set, inherited names
    /// first. Attributes with only a setter are left out.
    ///
    /// # Errors
    ///
    /// The first error returned by a getter.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understory_attribute::{
    ///     AttributeObjectExt, AttributeOptions, ClassRegistry, Function, Object, Value,
    /// };
    ///
    /// let mut registry: ClassRegistry = ClassRegistry::new();
    /// let parent = registry.define_class("Parent", None);
    /// registry
    ///     .declare_attribute(
    ///         parent,
    ///         "foo",
    ///         AttributeOptions::new()
    ///             .coerce(Function::unary(|_| Value::from(1)))
    ///             .strict(true),
    ///     )
    ///     .unwrap();
    /// let child = registry.define_class("Child", Some(parent));
    /// registry.declare_attribute(child, "bar", AttributeOptions::new()).unwrap();
    ///
    /// let exported = Object::new(child).attributes(&registry).unwrap();
    /// assert_eq!(exported.get("foo"), Some(&Value::from(1)));
    /// assert_eq!(exported.get("bar"), Some(&Value::Nil));
    ///
    /// assert_eq!(Object::new(parent).attributes(&registry).unwrap().len(), 1);
    /// ```
    fn attributes(&self, registry: &ClassRegistry<Self>) -> Result<Attributes> {
        let mut exported = Attributes::new();
        for name in registry.reader_names(self.class_id()) {
            exported.insert(name.clone(), registry.get(self, name)?);
        }
        Ok(exported)
    }

    /// Imports `options` through the writer-declared attributes.
    ///
    /// Keys are normalized to [`Name`]s (a repeated key keeps its last
    /// value), keys without a declared writer are skipped silently, and the
    /// remaining values are written in the order they were given. Returns
    /// `self` for chaining.
    ///
    /// # Errors
    ///
    /// The first error returned by a setter; earlier writes are kept.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understory_attribute::{
    ///     AttributeObject, AttributeObjectExt, ClassRegistry, Coercion, Function, Object, Value,
    /// };
    ///
    /// let mut registry: ClassRegistry = ClassRegistry::new();
    /// let class = registry.define_class("Subject", None);
    /// let to_s = Function::unary(|v| Value::from(v.to_string()));
    /// registry.declare_writer(class, "foo", Coercion::new().coerce(to_s)).unwrap();
    ///
    /// let mut object = Object::new(class);
    /// object
    ///     .assign_attributes(&registry, [("foo", Value::from(1)), ("unknown", Value::from(2))])
    ///     .unwrap();
    ///
    /// assert_eq!(object.slots().get("foo"), Some(&Value::from("1")));
    /// assert!(object.slots().get("unknown").is_none());
    /// ```
    fn assign_attributes<I, K, V>(
        &mut self,
        registry: &ClassRegistry<Self>,
        options: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Name>,
        V: Into<Value>,
    {
        let options: Attributes = options.into_iter().collect();
        let writers = registry.writer_names(self.class_id());
        for (name, value) in options {
            if writers.contains(&name) {
                registry.set(self, &name, value)?;
            } else {
                trace!("skipped undeclared attribute `{name}` on import");
            }
        }
        Ok(self)
    }
}

impl<O: AttributeObject> AttributeObjectExt for O {}

/// A ready-made [`AttributeObject`]: a class and its slots.
///
/// # Example
///
/// ```rust
/// use understory_attribute::{AttributeObject, ClassRegistry, Object};
///
/// let mut registry: ClassRegistry = ClassRegistry::new();
/// let class = registry.define_class("Subject", None);
///
/// let object = Object::new(class);
/// assert_eq!(object.class_id(), class);
/// assert!(object.slots().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    class: ClassId,
    slots: SlotStore,
}

impl Object {
    /// Creates an object of `class` with every slot unset.
    #[must_use]
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            slots: SlotStore::new(),
        }
    }
}

impl AttributeObject for Object {
    fn class_id(&self) -> ClassId {
        self.class
    }

    fn slots(&self) -> &SlotStore {
        &self.slots
    }

    fn slots_mut(&mut self) -> &mut SlotStore {
        &mut self.slots
    }
}
