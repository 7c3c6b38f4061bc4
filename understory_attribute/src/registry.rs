// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class registry and attribute declarations.
//!
//! This module provides [`ClassRegistry`], which records classes, the
//! accessors declared on them, and which attribute names take part in bulk
//! export and import.
//!
//! ## Name sets
//!
//! Each class keeps an ordered reader set and an ordered writer set. A set is
//! created the first time it is touched, as a copy of the parent class's set
//! (or empty for a root class). From then on the two evolve independently:
//! declaring on a subclass never changes its parent.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::OnceCell;
use hashbrown::HashMap;
use log::{debug, trace};
use smallvec::SmallVec;

use crate::coercer::{Coercer, Coercion};
use crate::error::{Error, Result};
use crate::id::{ClassId, Name};
use crate::object::{AttributeObject, Object};
use crate::options::AttributeOptions;
use crate::value::Value;

/// An ordered, duplicate-free set of attribute names.
pub(crate) type NameSet = SmallVec<[Name; 8]>;

/// A method callable by name from a coercer.
pub type Method<O> = Box<dyn Fn(&O, Value) -> Result<Value> + Send + Sync>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// A generated accessor: the conversion it applies, if any.
type Accessor = Option<Coercer>;

struct ClassEntry<O> {
    name: Name,
    parent: Option<ClassId>,
    readers: OnceCell<NameSet>,
    writers: OnceCell<NameSet>,
    getters: HashMap<Name, Accessor>,
    setters: HashMap<Name, Accessor>,
    methods: HashMap<Name, Method<O>>,
}

impl<O> ClassEntry<O> {
    fn new(name: Name, parent: Option<ClassId>) -> Self {
        Self {
            name,
            parent,
            readers: OnceCell::new(),
            writers: OnceCell::new(),
            getters: HashMap::new(),
            setters: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    fn names(&self, access: Access) -> &OnceCell<NameSet> {
        match access {
            Access::Read => &self.readers,
            Access::Write => &self.writers,
        }
    }

    fn names_mut(&mut self, access: Access) -> &mut OnceCell<NameSet> {
        match access {
            Access::Read => &mut self.readers,
            Access::Write => &mut self.writers,
        }
    }

    fn accessors(&self, access: Access) -> &HashMap<Name, Accessor> {
        match access {
            Access::Read => &self.getters,
            Access::Write => &self.setters,
        }
    }

    fn accessors_mut(&mut self, access: Access) -> &mut HashMap<Name, Accessor> {
        match access {
            Access::Read => &mut self.getters,
            Access::Write => &mut self.setters,
        }
    }
}

/// A registry of classes and their declared attributes.
///
/// Registering a class with [`define_class`](Self::define_class) opts it in:
/// the class can then declare attributes, and its instances (any
/// [`AttributeObject`]) can read, write, export, and import them.
///
/// Declarations happen while classes are being set up and need `&mut self`;
/// instance operations only borrow the registry.
///
/// # Example
///
/// ```rust
/// use understory_attribute::{
///     AttributeObject, AttributeObjectExt, AttributeOptions, ClassRegistry, Function, Object,
///     Value,
/// };
///
/// let mut registry: ClassRegistry = ClassRegistry::new();
/// let point = registry.define_class("Point", None);
///
/// registry
///     .declare_attribute(
///         point,
///         "x",
///         AttributeOptions::new()
///             .writer(Function::unary(|v| Value::from(v.as_int().unwrap_or(0) + 1)))
///             .reader(Function::unary(|v| Value::from(v.to_string()))),
///     )
///     .unwrap();
///
/// let mut object = Object::new(point);
/// object.write(&registry, "x", Value::from(4)).unwrap();
/// assert_eq!(object.slots().get("x"), Some(&Value::from(5)));
/// assert_eq!(object.read(&registry, "x").unwrap(), Value::from("5"));
/// ```
pub struct ClassRegistry<O = Object> {
    classes: Vec<ClassEntry<O>>,
    by_name: HashMap<Name, ClassId>,
}

impl<O> Default for ClassRegistry<O> {
    fn default() -> Self {
        Self {
            classes: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<O> ClassRegistry<O> {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, optionally deriving from `parent`.
    ///
    /// The class's name sets are not copied here; that happens the first
    /// time they are used, so declarations the parent makes in between are
    /// still inherited.
    ///
    /// # Panics
    ///
    /// Panics if a class with the same name is already registered, if
    /// `parent` is not registered here, or if more than 65,536 classes are
    /// registered.
    pub fn define_class(&mut self, name: impl Into<Name>, parent: Option<ClassId>) -> ClassId {
        let name = name.into();
        assert!(
            !self.by_name.contains_key(&name),
            "Class '{name}' is already registered"
        );
        if let Some(parent) = parent {
            assert!(
                self.entry(parent).is_some(),
                "Parent {parent} of class '{name}' is not registered"
            );
        }
        assert!(
            self.classes.len() < u16::MAX as usize,
            "Too many classes registered (max {})",
            u16::MAX
        );

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = ClassId::new(self.classes.len() as u16);

        debug!("defined class `{name}` as {id} (parent: {parent:?})");
        self.classes.push(ClassEntry::new(name.clone(), parent));
        self.by_name.insert(name, id);
        id
    }

    /// Returns the number of registered classes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no classes are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of a class.
    #[must_use]
    pub fn class_name(&self, class: ClassId) -> Option<&Name> {
        self.entry(class).map(|c| &c.name)
    }

    /// Returns the parent of a class.
    #[must_use]
    pub fn parent(&self, class: ClassId) -> Option<ClassId> {
        self.entry(class).and_then(|c| c.parent)
    }

    fn entry(&self, class: ClassId) -> Option<&ClassEntry<O>> {
        self.classes.get(class.index() as usize)
    }

    fn entry_mut(&mut self, class: ClassId) -> &mut ClassEntry<O> {
        let index = class.index() as usize;
        assert!(index < self.classes.len(), "Class {class} is not registered");
        &mut self.classes[index]
    }

    /// Walks `class` and its ancestors, nearest first.
    fn ancestry(&self, class: ClassId) -> impl Iterator<Item = &ClassEntry<O>> + '_ {
        let mut current = self.entry(class);
        core::iter::from_fn(move || {
            let entry = current?;
            current = entry.parent.and_then(|parent| self.entry(parent));
            Some(entry)
        })
    }

    fn undefined(&self, class: ClassId, name: Name) -> Error {
        Error::UndefinedMethod {
            class: self
                .class_name(class)
                .cloned()
                .unwrap_or_else(|| Name::from(alloc::format!("{class}"))),
            name,
        }
    }

    // =========================================================================
    // Name sets
    // =========================================================================

    fn names(&self, class: ClassId, access: Access) -> &[Name] {
        match self.entry(class) {
            Some(entry) => entry
                .names(access)
                .get_or_init(|| {
                    entry
                        .parent
                        .map(|parent| self.names(parent, access).iter().cloned().collect::<NameSet>())
                        .unwrap_or_default()
                })
                .as_slice(),
            None => &[],
        }
    }

    fn names_mut(&mut self, class: ClassId, access: Access) -> &mut NameSet {
        // Seed from the parent before taking the mutable borrow.
        let _ = self.names(class, access);
        self.entry_mut(class)
            .names_mut(access)
            .get_mut()
            .expect("name set is seeded before mutation")
    }

    /// The names taking part in export, in declaration order.
    pub(crate) fn reader_names(&self, class: ClassId) -> &[Name] {
        self.names(class, Access::Read)
    }

    /// The names taking part in import, in declaration order.
    pub(crate) fn writer_names(&self, class: ClassId) -> &[Name] {
        self.names(class, Access::Write)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn declare(
        &mut self,
        class: ClassId,
        name: Name,
        coercion: Coercion,
        access: Access,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::MissingFieldName);
        }
        let accessor = coercion.build()?;
        debug!(
            "declared {access:?} accessor `{name}` on {class} ({})",
            if accessor.is_some() { "coerced" } else { "plain" }
        );

        self.entry_mut(class)
            .accessors_mut(access)
            .insert(name.clone(), accessor);
        let names = self.names_mut(class, access);
        if !names.contains(&name) {
            names.push(name);
        }
        Ok(())
    }

    /// Declares a getter for `name` on `class`.
    ///
    /// The getter reads the object's slot and passes the raw value through
    /// the coercer built from `coercion`; without a conversion it returns the
    /// raw value. `name` joins the class's reader set once, however often it
    /// is declared; the latest declaration decides the getter's behaviour.
    ///
    /// # Errors
    ///
    /// [`Error::MissingFieldName`] for an empty name, or any error from
    /// [`Coercer::new`]. Nothing is registered when an error is returned.
    ///
    /// # Panics
    ///
    /// Panics if `class` is not registered.
    pub fn declare_reader(
        &mut self,
        class: ClassId,
        name: impl Into<Name>,
        coercion: Coercion,
    ) -> Result<()> {
        self.declare(class, name.into(), coercion, Access::Read)
    }

    /// Declares a setter for `name` on `class`.
    ///
    /// The setter coerces the incoming value and stores the result in the
    /// object's slot. See [`declare_reader`](Self::declare_reader) for the
    /// registration rules.
    ///
    /// # Errors
    ///
    /// Same as [`declare_reader`](Self::declare_reader).
    ///
    /// # Panics
    ///
    /// Panics if `class` is not registered.
    pub fn declare_writer(
        &mut self,
        class: ClassId,
        name: impl Into<Name>,
        coercion: Coercion,
    ) -> Result<()> {
        self.declare(class, name.into(), coercion, Access::Write)
    }

    /// Declares both a getter and a setter for `name`.
    ///
    /// The getter uses the `reader` conversion if one was given, else the
    /// shared one; likewise the setter with `writer`. `strict` applies to both.
    ///
    /// # Errors
    ///
    /// Same as [`declare_reader`](Self::declare_reader). Both coercers are
    /// validated before either accessor is declared.
    ///
    /// # Panics
    ///
    /// Panics if `class` is not registered.
    pub fn declare_attribute(
        &mut self,
        class: ClassId,
        name: impl Into<Name>,
        options: AttributeOptions,
    ) -> Result<()> {
        let name = name.into();
        let reader = options.reader_coercion();
        let writer = options.writer_coercion();
        if name.is_empty() {
            return Err(Error::MissingFieldName);
        }
        reader.clone().build()?;
        writer.clone().build()?;

        self.declare(class, name.clone(), reader, Access::Read)?;
        self.declare(class, name, writer, Access::Write)
    }

    /// Defines a method that conversions can name.
    ///
    /// Subclasses inherit methods and may redefine them.
    ///
    /// # Panics
    ///
    /// Panics if `class` is not registered.
    pub fn define_method<F>(&mut self, class: ClassId, name: impl Into<Name>, method: F)
    where
        F: Fn(&O, Value) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        trace!("defined method `{name}` on {class}");
        self.entry_mut(class).methods.insert(name, Box::new(method));
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    fn accessor(&self, class: ClassId, name: &str, access: Access) -> Option<&Accessor> {
        self.ancestry(class)
            .find_map(|entry| entry.accessors(access).get(name))
    }

    /// Returns `true` if objects of `class` have a getter for `name`.
    #[must_use]
    pub fn has_reader(&self, class: ClassId, name: &str) -> bool {
        self.accessor(class, name, Access::Read).is_some()
    }

    /// Returns `true` if objects of `class` have a setter for `name`.
    #[must_use]
    pub fn has_writer(&self, class: ClassId, name: &str) -> bool {
        self.accessor(class, name, Access::Write).is_some()
    }

    /// Returns `true` if objects of `class` have a method called `name`.
    #[must_use]
    pub fn has_method(&self, class: ClassId, name: &str) -> bool {
        self.ancestry(class).any(|entry| entry.methods.contains_key(name))
    }
}

impl<O: AttributeObject> ClassRegistry<O> {
    /// Calls the method `name` on `owner`.
    pub(crate) fn invoke_method(&self, owner: &O, name: &Name, value: Value) -> Result<Value> {
        let class = owner.class_id();
        let method = self
            .ancestry(class)
            .find_map(|entry| entry.methods.get(name))
            .ok_or_else(|| self.undefined(class, name.clone()))?;
        method(owner, value)
    }

    /// Runs the getter for `name` against `owner`.
    pub(crate) fn get(&self, owner: &O, name: &str) -> Result<Value> {
        let class = owner.class_id();
        let accessor = self
            .accessor(class, name, Access::Read)
            .ok_or_else(|| self.undefined(class, Name::from(name)))?;
        let raw = owner.slots().get(name).cloned().unwrap_or_default();
        match accessor {
            Some(coercer) => coercer.apply(self, owner, raw),
            None => Ok(raw),
        }
    }

    /// Runs the setter for `name` against `owner`.
    pub(crate) fn set(&self, owner: &mut O, name: &str, value: Value) -> Result<()> {
        let class = owner.class_id();
        let accessor = self
            .accessor(class, name, Access::Write)
            .ok_or_else(|| self.undefined(class, Name::from(alloc::format!("{name}="))))?;
        let value = match accessor {
            Some(coercer) => coercer.apply(self, owner, value)?,
            None => value,
        };
        owner.slots_mut().set(name, value);
        Ok(())
    }
}

impl<O> core::fmt::Debug for ClassRegistry<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("count", &self.classes.len())
            .field(
                "classes",
                &self.classes.iter().map(|c| &c.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Function;
    use alloc::format;
    use alloc::string::ToString;

    fn names(list: &[Name]) -> Vec<&str> {
        list.iter().map(|n| n.as_str()).collect()
    }

    #[test]
    fn registry_new() {
        let registry: ClassRegistry = ClassRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_define_class() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let base = registry.define_class("Base", None);
        let derived = registry.define_class("Derived", Some(base));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.by_name("Derived"), Some(derived));
        assert_eq!(registry.by_name("Missing"), None);
        assert_eq!(registry.class_name(base).map(Name::as_str), Some("Base"));
        assert_eq!(registry.parent(derived), Some(base));
        assert_eq!(registry.parent(base), None);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn registry_duplicate_class() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        registry.define_class("Base", None);
        registry.define_class("Base", None);
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn registry_unknown_parent() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        registry.define_class("Orphan", Some(ClassId::new(9)));
    }

    #[test]
    fn declare_registers_names_once() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let class = registry.define_class("Subject", None);
        registry.declare_reader(class, "foo", Coercion::new()).unwrap();
        registry.declare_reader(class, "bar", Coercion::new()).unwrap();
        registry.declare_reader(class, "foo", Coercion::new()).unwrap();

        assert_eq!(names(registry.reader_names(class)), ["foo", "bar"]);
        assert!(registry.writer_names(class).is_empty());
    }

    #[test]
    fn declare_reader_only() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let class = registry.define_class("Subject", None);
        registry.declare_reader(class, "foo", Coercion::new()).unwrap();

        assert!(registry.has_reader(class, "foo"));
        assert!(!registry.has_writer(class, "foo"));
    }

    #[test]
    fn declare_writer_only() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let class = registry.define_class("Subject", None);
        registry.declare_writer(class, "foo", Coercion::new()).unwrap();

        assert!(registry.has_writer(class, "foo"));
        assert!(!registry.has_reader(class, "foo"));
        assert_eq!(names(registry.writer_names(class)), ["foo"]);
    }

    #[test]
    fn declare_without_name_fails() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let class = registry.define_class("Subject", None);

        assert_eq!(
            registry.declare_reader(class, "", Coercion::new()),
            Err(Error::MissingFieldName)
        );
        assert_eq!(
            registry.declare_writer(class, "", Coercion::new()),
            Err(Error::MissingFieldName)
        );
        assert_eq!(
            registry.declare_attribute(class, "", AttributeOptions::new()),
            Err(Error::MissingFieldName)
        );
        assert!(registry.reader_names(class).is_empty());
    }

    #[test]
    fn failed_declaration_registers_nothing() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let class = registry.define_class("Subject", None);

        let error = registry
            .declare_reader(class, "foo", Coercion::new().coerce(1))
            .unwrap_err();
        assert_eq!(error.to_string(), "1 is not a function, symbol, or string");
        assert!(!registry.has_reader(class, "foo"));
        assert!(registry.reader_names(class).is_empty());

        // A bad writer conversion keeps the reader from being declared too.
        let binary = Function::new(2, |_| Ok(Value::Nil));
        let error = registry
            .declare_attribute(class, "bar", AttributeOptions::new().writer(binary))
            .unwrap_err();
        assert_eq!(error, Error::InvalidConversionArity { arity: 2 });
        assert!(!registry.has_reader(class, "bar"));
    }

    #[test]
    fn declare_attribute_registers_both_sets() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let class = registry.define_class("Subject", None);
        registry
            .declare_attribute(class, "foo", AttributeOptions::new())
            .unwrap();

        assert_eq!(names(registry.reader_names(class)), ["foo"]);
        assert_eq!(names(registry.writer_names(class)), ["foo"]);
    }

    #[test]
    fn subclass_copies_parent_sets_on_first_use() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let parent = registry.define_class("Parent", None);
        let child = registry.define_class("Child", Some(parent));

        // Declared after the child was defined but before it was used.
        registry.declare_attribute(parent, "foo", AttributeOptions::new()).unwrap();
        registry.declare_attribute(child, "bar", AttributeOptions::new()).unwrap();

        assert_eq!(names(registry.reader_names(parent)), ["foo"]);
        assert_eq!(names(registry.reader_names(child)), ["foo", "bar"]);
        assert_eq!(names(registry.writer_names(child)), ["foo", "bar"]);
    }

    #[test]
    fn subclass_sets_diverge_after_first_use() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let parent = registry.define_class("Parent", None);
        let child = registry.define_class("Child", Some(parent));
        registry.declare_reader(parent, "foo", Coercion::new()).unwrap();

        assert_eq!(names(registry.reader_names(child)), ["foo"]);

        // Later parent declarations are not seen by an already seeded child.
        registry.declare_reader(parent, "baz", Coercion::new()).unwrap();
        assert_eq!(names(registry.reader_names(parent)), ["foo", "baz"]);
        assert_eq!(names(registry.reader_names(child)), ["foo"]);

        // Its accessor is still inherited through the class chain.
        assert!(registry.has_reader(child, "baz"));
    }

    #[test]
    fn grandchild_seeds_through_chain() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let a = registry.define_class("A", None);
        let b = registry.define_class("B", Some(a));
        let c = registry.define_class("C", Some(b));
        registry.declare_writer(a, "x", Coercion::new()).unwrap();
        registry.declare_writer(b, "y", Coercion::new()).unwrap();

        assert_eq!(names(registry.writer_names(c)), ["x", "y"]);
        assert_eq!(names(registry.writer_names(a)), ["x"]);
    }

    #[test]
    fn methods_are_inherited() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        let parent = registry.define_class("Parent", None);
        let child = registry.define_class("Child", Some(parent));
        registry.define_method(parent, "normalize", |_, v| Ok(v));

        assert!(registry.has_method(child, "normalize"));
        assert!(!registry.has_method(child, "other"));
    }

    #[test]
    fn registry_debug() {
        let mut registry: ClassRegistry = ClassRegistry::new();
        registry.define_class("Point", None);

        let debug = format!("{:?}", registry);
        assert!(debug.contains("ClassRegistry"));
        assert!(debug.contains("Point"));
    }
}
