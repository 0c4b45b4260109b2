use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::String,
};

use crate::{resolver::Resolver, value::Value};

/// Definitions, shared names and shared instances
///
/// # Examples
/// ```rust
/// use sulfur::{Args, Registry, Resolver, Value};
///
/// struct Config;
///
/// let registry = Registry::new()
///     .set("Baz", Args::new().literal("value", "notdefault"))
///     .set_many([("Alias1", Resolver::from("Foo")), ("Alias2", Resolver::from("Alias1"))])
///     .share_many(["Foo", "Bar"])
///     .share_instance("Config", Value::new(Config));
/// assert!(registry.is_shared("Config"));
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    definitions: BTreeMap<String, Resolver>,
    shared: BTreeSet<String>,
    instances: BTreeMap<String, Value>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
            shared: BTreeSet::new(),
            instances: BTreeMap::new(),
        }
    }

    /// Registers a definition, replacing a previous one of the same name
    #[inline]
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, definition: impl Into<Resolver>) -> Self {
        self.insert_definition(name.into(), definition.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn set_many<N, D>(mut self, definitions: impl IntoIterator<Item = (N, D)>) -> Self
    where
        N: Into<String>,
        D: Into<Resolver>,
    {
        for (name, definition) in definitions {
            self.insert_definition(name.into(), definition.into());
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn share(mut self, name: impl Into<String>) -> Self {
        self.mark_shared(name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn share_many<N: Into<String>>(mut self, names: impl IntoIterator<Item = N>) -> Self {
        for name in names {
            self.mark_shared(name.into());
        }
        self
    }

    /// Marks the name shared and seeds its instance
    #[inline]
    #[must_use]
    pub fn share_instance(mut self, name: impl Into<String>, instance: Value) -> Self {
        self.seed_instance(name.into(), instance);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_shared(&self, name: &str) -> bool {
        self.shared.contains(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }
}

impl Registry {
    #[inline]
    pub(crate) fn insert_definition(&mut self, name: String, definition: Resolver) -> Option<Resolver> {
        self.definitions.insert(name, definition)
    }

    #[inline]
    pub(crate) fn mark_shared(&mut self, name: String) {
        self.shared.insert(name);
    }

    #[inline]
    pub(crate) fn seed_instance(&mut self, name: String, instance: Value) {
        self.shared.insert(name.clone());
        self.instances.insert(name, instance);
    }

    #[inline]
    #[must_use]
    pub(crate) fn definition(&self, name: &str) -> Option<&Resolver> {
        self.definitions.get(name)
    }

    /// Instance of a shared name, if one was produced
    #[inline]
    #[must_use]
    pub(crate) fn shared_instance(&self, name: &str) -> Option<Value> {
        if !self.shared.contains(name) {
            return None;
        }
        self.instances.get(name).cloned()
    }

    /// Stores the newest instance of a shared name, returns whether it was stored
    #[inline]
    pub(crate) fn store_instance(&mut self, name: &str, instance: &Value) -> bool {
        if !self.shared.contains(name) {
            return false;
        }
        self.instances.insert(name.into(), instance.clone());
        true
    }
}
