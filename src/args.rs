use alloc::{
    collections::{btree_map, BTreeMap},
    string::String,
};
use core::fmt::{self, Debug, Formatter};

use crate::{
    resolver::Resolver,
    utils::thread_safety::{SendSafety, SyncSafety},
    value::Value,
};

/// How one argument is supplied by the caller
#[derive(Clone)]
pub enum Argument {
    /// Used as is, without any further resolution
    Literal(Value),
    /// Resolved on its own through the container
    Resolve(Resolver),
    /// Default arguments for autowiring the parameter's declared type
    Overlay(Args),
}

impl Debug for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Resolve(resolver) => f.debug_tuple("Resolve").field(resolver).finish(),
            Self::Overlay(args) => f.debug_tuple("Overlay").field(args).finish(),
        }
    }
}

impl From<Resolver> for Argument {
    fn from(resolver: Resolver) -> Self {
        match resolver {
            Resolver::Overlay(args) => Self::Overlay(args),
            resolver => Self::Resolve(resolver),
        }
    }
}

/// Arguments supplied by the caller, keyed by parameter name.
///
/// There is one entry per name, so a literal and a resolver given for the same parameter
/// replace each other.
///
/// # Examples
/// ```rust
/// use sulfur::{Args, Callable};
///
/// let args = Args::new()
///     .literal("value", "notdefault")
///     .resolve("bar", Callable::new([], |_| Ok("resolved")))
///     .overlay("baz", Args::new().literal("value", "nested"));
/// assert_eq!(args.len(), 3);
/// ```
#[derive(Clone, Default)]
pub struct Args {
    pub(crate) entries: BTreeMap<String, Argument>,
}

impl Args {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub fn literal<T: SendSafety + SyncSafety + 'static>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, Argument::Literal(Value::new(value)));
        self
    }

    #[inline]
    #[must_use]
    pub fn resolve(mut self, name: impl Into<String>, resolver: impl Into<Resolver>) -> Self {
        self.insert(name, Argument::from(resolver.into()));
        self
    }

    #[inline]
    #[must_use]
    pub fn overlay(mut self, name: impl Into<String>, args: Args) -> Self {
        self.insert(name, Argument::Overlay(args));
        self
    }

    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, argument: Argument) -> Option<Argument> {
        self.entries.insert(name.into(), argument)
    }

    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Argument> {
        self.entries.remove(name)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.entries.get(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, String, Argument> {
        self.entries.iter()
    }
}

impl Debug for Args {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<N: Into<String>> FromIterator<(N, Argument)> for Args {
    fn from_iter<I: IntoIterator<Item = (N, Argument)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, argument)| (name.into(), argument)).collect(),
        }
    }
}
