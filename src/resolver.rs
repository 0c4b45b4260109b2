use alloc::{
    boxed::Box,
    string::{String, ToString as _},
};
use core::fmt::{self, Debug, Formatter};

use crate::{
    args::Args,
    errors::InstantiateErrorKind,
    instantiator::{boxed_factory, Factory},
    introspector::Invocation,
    parameter::Parameter,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    value::Value,
};

/// Member invoked on an invokable object, see [`Resolver::Object`]
pub const INVOKE: &str = "invoke";

/// Raw description of how to obtain a value.
///
/// Resolvers are stored in the [`crate::Registry`] as is and normalized on every resolve.
#[derive(Clone)]
pub enum Resolver {
    /// Registered name, alias, declared type or `"Type::member"` static method
    Name(String),
    /// Declared free function
    Function(String),
    /// Anonymous function with its own parameters. Its parameters are never cached.
    Callable(Callable),
    /// Object with a declared [`INVOKE`] method
    Object(Value),
    /// Declared method bound to the receiver
    Method(Value, String),
    /// Target with default arguments merged beneath the caller's ones
    With(Box<Resolver>, Args),
    /// Default arguments only, for the type of the same name
    Overlay(Args),
}

impl Resolver {
    #[inline]
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    #[inline]
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    #[inline]
    #[must_use]
    pub fn object<T: SendSafety + SyncSafety + 'static>(object: T) -> Self {
        Self::Object(Value::new(object))
    }

    #[inline]
    #[must_use]
    pub fn method<T: SendSafety + SyncSafety + 'static>(receiver: T, member: impl Into<String>) -> Self {
        Self::Method(Value::new(receiver), member.into())
    }

    /// Adds default arguments beneath the caller's ones
    #[inline]
    #[must_use]
    pub fn with(self, args: Args) -> Self {
        Self::With(Box::new(self), args)
    }
}

impl Debug for Resolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Function(name) => f.debug_tuple("Function").field(name).finish(),
            Self::Callable(_) => f.write_str("Callable"),
            Self::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Self::Method(receiver, member) => f.debug_tuple("Method").field(receiver).field(member).finish(),
            Self::With(resolver, args) => f.debug_tuple("With").field(resolver).field(args).finish(),
            Self::Overlay(args) => f.debug_tuple("Overlay").field(args).finish(),
        }
    }
}

impl From<&str> for Resolver {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Resolver {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Callable> for Resolver {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

impl From<Args> for Resolver {
    fn from(args: Args) -> Self {
        Self::Overlay(args)
    }
}

/// Anonymous function value together with its declared parameters
#[derive(Clone)]
pub struct Callable {
    pub(crate) parameters: RcThreadSafety<[Parameter]>,
    pub(crate) factory: Factory,
}

impl Callable {
    /// # Examples
    /// ```rust
    /// use sulfur::{Args, Callable, Container, Catalog, Parameter, Registry};
    ///
    /// let container = Container::new(Registry::new(), Catalog::new());
    /// let sum = Callable::new(
    ///     [Parameter::new("left").with_default(1u32), Parameter::new("right").with_default(2u32)],
    ///     |call| Ok(*call.get::<u32>(0)? + *call.get::<u32>(1)?),
    /// );
    ///
    /// let value = container.call(sum, Args::new().literal("right", 5u32), None).unwrap();
    /// assert_eq!(*value.downcast::<u32>().unwrap(), 6);
    /// ```
    #[must_use]
    pub fn new<F, T>(parameters: impl IntoIterator<Item = Parameter>, factory: F) -> Self
    where
        F: Fn(Invocation) -> Result<T, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
        T: SendSafety + SyncSafety + 'static,
    {
        Self {
            parameters: parameters.into_iter().collect(),
            factory: boxed_factory(factory),
        }
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("parameters", &self.parameters).finish_non_exhaustive()
    }
}
