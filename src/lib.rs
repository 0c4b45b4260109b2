#![no_std]

extern crate alloc;

pub(crate) mod args;
pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod guard;
pub(crate) mod instantiator;
pub(crate) mod introspector;
pub(crate) mod parameter;
pub(crate) mod provider;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod value;

pub mod utils;

pub use args::{Argument, Args};
pub use cache::Reflected;
pub use config::{Config, MAX_NESTING};
pub use container::Container;
pub use errors::{InstantiateErrorKind, ResolveErrorKind};
pub use instantiator::Factory;
pub use introspector::{Catalog, Introspector, Invocation, Symbol, CONSTRUCTOR};
pub use parameter::Parameter;
pub use provider::ProviderKind;
pub use registry::Registry;
pub use resolver::{Callable, Resolver, INVOKE};
pub use value::{TypeInfo, Value};
