use alloc::{
    format,
    string::{String, ToString as _},
};
use core::fmt::{self, Display, Formatter};
use tracing::error;

use crate::{
    args::Args,
    errors::ResolveErrorKind,
    introspector::Symbol,
    registry::Registry,
    resolver::{Callable, Resolver, INVOKE},
    utils::merge::Merge as _,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Construct,
    Resolve,
    Method,
    Function,
}

#[derive(Clone, Debug)]
pub(crate) enum Target {
    /// Another resolver to resolve instead
    Resolve(Resolver),
    Symbol(Symbol),
    Callable(Callable),
}

/// Normalized description of how to produce a value for one request
#[derive(Clone, Debug)]
pub(crate) struct Provider {
    pub(crate) target: Target,
    /// Set for declared symbols only
    pub(crate) cache_key: Option<String>,
    /// Set only when reached through a registry name lookup
    pub(crate) name: Option<String>,
}

impl Provider {
    fn symbol(symbol: Symbol, name: Option<String>) -> Self {
        Self {
            cache_key: Some(symbol.cache_key()),
            target: Target::Symbol(symbol),
            name,
        }
    }

    #[must_use]
    pub(crate) const fn kind(&self) -> ProviderKind {
        match &self.target {
            Target::Resolve(_) => ProviderKind::Resolve,
            Target::Symbol(Symbol::Class(_)) => ProviderKind::Construct,
            Target::Symbol(Symbol::StaticMethod { .. } | Symbol::Method { .. }) => ProviderKind::Method,
            Target::Symbol(Symbol::Function(_)) | Target::Callable(_) => ProviderKind::Function,
        }
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.target) {
            (Some(name), Target::Resolve(_)) => write!(f, "{name}"),
            (Some(name), Target::Symbol(Symbol::Class(class))) if name == class => write!(f, "class {class}"),
            (Some(name), Target::Symbol(symbol)) => write!(f, "{symbol} ({name})"),
            (None, Target::Resolve(resolver)) => write!(f, "{resolver:?}"),
            (None, Target::Symbol(symbol)) => write!(f, "{symbol}"),
            (_, Target::Callable(_)) => f.write_str("callable"),
        }
    }
}

fn invalid(resolver: &Resolver) -> ResolveErrorKind {
    let err = ResolveErrorKind::InvalidResolver {
        resolver: format!("{resolver:?}"),
    };
    error!("{}", err);
    err
}

/// Converts a raw resolver into a provider, together with the arguments in effect for it.
///
/// Default arguments found on the way are merged beneath `args`, caller entries win.
///
/// # Errors
/// - Returns [`ResolveErrorKind::InvalidResolver`] if the resolver has no target
pub(crate) fn normalize(resolver: &Resolver, args: Args, registry: &Registry) -> Result<(Provider, Args), ResolveErrorKind> {
    match resolver {
        Resolver::With(target, overlay) => {
            if let Resolver::Overlay(_) = **target {
                return Err(invalid(resolver));
            }
            normalize(target, overlay.clone().merge(args), registry)
        }
        Resolver::Name(name) => Ok(normalize_name(name, args, registry)),
        Resolver::Function(function) => Ok((Provider::symbol(Symbol::Function(function.clone()), None), args)),
        Resolver::Callable(callable) => Ok((
            Provider {
                target: Target::Callable(callable.clone()),
                cache_key: None,
                name: None,
            },
            args,
        )),
        Resolver::Object(object) => Ok((
            Provider::symbol(
                Symbol::Method {
                    receiver: object.clone(),
                    member: INVOKE.to_string(),
                },
                None,
            ),
            args,
        )),
        Resolver::Method(receiver, member) => Ok((
            Provider::symbol(
                Symbol::Method {
                    receiver: receiver.clone(),
                    member: member.clone(),
                },
                None,
            ),
            args,
        )),
        Resolver::Overlay(_) => Err(invalid(resolver)),
    }
}

fn normalize_name(name: &str, args: Args, registry: &Registry) -> (Provider, Args) {
    match registry.definition(name) {
        Some(Resolver::Overlay(overlay)) => (
            Provider::symbol(Symbol::Class(name.to_string()), Some(name.to_string())),
            overlay.clone().merge(args),
        ),
        Some(definition) => (
            Provider {
                target: Target::Resolve(definition.clone()),
                cache_key: None,
                name: Some(name.to_string()),
            },
            args,
        ),
        None => {
            let symbol = match name.split_once("::") {
                Some((ty, member)) if !ty.is_empty() && !member.is_empty() => Symbol::StaticMethod {
                    ty: ty.to_string(),
                    member: member.to_string(),
                },
                _ => Symbol::Class(name.to_string()),
            };
            (Provider::symbol(symbol, Some(name.to_string())), args)
        }
    }
}
