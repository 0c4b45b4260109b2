use alloc::{boxed::Box, string::String};
use core::any::type_name;
use parking_lot::Mutex;
use tracing::{debug, debug_span, error, info_span};

use crate::{
    args::Args,
    cache::{Cache, Reflected},
    config::Config,
    errors::ResolveErrorKind,
    guard::{Chain, NestingGuard},
    introspector::{Introspector, Invocation, Symbol},
    parameter::Parameter,
    provider::{normalize, Target},
    registry::Registry,
    resolver::Resolver,
    utils::{
        merge::Merge as _,
        thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    },
    value::Value,
};

/// Name-based dependency resolution container.
///
/// Cloning is cheap, clones share definitions, shared instances and the parameter cache.
/// Every top-level resolution starts its own chain for the nesting guard,
/// nested resolutions through [`Invocation::container`] continue it.
///
/// # Examples
/// ```rust
/// use sulfur::{Args, Catalog, Container, Parameter, Registry};
///
/// struct Baz(&'static str);
///
/// let catalog = Catalog::new().class("Baz", [Parameter::new("value").with_default("default")], |call| {
///     Ok(Baz(call.cloned(0)?))
/// });
/// let container = Container::new(Registry::new().share("Baz"), catalog);
///
/// let baz = container.get("Baz", Args::new()).unwrap();
/// assert!(baz.ptr_eq(&container.get("Baz", Args::new()).unwrap()));
///
/// let shared = container.get_as::<Baz>("Baz", Args::new().literal("value", "x")).unwrap();
/// assert_eq!(shared.0, "default");
///
/// let made = container.make("Baz", Args::new().literal("value", "x")).unwrap();
/// assert!(made.ptr_eq(&container.get("Baz", Args::new()).unwrap()));
/// ```
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: RcThreadSafety<ContainerInner>,
    chain: Option<Chain>,
}

pub(crate) struct ContainerInner {
    pub(crate) registry: Mutex<Registry>,
    pub(crate) cache: Mutex<Cache>,
    pub(crate) introspector: Box<dyn Introspector>,
    pub(crate) config: Config,
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new(registry: Registry, introspector: impl Introspector + 'static) -> Self {
        Self::with_config(registry, introspector, Config::default())
    }

    #[must_use]
    pub fn with_config(registry: Registry, introspector: impl Introspector + 'static, config: Config) -> Self {
        Self {
            inner: RcThreadSafety::new(ContainerInner {
                registry: Mutex::new(registry),
                cache: Mutex::new(Cache::new()),
                introspector: Box::new(introspector),
                config,
            }),
            chain: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.config
    }

    /// Registers a definition, replacing a previous one of the same name
    #[inline]
    pub fn set(&self, name: impl Into<String>, definition: impl Into<Resolver>) -> &Self {
        self.inner.registry.lock().insert_definition(name.into(), definition.into());
        self
    }

    #[inline]
    pub fn set_many<N, D>(&self, definitions: impl IntoIterator<Item = (N, D)>) -> &Self
    where
        N: Into<String>,
        D: Into<Resolver>,
    {
        let mut registry = self.inner.registry.lock();
        for (name, definition) in definitions {
            registry.insert_definition(name.into(), definition.into());
        }
        drop(registry);
        self
    }

    #[inline]
    pub fn share(&self, name: impl Into<String>) -> &Self {
        self.inner.registry.lock().mark_shared(name.into());
        self
    }

    #[inline]
    pub fn share_many<N: Into<String>>(&self, names: impl IntoIterator<Item = N>) -> &Self {
        let mut registry = self.inner.registry.lock();
        for name in names {
            registry.mark_shared(name.into());
        }
        drop(registry);
        self
    }

    /// Marks the name shared and seeds its instance
    #[inline]
    pub fn share_instance(&self, name: impl Into<String>, instance: Value) -> &Self {
        self.inner.registry.lock().seed_instance(name.into(), instance);
        self
    }

    /// Resolves the name, reusing the instance of a shared name if one was produced
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::InvalidResolver`] if the name leads to a resolver without a target
    /// - Returns [`ResolveErrorKind::CircularDependency`] if the name is nested deeper than [`Config::max_nesting`]
    /// - Returns [`ResolveErrorKind::ParameterProvision`] if an argument can't be provided
    /// - Returns [`ResolveErrorKind::UnknownType`] if the name leads to an undeclared type
    /// - Returns [`ResolveErrorKind::Instantiate`] if a factory fails
    pub fn get(&self, name: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("get", name);
        let _guard = span.enter();

        self.resolve(&Resolver::name(name), args, false)
    }

    /// Resolves the name to a new instance.
    /// The instance of a shared name is replaced by it.
    ///
    /// # Errors
    /// See [`Self::get`]
    pub fn make(&self, name: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("make", name);
        let _guard = span.enter();

        self.resolve(&Resolver::name(name), args, true)
    }

    /// Same as [`Self::get`], but downcasts the instance to `T`
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the instance isn't of type `T`
    /// - See [`Self::get`] for the rest
    pub fn get_as<T: SendSafety + SyncSafety + 'static>(&self, name: &str, args: Args) -> Result<RcThreadSafety<T>, ResolveErrorKind> {
        let value = self.get(name, args)?;
        value.downcast().ok_or_else(|| {
            let err = ResolveErrorKind::IncorrectType {
                expected: type_name::<T>(),
                actual: value.type_info().name,
            };
            error!("{}", err);
            err
        })
    }

    /// Resolves a callable, function, method or invokable object.
    ///
    /// If `context` names a registered overlay, it's merged beneath `args`.
    ///
    /// # Errors
    /// See [`Self::get`]
    pub fn call(&self, resolver: impl Into<Resolver>, args: Args, context: Option<&str>) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("call", context);
        let _guard = span.enter();

        let args = match context {
            Some(context) => match self.inner.registry.lock().definition(context) {
                Some(Resolver::Overlay(overlay)) => {
                    debug!("Context overlay merged");
                    overlay.clone().merge(args)
                }
                _ => args,
            },
            None => args,
        };

        self.resolve(&resolver.into(), args, false)
    }

    /// Exports the introspected parameters
    #[inline]
    #[must_use]
    pub fn reflected(&self) -> Reflected {
        self.inner.cache.lock().reflected()
    }

    /// Imports previously exported parameters, replacing the current ones.
    /// The cache counts as unchanged afterwards.
    #[inline]
    pub fn set_reflected(&self, reflected: Reflected) -> &Self {
        self.inner.cache.lock().replace(reflected);
        self
    }

    /// Whether parameters were introspected since the cache was created or imported
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.inner.cache.lock().changed()
    }
}

impl Container {
    /// Same container continuing a new resolution chain
    fn chained(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            chain: Some(Chain::default()),
        }
    }

    pub(crate) fn resolve(&self, resolver: &Resolver, args: Args, force: bool) -> Result<Value, ResolveErrorKind> {
        let Some(chain) = &self.chain else {
            return self.chained().resolve(resolver, args, force);
        };

        let (provider, args) = {
            let registry = self.inner.registry.lock();
            normalize(resolver, args, &registry)?
        };

        let span = debug_span!("resolve", provider = %provider, kind = ?provider.kind());
        let _span_guard = span.enter();

        if let Some(name) = &provider.name {
            if !force {
                if let Some(instance) = self.inner.registry.lock().shared_instance(name) {
                    debug!("Found shared instance");
                    return Ok(instance);
                }
            }
        }

        let guard = match &provider.name {
            Some(name) => Some(NestingGuard::enter(chain, name, self.inner.config.max_nesting)?),
            None => None,
        };

        let instance = match &provider.target {
            Target::Resolve(target) => self.resolve(target, args, force)?,
            Target::Symbol(symbol) => {
                let parameters = self.parameters(symbol, provider.cache_key.as_deref())?;
                let Some(factory) = self.inner.introspector.factory(symbol) else {
                    let err = symbol.undeclared();
                    error!("{}", err);
                    return Err(err);
                };
                let arguments = self.resolve_arguments(&provider, &parameters, &args)?;
                let receiver = match symbol {
                    Symbol::Method { receiver, .. } => Some(receiver.clone()),
                    _ => None,
                };
                factory(Invocation::new(self.clone(), receiver, parameters, arguments)).map_err(|err| {
                    error!("{}", err);
                    ResolveErrorKind::from(err)
                })?
            }
            Target::Callable(callable) => {
                let arguments = self.resolve_arguments(&provider, &callable.parameters, &args)?;
                (callable.factory)(Invocation::new(self.clone(), None, callable.parameters.clone(), arguments)).map_err(|err| {
                    error!("{}", err);
                    ResolveErrorKind::from(err)
                })?
            }
        };
        drop(guard);

        if let Some(name) = &provider.name {
            if self.inner.registry.lock().store_instance(name, &instance) {
                debug!("Shared instance stored");
            }
        }

        Ok(instance)
    }

    /// Parameters of the symbol, introspected at most once per cache key
    fn parameters(&self, symbol: &Symbol, cache_key: Option<&str>) -> Result<RcThreadSafety<[Parameter]>, ResolveErrorKind> {
        if let Some(key) = cache_key {
            if let Some(parameters) = self.inner.cache.lock().get(key) {
                debug!("Found in cache");
                return Ok(parameters);
            }
            debug!("Not found in cache");
        }

        let Some(parameters) = self.inner.introspector.parameters(symbol) else {
            let err = symbol.undeclared();
            error!("{}", err);
            return Err(err);
        };
        let parameters: RcThreadSafety<[Parameter]> = parameters.into();

        if let Some(key) = cache_key {
            self.inner.cache.lock().insert(key.into(), parameters.clone());
            debug!("Cached");
        }

        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::Container;
    use crate::{Args, Callable, Catalog, Config, Parameter, Registry, ResolveErrorKind, Resolver, Value};

    use alloc::{
        format,
        string::{String, ToString as _},
    };
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing_test::traced_test;

    struct Baz(&'static str);
    struct Foo(crate::utils::thread_safety::RcThreadSafety<Baz>);

    fn catalog() -> Catalog {
        Catalog::new()
            .class("Baz", [Parameter::new("value").with_default("default")], |call| Ok(Baz(call.cloned(0)?)))
            .class("Foo", [Parameter::new("baz").typed("Baz")], |call| Ok(Foo(call.get(0)?)))
    }

    #[test]
    #[traced_test]
    fn test_get() {
        let container = Container::new(Registry::new(), catalog());

        let foo = container.get_as::<Foo>("Foo", Args::new()).unwrap();

        assert_eq!(foo.0 .0, "default");
        assert!(logs_contain("Not found in cache"));
        assert!(logs_contain("Instantiated"));
    }

    #[test]
    #[traced_test]
    fn test_shared_instance() {
        let container = Container::new(Registry::new().share("Baz"), catalog());

        let first = container.get("Baz", Args::new()).unwrap();
        let second = container.get("Baz", Args::new()).unwrap();
        assert!(first.ptr_eq(&second));
        assert!(logs_contain("Found shared instance"));

        let made = container.make("Baz", Args::new()).unwrap();
        assert!(!made.ptr_eq(&first));
        assert!(made.ptr_eq(&container.get("Baz", Args::new()).unwrap()));
    }

    #[test]
    #[traced_test]
    fn test_share_instance_seeds() {
        let container = Container::new(Registry::new(), catalog());
        let instance = Value::new(Baz("seeded"));
        container.share_instance("Baz", instance.clone());

        assert!(container.get("Baz", Args::new()).unwrap().ptr_eq(&instance));
        assert_eq!(container.get_as::<Foo>("Foo", Args::new()).unwrap().0 .0, "seeded");
    }

    #[test]
    #[traced_test]
    fn test_get_as_incorrect_type() {
        let container = Container::new(Registry::new(), catalog());

        assert!(matches!(
            container.get_as::<Foo>("Baz", Args::new()),
            Err(ResolveErrorKind::IncorrectType { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_call_with_context() {
        let container = Container::new(Registry::new(), catalog());
        container.set("Sum", Args::new().literal("right", 10u32));
        let sum = Callable::new(
            [Parameter::new("left").with_default(1u32), Parameter::new("right").with_default(2u32)],
            |call| Ok(*call.get::<u32>(0)? + *call.get::<u32>(1)?),
        );

        let plain = container.call(sum.clone(), Args::new(), None).unwrap();
        assert_eq!(*plain.downcast::<u32>().unwrap(), 3);

        let contextual = container.call(sum.clone(), Args::new(), Some("Sum")).unwrap();
        assert_eq!(*contextual.downcast::<u32>().unwrap(), 11);
        assert!(logs_contain("Context overlay merged"));

        let overridden = container.call(sum, Args::new().literal("right", 5u32), Some("Sum")).unwrap();
        assert_eq!(*overridden.downcast::<u32>().unwrap(), 6);
    }

    #[test]
    #[traced_test]
    fn test_circular_dependency() {
        let calls = crate::utils::thread_safety::RcThreadSafety::new(AtomicU8::new(0));
        let counter = calls.clone();
        let catalog = Catalog::new().class("Loop", [], move |call| {
            counter.fetch_add(1, Ordering::SeqCst);
            call.container().get("Loop", Args::new())?;
            Ok(())
        });
        let container = Container::with_config(Registry::new(), catalog, Config { max_nesting: 2 });

        assert!(matches!(
            container.get("Loop", Args::new()),
            Err(ResolveErrorKind::CircularDependency { ref name, depth: 3, max: 2 }) if name == "Loop"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        assert!(matches!(
            container.get("Loop", Args::new()),
            Err(ResolveErrorKind::CircularDependency { depth: 3, max: 2, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    #[traced_test]
    fn test_parameters_cached() {
        let container = Container::new(Registry::new(), catalog());
        assert!(!container.changed());

        container.get("Foo", Args::new()).unwrap();
        assert!(container.changed());

        let reflected = container.reflected();
        assert!(reflected.contains_key("class:Foo.new"));
        assert!(reflected.contains_key("class:Baz.new"));

        container.get("Foo", Args::new()).unwrap();
        assert!(logs_contain("Found in cache"));

        let fresh = Container::new(Registry::new(), catalog());
        fresh.set_reflected(reflected);
        assert!(!fresh.changed());
        fresh.get("Foo", Args::new()).unwrap();
        assert!(!fresh.changed());
    }

    #[test]
    #[traced_test]
    fn test_constructor_and_static_new_cached_apart() {
        let catalog = catalog().static_method("Baz", "new", [], |_| Ok(Baz("static")));
        let container = Container::new(Registry::new(), catalog);

        assert_eq!(container.get_as::<Baz>("Baz::new", Args::new()).unwrap().0, "static");
        assert_eq!(container.get_as::<Baz>("Baz", Args::new()).unwrap().0, "default");
        assert_eq!(container.get_as::<Baz>("Baz::new", Args::new()).unwrap().0, "static");

        let reflected = container.reflected();
        assert_eq!(reflected["class:Baz.new"].len(), 1);
        assert!(reflected["static:Baz.new"].is_empty());
    }

    #[test]
    #[traced_test]
    fn test_invalid_resolver() {
        let container = Container::new(Registry::new(), catalog());

        assert!(matches!(
            container.call(Resolver::function("missing"), Args::new(), None),
            Err(ResolveErrorKind::InvalidResolver { .. })
        ));
        assert!(matches!(
            container.call(Args::new(), Args::new(), None),
            Err(ResolveErrorKind::InvalidResolver { .. })
        ));
        assert!(matches!(
            container.get("Missing", Args::new()),
            Err(ResolveErrorKind::UnknownType { .. })
        ));
    }
}
