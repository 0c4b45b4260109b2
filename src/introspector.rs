use alloc::{
    collections::BTreeMap,
    format,
    string::{String, ToString as _},
    vec::Vec,
};
use core::{
    any::TypeId,
    fmt::{self, Display, Formatter},
};

use crate::{
    container::Container,
    errors::{InstantiateErrorKind, ResolveErrorKind},
    instantiator::{boxed_factory, Factory},
    parameter::Parameter,
    utils::thread_safety::{RcThreadSafety, SendSafety, SyncSafety},
    value::{TypeInfo, Value},
};

/// Member name used in cache keys of constructors
pub const CONSTRUCTOR: &str = "new";

/// A declared target the [`Introspector`] knows the signature of
#[derive(Clone, Debug)]
pub enum Symbol {
    /// Constructor of the type
    Class(String),
    /// `"Type::member"` method without a receiver
    StaticMethod { ty: String, member: String },
    /// Method bound to the receiver
    Method { receiver: Value, member: String },
    /// Free function
    Function(String),
}

impl Symbol {
    /// Stable key the parameters of this symbol are cached by.
    ///
    /// The kind prefix keeps a constructor apart from a static method named [`CONSTRUCTOR`].
    /// Methods are keyed by the receiver's `TypeId` too, as [`Catalog`] looks them up,
    /// so their keys only carry over between processes running the same build.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::Class(name) => format!("class:{name}.{CONSTRUCTOR}"),
            Self::StaticMethod { ty, member } => format!("static:{ty}.{member}"),
            Self::Method { receiver, member } => {
                let TypeInfo { name, id } = receiver.type_info();
                format!("method:{name}.{member}@{id:?}")
            }
            Self::Function(name) => format!("function:{name}"),
        }
    }

    pub(crate) fn undeclared(&self) -> ResolveErrorKind {
        match self {
            Self::Class(name) => ResolveErrorKind::UnknownType { name: name.clone() },
            symbol => ResolveErrorKind::InvalidResolver {
                resolver: symbol.to_string(),
            },
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(name) => write!(f, "class {name}"),
            Self::StaticMethod { ty, member } => write!(f, "{ty}::{member}"),
            Self::Method { receiver, member } => write!(f, "{}.{member}", receiver.type_info().short_name()),
            Self::Function(name) => write!(f, "{name}()"),
        }
    }
}

/// Source of signatures and factories of declared symbols.
///
/// Rust has no runtime reflection, so signatures are declared up front,
/// see [`Catalog`] for the bundled implementation.
/// The container asks for [`Introspector::parameters`] at most once per cache key.
pub trait Introspector: SendSafety + SyncSafety {
    /// Ordered parameters of the symbol, `None` if the symbol isn't declared
    fn parameters(&self, symbol: &Symbol) -> Option<Vec<Parameter>>;

    /// Factory invoking the symbol, `None` if the symbol isn't declared
    fn factory(&self, symbol: &Symbol) -> Option<Factory>;
}

#[derive(Clone)]
struct Declaration {
    parameters: RcThreadSafety<[Parameter]>,
    factory: Factory,
}

impl Declaration {
    fn new<F, T>(parameters: impl IntoIterator<Item = Parameter>, factory: F) -> Self
    where
        F: Fn(Invocation) -> Result<T, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
        T: SendSafety + SyncSafety + 'static,
    {
        Self {
            parameters: parameters.into_iter().collect(),
            factory: boxed_factory(factory),
        }
    }
}

/// Declared constructors, methods and functions
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
/// let container = Container::new(Registry::new(), catalog);
///
/// let baz = container.get_as::<Baz>("Baz", Args::new()).unwrap();
/// assert_eq!(baz.0, "default");
/// ```
#[derive(Clone, Default)]
pub struct Catalog {
    classes: BTreeMap<String, Declaration>,
    static_methods: BTreeMap<(String, String), Declaration>,
    methods: BTreeMap<(TypeId, String), Declaration>,
    functions: BTreeMap<String, Declaration>,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the constructor of the type `name`
    #[inline]
    #[must_use]
    pub fn class<F, T>(mut self, name: impl Into<String>, parameters: impl IntoIterator<Item = Parameter>, factory: F) -> Self
    where
        F: Fn(Invocation) -> Result<T, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
        T: SendSafety + SyncSafety + 'static,
    {
        self.classes.insert(name.into(), Declaration::new(parameters, factory));
        self
    }

    /// Declares `ty::member`, callable without a receiver
    #[inline]
    #[must_use]
    pub fn static_method<F, T>(
        mut self,
        ty: impl Into<String>,
        member: impl Into<String>,
        parameters: impl IntoIterator<Item = Parameter>,
        factory: F,
    ) -> Self
    where
        F: Fn(Invocation) -> Result<T, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
        T: SendSafety + SyncSafety + 'static,
    {
        self.static_methods
            .insert((ty.into(), member.into()), Declaration::new(parameters, factory));
        self
    }

    /// Declares `member` of receivers of type `R`.
    /// The receiver is available in the factory through [`Invocation::receiver`].
    #[inline]
    #[must_use]
    pub fn method<R, F, T>(mut self, member: impl Into<String>, parameters: impl IntoIterator<Item = Parameter>, factory: F) -> Self
    where
        R: 'static,
        F: Fn(Invocation) -> Result<T, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
        T: SendSafety + SyncSafety + 'static,
    {
        self.methods
            .insert((TypeId::of::<R>(), member.into()), Declaration::new(parameters, factory));
        self
    }

    #[inline]
    #[must_use]
    pub fn function<F, T>(mut self, name: impl Into<String>, parameters: impl IntoIterator<Item = Parameter>, factory: F) -> Self
    where
        F: Fn(Invocation) -> Result<T, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
        T: SendSafety + SyncSafety + 'static,
    {
        self.functions.insert(name.into(), Declaration::new(parameters, factory));
        self
    }

    fn declaration(&self, symbol: &Symbol) -> Option<&Declaration> {
        match symbol {
            Symbol::Class(name) => self.classes.get(name),
            Symbol::StaticMethod { ty, member } => self.static_methods.get(&(ty.clone(), member.clone())),
            Symbol::Method { receiver, member } => self.methods.get(&(receiver.type_info().id, member.clone())),
            Symbol::Function(name) => self.functions.get(name),
        }
    }
}

impl Introspector for Catalog {
    fn parameters(&self, symbol: &Symbol) -> Option<Vec<Parameter>> {
        self.declaration(symbol).map(|declaration| declaration.parameters.to_vec())
    }

    fn factory(&self, symbol: &Symbol) -> Option<Factory> {
        self.declaration(symbol).map(|declaration| declaration.factory.clone())
    }
}

/// Input of a factory: the container, the receiver of a bound method
/// and the arguments resolved for the declared parameters, in declaration order.
pub struct Invocation {
    container: Container,
    receiver: Option<Value>,
    parameters: RcThreadSafety<[Parameter]>,
    arguments: Vec<Option<Value>>,
}

impl Invocation {
    #[inline]
    #[must_use]
    pub(crate) fn new(
        container: Container,
        receiver: Option<Value>,
        parameters: RcThreadSafety<[Parameter]>,
        arguments: Vec<Option<Value>>,
    ) -> Self {
        Self {
            container,
            receiver,
            parameters,
            arguments,
        }
    }

    /// Container the factory is invoked by. Resolving through it keeps the nesting guard in effect.
    #[inline]
    #[must_use]
    pub const fn container(&self) -> &Container {
        &self.container
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Argument at `index`, `None` for an absent optional argument
    #[inline]
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index).and_then(Option::as_ref)
    }

    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingReceiver`] if the factory isn't invoked on a receiver of type `T`
    pub fn receiver<T: SendSafety + SyncSafety + 'static>(&self) -> Result<RcThreadSafety<T>, InstantiateErrorKind> {
        self.receiver
            .as_ref()
            .and_then(Value::downcast)
            .ok_or(InstantiateErrorKind::MissingReceiver {
                expected: TypeInfo::of::<T>().name,
            })
    }

    /// # Errors
    /// - Returns [`InstantiateErrorKind::IncorrectType`] if the argument isn't of type `T`
    pub fn optional<T: SendSafety + SyncSafety + 'static>(&self, index: usize) -> Result<Option<RcThreadSafety<T>>, InstantiateErrorKind> {
        let Some(value) = self.value(index) else {
            return Ok(None);
        };
        match value.downcast() {
            Some(value) => Ok(Some(value)),
            None => Err(InstantiateErrorKind::IncorrectType {
                index,
                name: self.parameter_name(index),
                expected: TypeInfo::of::<T>().name,
                actual: value.type_info().name,
            }),
        }
    }

    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if the argument is absent
    /// - Returns [`InstantiateErrorKind::IncorrectType`] if the argument isn't of type `T`
    pub fn get<T: SendSafety + SyncSafety + 'static>(&self, index: usize) -> Result<RcThreadSafety<T>, InstantiateErrorKind> {
        self.optional(index)?.ok_or_else(|| InstantiateErrorKind::MissingArgument {
            index,
            name: self.parameter_name(index),
        })
    }

    /// Same as [`Self::get`], but clones the argument out of the shared instance
    ///
    /// # Errors
    /// See [`Self::get`]
    pub fn cloned<T: Clone + SendSafety + SyncSafety + 'static>(&self, index: usize) -> Result<T, InstantiateErrorKind> {
        self.get::<T>(index).map(|value| (*value).clone())
    }

    fn parameter_name(&self, index: usize) -> String {
        self.parameters
            .get(index)
            .map_or_else(|| index.to_string(), |parameter| parameter.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, Introspector as _, Invocation, Symbol};
    use crate::{Container, InstantiateErrorKind, Parameter, Registry, Value};

    use alloc::{format, string::ToString as _, vec, vec::Vec};
    use core::any::TypeId;

    struct Baz(&'static str);
    struct Factory;

    fn catalog() -> Catalog {
        Catalog::new()
            .class("Baz", [Parameter::new("value").with_default("default")], |call| Ok(Baz(call.cloned(0)?)))
            .static_method("Factory", "make", [Parameter::new("value").with_default("default")], |call| {
                Ok(Baz(call.cloned(0)?))
            })
            .method::<Factory, _, _>("create", [Parameter::new("value")], |call| {
                let _ = call.receiver::<Factory>()?;
                Ok(Baz(call.cloned(0)?))
            })
            .function("create", [Parameter::new("val").with_default("default")], |call| Ok(Baz(call.cloned(0)?)))
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(Symbol::Class("Baz".into()).cache_key(), "class:Baz.new");
        assert_eq!(
            Symbol::StaticMethod {
                ty: "Factory".into(),
                member: "make".into()
            }
            .cache_key(),
            "static:Factory.make"
        );
        let method = Symbol::Method {
            receiver: Value::new(Factory),
            member: "create".into(),
        }
        .cache_key();
        assert!(method.starts_with("method:"));
        assert!(method.contains("tests::Factory.create@"));
        assert_eq!(Symbol::Function("create".into()).cache_key(), "function:create");
    }

    #[test]
    fn test_cache_keys_distinct_per_kind() {
        let constructor = Symbol::Class("Baz".into()).cache_key();
        let static_new = Symbol::StaticMethod {
            ty: "Baz".into(),
            member: "new".into(),
        }
        .cache_key();
        assert_ne!(constructor, static_new);

        let function = Symbol::Function("Baz.new".into()).cache_key();
        assert_ne!(function, constructor);
        assert_ne!(function, static_new);
    }

    #[test]
    fn test_method_keys_follow_type_id() {
        let key = Symbol::Method {
            receiver: Value::new(Factory),
            member: "create".into(),
        }
        .cache_key();

        assert!(key.ends_with(&format!("@{:?}", TypeId::of::<Factory>())));
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = catalog();

        let parameters = catalog.parameters(&Symbol::Class("Baz".into())).unwrap();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "value");
        assert!(parameters[0].has_default());

        let method = Symbol::Method {
            receiver: Value::new(Factory),
            member: "create".into(),
        };
        assert!(catalog.parameters(&method).is_some());
        assert!(catalog.factory(&method).is_some());

        let foreign = Symbol::Method {
            receiver: Value::new(Baz("default")),
            member: "create".into(),
        };
        assert!(catalog.parameters(&foreign).is_none());
        assert!(catalog.parameters(&Symbol::Function("missing".into())).is_none());
    }

    #[test]
    fn test_undeclared() {
        assert_eq!(Symbol::Class("Missing".into()).undeclared().to_string(), "Type Missing is not declared");
        assert_eq!(
            Symbol::Function("missing".into()).undeclared().to_string(),
            "Invalid resolver: missing()"
        );
    }

    #[test]
    fn test_invocation_accessors() {
        let container = Container::new(Registry::new(), Catalog::new());
        let parameters = vec![Parameter::new("value"), Parameter::new("absent").optional()];
        let invocation = Invocation::new(
            container,
            None,
            parameters.into(),
            vec![Some(Value::new("value")), None],
        );

        assert_eq!(invocation.len(), 2);
        assert_eq!(invocation.cloned::<&str>(0).unwrap(), "value");
        assert!(invocation.optional::<&str>(1).unwrap().is_none());
        assert!(matches!(
            invocation.get::<&str>(1),
            Err(InstantiateErrorKind::MissingArgument { index: 1, ref name }) if name == "absent"
        ));
        assert!(matches!(
            invocation.get::<u8>(0),
            Err(InstantiateErrorKind::IncorrectType { index: 0, .. })
        ));
        assert!(matches!(
            invocation.receiver::<Factory>(),
            Err(InstantiateErrorKind::MissingReceiver { .. })
        ));

        let empty = Invocation::new(invocation.container().clone(), None, Vec::new().into(), Vec::new());
        assert!(empty.is_empty());
    }
}
