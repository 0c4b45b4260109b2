use core::{
    any::{type_name, TypeId},
    fmt::{self, Debug, Formatter},
};

use crate::utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety};

/// Name and id of a Rust type, captured when a [`Value`] is created.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

/// A type-erased shared instance.
///
/// Everything that flows through the container is a [`Value`]: resolved instances,
/// literal arguments, parameter defaults and receivers of bound methods.
/// Cloning is cheap and keeps the identity, see [`Value::ptr_eq`].
#[derive(Clone)]
pub struct Value {
    inner: RcAnyThreadSafety,
    type_info: TypeInfo,
}

impl Value {
    /// Wraps `value`.
    /// Passing a [`Value`] returns it as is, so factories may return already resolved values.
    #[must_use]
    pub fn new<T: SendSafety + SyncSafety + 'static>(value: T) -> Self {
        let inner: RcAnyThreadSafety = RcThreadSafety::new(value);
        match inner.downcast::<Value>() {
            Ok(value) => (*value).clone(),
            Err(inner) => Self {
                inner,
                type_info: TypeInfo::of::<T>(),
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn from_rc<T: SendSafety + SyncSafety + 'static>(value: RcThreadSafety<T>) -> Self {
        Self {
            inner: value,
            type_info: TypeInfo::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }

    #[inline]
    #[must_use]
    pub fn downcast<T: SendSafety + SyncSafety + 'static>(&self) -> Option<RcThreadSafety<T>> {
        self.inner.clone().downcast::<T>().ok()
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        RcThreadSafety::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.type_info.name).finish()
    }
}
