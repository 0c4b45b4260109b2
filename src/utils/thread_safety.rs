use crate::{errors::InstantiateErrorKind, introspector::Invocation, value::Value};

#[cfg(feature = "thread_safe")]
mod thread_safe {
    use alloc::sync::Arc;
    use core::any::Any;

    use super::{Invocation, InstantiateErrorKind, Value};

    pub trait SendSafety: Send {}
    pub trait SyncSafety: Sync {}

    impl<T: Send> SendSafety for T {}
    impl<T: Sync> SyncSafety for T {}

    pub type RcThreadSafety<T> = Arc<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any + Send + Sync>;
    pub type FactoryFn = dyn Fn(Invocation) -> Result<Value, InstantiateErrorKind> + Send + Sync;
}

#[cfg(not(feature = "thread_safe"))]
mod thread_unsafe {
    use alloc::rc::Rc;
    use core::any::Any;

    use super::{Invocation, InstantiateErrorKind, Value};

    pub trait SendSafety {}
    pub trait SyncSafety {}

    impl<T> SendSafety for T {}
    impl<T> SyncSafety for T {}

    pub type RcThreadSafety<T> = Rc<T>;
    pub type RcAnyThreadSafety = RcThreadSafety<dyn Any>;
    pub type FactoryFn = dyn Fn(Invocation) -> Result<Value, InstantiateErrorKind>;
}

#[cfg(feature = "thread_safe")]
pub use thread_safe::{FactoryFn, RcThreadSafety, SendSafety, SyncSafety};
#[cfg(feature = "thread_safe")]
pub(crate) use thread_safe::RcAnyThreadSafety;

#[cfg(not(feature = "thread_safe"))]
pub use thread_unsafe::{FactoryFn, RcThreadSafety, SendSafety, SyncSafety};
#[cfg(not(feature = "thread_safe"))]
pub(crate) use thread_unsafe::RcAnyThreadSafety;
