use tracing::debug;

use crate::{
    errors::InstantiateErrorKind,
    introspector::Invocation,
    utils::thread_safety::{FactoryFn, RcThreadSafety, SendSafety, SyncSafety},
    value::Value,
};

/// Shared, type-erased factory of a declared constructor, method or function
pub type Factory = RcThreadSafety<FactoryFn>;

#[must_use]
pub(crate) fn boxed_factory<F, T>(factory: F) -> Factory
where
    F: Fn(Invocation) -> Result<T, InstantiateErrorKind> + SendSafety + SyncSafety + 'static,
    T: SendSafety + SyncSafety + 'static,
{
    RcThreadSafety::new(move |invocation: Invocation| -> Result<Value, InstantiateErrorKind> {
        let dependency = factory(invocation)?;

        debug!("Instantiated");

        Ok(Value::new(dependency))
    })
}
