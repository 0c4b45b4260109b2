use alloc::{collections::BTreeMap, string::String};
use parking_lot::Mutex;
use tracing::error;

use crate::{errors::ResolveErrorKind, utils::thread_safety::RcThreadSafety};

/// In-flight resolutions by provider name
pub(crate) type Resolving = BTreeMap<String, usize>;

/// Counters of one resolution chain, shared by the containers handed to its factories
pub(crate) type Chain = RcThreadSafety<Mutex<Resolving>>;

/// Holds one in-flight resolution of a named provider.
///
/// The counter is released on drop, so it is balanced on the error path as well.
pub(crate) struct NestingGuard<'a> {
    resolving: &'a Mutex<Resolving>,
    name: String,
}

impl<'a> NestingGuard<'a> {
    /// # Errors
    /// - Returns [`ResolveErrorKind::CircularDependency`] if `name` is already in-flight more than `max_nesting` times
    pub(crate) fn enter(resolving: &'a Mutex<Resolving>, name: &str, max_nesting: usize) -> Result<Self, ResolveErrorKind> {
        let mut guard = resolving.lock();
        let depth = guard.entry(name.into()).or_default();
        if *depth > max_nesting {
            let err = ResolveErrorKind::CircularDependency {
                name: name.into(),
                depth: *depth,
                max: max_nesting,
            };
            error!("{}", err);
            return Err(err);
        }
        *depth += 1;

        Ok(Self {
            resolving,
            name: name.into(),
        })
    }
}

impl Drop for NestingGuard<'_> {
    fn drop(&mut self) {
        let mut guard = self.resolving.lock();
        if let Some(depth) = guard.get_mut(&self.name) {
            *depth = depth.saturating_sub(1);
            if *depth == 0 {
                guard.remove(&self.name);
            }
        }
    }
}
