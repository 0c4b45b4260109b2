/// Nesting bound used by [`Config::default`]
pub const MAX_NESTING: usize = 5;

/// Config for a container
/// ## Fields
/// - `max_nesting`:
///   How many times a named provider may be in-flight in one resolution chain
///   before [`crate::ResolveErrorKind::CircularDependency`] is raised.
///   A chain is one top-level `get`, `make` or `call` together with the resolutions
///   its factories make through [`crate::Invocation::container`].
///   Concurrent chains don't count against each other.
///
///   Resolution is plain recursion, so the bound must stay small to fail fast.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub max_nesting: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_nesting: MAX_NESTING }
    }
}
