use alloc::string::String;

use super::instantiate::InstantiateErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Invalid resolver: {resolver}")]
    InvalidResolver { resolver: String },
    #[error("Circular dependency detected while resolving {name}: nesting {depth} exceeds the limit of {max}")]
    CircularDependency { name: String, depth: usize, max: usize },
    #[error("Could not provision parameter ${parameter} for {provider}")]
    ParameterProvision { parameter: String, provider: String },
    #[error("Type {name} is not declared")]
    UnknownType { name: String },
    #[error("Incorrect instance type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: &'static str, actual: &'static str },
    #[error(transparent)]
    Instantiate(InstantiateErrorKind),
}

impl From<InstantiateErrorKind> for ResolveErrorKind {
    /// Errors of a factory propagate as is, except that a factory which failed to resolve
    /// something itself gives back the original resolve error.
    fn from(err: InstantiateErrorKind) -> Self {
        match err {
            InstantiateErrorKind::Resolve(err) => *err,
            err => Self::Instantiate(err),
        }
    }
}
