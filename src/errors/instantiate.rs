use alloc::{boxed::Box, string::String};

use super::dependency_resolver::ResolveErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Argument ${name} (position {index}) was not provided")]
    MissingArgument { index: usize, name: String },
    #[error("Incorrect type of argument ${name} (position {index}). Actual: {actual}, expected: {expected}")]
    IncorrectType {
        index: usize,
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Receiver of type {expected} not provided")]
    MissingReceiver { expected: &'static str },
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}
