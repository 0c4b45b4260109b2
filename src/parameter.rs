use alloc::string::String;

use crate::{
    utils::thread_safety::{SendSafety, SyncSafety},
    value::Value,
};

/// Declared metadata of one formal parameter of a constructor, method or function.
///
/// Parameters are matched against [`crate::Args`] by `name`, in declaration order.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: String,
    pub default: Option<Value>,
    pub optional: bool,
    /// Name the container resolves to autowire this parameter
    pub declared_type: Option<String>,
}

impl Parameter {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            optional: false,
            declared_type: None,
        }
    }

    /// Sets the default value. A parameter with a default is optional.
    #[inline]
    #[must_use]
    pub fn with_default<T: SendSafety + SyncSafety + 'static>(mut self, value: T) -> Self {
        self.default = Some(Value::new(value));
        self.optional = true;
        self
    }

    /// Marks the parameter optional without a default, an absent argument is passed instead
    #[inline]
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn typed(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    #[inline]
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }
}
