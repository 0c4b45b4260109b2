use alloc::{string::ToString as _, vec::Vec};
use tracing::{debug, debug_span, error};

use crate::{
    args::{Args, Argument},
    container::Container,
    errors::ResolveErrorKind,
    parameter::Parameter,
    provider::Provider,
    resolver::Resolver,
    value::Value,
};

impl Container {
    /// Resolves one argument per parameter, in declaration order.
    /// `None` stands for an absent optional argument.
    ///
    /// # Errors
    /// - Returns the original error of a failed typed autowire if no fallback applies
    /// - Returns [`ResolveErrorKind::ParameterProvision`] if nothing provides the argument
    pub(crate) fn resolve_arguments(
        &self,
        provider: &Provider,
        parameters: &[Parameter],
        args: &Args,
    ) -> Result<Vec<Option<Value>>, ResolveErrorKind> {
        parameters
            .iter()
            .map(|parameter| self.resolve_argument(provider, parameter, args))
            .collect()
    }

    fn resolve_argument(&self, provider: &Provider, parameter: &Parameter, args: &Args) -> Result<Option<Value>, ResolveErrorKind> {
        let span = debug_span!("argument", parameter = parameter.name.as_str());
        let _guard = span.enter();

        let overlay = match args.get(&parameter.name) {
            Some(Argument::Literal(value)) => {
                debug!("Literal provided");
                return Ok(Some(value.clone()));
            }
            Some(Argument::Overlay(overlay) | Argument::Resolve(Resolver::Overlay(overlay))) => Some(overlay.clone()),
            Some(Argument::Resolve(resolver)) => {
                debug!("Resolver provided");
                return self.resolve(resolver, Args::new(), false).map(Some);
            }
            None => None,
        };

        let mut autowire_err = None;
        if let Some(declared_type) = &parameter.declared_type {
            match self.resolve(&Resolver::name(declared_type.as_str()), overlay.unwrap_or_default(), false) {
                Ok(value) => {
                    debug!(declared_type = declared_type.as_str(), "Autowired");
                    return Ok(Some(value));
                }
                Err(err) => {
                    debug!(declared_type = declared_type.as_str(), %err, "Autowire failed");
                    autowire_err = Some(err);
                }
            }
        }

        if let Some(default) = &parameter.default {
            debug!("Default used");
            return Ok(Some(default.clone()));
        }
        if parameter.optional {
            debug!("Absent optional");
            return Ok(None);
        }

        if let Some(err) = autowire_err {
            return Err(err);
        }

        let err = ResolveErrorKind::ParameterProvision {
            parameter: parameter.name.clone(),
            provider: provider.to_string(),
        };
        error!("{}", err);
        Err(err)
    }
}
