//! Subcommand resolution.
//!
//! Decides whether a token names a child command. Class-style matches
//! produce a nested model the run driver descends into; method-style
//! matches produce a deferred invocation that consumes the remaining tokens
//! against the method's own parameter set. A dash-prefixed token can never
//! name a subcommand and always terminates resolution.

use command_bind_core::{CommandModel, MethodSubcommandRef, SubcommandRef};
use tracing::debug;

/// A resolved subcommand reference.
#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    /// Class-style: descend into a nested model with a fresh instance.
    Class(&'a SubcommandRef),
    /// Method-style: stop resolving and invoke directly.
    Method(&'a MethodSubcommandRef),
}

impl Resolution<'_> {
    /// Canonical name of the resolved subcommand.
    pub fn canonical_name(&self) -> &str {
        match self {
            Self::Class(sub) => &sub.name,
            Self::Method(method) => &method.name,
        }
    }
}

/// Resolves `token` against `model`'s subcommand tables.
///
/// # Examples
///
/// ```
/// use command_bind_core::*;
/// use command_bind_parse::{Resolution, resolve};
///
/// let model = CommandModel::new("tool")
///     .with_subcommand(SubcommandRef::new("status", CommandModel::new("status")))
///     .with_method(MethodSubcommandRef::new("ping", CommandAction::run(|_| Ok(()))));
///
/// assert!(matches!(resolve(&model, "status"), Some(Resolution::Class(_))));
/// assert!(matches!(resolve(&model, "ping"), Some(Resolution::Method(_))));
/// assert!(resolve(&model, "--status").is_none());
/// assert!(resolve(&model, "unknown").is_none());
/// ```
pub fn resolve<'a>(model: &'a CommandModel, token: &str) -> Option<Resolution<'a>> {
    if token.starts_with('-') {
        return None;
    }

    if let Some(sub) = model.find_subcommand(token) {
        debug!(name = %sub.name, "resolved class-style subcommand");
        return Some(Resolution::Class(sub));
    }

    model.find_method(token).map(|method| {
        debug!(name = %method.name, "resolved method-style subcommand");
        Resolution::Method(method)
    })
}
