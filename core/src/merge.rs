//! Model resolution: mixin flattening and option override.
//!
//! A declared [`CommandModel`] may reference mixin bundles whose options and
//! parameters belong to the effective model. [`resolve_model`] flattens them
//! in declaration order — mixins first, then the command's own declarations —
//! into an ordered map keyed by canonical dash-stripped name: a later
//! declaration of the same name **replaces** the earlier one when both bind
//! the same field, and is a fatal
//! [`AmbiguousOptionName`](crate::ModelError::AmbiguousOptionName) when they
//! bind different fields. Nested subcommand models are resolved recursively,
//! parameters are index-sorted, and the result is validated.
//!
//! # Example
//!
//! ```
//! use command_bind_core::*;
//!
//! let logging = MixinSpec::new("logging")
//!     .with_option(OptionSpec::flag(&["--debug"], "debug"));
//!
//! let model = CommandModel::new("tool")
//!     .with_mixin(logging)
//!     .with_option(OptionSpec::flag(&["-v", "--verbose"], "verbose"));
//!
//! let resolved = resolve_model(&model, &ParserConfig::default()).unwrap();
//! assert_eq!(resolved.options.len(), 2);
//! assert!(resolved.mixins.is_empty());
//! assert!(resolved.find_option("--debug").is_some());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ParserConfig;
use crate::model::{CommandModel, OptionSpec, ParamSpec, SubcommandRef};
use crate::validate::{ModelError, validate_model};

/// Resolves a declared model into its effective, immutable form.
///
/// Flattens mixins, applies override-by-declaration-order, sorts parameters
/// by index, resolves nested subcommand models recursively, records whether
/// the standard help/version options are mixed in, and validates the result.
///
/// # Errors
///
/// Returns the first [`ModelError`] found — notably
/// [`AmbiguousOptionName`](ModelError::AmbiguousOptionName) when one
/// dash-stripped name is bound to two different fields.
pub fn resolve_model(
    model: &CommandModel,
    config: &ParserConfig,
) -> Result<CommandModel, ModelError> {
    let mut resolved = model.clone();
    resolved.standard_help = config.mixin_standard_help_options;

    resolved.options = merge_options(model)?;
    resolved.parameters = merge_parameters(model);
    resolved.mixins.clear();

    let mut subcommands = Vec::with_capacity(model.subcommands.len());
    for sub in &model.subcommands {
        let nested = resolve_model(&sub.model, config)?;
        subcommands.push(SubcommandRef {
            name: sub.name.clone(),
            description: sub.description.clone(),
            hidden: sub.hidden,
            model: Arc::new(nested),
        });
    }
    resolved.subcommands = subcommands;

    if let Some(error) = validate_model(&resolved).into_iter().next() {
        return Err(error);
    }
    Ok(resolved)
}

fn merge_options(model: &CommandModel) -> Result<Vec<OptionSpec>, ModelError> {
    let declared = model
        .mixins
        .iter()
        .flat_map(|mixin| mixin.options.iter())
        .chain(model.options.iter());

    let mut merged: Vec<OptionSpec> = Vec::new();
    let mut by_bare: HashMap<String, usize> = HashMap::new();

    for option in declared {
        let bare = option.bare_name().to_string();
        match by_bare.get(&bare) {
            Some(&slot) if merged[slot].field == option.field => {
                // Redeclaration of the same field: the later one wins, in place.
                merged[slot] = option.clone();
            }
            Some(&slot) => {
                return Err(ModelError::AmbiguousOptionName {
                    bare,
                    names: vec![
                        merged[slot].canonical_name().to_string(),
                        option.canonical_name().to_string(),
                    ],
                });
            }
            None => {
                by_bare.insert(bare, merged.len());
                merged.push(option.clone());
            }
        }
    }

    Ok(merged)
}

fn merge_parameters(model: &CommandModel) -> Vec<ParamSpec> {
    let mut parameters: Vec<ParamSpec> = model
        .mixins
        .iter()
        .flat_map(|mixin| mixin.parameters.iter().cloned())
        .chain(model.parameters.iter().cloned())
        .collect();
    parameters.sort_by_key(|p| p.index);
    parameters
}
