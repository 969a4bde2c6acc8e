//! Model validation.
//!
//! Validates the structural invariants of a command model before any parse:
//! option name formats, exact-name uniqueness, dash-stripped bare-name
//! ambiguity across fields, positional index contiguity, varargs placement,
//! and subcommand name uniqueness. Validation runs on the effective model —
//! after mixin flattening — and is fail-fast: the first error reported is the
//! one [`resolve_model`](crate::resolve_model) surfaces.
//!
//! # Examples
//!
//! ```
//! use command_bind_core::*;
//!
//! let model = CommandModel::new("tool")
//!     .with_option(OptionSpec::flag(&["-v", "--verbose"], "verbose"));
//! assert!(validate_model(&model).is_empty());
//!
//! // Two different fields sharing the bare name "x"
//! let bad = CommandModel::new("tool")
//!     .with_option(OptionSpec::flag(&["-x"], "alpha"))
//!     .with_option(OptionSpec::flag(&["--x"], "beta"));
//! let errors = validate_model(&bad);
//! assert!(matches!(errors[0], ModelError::AmbiguousOptionName { .. }));
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::{CommandModel, FieldRef, ValueKind, ValueType};

/// Model construction errors, all fatal and detected before parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// An option declares no names at all.
    #[error("option must declare at least one name")]
    MissingOptionName,
    /// An option name is not dash-prefixed or is too short.
    #[error("invalid option name '{0}': expected one or two leading dashes")]
    InvalidOptionName(String),
    /// The same dashed name appears on two declarations.
    #[error("duplicate option name '{0}'")]
    DuplicateOptionName(String),
    /// One dash-stripped bare name is bound to two different fields.
    #[error("ambiguous option name '{}': {}", bare, names.join(", "))]
    AmbiguousOptionName {
        /// The colliding dash-stripped name.
        bare: String,
        /// The dashed names involved in the collision.
        names: Vec<String>,
    },
    /// A positional index is declared more than once.
    #[error("parameter index {0} is declared more than once")]
    OverlappingParameters(usize),
    /// Positional indexes leave a gap.
    #[error("parameter indexes are not contiguous at index {0}")]
    NonContiguousParameters(usize),
    /// A varargs parameter is followed by further parameters.
    #[error("only the last positional parameter may be varargs")]
    VarargsNotLast,
    /// Two subcommands (of either style) share a name.
    #[error("duplicate subcommand '{0}'")]
    DuplicateSubcommand(String),
    /// A field declares a type the binder cannot service.
    #[error("unsupported field type for '{field}': {reason}")]
    UnsupportedFieldType {
        /// The offending field.
        field: String,
        /// Why the type is unsupported.
        reason: String,
    },
}

/// Validates a command model, returning the structural errors found.
///
/// Fail-fast within each category: at most one error per category is
/// reported, and option errors suppress later checks.
pub fn validate_model(model: &CommandModel) -> Vec<ModelError> {
    let mut errors = Vec::new();

    if model.name.trim().is_empty() {
        errors.push(ModelError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_options(model));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_parameters(model));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_subcommands(model));
    errors
}

fn validate_options(model: &CommandModel) -> Vec<ModelError> {
    let mut errors = Vec::new();
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut bare_owners: HashMap<String, (&FieldRef, &str)> = HashMap::new();

    for option in &model.options {
        if option.names.is_empty() {
            errors.push(ModelError::MissingOptionName);
            return errors;
        }

        for name in &option.names {
            let valid = if let Some(rest) = name.strip_prefix("--") {
                !rest.is_empty() && !rest.starts_with('-')
            } else if let Some(rest) = name.strip_prefix('-') {
                !rest.is_empty()
            } else {
                false
            };
            if !valid {
                errors.push(ModelError::InvalidOptionName(name.clone()));
                return errors;
            }

            if !seen_names.insert(name) {
                errors.push(ModelError::DuplicateOptionName(name.clone()));
                return errors;
            }

            let bare = name.trim_start_matches('-').to_string();
            match bare_owners.get(&bare) {
                Some((field, first)) if *field != &option.field => {
                    errors.push(ModelError::AmbiguousOptionName {
                        bare,
                        names: vec![first.to_string(), name.clone()],
                    });
                    return errors;
                }
                Some(_) => {}
                None => {
                    bare_owners.insert(bare, (&option.field, name.as_str()));
                }
            }
        }

        if let ValueType::Choice(candidates) = &option.value_type {
            if candidates.is_empty() {
                errors.push(ModelError::UnsupportedFieldType {
                    field: option.field.to_string(),
                    reason: "choice type with no candidates".to_string(),
                });
                return errors;
            }
        }

        if option.kind == ValueKind::Boolean && option.value_type != ValueType::Bool {
            errors.push(ModelError::UnsupportedFieldType {
                field: option.field.to_string(),
                reason: "boolean option with a non-boolean value type".to_string(),
            });
            return errors;
        }
    }

    errors
}

fn validate_parameters(model: &CommandModel) -> Vec<ModelError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();

    for param in &model.parameters {
        if !seen.insert(param.index) {
            errors.push(ModelError::OverlappingParameters(param.index));
            return errors;
        }
    }

    for expected in 0..seen.len() {
        if !seen.contains(&expected) {
            errors.push(ModelError::NonContiguousParameters(expected));
            return errors;
        }
    }

    // Parameters arrive index-sorted from resolution; varargs may only close
    // the list.
    for (position, param) in model.parameters.iter().enumerate() {
        if param.varargs && position + 1 != model.parameters.len() {
            errors.push(ModelError::VarargsNotLast);
            return errors;
        }
    }

    errors
}

fn validate_subcommands(model: &CommandModel) -> Vec<ModelError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let names = model
        .subcommands
        .iter()
        .map(|s| s.name.as_str())
        .chain(model.methods.iter().map(|m| m.name.as_str()));
    for name in names {
        if !seen.insert(name) {
            errors.push(ModelError::DuplicateSubcommand(name.to_string()));
            return errors;
        }
    }

    errors
}
