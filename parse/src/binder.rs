//! The tokenizer and binder state machine.
//!
//! Consumes a token stream against a resolved
//! [`CommandModel`](command_bind_core::CommandModel), producing bound field
//! values or a typed parse error. The machine tracks which options were
//! seen, which optional-value options were seen without a value, and the
//! positional tokens, in a single left-to-right pass:
//!
//! 1. `--` stops option recognition; later tokens are positional even when
//!    dash-prefixed.
//! 2. Help/version sentinels interrupt immediately, before unknown-option
//!    detection.
//! 3. Dash-prefixed tokens split on the first `=` and bind against the
//!    option table; booleans may consume a following explicit `true`/`false`
//!    literal, multi-value options accumulate raw strings, scalars convert
//!    and verify immediately.
//! 4. Everything else is positional.
//!
//! After the stream: accumulated multi-value fields convert element-wise,
//! defaults apply in declaration order (never to required options), required
//! options are checked, and positionals bind against the parameter specs in
//! index order with varargs arity honored.

use std::collections::{HashMap, HashSet};

use command_bind_core::{
    BoundCommand, CommandModel, ConverterRegistry, FieldRef, OptionSpec, ParamSpec, ParserConfig,
    Value, ValueKind, parse_bool,
};
use tracing::{debug, trace};

use crate::error::{ParseError, Result};
use crate::suggest::suggest;

/// Returns `true` when `token` requests help for `model`.
pub(crate) fn is_help_sentinel(model: &CommandModel, token: &str) -> bool {
    model.standard_help
        && (token == "--help" || token == "-h" || (model.agent_mode && token == "help"))
}

/// Returns `true` when `token` requests the version for `model`.
pub(crate) fn is_version_sentinel(model: &CommandModel, token: &str) -> bool {
    model.standard_help
        && (token == "--version" || token == "-V" || (model.agent_mode && token == "version"))
}

/// Binds `tokens` against `model`.
///
/// # Errors
///
/// Returns [`ParseError::HelpRequested`]/[`ParseError::VersionRequested`] as
/// control-flow interrupts, or the usage error that terminated the parse.
///
/// # Examples
///
/// ```
/// use command_bind_core::*;
/// use command_bind_parse::bind;
///
/// let model = CommandModel::new("greet")
///     .with_option(OptionSpec::scalar(&["-n", "--name"], "name", ValueType::Str).required())
///     .with_option(OptionSpec::scalar(&["-c", "--count"], "count", ValueType::Int).with_default("1"));
/// let model = resolve_model(&model, &ParserConfig::default()).unwrap();
///
/// let tokens: Vec<String> = vec!["--name=World".into()];
/// let bound = bind(&model, &tokens, &ParserConfig::default(), &ConverterRegistry::new()).unwrap();
/// assert_eq!(bound.str_value("name"), Some("World"));
/// assert_eq!(bound.int_value("count"), Some(1));
/// ```
pub fn bind(
    model: &CommandModel,
    tokens: &[String],
    config: &ParserConfig,
    registry: &ConverterRegistry,
) -> Result<BoundCommand> {
    let mut bound = BoundCommand::new();
    let mut seen: HashSet<FieldRef> = HashSet::new();
    let mut seen_without_value: HashSet<FieldRef> = HashSet::new();
    let mut multi_raw: HashMap<FieldRef, Vec<String>> = HashMap::new();
    let mut positionals: Vec<String> = Vec::new();
    let mut accept_options = true;

    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index].as_str();
        index += 1;

        if accept_options && token == "--" {
            accept_options = false;
            continue;
        }

        if accept_options {
            if is_help_sentinel(model, token) {
                return Err(ParseError::HelpRequested);
            }
            if is_version_sentinel(model, token) {
                return Err(ParseError::VersionRequested);
            }
        }

        if accept_options && token.starts_with('-') && token.len() > 1 {
            let (name, explicit) = match token.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (token, None),
            };

            let Some(option) = model.find_option(name) else {
                let suggestion = if config.suggest_similar_options {
                    suggest(
                        name,
                        model
                            .options
                            .iter()
                            .flat_map(|o| o.names.iter().map(String::as_str)),
                    )
                } else {
                    None
                };
                return Err(ParseError::UnknownOption {
                    name: name.to_string(),
                    suggestion,
                });
            };
            trace!(name, kind = ?option.kind, "matched option token");

            match option.kind {
                ValueKind::Boolean => {
                    let value = match explicit {
                        Some(raw) => convert_option(option, raw, registry)?,
                        None => {
                            // Only an explicit boolean literal in the next
                            // token is consumed as the value.
                            match tokens.get(index).and_then(|next| parse_bool(next)) {
                                Some(literal) => {
                                    index += 1;
                                    Value::Bool(literal)
                                }
                                None => Value::Bool(true),
                            }
                        }
                    };
                    bound.bind(option.field.clone(), value);
                    seen.insert(option.field.clone());
                }
                ValueKind::Multi => {
                    let raw = match explicit {
                        Some(value) => value.to_string(),
                        None => match tokens.get(index) {
                            Some(next) => {
                                index += 1;
                                next.clone()
                            }
                            None => {
                                return Err(ParseError::MissingValue {
                                    name: option.canonical_name().to_string(),
                                });
                            }
                        },
                    };
                    let accumulator = multi_raw.entry(option.field.clone()).or_default();
                    match &option.split_delimiter {
                        Some(delimiter) => {
                            accumulator.extend(raw.split(delimiter.as_str()).map(String::from));
                        }
                        None => accumulator.push(raw),
                    }
                    seen.insert(option.field.clone());
                }
                ValueKind::Scalar => {
                    let raw = match explicit {
                        Some(value) => Some(value.to_string()),
                        None if option.has_optional_value() => None,
                        None => match tokens.get(index) {
                            Some(next) => {
                                index += 1;
                                Some(next.clone())
                            }
                            None => {
                                return Err(ParseError::MissingValue {
                                    name: option.canonical_name().to_string(),
                                });
                            }
                        },
                    };
                    match raw {
                        Some(raw) => {
                            let value = convert_option(option, &raw, registry)?;
                            bound.bind(option.field.clone(), value);
                            seen.insert(option.field.clone());
                        }
                        None => {
                            // Value omitted; the default applies after the
                            // stream is consumed.
                            seen.insert(option.field.clone());
                            seen_without_value.insert(option.field.clone());
                        }
                    }
                }
            }
            continue;
        }

        positionals.push(token.to_string());
    }

    apply_multi(model, &multi_raw, registry, &mut bound)?;
    apply_defaults(model, &seen, &seen_without_value, registry, &mut bound)?;

    for option in &model.options {
        if option.required && !seen.contains(&option.field) {
            return Err(ParseError::MissingRequiredOption {
                name: option.canonical_name().to_string(),
            });
        }
    }

    bind_positionals(model, &positionals, registry, &mut bound)?;

    debug!(fields = bound.len(), positionals = positionals.len(), "bind complete");
    Ok(bound)
}

/// Converts accumulated multi-value fields, element-wise, once the full
/// stream has been consumed.
fn apply_multi(
    model: &CommandModel,
    multi_raw: &HashMap<FieldRef, Vec<String>>,
    registry: &ConverterRegistry,
    bound: &mut BoundCommand,
) -> Result<()> {
    for option in model.options.iter().filter(|o| o.kind == ValueKind::Multi) {
        if let Some(raws) = multi_raw.get(&option.field) {
            let mut items = Vec::with_capacity(raws.len());
            for raw in raws {
                items.push(convert_option(option, raw, registry)?);
            }
            bound.bind(option.field.clone(), Value::List(items));
        }
    }
    Ok(())
}

/// Applies defaults in declaration order to every non-required option that
/// was absent, or seen without a value.
fn apply_defaults(
    model: &CommandModel,
    seen: &HashSet<FieldRef>,
    seen_without_value: &HashSet<FieldRef>,
    registry: &ConverterRegistry,
    bound: &mut BoundCommand,
) -> Result<()> {
    for option in &model.options {
        if option.required {
            continue;
        }
        let needs_default =
            !seen.contains(&option.field) || seen_without_value.contains(&option.field);
        if !needs_default {
            continue;
        }
        let Some(default) = &option.default_value else {
            continue;
        };

        let value = match option.kind {
            ValueKind::Multi => {
                let parts: Vec<&str> = match &option.split_delimiter {
                    Some(delimiter) => default.split(delimiter.as_str()).collect(),
                    None => vec![default.as_str()],
                };
                let mut items = Vec::with_capacity(parts.len());
                for part in parts {
                    items.push(convert_option(option, part, registry)?);
                }
                Value::List(items)
            }
            _ => convert_option(option, default, registry)?,
        };
        bound.bind(option.field.clone(), value);
    }
    Ok(())
}

fn bind_positionals(
    model: &CommandModel,
    positionals: &[String],
    registry: &ConverterRegistry,
    bound: &mut BoundCommand,
) -> Result<()> {
    let mut cursor = 0;

    for param in &model.parameters {
        if param.varargs {
            let available = positionals.len() - cursor;
            let minimum = param.arity.map_or(0, |a| a.min);
            if available < minimum {
                return Err(ParseError::MissingRequiredParameter {
                    label: param.param_label.clone(),
                });
            }
            let take = param
                .arity
                .and_then(|a| a.max)
                .map_or(available, |max| max.min(available));
            let mut items = Vec::with_capacity(take);
            for raw in &positionals[cursor..cursor + take] {
                items.push(convert_param(param, raw, registry)?);
            }
            cursor += take;
            bound.bind(param.field.clone(), Value::List(items));
        } else if cursor < positionals.len() {
            let raw = &positionals[cursor];
            cursor += 1;
            let value = convert_param(param, raw, registry)?;
            bound.bind(param.field.clone(), value);
        } else if param.required {
            return Err(ParseError::MissingRequiredParameter {
                label: param.param_label.clone(),
            });
        } else if let Some(default) = &param.default_value {
            let value = convert_param(param, default, registry)?;
            bound.bind(param.field.clone(), value);
        }
    }

    if cursor < positionals.len() {
        return Err(ParseError::TooManyParameters {
            first_extra: positionals[cursor].clone(),
        });
    }
    Ok(())
}

fn convert_option(
    option: &OptionSpec,
    raw: &str,
    registry: &ConverterRegistry,
) -> Result<Value> {
    let value = registry
        .convert(option.converter.as_ref(), &option.value_type, raw)
        .map_err(|message| ParseError::Conversion {
            field: format!("option '{}'", option.canonical_name()),
            raw: raw.to_string(),
            message,
        })?;
    if let Some(verifier) = &option.verifier {
        verifier
            .verify(&value)
            .map_err(|message| ParseError::Verification { message })?;
    }
    Ok(value)
}

fn convert_param(param: &ParamSpec, raw: &str, registry: &ConverterRegistry) -> Result<Value> {
    let value = registry
        .convert(param.converter.as_ref(), &param.value_type, raw)
        .map_err(|message| ParseError::Conversion {
            field: format!("parameter {}", param.param_label),
            raw: raw.to_string(),
            message,
        })?;
    if let Some(verifier) = &param.verifier {
        verifier
            .verify(&value)
            .map_err(|message| ParseError::Verification { message })?;
    }
    Ok(value)
}
