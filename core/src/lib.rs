//! Core command model and shared binding primitives.
//!
//! This crate defines the foundational types for declarative command-line
//! binding:
//!
//! - [`CommandModel`] — the full description of one command: named options,
//!   positional parameters, mixin bundles, subcommands, and an optional body.
//! - [`OptionSpec`] / [`ParamSpec`] — a named option or positional parameter
//!   with conversion, verification, defaults, and arity.
//! - [`MixinSpec`] — a reusable option/parameter bundle merged into an owning
//!   command during resolution.
//! - [`SubcommandRef`] / [`MethodSubcommandRef`] — class-style and
//!   method-style subcommands.
//! - [`BoundCommand`] / [`Value`] — the typed field values one successful
//!   bind produces.
//! - [`ParserConfig`] — the recognized configuration surface, YAML-loadable.
//!
//! Resolution ([`resolve_model`]) flattens mixins with
//! override-by-declaration-order, and validation ([`validate_model`]) catches
//! structural errors — most importantly the dash-stripped bare-name ambiguity
//! between different fields — eagerly, before any token is parsed.
//!
//! # Example
//!
//! ```
//! use command_bind_core::*;
//!
//! let model = CommandModel::new("greet")
//!     .with_description("Greets people.")
//!     .with_option(
//!         OptionSpec::scalar(&["-n", "--name"], "name", ValueType::Str)
//!             .required()
//!             .with_description("Who to greet"),
//!     )
//!     .with_option(
//!         OptionSpec::scalar(&["-c", "--count"], "count", ValueType::Int)
//!             .with_default("1")
//!             .with_description("How many times"),
//!     );
//!
//! let resolved = resolve_model(&model, &ParserConfig::default()).unwrap();
//! assert!(resolved.standard_help);
//! assert!(resolved.find_option("--name").is_some());
//! assert!(validate_model(&resolved).is_empty());
//! ```

mod config;
mod convert;
mod merge;
mod model;
mod validate;

pub use config::{
    COMPLETION_CANDIDATES_PLACEHOLDER, ConfigError, DEFAULT_VALUE_PLACEHOLDER, ParserConfig,
    SUGGESTION_PLACEHOLDER,
};
pub use convert::{Converter, ConverterRegistry, TypeKey, Value, Verifier, convert_builtin, parse_bool};
pub use merge::resolve_model;
pub use model::*;
pub use validate::{ModelError, validate_model};
