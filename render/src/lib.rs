//! Usage and help rendering for command models.
//!
//! This crate turns a resolved
//! [`CommandModel`](command_bind_core::CommandModel) into deterministic,
//! column-aligned help text:
//!
//! - [`render_help`] — synopsis, parameter/option table, and subcommand
//!   table, in classic or agent display mode.
//! - [`render_version`] — the version line, honoring the configured fallback.
//! - [`wrap`] / [`wrap_tokens`] — the word-wrapping primitives the renderer
//!   is built on.
//!
//! The exact column arithmetic and wrapping rules are part of the external
//! contract: rendering the same inputs twice yields byte-identical output.
//!
//! # Example
//!
//! ```
//! use command_bind_core::*;
//! use command_bind_render::render_help;
//!
//! let model = CommandModel::new("tool")
//!     .with_option(OptionSpec::flag(&["-v", "--verbose"], "verbose"));
//! let model = resolve_model(&model, &ParserConfig::default()).unwrap();
//!
//! let text = render_help(&model, &["tool".to_string()], &ParserConfig::default(), false);
//! assert!(text.starts_with("Usage: tool [-hV] [--verbose]"));
//! ```

mod help;
mod wrap;

pub use help::{render_help, render_version};
pub use wrap::{wrap, wrap_tokens};
