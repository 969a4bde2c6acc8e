//! Token binding and invocation driving for command models.
//!
//! This crate consumes token streams against resolved
//! [`CommandModel`](command_bind_core::CommandModel)s:
//!
//! - [`bind`] — the tokenizer/binder state machine: option matching,
//!   conversion and verification, multi-value accumulation, defaults,
//!   required checks, and positional binding.
//! - [`to_argv`] / [`normalize_bare`] — the agent token syntax: one escaped,
//!   comma-delimited string translated into a token vector and normalized
//!   into canonical dashed form.
//! - [`resolve`] — subcommand resolution, distinguishing class-style
//!   (nested model) from method-style (direct invocation).
//! - [`suggest`] — Levenshtein-based "did you mean" lookup for unknown
//!   options.
//! - [`run`] / [`run_agent`] — the run driver: model resolution, the
//!   subcommand chain loop, help/version interrupts, and exit-code mapping.
//! - [`ParseContext`] — the explicit context value threaded through the
//!   call chain instead of any ambient state.
//!
//! # Example
//!
//! ```
//! use command_bind_core::*;
//! use command_bind_parse::bind;
//!
//! let model = CommandModel::new("tool")
//!     .with_option(OptionSpec::flag(&["-v", "--verbose"], "verbose"));
//! let model = resolve_model(&model, &ParserConfig::default()).unwrap();
//!
//! let tokens: Vec<String> = vec!["--verbose".into()];
//! let bound = bind(&model, &tokens, &ParserConfig::default(), &ConverterRegistry::new()).unwrap();
//! assert!(bound.flag("verbose"));
//! ```

mod agent;
mod binder;
mod context;
mod error;
mod resolve;
mod run;
mod suggest;

pub use agent::{AgentError, normalize_bare, to_argv};
pub use binder::bind;
pub use context::ParseContext;
pub use error::{ParseError, Result};
pub use resolve::{Resolution, resolve};
pub use run::{run, run_agent};
pub use suggest::{levenshtein, suggest};
