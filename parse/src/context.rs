//! The explicit parse context.
//!
//! Everything a parse needs to stay consistent with the invocation that
//! started it: the active model, the display path accumulated while
//! descending subcommands, the agent-mode flag, and the configuration. The
//! context is a plain value threaded through resolver, binder, and renderer
//! calls. Descending produces a new child value and leaves the caller's
//! context untouched, so nested or concurrent invocations restore state by
//! construction, on every exit path.

use std::sync::Arc;

use command_bind_core::{CommandModel, ParserConfig, SubcommandRef};

/// The ambient state of one parse, passed down the call chain.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// The model tokens are currently parsed against.
    pub model: Arc<CommandModel>,
    /// Display path segments from the root command to the active one.
    pub path: Vec<String>,
    /// Whether this invocation uses the agent token syntax.
    pub agent_mode: bool,
    /// The configuration in force for this invocation.
    pub config: ParserConfig,
}

impl ParseContext {
    /// Creates the root context for an invocation of `model`.
    pub fn root(model: Arc<CommandModel>, config: ParserConfig) -> Self {
        let agent_mode = model.agent_mode;
        let path = vec![model.name.clone()];
        Self {
            model,
            path,
            agent_mode,
            config,
        }
    }

    /// Creates the context for a resolved class-style subcommand.
    ///
    /// The receiver is unchanged; callers keep their own context and the
    /// child value dies with the nested invocation.
    pub fn child(&self, sub: &SubcommandRef) -> Self {
        let mut path = self.path.clone();
        path.push(sub.name.clone());
        Self {
            model: Arc::clone(&sub.model),
            path,
            agent_mode: self.agent_mode || sub.model.agent_mode,
            config: self.config.clone(),
        }
    }

    /// The display path joined for the active mode: spaces classically,
    /// commas in agent mode.
    pub fn display_path(&self) -> String {
        let separator = if self.agent_mode { "," } else { " " };
        self.path.join(separator)
    }
}
