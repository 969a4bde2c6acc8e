//! The run driver.
//!
//! Orchestrates one invocation end to end: resolves the declared model,
//! walks the subcommand chain (checking help/version sentinels at every
//! depth), translates agent syntax when applicable, binds the remaining
//! tokens, dispatches the command body, and maps every outcome to a process
//! exit code:
//!
//! - `0` — success, or help/version display (help code configurable)
//! - `1` — the command body itself failed (`Error: <message>`, no help)
//! - `2` — any parse/usage error (the error line, a blank line, then full
//!   help for the command at the point of failure)
//!
//! All text goes to the caller-supplied output and error sinks; nothing else
//! is written or read.

use std::io::Write;
use std::sync::Arc;

use command_bind_core::{
    CommandAction, CommandModel, ConverterRegistry, MethodSubcommandRef, ParserConfig,
    SubcommandRef, resolve_model,
};
use command_bind_render::{render_help, render_version};
use tracing::debug;

use crate::agent::{normalize_bare, to_argv};
use crate::binder::{bind, is_help_sentinel, is_version_sentinel};
use crate::context::ParseContext;
use crate::error::ParseError;
use crate::resolve::{Resolution, resolve};

/// Runs `model` against an already-split argument vector.
///
/// # Examples
///
/// ```
/// use command_bind_core::*;
/// use command_bind_parse::run;
///
/// let model = CommandModel::new("greet")
///     .with_option(OptionSpec::scalar(&["-n", "--name"], "name", ValueType::Str).required())
///     .with_action(CommandAction::run(|bound| {
///         assert_eq!(bound.str_value("name"), Some("World"));
///         Ok(())
///     }));
///
/// let args: Vec<String> = vec!["--name=World".into()];
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let code = run(
///     &model,
///     &args,
///     &ParserConfig::default(),
///     &ConverterRegistry::new(),
///     &mut out,
///     &mut err,
/// );
/// assert_eq!(code, 0);
/// ```
pub fn run(
    model: &CommandModel,
    args: &[String],
    config: &ParserConfig,
    registry: &ConverterRegistry,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let root = match prepare(model, config, err) {
        Ok(root) => root,
        Err(code) => return code,
    };
    run_resolved(root, args.to_vec(), false, config, registry, out, err)
}

/// Runs `model` against a single agent-syntax argument string.
///
/// The string is translated by [`to_argv`](crate::to_argv) first; a
/// translation failure is reported like any other usage error, with help
/// text for the root command.
pub fn run_agent(
    model: &CommandModel,
    agent: &str,
    config: &ParserConfig,
    registry: &ConverterRegistry,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let root = match prepare(model, config, err) {
        Ok(root) => root,
        Err(code) => return code,
    };
    match to_argv(agent) {
        Ok(tokens) => run_resolved(root, tokens, true, config, registry, out, err),
        Err(agent_error) => {
            let mut ctx = ParseContext::root(root, config.clone());
            ctx.agent_mode = true;
            report_usage(&ParseError::from(agent_error), &ctx, out, err)
        }
    }
}

/// Resolves the declared model and validates the configuration.
///
/// Both failure kinds are definition bugs rather than usage errors, so they
/// report as `Error: <message>` with exit code 1 and no help text.
fn prepare(
    model: &CommandModel,
    config: &ParserConfig,
    err: &mut dyn Write,
) -> Result<Arc<CommandModel>, i32> {
    if let Err(config_error) = config.validate() {
        let _ = writeln!(err, "Error: {config_error}");
        return Err(1);
    }
    match resolve_model(model, config) {
        Ok(resolved) => Ok(Arc::new(resolved)),
        Err(model_error) => {
            let _ = writeln!(err, "Error: {model_error}");
            Err(1)
        }
    }
}

enum Step {
    Descend(SubcommandRef),
    Invoke(MethodSubcommandRef),
    Bind,
}

fn run_resolved(
    root: Arc<CommandModel>,
    tokens: Vec<String>,
    agent: bool,
    config: &ParserConfig,
    registry: &ConverterRegistry,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let mut ctx = ParseContext::root(root, config.clone());
    ctx.agent_mode = ctx.agent_mode || agent;
    let mut index = 0;

    loop {
        let Some(token) = tokens.get(index) else {
            break;
        };

        // Sentinels outrank subcommand resolution at every depth.
        if is_help_sentinel(&ctx.model, token) {
            let _ = write!(out, "{}", help_text(&ctx));
            return ctx.config.help_exit_code;
        }
        if is_version_sentinel(&ctx.model, token) {
            let _ = write!(out, "{}", render_version(&ctx.model, &ctx.config));
            return 0;
        }

        let step = match resolve(&ctx.model, token) {
            Some(Resolution::Class(sub)) => Step::Descend(sub.clone()),
            Some(Resolution::Method(method)) => Step::Invoke(method.clone()),
            None => Step::Bind,
        };

        match step {
            Step::Descend(sub) => {
                debug!(subcommand = %sub.name, "descending into subcommand");
                ctx = ctx.child(&sub);
                index += 1;
            }
            Step::Invoke(method) => {
                index += 1;
                let rest = tokens[index..].to_vec();
                let shim = method_model(&ctx, &method);
                return match bind(&shim, &rest, &ctx.config, registry) {
                    Ok(bound) => dispatch(&method.action, &bound, err),
                    Err(outcome) => report_outcome(&outcome, &ctx, out, err),
                };
            }
            Step::Bind => break,
        }
    }

    let rest = tokens[index..].to_vec();
    let rest = if ctx.agent_mode {
        normalize_bare(&ctx.model, &rest)
    } else {
        rest
    };

    match bind(&ctx.model, &rest, &ctx.config, registry) {
        Ok(bound) => match ctx.model.action.clone() {
            Some(action) => dispatch(&action, &bound, err),
            None => {
                // Not directly runnable; show how it is meant to be used.
                let _ = write!(out, "{}", help_text(&ctx));
                0
            }
        },
        Err(outcome) => report_outcome(&outcome, &ctx, out, err),
    }
}

/// A method-style subcommand parses against its own, normally empty,
/// parameter set.
fn method_model(ctx: &ParseContext, method: &MethodSubcommandRef) -> CommandModel {
    let mut shim = CommandModel::new(&method.name);
    shim.parameters = method.parameters.clone();
    shim.standard_help = ctx.model.standard_help;
    shim.agent_mode = ctx.model.agent_mode;
    shim
}

fn dispatch(action: &CommandAction, bound: &command_bind_core::BoundCommand, err: &mut dyn Write) -> i32 {
    match action.invoke(bound) {
        Ok(code) => code,
        Err(message) => {
            // The command's own logic failed, not its invocation; no help.
            let _ = writeln!(err, "Error: {message}");
            1
        }
    }
}

fn report_outcome(
    outcome: &ParseError,
    ctx: &ParseContext,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    match outcome {
        ParseError::HelpRequested => {
            let _ = write!(out, "{}", help_text(ctx));
            ctx.config.help_exit_code
        }
        ParseError::VersionRequested => {
            let _ = write!(out, "{}", render_version(&ctx.model, &ctx.config));
            0
        }
        usage => report_usage(usage, ctx, out, err),
    }
}

fn report_usage(
    usage: &ParseError,
    ctx: &ParseContext,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let sink: &mut dyn Write = if ctx.config.usage_errors_to_stdout {
        out
    } else {
        err
    };
    let _ = writeln!(sink, "{usage}");
    if let ParseError::UnknownOption {
        suggestion: Some(suggestion),
        ..
    } = usage
    {
        let _ = writeln!(sink, "{}", ctx.config.suggestion_line(suggestion));
    }
    let _ = writeln!(sink);
    let _ = write!(sink, "{}", help_text(ctx));
    2
}

fn help_text(ctx: &ParseContext) -> String {
    render_help(&ctx.model, &ctx.path, &ctx.config, ctx.agent_mode)
}
