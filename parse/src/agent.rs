//! Agent token syntax: one escaped, comma-delimited string.
//!
//! In agent mode all arguments arrive as a single string whose tokens are
//! separated by commas. The grammar is bit-exact:
//!
//! - escapes `\\`, `\,`, `\=`; any other escape is an error
//! - a single quote toggles a quoted mode in which commas and spaces are
//!   literal and only the same three escapes are recognized
//! - each token is trimmed of surrounding whitespace outside quotes
//! - empty tokens are rejected; callers needing an empty option value must
//!   pass `--opt=`
//!
//! [`to_argv`] performs the split; [`normalize_bare`] then rewrites bare
//! tokens (`name=value`, bare flags, bare `help`/`version`) into canonical
//! dashed syntax for the active model. Bare-name ambiguity between fields is
//! rejected at model-build time, so normalization can assume uniqueness.

use command_bind_core::{CommandModel, ValueKind};
use thiserror::Error;
use tracing::trace;

/// Agent string translation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AgentError {
    /// An escape other than `\\`, `\,`, or `\=` appeared.
    #[error("unsupported escape '\\{0}' in agent arguments")]
    UnknownEscape(char),
    /// A quote was opened and never closed.
    #[error("unterminated quote in agent arguments")]
    UnterminatedQuote,
    /// The string ended in a bare backslash.
    #[error("dangling escape at end of agent arguments")]
    DanglingEscape,
    /// A token was empty after trimming (`,,`, a trailing comma, or `''`).
    #[error("empty token in agent arguments")]
    EmptyToken,
}

/// One accumulated character and whether quoting/escaping protects it from
/// trimming.
type TokenChar = (char, bool);

/// Splits an agent string into its token vector.
///
/// An entirely empty (or all-whitespace) input translates to no tokens at
/// all; anything else must form non-empty tokens.
///
/// # Examples
///
/// ```
/// use command_bind_parse::to_argv;
///
/// let tokens = to_argv("stop,jfr,output=file.jfr,verbose").unwrap();
/// assert_eq!(tokens, vec!["stop", "jfr", "output=file.jfr", "verbose"]);
///
/// // Escapes and quotes protect delimiters.
/// let tokens = to_argv(r"message=hello\, world").unwrap();
/// assert_eq!(tokens, vec!["message=hello, world"]);
/// ```
pub fn to_argv(agent: &str) -> Result<Vec<String>, AgentError> {
    if agent.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::new();
    let mut current: Vec<TokenChar> = Vec::new();
    let mut quoted = false;
    let mut chars = agent.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(escaped @ ('\\' | ',' | '=')) => current.push((escaped, true)),
                Some(other) => return Err(AgentError::UnknownEscape(other)),
                None => return Err(AgentError::DanglingEscape),
            },
            '\'' => quoted = !quoted,
            ',' if !quoted => tokens.push(finish_token(&mut current)?),
            _ => current.push((ch, quoted)),
        }
    }

    if quoted {
        return Err(AgentError::UnterminatedQuote);
    }
    tokens.push(finish_token(&mut current)?);
    trace!(count = tokens.len(), "translated agent arguments");
    Ok(tokens)
}

fn finish_token(current: &mut Vec<TokenChar>) -> Result<String, AgentError> {
    let protected = |(ch, quoted): &TokenChar| *quoted || !ch.is_whitespace();
    let start = current.iter().position(protected);
    let end = current.iter().rposition(protected);

    let token: String = match (start, end) {
        (Some(start), Some(end)) => current[start..=end].iter().map(|(ch, _)| ch).collect(),
        _ => String::new(),
    };
    current.clear();

    if token.is_empty() {
        return Err(AgentError::EmptyToken);
    }
    Ok(token)
}

/// Rewrites bare agent tokens into canonical dashed syntax for `model`.
///
/// Dash-prefixed tokens pass through untouched. Bare `help`/`version`
/// become `--help`/`--version` when the standard options are mixed in. A
/// `name=value` token whose left side matches a known option's bare name is
/// rewritten to that option's canonical form; a bare token exactly matching
/// a boolean option's bare name becomes its canonical flag. Anything else
/// (subcommand names, positionals) passes through.
///
/// # Examples
///
/// ```
/// use command_bind_core::*;
/// use command_bind_parse::normalize_bare;
///
/// let model = CommandModel::new("stop")
///     .with_option(OptionSpec::scalar(&["-o", "--output"], "output", ValueType::Path).required())
///     .with_option(OptionSpec::flag(&["--verbose"], "verbose"))
///     .agent_mode();
/// let model = resolve_model(&model, &ParserConfig::default()).unwrap();
///
/// let tokens: Vec<String> =
///     ["jfr", "output=file.jfr", "verbose"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(
///     normalize_bare(&model, &tokens),
///     vec!["jfr", "--output=file.jfr", "--verbose"]
/// );
/// ```
pub fn normalize_bare(model: &CommandModel, tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| normalize_token(model, token))
        .collect()
}

fn normalize_token(model: &CommandModel, token: &str) -> String {
    if token.starts_with('-') {
        return token.to_string();
    }

    if model.standard_help {
        if token == "help" {
            return "--help".to_string();
        }
        if token == "version" {
            return "--version".to_string();
        }
    }

    if let Some((bare, value)) = token.split_once('=') {
        if let Some(option) = model.find_option_bare(bare) {
            return format!("{}={value}", option.canonical_name());
        }
    } else if let Some(option) = model.find_option_bare(token) {
        if option.kind == ValueKind::Boolean {
            return option.canonical_name().to_string();
        }
    }

    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bind_core::{CommandModel, OptionSpec, ParserConfig, ValueType, resolve_model};

    #[test]
    fn test_to_argv_plain_split() {
        let tokens = to_argv("stop,jfr,output=file.jfr,verbose").unwrap();
        assert_eq!(tokens, vec!["stop", "jfr", "output=file.jfr", "verbose"]);
    }

    #[test]
    fn test_to_argv_trims_outside_quotes() {
        let tokens = to_argv("  alpha , beta ").unwrap();
        assert_eq!(tokens, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_to_argv_escapes() {
        assert_eq!(
            to_argv(r"a\,b,c\\d,e\=f").unwrap(),
            vec!["a,b", r"c\d", "e=f"]
        );
    }

    #[test]
    fn test_to_argv_rejects_unknown_escape() {
        assert_eq!(to_argv(r"a\nb"), Err(AgentError::UnknownEscape('n')));
    }

    #[test]
    fn test_to_argv_rejects_dangling_escape() {
        assert_eq!(to_argv(r"ab\"), Err(AgentError::DanglingEscape));
    }

    #[test]
    fn test_to_argv_quotes_protect_commas_and_spaces() {
        let tokens = to_argv("greeting='hello, world ',x").unwrap();
        assert_eq!(tokens, vec!["greeting=hello, world ", "x"]);
    }

    #[test]
    fn test_to_argv_rejects_unterminated_quote() {
        assert_eq!(to_argv("a,'bc"), Err(AgentError::UnterminatedQuote));
    }

    #[test]
    fn test_to_argv_rejects_empty_tokens() {
        assert_eq!(to_argv("a,,b"), Err(AgentError::EmptyToken));
        assert_eq!(to_argv("a,b,"), Err(AgentError::EmptyToken));
        assert_eq!(to_argv("a,''"), Err(AgentError::EmptyToken));
    }

    #[test]
    fn test_to_argv_empty_input_is_no_tokens() {
        assert_eq!(to_argv("").unwrap(), Vec::<String>::new());
        assert_eq!(to_argv("   ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_to_argv_roundtrip_through_reescaping() {
        let original = vec!["a,b".to_string(), r"c\d".to_string(), "e=f".to_string()];
        let reescaped: Vec<String> = original
            .iter()
            .map(|t| t.replace('\\', r"\\").replace(',', r"\,").replace('=', r"\="))
            .collect();
        let reparsed = to_argv(&reescaped.join(",")).unwrap();
        assert_eq!(reparsed, original);
    }

    fn agent_model() -> CommandModel {
        let model = CommandModel::new("stop")
            .with_option(
                OptionSpec::scalar(&["-o", "--output"], "output", ValueType::Path).required(),
            )
            .with_option(OptionSpec::flag(&["--verbose"], "verbose"))
            .agent_mode();
        resolve_model(&model, &ParserConfig::default()).unwrap()
    }

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_rewrites_bare_assignments_and_flags() {
        let model = agent_model();
        assert_eq!(
            normalize_bare(&model, &tokens(&["jfr", "output=file.jfr", "verbose"])),
            vec!["jfr", "--output=file.jfr", "--verbose"]
        );
    }

    #[test]
    fn test_normalize_passes_dashed_tokens_through() {
        let model = agent_model();
        assert_eq!(
            normalize_bare(&model, &tokens(&["--output=x", "-o", "y"])),
            vec!["--output=x", "-o", "y"]
        );
    }

    #[test]
    fn test_normalize_help_and_version_words() {
        let model = agent_model();
        assert_eq!(
            normalize_bare(&model, &tokens(&["help", "version"])),
            vec!["--help", "--version"]
        );
    }

    #[test]
    fn test_normalize_leaves_non_boolean_bare_names_alone() {
        // "output" without '=' names a value-bearing option; a bare mention
        // is a positional, not a flag.
        let model = agent_model();
        assert_eq!(
            normalize_bare(&model, &tokens(&["output"])),
            vec!["output"]
        );
    }

    #[test]
    fn test_normalize_unknown_assignment_passes_through() {
        let model = agent_model();
        assert_eq!(
            normalize_bare(&model, &tokens(&["mystery=1"])),
            vec!["mystery=1"]
        );
    }
}
