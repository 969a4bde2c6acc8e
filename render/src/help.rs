//! Help and usage rendering.
//!
//! Renders a resolved [`CommandModel`] as usage text: synopsis, the shared
//! parameter/option table, and the subcommand table. Rendering is a pure
//! function of its inputs — the same model, display path, and configuration
//! always produce byte-identical output.
//!
//! Column rules: the parameter/option table column is
//! `max(12, longest label) + 6` wide and descriptions wrap to the remaining
//! width of an 80-column line; the subcommand name column is the longest
//! visible name plus two. Option rows are sorted by dash-stripped,
//! lower-cased primary name; parameter rows keep index order and subcommand
//! rows keep declaration order.

use command_bind_core::{
    COMPLETION_CANDIDATES_PLACEHOLDER, CommandModel, DEFAULT_VALUE_PLACEHOLDER, OptionSpec,
    ParserConfig, ValueType,
};

use crate::wrap::{wrap, wrap_tokens};

/// Description of the synthetic `--help` row.
const HELP_DESCRIPTION: &str = "Show this help message and exit.";
/// Description of the synthetic `--version` row.
const VERSION_DESCRIPTION: &str = "Print version information and exit.";

/// Renders full help text for `model` at `display_path`.
///
/// `agent_mode` switches the synopsis path separator from a space to a comma
/// and disables synopsis wrapping; everything else renders identically in
/// both modes.
///
/// # Examples
///
/// ```
/// use command_bind_core::*;
/// use command_bind_render::render_help;
///
/// let mut model = CommandModel::new("tool")
///     .with_option(OptionSpec::flag(&["-v", "--verbose"], "verbose"));
/// model.standard_help = true;
///
/// let text = render_help(&model, &["tool".to_string()], &ParserConfig::default(), false);
/// assert!(text.starts_with("Usage: tool [-hV] [--verbose]\n"));
/// ```
pub fn render_help(
    model: &CommandModel,
    display_path: &[String],
    config: &ParserConfig,
    agent_mode: bool,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.extend(model.header.iter().cloned());
    lines.extend(synopsis_lines(model, display_path, agent_mode));
    if config.empty_line_after_usage {
        lines.push(String::new());
    }

    for paragraph in &model.description {
        lines.extend(wrap(paragraph, 80));
    }
    if config.empty_line_after_description && !model.description.is_empty() {
        lines.push(String::new());
    }

    lines.extend(table_lines(model, config));
    lines.extend(subcommand_lines(model));
    lines.extend(model.footer.iter().cloned());

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Renders the version line for `model`, using the configured fallback.
pub fn render_version(model: &CommandModel, config: &ParserConfig) -> String {
    format!("{}\n", model.version_or(config.version.as_deref()))
}

fn synopsis_lines(model: &CommandModel, display_path: &[String], agent_mode: bool) -> Vec<String> {
    let separator = if agent_mode { "," } else { " " };
    let path = display_path.join(separator);
    let prefix = format!("Usage: {path}");

    if !model.custom_synopsis.is_empty() {
        let mut lines = vec![format!("Usage: {}", model.custom_synopsis[0])];
        let indent = " ".repeat("Usage: ".len());
        for extra in &model.custom_synopsis[1..] {
            lines.push(format!("{indent}{extra}"));
        }
        return lines;
    }

    let tokens = synopsis_tokens(model);
    if agent_mode {
        let mut line = prefix;
        for token in &tokens {
            line.push(' ');
            line.push_str(token);
        }
        vec![line]
    } else {
        wrap_tokens(&prefix, &tokens, 80)
    }
}

fn synopsis_tokens(model: &CommandModel) -> Vec<String> {
    let mut tokens = Vec::new();

    if model.standard_help {
        tokens.push("[-hV]".to_string());
    }

    for option in model.options.iter().filter(|o| !o.hidden) {
        let canonical = option.canonical_name();
        let token = if option.takes_value() {
            let inner = format!("{canonical}={}", option.label());
            if option.required {
                inner
            } else {
                format!("[{inner}]")
            }
        } else if option.required {
            canonical.to_string()
        } else {
            format!("[{canonical}]")
        };
        tokens.push(token);
    }

    if model.has_subcommands() {
        tokens.push("[COMMAND]".to_string());
    }

    for param in model.parameters.iter().filter(|p| !p.hidden) {
        let label = &param.param_label;
        let token = if param.varargs {
            format!("[{label}...]")
        } else if param.required {
            label.clone()
        } else {
            format!("[{label}]")
        };
        tokens.push(token);
    }

    tokens
}

struct Row {
    label: String,
    description: String,
}

fn table_lines(model: &CommandModel, config: &ParserConfig) -> Vec<String> {
    let mut rows: Vec<Row> = Vec::new();

    for param in model.parameters.iter().filter(|p| !p.hidden) {
        rows.push(Row {
            label: format!("  {}", param.param_label),
            description: param.description.clone().unwrap_or_default(),
        });
    }

    let mut option_rows: Vec<(String, Row)> = Vec::new();
    for option in model.options.iter().filter(|o| !o.hidden) {
        let mut label = format!("  {}", option.names.join(", "));
        if option.takes_value() {
            label.push('=');
            label.push_str(&option.label());
        }
        option_rows.push((
            option.bare_name().to_lowercase(),
            Row {
                label,
                description: expand_description(option, config),
            },
        ));
    }
    if model.standard_help {
        option_rows.push((
            "help".to_string(),
            Row {
                label: "  -h, --help".to_string(),
                description: HELP_DESCRIPTION.to_string(),
            },
        ));
        option_rows.push((
            "version".to_string(),
            Row {
                label: "  -V, --version".to_string(),
                description: VERSION_DESCRIPTION.to_string(),
            },
        ));
    }
    option_rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows.extend(option_rows.into_iter().map(|(_, row)| row));

    if rows.is_empty() {
        return Vec::new();
    }

    let longest = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
    let column = longest.max(12) + 6;
    let width = 80usize.saturating_sub(column).max(1);

    let mut lines = Vec::new();
    for row in rows {
        lines.extend(layout_row(&row.label, &row.description, column, width));
    }
    lines
}

fn layout_row(label: &str, description: &str, column: usize, width: usize) -> Vec<String> {
    let wrapped = wrap(description, width);
    if wrapped.is_empty() {
        return vec![label.to_string()];
    }
    let mut lines = Vec::with_capacity(wrapped.len());
    lines.push(format!("{label:<column$}{}", wrapped[0]));
    for continuation in &wrapped[1..] {
        lines.push(format!("{:<column$}{continuation}", ""));
    }
    lines
}

fn expand_description(option: &OptionSpec, config: &ParserConfig) -> String {
    let mut description = option.description.clone().unwrap_or_default();

    if description.contains(COMPLETION_CANDIDATES_PLACEHOLDER) {
        if let ValueType::Choice(candidates) = &option.value_type {
            let expanded: Vec<String> = candidates
                .iter()
                .map(|c| match &c.description {
                    Some(text) => format!("{} ({text})", c.name.to_lowercase()),
                    None => c.name.to_lowercase(),
                })
                .collect();
            description = description.replace(
                COMPLETION_CANDIDATES_PLACEHOLDER,
                &expanded.join(&config.completion_candidates_separator),
            );
        }
    }

    let default = option.default_value.clone().unwrap_or_default();
    if description.contains(DEFAULT_VALUE_PLACEHOLDER) {
        // The author placed the default themselves; substitute in place and
        // never append a second mention.
        description = description.replace(DEFAULT_VALUE_PLACEHOLDER, &default);
    } else if config.show_default_values_in_help
        && option.show_default
        && option.takes_value()
        && !default.is_empty()
    {
        let rendered = config.default_value_line(&default);
        if description.is_empty() {
            description = rendered;
        } else if config.default_value_on_new_line {
            description = format!("{description}\n{rendered}");
        } else {
            description = format!("{description} {rendered}");
        }
    }

    if option.required {
        if description.is_empty() {
            description = "(required)".to_string();
        } else {
            description.push_str(" (required)");
        }
    }

    description
}

fn subcommand_lines(model: &CommandModel) -> Vec<String> {
    let entries: Vec<(&str, &str)> = model
        .subcommands
        .iter()
        .filter(|s| !s.hidden)
        .map(|s| (s.name.as_str(), s.description.as_deref().unwrap_or("")))
        .chain(
            model
                .methods
                .iter()
                .filter(|m| !m.hidden)
                .map(|m| (m.name.as_str(), m.description.as_deref().unwrap_or(""))),
        )
        .collect();

    if entries.is_empty() {
        return Vec::new();
    }

    let name_column = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0) + 2;
    let column = 2 + name_column;
    let width = 80usize.saturating_sub(column).max(1);

    let mut lines = vec!["Commands:".to_string()];
    for (name, description) in entries {
        let label = format!("  {name:<name_column$}");
        let label = label.trim_end().to_string();
        if description.is_empty() {
            lines.push(label);
        } else {
            let padded = format!("  {name:<name_column$}");
            let wrapped = wrap(description, width);
            lines.push(format!("{padded}{}", wrapped[0]));
            for continuation in &wrapped[1..] {
                lines.push(format!("{:<column$}{continuation}", ""));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bind_core::{
        ChoiceValue, CommandAction, CommandModel, MethodSubcommandRef, OptionSpec, ParamSpec,
        ParserConfig, SubcommandRef, resolve_model,
    };

    fn greet_model() -> CommandModel {
        let model = CommandModel::new("greet")
            .with_option(
                OptionSpec::scalar(&["-n", "--name"], "name", ValueType::Str)
                    .required()
                    .with_description("Who to greet"),
            )
            .with_option(
                OptionSpec::scalar(&["-c", "--count"], "count", ValueType::Int)
                    .with_default("1")
                    .with_description("How many times"),
            );
        resolve_model(&model, &ParserConfig::default()).unwrap()
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_help_greet_literal_output() {
        let model = greet_model();
        let text = render_help(&model, &path(&["greet"]), &ParserConfig::default(), false);

        let expected = [
            "Usage: greet [-hV] --name=<name> [--count=<count>]".to_string(),
            format!("{:<27}{}", "  -c, --count=<count>", "How many times (default: 1)"),
            format!("{:<27}{}", "  -h, --help", "Show this help message and exit."),
            format!("{:<27}{}", "  -n, --name=<name>", "Who to greet (required)"),
            format!("{:<27}{}", "  -V, --version", "Print version information and exit."),
        ]
        .join("\n")
            + "\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_help_is_idempotent() {
        let model = greet_model();
        let config = ParserConfig::default();
        let first = render_help(&model, &path(&["greet"]), &config, false);
        let second = render_help(&model, &path(&["greet"]), &config, false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_option_rows_sorted_with_standard_rows() {
        let model = greet_model();
        let text = render_help(&model, &path(&["greet"]), &ParserConfig::default(), false);
        let labels: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.trim_start())
            .collect();
        assert!(labels[0].starts_with("-c, --count"));
        assert!(labels[1].starts_with("-h, --help"));
        assert!(labels[2].starts_with("-n, --name"));
        assert!(labels[3].starts_with("-V, --version"));
    }

    #[test]
    fn test_agent_mode_joins_path_with_commas() {
        let model = greet_model();
        let text = render_help(
            &model,
            &path(&["5140:jcmd", "greet"]),
            &ParserConfig::default(),
            true,
        );
        assert!(text.starts_with("Usage: 5140:jcmd,greet [-hV]"));
    }

    #[test]
    fn test_synopsis_wraps_to_eighty_columns_with_alignment() {
        let mut model = CommandModel::new("wide");
        for i in 0..8 {
            model = model.with_option(OptionSpec::scalar(
                &[format!("--option-number-{i}").as_str()],
                &format!("field{i}"),
                ValueType::Str,
            ));
        }
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["wide"]), &ParserConfig::default(), false);

        // Option rows indent by exactly two spaces; synopsis continuations
        // indent much further, so three spaces separates the two.
        let synopsis: Vec<&str> = text
            .lines()
            .take_while(|l| l.starts_with("Usage:") || l.starts_with("   "))
            .collect();
        assert!(synopsis.len() > 1);
        let indent = "Usage: wide ".len();
        for line in &synopsis {
            assert!(line.len() <= 80);
        }
        for continuation in &synopsis[1..] {
            assert!(continuation.starts_with(&" ".repeat(indent)));
            assert!(!continuation[indent..].starts_with(' '));
        }
    }

    #[test]
    fn test_parameters_render_before_options_in_index_order() {
        let model = CommandModel::new("copy")
            .with_parameter(
                ParamSpec::at(0, "<source>", "source", ValueType::Path)
                    .with_description("Input file"),
            )
            .with_parameter(
                ParamSpec::trailing(1, "<targets>", "targets", ValueType::Path)
                    .with_description("Destinations"),
            )
            .with_option(
                OptionSpec::flag(&["-f", "--force"], "force").with_description("Overwrite"),
            );
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["copy"]), &ParserConfig::default(), false);

        // Longest label is "  -V, --version" (15) -> column 21.
        let expected = [
            "Usage: copy [-hV] [--force] <source> [<targets>...]".to_string(),
            format!("{:<21}{}", "  <source>", "Input file"),
            format!("{:<21}{}", "  <targets>", "Destinations"),
            format!("{:<21}{}", "  -f, --force", "Overwrite"),
            format!("{:<21}{}", "  -h, --help", "Show this help message and exit."),
            format!("{:<21}{}", "  -V, --version", "Print version information and exit."),
        ]
        .join("\n")
            + "\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_description_wraps_with_column_padding() {
        let model = CommandModel::new("tool").with_option(
            OptionSpec::flag(&["--toggle"], "toggle").with_description(
                "This description is deliberately long enough that it cannot possibly fit \
                 on a single eighty column line and therefore must wrap onto continuations",
            ),
        );
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["tool"]), &ParserConfig::default(), false);

        let lines: Vec<&str> = text.lines().collect();
        // Label column: "  -h, --help" (12) vs "  --toggle" (10) vs
        // "  -V, --version" (15) -> max 15 -> column 21. Sorted order puts
        // the help row first, then the wrapped --toggle row.
        let column = 21;
        let row_start = 2;
        assert!(lines[row_start].starts_with("  --toggle"));
        let continuation = lines[row_start + 1];
        assert!(continuation.starts_with(&" ".repeat(column)));
        assert!(!continuation[column..].starts_with(' '));
        for line in &lines {
            assert!(line.len() <= 80, "line exceeds 80 columns: {line:?}");
        }
    }

    #[test]
    fn test_placeholder_in_description_suppresses_append() {
        let model = CommandModel::new("tool").with_option(
            OptionSpec::scalar(&["--level"], "level", ValueType::Int)
                .with_default("3")
                .with_description("Verbosity, defaults to ${DEFAULT-VALUE}."),
        );
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["tool"]), &ParserConfig::default(), false);

        assert!(text.contains("Verbosity, defaults to 3."));
        assert!(!text.contains("(default: 3)"));
    }

    #[test]
    fn test_default_on_new_line_renders_own_continuation() {
        let config = ParserConfig {
            default_value_on_new_line: true,
            ..ParserConfig::default()
        };
        let model = CommandModel::new("tool").with_option(
            OptionSpec::scalar(&["--level"], "level", ValueType::Int)
                .with_default("3")
                .with_description("Verbosity level"),
        );
        let model = resolve_model(&model, &config).unwrap();
        let text = render_help(&model, &path(&["tool"]), &config, false);

        let lines: Vec<&str> = text.lines().collect();
        // "  --level=<level>" is 17 wide -> column 23; sorted order puts the
        // help row between the synopsis and the level row.
        assert_eq!(lines[2], format!("{:<23}{}", "  --level=<level>", "Verbosity level"));
        assert_eq!(lines[3], format!("{:<23}{}", "", "(default: 3)"));
    }

    #[test]
    fn test_completion_candidates_expansion() {
        let model = CommandModel::new("tool").with_option(
            OptionSpec::scalar(
                &["--format"],
                "format",
                ValueType::Choice(vec![
                    ChoiceValue::new("JSON"),
                    ChoiceValue::new("YAML").with_description("for humans"),
                ]),
            )
            .with_description("Output format: ${COMPLETION-CANDIDATES}"),
        );
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["tool"]), &ParserConfig::default(), false);

        assert!(text.contains("Output format: json, yaml (for humans)"));
    }

    #[test]
    fn test_subcommand_table_declaration_order_and_width() {
        let model = CommandModel::new("tool")
            .with_subcommand(
                SubcommandRef::new("status", CommandModel::new("status"))
                    .with_description("Show status"),
            )
            .with_subcommand(
                SubcommandRef::new("go", CommandModel::new("go")).with_description("Run it"),
            )
            .with_method(
                MethodSubcommandRef::new("dump", CommandAction::run(|_| Ok(())))
                    .with_description("Dump state"),
            );
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["tool"]), &ParserConfig::default(), false);

        // Name column: longest visible name ("status", 6) + 2 = 8.
        let expected_tail = [
            "Commands:".to_string(),
            format!("  {:<8}{}", "status", "Show status"),
            format!("  {:<8}{}", "go", "Run it"),
            format!("  {:<8}{}", "dump", "Dump state"),
        ]
        .join("\n")
            + "\n";
        assert!(text.ends_with(&expected_tail), "got: {text}");
        // Declaration order, not sorted.
        let status_at = text.find("status").unwrap();
        let go_at = text.find("\n  go").unwrap();
        assert!(status_at < go_at);
    }

    #[test]
    fn test_hidden_entries_are_omitted() {
        let model = CommandModel::new("tool")
            .with_option(OptionSpec::flag(&["--secret"], "secret").hidden())
            .with_option(OptionSpec::flag(&["--shown"], "shown"))
            .with_subcommand(
                SubcommandRef::new("internal", CommandModel::new("internal")).hidden(),
            );
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["tool"]), &ParserConfig::default(), false);

        assert!(!text.contains("--secret"));
        assert!(!text.contains("internal"));
        assert!(text.contains("--shown"));
        // Hidden-only subcommand list renders no Commands table, but the
        // synopsis still advertises [COMMAND] because a subcommand exists.
        assert!(!text.contains("Commands:"));
        assert!(text.contains("[COMMAND]"));
    }

    #[test]
    fn test_blank_line_configuration() {
        let config = ParserConfig {
            empty_line_after_usage: true,
            empty_line_after_description: true,
            ..ParserConfig::default()
        };
        let model = CommandModel::new("tool").with_description("Does things.");
        let model = resolve_model(&model, &config).unwrap();
        let text = render_help(&model, &path(&["tool"]), &config, false);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Usage: tool [-hV]");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Does things.");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_custom_synopsis_replaces_generated() {
        let model = CommandModel::new("tool")
            .with_synopsis("tool [the usual options] <stuff>")
            .with_synopsis("tool --special")
            .with_option(OptionSpec::flag(&["--ignored-in-synopsis"], "x"));
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["tool"]), &ParserConfig::default(), false);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Usage: tool [the usual options] <stuff>");
        assert_eq!(lines[1], "       tool --special");
    }

    #[test]
    fn test_render_version_fallback() {
        let config = ParserConfig {
            version: Some("0.9.0".to_string()),
            ..ParserConfig::default()
        };
        let unversioned = CommandModel::new("tool");
        assert_eq!(render_version(&unversioned, &config), "0.9.0\n");

        let versioned = CommandModel::new("tool").with_version("1.0.0");
        assert_eq!(render_version(&versioned, &config), "1.0.0\n");
    }

    #[test]
    fn test_header_and_footer_bracket_output() {
        let model = CommandModel::new("tool")
            .with_header("tool - a demonstration")
            .with_footer("See also: the manual.");
        let model = resolve_model(&model, &ParserConfig::default()).unwrap();
        let text = render_help(&model, &path(&["tool"]), &ParserConfig::default(), false);

        assert!(text.starts_with("tool - a demonstration\n"));
        assert!(text.ends_with("See also: the manual.\n"));
    }
}
