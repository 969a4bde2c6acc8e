//! End-to-end scenarios across the binder, resolver, translator, and driver.

use command_bind_core::{
    CommandAction, CommandModel, ConverterRegistry, MethodSubcommandRef, ModelError, OptionSpec,
    ParamSpec, ParserConfig, SubcommandRef, ValueType, resolve_model,
};
use command_bind_parse::{ParseError, bind, run, run_agent, to_argv};

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn run_captured(model: &CommandModel, parts: &[&str]) -> (i32, String, String) {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run(
        model,
        &args(parts),
        &ParserConfig::default(),
        &ConverterRegistry::new(),
        &mut out,
        &mut err,
    );
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

fn greet_model() -> CommandModel {
    CommandModel::new("greet")
        .with_option(
            OptionSpec::scalar(&["-n", "--name"], "name", ValueType::Str)
                .required()
                .with_description("Who to greet"),
        )
        .with_option(
            OptionSpec::scalar(&["-c", "--count"], "count", ValueType::Int)
                .with_default("1")
                .with_description("How many times"),
        )
        .with_action(CommandAction::exit(|bound| {
            if bound.str_value("name") == Some("World") && bound.int_value("count") == Some(1) {
                Ok(0)
            } else {
                Err("unexpected bound values".to_string())
            }
        }))
}

// ---------------------------------------------------------------------------
// Specified scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_binds_name_and_count() {
    let (code, out, err) = run_captured(&greet_model(), &["--name=World", "--count=1"]);
    assert_eq!(code, 0, "stdout: {out} stderr: {err}");
    assert!(err.is_empty());
}

#[test]
fn scenario_b_missing_required_option() {
    let (code, _, err) = run_captured(&greet_model(), &[]);
    assert_eq!(code, 2);
    assert!(err.contains("Missing required option: --name"));
    // The error line, a blank line, then the full help text.
    let mut lines = err.lines();
    assert_eq!(lines.next(), Some("Missing required option: --name"));
    assert_eq!(lines.next(), Some(""));
    assert!(lines.next().unwrap().starts_with("Usage: greet"));
}

#[test]
fn scenario_c_agent_string_with_subcommand() {
    let stop = CommandModel::new("stop")
        .with_option(
            OptionSpec::scalar(&["-o", "--output"], "output", ValueType::Str).required(),
        )
        .with_option(OptionSpec::flag(&["--verbose"], "verbose"))
        .with_parameter(ParamSpec::at(0, "<subsystem>", "subsystem", ValueType::Str))
        .with_action(CommandAction::exit(|bound| {
            let ok = bound.str_value("subsystem") == Some("jfr")
                && bound.str_value("output") == Some("file.jfr")
                && bound.flag("verbose");
            if ok { Ok(0) } else { Err("unexpected bound values".to_string()) }
        }));
    let root = CommandModel::new("5140:jcmd")
        .agent_mode()
        .with_subcommand(SubcommandRef::new("stop", stop));

    // The translation itself is part of the contract.
    assert_eq!(
        to_argv("stop,jfr,output=file.jfr,verbose").unwrap(),
        vec!["stop", "jfr", "output=file.jfr", "verbose"]
    );

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run_agent(
        &root,
        "stop,jfr,output=file.jfr,verbose",
        &ParserConfig::default(),
        &ConverterRegistry::new(),
        &mut out,
        &mut err,
    );
    assert_eq!(code, 0, "stderr: {}", String::from_utf8(err).unwrap());
}

#[test]
fn scenario_d_unknown_option_suggestion() {
    let model = CommandModel::new("tool")
        .with_option(OptionSpec::flag(&["--verbose"], "verbose"))
        .with_action(CommandAction::run(|_| Ok(())));
    let (code, _, err) = run_captured(&model, &["--verbse"]);
    assert_eq!(code, 2);
    assert!(err.contains("Unknown option: '--verbse'"));
    assert!(err.contains("Did you mean '--verbose'?"));
}

#[test]
fn scenario_e_ambiguity_detected_before_parse() {
    let model = CommandModel::new("tool")
        .with_option(OptionSpec::flag(&["-x"], "alpha"))
        .with_option(OptionSpec::flag(&["--x"], "beta"));

    match resolve_model(&model, &ParserConfig::default()) {
        Err(ModelError::AmbiguousOptionName { bare, .. }) => assert_eq!(bare, "x"),
        other => panic!("expected ambiguity error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Subcommand chains
// ---------------------------------------------------------------------------

#[test]
fn multi_level_chain_resolves_before_option_parsing() {
    let deep = CommandModel::new("deep")
        .with_option(OptionSpec::flag(&["--flag"], "flag"))
        .with_action(CommandAction::exit(|bound| {
            Ok(if bound.flag("flag") { 0 } else { 9 })
        }));
    let sub = CommandModel::new("sub").with_subcommand(SubcommandRef::new("deep", deep));
    let root = CommandModel::new("root").with_subcommand(SubcommandRef::new("sub", sub));

    let (code, _, _) = run_captured(&root, &["sub", "deep", "--flag"]);
    assert_eq!(code, 0);
}

#[test]
fn help_at_depth_shows_subcommand_usage() {
    let sub = CommandModel::new("sub").with_option(OptionSpec::flag(&["--flag"], "flag"));
    let root = CommandModel::new("root").with_subcommand(SubcommandRef::new("sub", sub));

    let (code, out, _) = run_captured(&root, &["sub", "--help"]);
    assert_eq!(code, 0);
    assert!(out.starts_with("Usage: root sub"));
}

#[test]
fn dash_token_terminates_resolution() {
    // "--sub" cannot name the subcommand; it must be an unknown option.
    let sub = CommandModel::new("sub").with_action(CommandAction::run(|_| Ok(())));
    let root = CommandModel::new("root")
        .with_subcommand(SubcommandRef::new("sub", sub))
        .with_action(CommandAction::run(|_| Ok(())));

    let (code, _, err) = run_captured(&root, &["--sub"]);
    assert_eq!(code, 2);
    assert!(err.contains("Unknown option: '--sub'"));
}

#[test]
fn method_style_subcommand_invokes_directly() {
    let root = CommandModel::new("root").with_method(
        MethodSubcommandRef::new("ping", CommandAction::exit(|_| Ok(7)))
            .with_description("Liveness probe"),
    );
    let (code, _, _) = run_captured(&root, &["ping"]);
    assert_eq!(code, 7);
}

#[test]
fn method_style_binds_its_own_parameters() {
    let root = CommandModel::new("root").with_method(
        MethodSubcommandRef::new("echo", CommandAction::exit(|bound| {
            Ok(if bound.str_value("word") == Some("hi") { 0 } else { 5 })
        }))
        .with_parameter(ParamSpec::at(0, "<word>", "word", ValueType::Str)),
    );
    let (code, _, _) = run_captured(&root, &["echo", "hi"]);
    assert_eq!(code, 0);

    // Surplus tokens against the normally-empty parameter set fail.
    let noargs = CommandModel::new("root").with_method(MethodSubcommandRef::new(
        "ping",
        CommandAction::run(|_| Ok(())),
    ));
    let (code, _, err) = run_captured(&noargs, &["ping", "surplus"]);
    assert_eq!(code, 2);
    assert!(err.contains("Too many parameters: 'surplus'"));
}

// ---------------------------------------------------------------------------
// Agent mode end to end
// ---------------------------------------------------------------------------

#[test]
fn agent_bare_help_renders_with_comma_path() {
    let sub = CommandModel::new("stop").with_option(OptionSpec::flag(&["--verbose"], "verbose"));
    let root = CommandModel::new("5140:jcmd")
        .agent_mode()
        .with_subcommand(SubcommandRef::new("stop", sub));

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run_agent(
        &root,
        "stop,help",
        &ParserConfig::default(),
        &ConverterRegistry::new(),
        &mut out,
        &mut err,
    );
    assert_eq!(code, 0);
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Usage: 5140:jcmd,stop"));
}

#[test]
fn agent_translation_error_reports_as_usage_error() {
    let root = CommandModel::new("jcmd").agent_mode();
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run_agent(
        &root,
        "a,,b",
        &ParserConfig::default(),
        &ConverterRegistry::new(),
        &mut out,
        &mut err,
    );
    assert_eq!(code, 2);
    let err = String::from_utf8(err).unwrap();
    assert!(err.contains("empty token in agent arguments"));
    assert!(err.contains("Usage: jcmd"));
}

// ---------------------------------------------------------------------------
// Binder properties that hold for every model
// ---------------------------------------------------------------------------

#[test]
fn required_option_fails_before_any_body_runs() {
    let model = CommandModel::new("tool")
        .with_option(OptionSpec::scalar(&["--must"], "must", ValueType::Str).required())
        .with_action(CommandAction::run(|_| {
            panic!("body must never run on a usage error")
        }));
    let (code, _, _) = run_captured(&model, &[]);
    assert_eq!(code, 2);
}

#[test]
fn boolean_binding_forms_match_specification() {
    let model = resolve_model(
        &CommandModel::new("tool").with_option(OptionSpec::flag(&["--flag"], "flag")),
        &ParserConfig::default(),
    )
    .unwrap();
    let config = ParserConfig::default();
    let registry = ConverterRegistry::new();

    let bound = bind(&model, &args(&["--flag"]), &config, &registry).unwrap();
    assert!(bound.flag("flag"));

    let bound = bind(&model, &args(&["--flag=false"]), &config, &registry).unwrap();
    assert!(!bound.flag("flag"));

    let bound = bind(&model, &args(&["--flag", "false"]), &config, &registry).unwrap();
    assert!(!bound.flag("flag"));
}

#[test]
fn varargs_with_no_tokens_is_empty_not_an_error() {
    let model = resolve_model(
        &CommandModel::new("tool")
            .with_parameter(ParamSpec::trailing(0, "<files>", "files", ValueType::Str)),
        &ParserConfig::default(),
    )
    .unwrap();
    let bound = bind(
        &model,
        &[],
        &ParserConfig::default(),
        &ConverterRegistry::new(),
    )
    .unwrap();
    assert_eq!(bound.list("files").map(<[_]>::len), Some(0));
}

#[test]
fn help_interrupt_outranks_unknown_option() {
    let model = resolve_model(
        &CommandModel::new("tool"),
        &ParserConfig::default(),
    )
    .unwrap();
    let outcome = bind(
        &model,
        &args(&["--no-such-option", "--help"]),
        &ParserConfig::default(),
        &ConverterRegistry::new(),
    )
    .unwrap_err();
    // The unknown option comes first in the stream, so it wins; but help
    // seen first wins over later unknowns.
    assert!(matches!(outcome, ParseError::UnknownOption { .. }));

    let outcome = bind(
        &model,
        &args(&["--help", "--no-such-option"]),
        &ParserConfig::default(),
        &ConverterRegistry::new(),
    )
    .unwrap_err();
    assert_eq!(outcome, ParseError::HelpRequested);
}
