//! `cmdbind` demonstration binary.
//!
//! Drives the library end to end with a small `greet` command: a required
//! `--name`, a defaulted `--count`, an `--excited` flag, a `--json`
//! inspection switch, and a method-style `ping` subcommand. The process
//! exit code comes straight from the run driver, which makes this binary
//! the fixture for the exit-code and output integration tests.

use std::io;

use command_bind_core::{
    CommandAction, CommandModel, ConverterRegistry, MethodSubcommandRef, OptionSpec, ParserConfig,
    ValueType, Verifier,
};
use command_bind_parse::run;

fn greet_model() -> CommandModel {
    CommandModel::new("greet")
        .with_version("1.2.3")
        .with_description("Greets somebody, possibly repeatedly.")
        .with_option(
            OptionSpec::scalar(&["-n", "--name"], "name", ValueType::Str)
                .required()
                .with_description("Who to greet"),
        )
        .with_option(
            OptionSpec::scalar(&["-c", "--count"], "count", ValueType::Int)
                .with_default("1")
                .with_description("How many times")
                .with_verifier(Verifier::new(|value| match value.as_int() {
                    Some(n) if n >= 0 => Ok(()),
                    _ => Err("count must not be negative".to_string()),
                })),
        )
        .with_option(
            OptionSpec::flag(&["-e", "--excited"], "excited")
                .with_description("Add an exclamation mark"),
        )
        .with_option(
            OptionSpec::flag(&["--json"], "json")
                .with_description("Print the bound values as JSON instead of greeting"),
        )
        .with_method(
            MethodSubcommandRef::new("ping", CommandAction::run(|_| {
                println!("pong");
                Ok(())
            }))
            .with_description("Print pong and exit"),
        )
        .with_action(CommandAction::run(|bound| {
            if bound.flag("json") {
                let rendered = serde_json::to_string(&bound.to_json())
                    .map_err(|e| e.to_string())?;
                println!("{rendered}");
                return Ok(());
            }
            let name = bound.str_value("name").unwrap_or("stranger");
            let count = bound.int_value("count").unwrap_or(1);
            let punctuation = if bound.flag("excited") { "!" } else { "." };
            for _ in 0..count {
                println!("Hello, {name}{punctuation}");
            }
            Ok(())
        }))
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ParserConfig::default();
    let registry = ConverterRegistry::new();
    let model = greet_model();

    let mut out = io::stdout();
    let mut err = io::stderr();
    let code = run(&model, &args, &config, &registry, &mut out, &mut err);
    std::process::exit(code);
}
