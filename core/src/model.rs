//! Command model type definitions.
//!
//! This module defines the data model a parse runs against: a
//! [`CommandModel`] describing one command's named options, positional
//! parameters, mixin bundles, and subcommands. Models are assembled through
//! constructor and `with_*` builder methods, then resolved once via
//! [`resolve_model`](crate::resolve_model) into their effective, immutable
//! form before any token is consumed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::convert::{Converter, Value, Verifier};

/// Identifies which declaration site owns a bound field.
///
/// Options declared directly on a command bind to [`OwnerPath::Command`];
/// options contributed by a mixin bundle bind to [`OwnerPath::Mixin`] with
/// the mixin's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OwnerPath {
    /// The field lives on the command itself (the default).
    #[default]
    Command,
    /// The field lives on the named mixin bundle.
    Mixin(String),
}

/// The binding target of an option or parameter.
///
/// A `FieldRef` is an opaque identity: two option declarations that share a
/// dash-stripped name are an override when their `FieldRef`s are equal and a
/// hard ambiguity error when they differ.
///
/// # Examples
///
/// ```
/// use command_bind_core::FieldRef;
///
/// let field = FieldRef::command("verbose");
/// assert_eq!(field.to_string(), "verbose");
///
/// let mixed = FieldRef::mixin("logging", "level");
/// assert_eq!(mixed.to_string(), "logging.level");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    /// Declaration site of the field.
    pub owner: OwnerPath,
    /// Field name within its owner.
    pub name: String,
}

impl FieldRef {
    /// Creates a field reference owned by the command itself.
    pub fn command(name: &str) -> Self {
        Self {
            owner: OwnerPath::Command,
            name: name.to_string(),
        }
    }

    /// Creates a field reference owned by the named mixin.
    pub fn mixin(mixin: &str, name: &str) -> Self {
        Self {
            owner: OwnerPath::Mixin(mixin.to_string()),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            OwnerPath::Command => write!(f, "{}", self.name),
            OwnerPath::Mixin(mixin) => write!(f, "{mixin}.{}", self.name),
        }
    }
}

/// How many values a field consumes and how they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueKind {
    /// A flag; binds `true`/`false` without requiring a value token.
    Boolean,
    /// Exactly one value (the default).
    #[default]
    Scalar,
    /// Accumulates any number of values into a list.
    Multi,
}

/// Permitted `(min, max)` count of values, `max = None` meaning unbounded.
///
/// # Examples
///
/// ```
/// use command_bind_core::Arity;
///
/// let optional = Arity::optional_value();
/// assert!(optional.contains(0));
/// assert!(optional.contains(1));
/// assert!(!optional.contains(2));
///
/// let open = Arity::at_least(1);
/// assert!(open.contains(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    /// Creates an arity with an explicit bound.
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Exactly `n` values.
    pub fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// At least `min` values, unbounded above.
    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// The `0..1` arity of an option whose value may be omitted.
    pub fn optional_value() -> Self {
        Self {
            min: 0,
            max: Some(1),
        }
    }

    /// Returns `true` if `count` falls within this arity.
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    /// Returns `true` for the `0..1` optional-value arity.
    pub fn is_optional_value(&self) -> bool {
        self.min == 0 && self.max == Some(1)
    }
}

/// One enum candidate for a [`ValueType::Choice`] field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceValue {
    /// Candidate constant name, matched case-insensitively.
    pub name: String,
    /// Optional human description shown by `${COMPLETION-CANDIDATES}`.
    pub description: Option<String>,
}

impl ChoiceValue {
    /// Creates a candidate without a description.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
        }
    }

    /// Attaches a human description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Target type a raw token string is converted into.
///
/// # Examples
///
/// ```
/// use command_bind_core::{ChoiceValue, ValueType};
///
/// let vt = ValueType::default();
/// assert_eq!(vt, ValueType::Str);
///
/// let format = ValueType::Choice(vec![
///     ChoiceValue::new("JSON"),
///     ChoiceValue::new("YAML"),
/// ]);
/// assert!(matches!(format, ValueType::Choice(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueType {
    /// `true`/`false`, case-insensitive.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Unconverted string (the default).
    #[default]
    Str,
    /// Filesystem path.
    Path,
    /// One of a closed set of candidates, matched case-insensitively.
    Choice(Vec<ChoiceValue>),
}

/// Schema for a named option.
///
/// An option carries one or more dash-prefixed names, the identity of the
/// field it binds to, and the conversion/verification/default machinery used
/// while binding. Construct with [`flag`](OptionSpec::flag),
/// [`scalar`](OptionSpec::scalar), or [`multi`](OptionSpec::multi), then
/// chain `with_*` methods.
///
/// # Examples
///
/// ```
/// use command_bind_core::{OptionSpec, ValueType};
///
/// let verbose = OptionSpec::flag(&["-v", "--verbose"], "verbose")
///     .with_description("Enable verbose output");
/// assert_eq!(verbose.canonical_name(), "--verbose");
/// assert_eq!(verbose.bare_name(), "verbose");
/// assert!(!verbose.takes_value());
///
/// let count = OptionSpec::scalar(&["-c", "--count"], "count", ValueType::Int)
///     .with_default("1");
/// assert!(count.takes_value());
/// ```
#[derive(Debug, Clone)]
pub struct OptionSpec {
    /// Dash-prefixed names; the first long form is the canonical name.
    pub names: Vec<String>,
    /// Field the option binds to.
    pub field: FieldRef,
    /// Boolean, scalar, or accumulating.
    pub kind: ValueKind,
    /// Conversion target type.
    pub value_type: ValueType,
    /// Whether absence on the command line is an error.
    pub required: bool,
    /// Default applied when the option is absent (never for required ones).
    pub default_value: Option<String>,
    /// Delimiter splitting one token into several values (multi only).
    pub split_delimiter: Option<String>,
    /// Permitted value count; `0..1` marks an optional-value option.
    pub arity: Option<Arity>,
    /// Custom string-to-value conversion, overriding the registry.
    pub converter: Option<Converter>,
    /// Post-conversion validation.
    pub verifier: Option<Verifier>,
    /// Hidden options bind normally but never render.
    pub hidden: bool,
    /// Placeholder label in synopsis and tables (defaults to `<bare_name>`).
    pub param_label: Option<String>,
    /// Whether help may show the default value for this option.
    pub show_default: bool,
    /// Description shown in the option table.
    pub description: Option<String>,
}

impl OptionSpec {
    fn base(names: &[&str], field: &str, kind: ValueKind, value_type: ValueType) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            field: FieldRef::command(field),
            kind,
            value_type,
            required: false,
            default_value: None,
            split_delimiter: None,
            arity: None,
            converter: None,
            verifier: None,
            hidden: false,
            param_label: None,
            show_default: true,
            description: None,
        }
    }

    /// Creates a boolean flag option.
    pub fn flag(names: &[&str], field: &str) -> Self {
        Self::base(names, field, ValueKind::Boolean, ValueType::Bool)
    }

    /// Creates a single-value option.
    pub fn scalar(names: &[&str], field: &str, value_type: ValueType) -> Self {
        Self::base(names, field, ValueKind::Scalar, value_type)
    }

    /// Creates an accumulating multi-value option.
    pub fn multi(names: &[&str], field: &str, value_type: ValueType) -> Self {
        Self::base(names, field, ValueKind::Multi, value_type)
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value applied when the option is absent.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Splits each supplied token on `delimiter` before accumulation.
    pub fn with_split(mut self, delimiter: &str) -> Self {
        self.split_delimiter = Some(delimiter.to_string());
        self
    }

    /// Constrains the permitted value count.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Installs a custom converter, taking priority over the registry.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Installs a post-conversion verifier.
    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Hides the option from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Overrides the `<label>` placeholder used in help output.
    pub fn with_label(mut self, label: &str) -> Self {
        self.param_label = Some(label.to_string());
        self
    }

    /// Suppresses default-value display for this option.
    pub fn without_default_display(mut self) -> Self {
        self.show_default = false;
        self
    }

    /// Re-owns the binding target to the named mixin.
    pub fn owned_by_mixin(mut self, mixin: &str) -> Self {
        self.field.owner = OwnerPath::Mixin(mixin.to_string());
        self
    }

    /// Returns the canonical name: the first `--` long form, falling back to
    /// the first declared name.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::OptionSpec;
    ///
    /// let opt = OptionSpec::flag(&["-v", "--verbose"], "verbose");
    /// assert_eq!(opt.canonical_name(), "--verbose");
    ///
    /// let short_only = OptionSpec::flag(&["-x"], "x");
    /// assert_eq!(short_only.canonical_name(), "-x");
    /// ```
    pub fn canonical_name(&self) -> &str {
        self.names
            .iter()
            .find(|n| n.starts_with("--"))
            .or_else(|| self.names.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Canonical name with leading dashes stripped.
    pub fn bare_name(&self) -> &str {
        self.canonical_name().trim_start_matches('-')
    }

    /// Checks whether `token` equals one of this option's names.
    pub fn matches(&self, token: &str) -> bool {
        self.names.iter().any(|n| n == token)
    }

    /// Returns `true` when the option consumes a value token.
    pub fn takes_value(&self) -> bool {
        self.kind != ValueKind::Boolean
    }

    /// Returns `true` for value-bearing options whose value may be omitted.
    pub fn has_optional_value(&self) -> bool {
        self.takes_value() && self.arity.is_some_and(|a| a.min == 0)
    }

    /// Placeholder label shown next to the names in help output.
    pub fn label(&self) -> String {
        self.param_label
            .clone()
            .unwrap_or_else(|| format!("<{}>", self.bare_name()))
    }
}

/// Schema for a positional parameter.
///
/// Parameters bind by index. Fixed-index parameters consume exactly one
/// token; a trailing varargs parameter consumes every remaining token
/// subject to its arity.
///
/// # Examples
///
/// ```
/// use command_bind_core::{ParamSpec, ValueType};
///
/// let file = ParamSpec::at(0, "<file>", "file", ValueType::Path);
/// assert!(file.required);
///
/// let rest = ParamSpec::trailing(1, "<args>", "args", ValueType::Str);
/// assert!(rest.varargs);
/// assert!(!rest.required);
/// ```
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Position in the positional token stream.
    pub index: usize,
    /// Consumes all remaining tokens; only legal on the last parameter.
    pub varargs: bool,
    /// Permitted token count for a varargs parameter.
    pub arity: Option<Arity>,
    /// Field the parameter binds to.
    pub field: FieldRef,
    /// Conversion target type.
    pub value_type: ValueType,
    /// Whether absence is an error.
    pub required: bool,
    /// Default applied when the parameter is absent (never when required).
    pub default_value: Option<String>,
    /// Custom string-to-value conversion, overriding the registry.
    pub converter: Option<Converter>,
    /// Post-conversion validation.
    pub verifier: Option<Verifier>,
    /// Hidden parameters bind normally but never render.
    pub hidden: bool,
    /// Label in synopsis and tables, e.g. `<file>`.
    pub param_label: String,
    /// Description shown in the parameter table.
    pub description: Option<String>,
}

impl ParamSpec {
    /// Creates a required fixed-index parameter.
    pub fn at(index: usize, label: &str, field: &str, value_type: ValueType) -> Self {
        Self {
            index,
            varargs: false,
            arity: None,
            field: FieldRef::command(field),
            value_type,
            required: true,
            default_value: None,
            converter: None,
            verifier: None,
            hidden: false,
            param_label: label.to_string(),
            description: None,
        }
    }

    /// Creates a trailing varargs parameter; zero tokens bind an empty list.
    pub fn trailing(index: usize, label: &str, field: &str, value_type: ValueType) -> Self {
        let mut param = Self::at(index, label, field, value_type);
        param.varargs = true;
        param.required = false;
        param
    }

    /// Marks the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the default applied when the parameter is absent.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self.required = false;
        self
    }

    /// Constrains the token count of a varargs parameter.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Installs a custom converter.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Installs a post-conversion verifier.
    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Hides the parameter from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Re-owns the binding target to the named mixin.
    pub fn owned_by_mixin(mut self, mixin: &str) -> Self {
        self.field.owner = OwnerPath::Mixin(mixin.to_string());
        self
    }
}

/// A reusable bundle of option and parameter declarations merged into an
/// owning command's model during resolution.
///
/// # Examples
///
/// ```
/// use command_bind_core::{MixinSpec, OptionSpec, OwnerPath};
///
/// let logging = MixinSpec::new("logging")
///     .with_option(OptionSpec::flag(&["--debug"], "debug"));
/// assert_eq!(logging.options[0].field.owner, OwnerPath::Mixin("logging".into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MixinSpec {
    /// Mixin name; becomes the owner path of its fields.
    pub name: String,
    /// Options contributed by the mixin, in declaration order.
    pub options: Vec<OptionSpec>,
    /// Parameters contributed by the mixin.
    pub parameters: Vec<ParamSpec>,
}

impl MixinSpec {
    /// Creates an empty mixin bundle.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds an option, re-owned to this mixin.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        let name = self.name.clone();
        self.options.push(option.owned_by_mixin(&name));
        self
    }

    /// Adds a parameter, re-owned to this mixin.
    pub fn with_parameter(mut self, parameter: ParamSpec) -> Self {
        let name = self.name.clone();
        self.parameters.push(parameter.owned_by_mixin(&name));
        self
    }
}

/// The body a resolved command runs after binding.
///
/// Exactly two shapes exist: a unit body (implicit exit 0) and a body that
/// produces its own exit code. Both receive the bound field values and report
/// failures as messages, which the run driver prints as `Error: <message>`
/// with exit code 1.
#[derive(Clone)]
pub enum CommandAction {
    /// Produces no result; success maps to exit code 0.
    Run(Arc<dyn Fn(&BoundCommand) -> Result<(), String> + Send + Sync>),
    /// Produces an integer exit code.
    Exit(Arc<dyn Fn(&BoundCommand) -> Result<i32, String> + Send + Sync>),
}

impl CommandAction {
    /// Wraps a unit-returning body.
    pub fn run<F>(body: F) -> Self
    where
        F: Fn(&BoundCommand) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::Run(Arc::new(body))
    }

    /// Wraps an exit-code-returning body.
    pub fn exit<F>(body: F) -> Self
    where
        F: Fn(&BoundCommand) -> Result<i32, String> + Send + Sync + 'static,
    {
        Self::Exit(Arc::new(body))
    }

    /// Invokes the body, normalizing the unit shape to exit code 0.
    pub fn invoke(&self, bound: &BoundCommand) -> Result<i32, String> {
        match self {
            Self::Run(body) => body(bound).map(|()| 0),
            Self::Exit(body) => body(bound),
        }
    }
}

impl fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run(_) => f.write_str("CommandAction::Run"),
            Self::Exit(_) => f.write_str("CommandAction::Exit"),
        }
    }
}

/// A class-style subcommand: a nested command model with its own instance
/// per invocation.
#[derive(Debug, Clone)]
pub struct SubcommandRef {
    /// Canonical subcommand name.
    pub name: String,
    /// Description shown in the subcommand table.
    pub description: Option<String>,
    /// Hidden subcommands resolve normally but never render.
    pub hidden: bool,
    /// The nested command model.
    pub model: Arc<CommandModel>,
}

impl SubcommandRef {
    /// Creates a subcommand reference over a nested model.
    pub fn new(name: &str, model: CommandModel) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            hidden: false,
            model: Arc::new(model),
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Hides the subcommand from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// A method-style subcommand: a directly invocable handle with its own,
/// normally empty, parameter list.
#[derive(Debug, Clone)]
pub struct MethodSubcommandRef {
    /// Canonical subcommand name.
    pub name: String,
    /// Description shown in the subcommand table.
    pub description: Option<String>,
    /// Hidden methods resolve normally but never render.
    pub hidden: bool,
    /// Positional parameters consumed from the remaining tokens.
    pub parameters: Vec<ParamSpec>,
    /// The deferred invocation.
    pub action: CommandAction,
}

impl MethodSubcommandRef {
    /// Creates a method-style subcommand.
    pub fn new(name: &str, action: CommandAction) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            hidden: false,
            parameters: Vec::new(),
            action,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Adds a positional parameter.
    pub fn with_parameter(mut self, parameter: ParamSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Hides the method from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Complete model for one command.
///
/// This is the primary type of the crate: the full declarative description a
/// parse runs against. Assemble it with builder methods, then pass it through
/// [`resolve_model`](crate::resolve_model) to flatten mixins, validate names,
/// and produce the effective model used by the binder and renderer.
///
/// # Examples
///
/// ```
/// use command_bind_core::*;
///
/// let model = CommandModel::new("greet")
///     .with_description("Greets people.")
///     .with_option(
///         OptionSpec::scalar(&["-n", "--name"], "name", ValueType::Str)
///             .required()
///             .with_description("Who to greet"),
///     )
///     .with_option(
///         OptionSpec::scalar(&["-c", "--count"], "count", ValueType::Int)
///             .with_default("1"),
///     );
///
/// assert_eq!(model.name, "greet");
/// assert!(model.find_option("--name").is_some());
/// assert!(model.find_option("-c").is_some());
/// assert!(model.find_option("--missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandModel {
    /// Command name, the first display-path segment.
    pub name: String,
    /// Version string printed by `--version`.
    pub version: Option<String>,
    /// Description lines shown below the synopsis.
    pub description: Vec<String>,
    /// Header lines shown above the synopsis.
    pub header: Vec<String>,
    /// Footer lines shown after all tables.
    pub footer: Vec<String>,
    /// Custom synopsis lines replacing the generated one when non-empty.
    pub custom_synopsis: Vec<String>,
    /// Named options in declaration order.
    pub options: Vec<OptionSpec>,
    /// Positional parameters; sorted by index during resolution.
    pub parameters: Vec<ParamSpec>,
    /// Mixin bundles; flattened into `options`/`parameters` by resolution.
    pub mixins: Vec<MixinSpec>,
    /// Class-style subcommands in declaration order.
    pub subcommands: Vec<SubcommandRef>,
    /// Method-style subcommands in declaration order.
    pub methods: Vec<MethodSubcommandRef>,
    /// Whether the comma-delimited agent syntax is accepted.
    pub agent_mode: bool,
    /// Whether the standard `--help`/`--version` options are mixed in.
    /// Populated from configuration during resolution.
    pub standard_help: bool,
    /// The command body, if this command is directly runnable.
    pub action: Option<CommandAction>,
}

impl CommandModel {
    /// Creates an empty model with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the version string.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Appends a description line.
    pub fn with_description(mut self, line: &str) -> Self {
        self.description.push(line.to_string());
        self
    }

    /// Appends a header line.
    pub fn with_header(mut self, line: &str) -> Self {
        self.header.push(line.to_string());
        self
    }

    /// Appends a footer line.
    pub fn with_footer(mut self, line: &str) -> Self {
        self.footer.push(line.to_string());
        self
    }

    /// Appends a custom synopsis line, replacing the generated synopsis.
    pub fn with_synopsis(mut self, line: &str) -> Self {
        self.custom_synopsis.push(line.to_string());
        self
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a positional parameter.
    pub fn with_parameter(mut self, parameter: ParamSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a mixin bundle.
    pub fn with_mixin(mut self, mixin: MixinSpec) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// Adds a class-style subcommand.
    pub fn with_subcommand(mut self, subcommand: SubcommandRef) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Adds a method-style subcommand.
    pub fn with_method(mut self, method: MethodSubcommandRef) -> Self {
        self.methods.push(method);
        self
    }

    /// Enables the comma-delimited agent syntax for this command.
    pub fn agent_mode(mut self) -> Self {
        self.agent_mode = true;
        self
    }

    /// Sets the command body.
    pub fn with_action(mut self, action: CommandAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Finds an option by exact dashed name.
    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.matches(name))
    }

    /// Finds an option by dash-stripped bare name.
    pub fn find_option_bare(&self, bare: &str) -> Option<&OptionSpec> {
        self.options
            .iter()
            .find(|o| o.names.iter().any(|n| n.trim_start_matches('-') == bare))
    }

    /// Finds a class-style subcommand by name.
    pub fn find_subcommand(&self, name: &str) -> Option<&SubcommandRef> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Finds a method-style subcommand by name.
    pub fn find_method(&self, name: &str) -> Option<&MethodSubcommandRef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Returns `true` when any subcommand of either style exists.
    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty() || !self.methods.is_empty()
    }

    /// Effective version string: the model's, falling back to `fallback`.
    pub fn version_or<'a>(&'a self, fallback: Option<&'a str>) -> &'a str {
        self.version
            .as_deref()
            .or(fallback)
            .unwrap_or("")
    }
}

/// Field values produced by one successful bind.
///
/// Maps each [`FieldRef`] to its converted [`Value`]. Typed accessors look a
/// field up by name, preferring a command-owned field over mixin-owned ones.
///
/// # Examples
///
/// ```
/// use command_bind_core::{BoundCommand, FieldRef, Value};
///
/// let mut bound = BoundCommand::new();
/// bound.bind(FieldRef::command("verbose"), Value::Bool(true));
/// bound.bind(FieldRef::command("count"), Value::Int(3));
///
/// assert!(bound.flag("verbose"));
/// assert_eq!(bound.int_value("count"), Some(3));
/// assert!(!bound.flag("missing"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoundCommand {
    values: HashMap<FieldRef, Value>,
}

impl BoundCommand {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `field`, replacing any earlier binding.
    pub fn bind(&mut self, field: FieldRef, value: Value) {
        self.values.insert(field, value);
    }

    /// Looks a value up by exact field reference.
    pub fn get_field(&self, field: &FieldRef) -> Option<&Value> {
        self.values.get(field)
    }

    /// Looks a value up by field name, preferring command-owned fields.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .get(&FieldRef::command(name))
            .or_else(|| {
                self.values
                    .iter()
                    .find(|(field, _)| field.name == name)
                    .map(|(_, value)| value)
            })
    }

    /// Returns a boolean field, `false` when absent.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Bool(true)))
    }

    /// Returns a string field.
    pub fn str_value(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns an integer field.
    pub fn int_value(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Returns a float field.
    pub fn float_value(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(Value::Float(x)) => Some(*x),
            _ => None,
        }
    }

    /// Returns a list field.
    pub fn list(&self, name: &str) -> Option<&[Value]> {
        match self.get(name) {
            Some(Value::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` when the named field received a binding.
    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing was bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Renders the bound fields as a JSON object keyed by field path,
    /// deterministically ordered.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by_key(|(field, _)| field.to_string());
        for (field, value) in entries {
            map.insert(field.to_string(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}
