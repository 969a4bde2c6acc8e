//! Parser configuration surface.
//!
//! [`ParserConfig`] carries the recognized configuration options: standard
//! help mixing, default-value display, template strings, exit-code and
//! output-routing choices. It is YAML-serializable and can be loaded from a
//! settings file next to the application.
//!
//! # Example YAML
//!
//! ```yaml
//! mixin_standard_help_options: true
//! show_default_values_in_help: true
//! default_value_help_template: "(default: ${DEFAULT-VALUE})"
//! default_value_on_new_line: false
//! suggest_similar_options: true
//! similar_options_suggestion_template: "Did you mean '${SUGGESTION}'?"
//! help_exit_code: 0
//! usage_errors_to_stdout: false
//! empty_line_after_usage: false
//! empty_line_after_description: false
//! completion_candidates_separator: ", "
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder substituted with an option's rendered default value.
pub const DEFAULT_VALUE_PLACEHOLDER: &str = "${DEFAULT-VALUE}";
/// Placeholder substituted with the suggested option name.
pub const SUGGESTION_PLACEHOLDER: &str = "${SUGGESTION}";
/// Placeholder substituted with an enum field's candidate list.
pub const COMPLETION_CANDIDATES_PLACEHOLDER: &str = "${COMPLETION-CANDIDATES}";

/// Configuration errors: template validation and settings-file I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A template string is missing its mandatory placeholder.
    #[error("template '{template}' must contain {placeholder}")]
    InvalidTemplate {
        /// The offending template text.
        template: String,
        /// The placeholder the template must contain.
        placeholder: &'static str,
    },
    /// Settings file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Settings file parse or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The recognized parser configuration options.
///
/// # Examples
///
/// ```
/// use command_bind_core::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert!(config.mixin_standard_help_options);
/// assert_eq!(config.help_exit_code, 0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Mix the standard `--help`/`--version` options into every model.
    pub mixin_standard_help_options: bool,
    /// Globally permit default values in help descriptions.
    pub show_default_values_in_help: bool,
    /// Template appended to a description when a default is shown; must
    /// contain `${DEFAULT-VALUE}`.
    pub default_value_help_template: String,
    /// Render the default-value template on its own line instead of inline.
    pub default_value_on_new_line: bool,
    /// Version string used when a model declares none.
    pub version: Option<String>,
    /// Decorate unknown-option errors with a closest-match suggestion.
    pub suggest_similar_options: bool,
    /// Template for the suggestion line; must contain `${SUGGESTION}`.
    pub similar_options_suggestion_template: String,
    /// Exit code returned after rendering requested help.
    pub help_exit_code: i32,
    /// Route usage errors to stdout instead of stderr.
    pub usage_errors_to_stdout: bool,
    /// Print a blank line after the synopsis block.
    pub empty_line_after_usage: bool,
    /// Print a blank line after the description block.
    pub empty_line_after_description: bool,
    /// Separator between expanded `${COMPLETION-CANDIDATES}` entries.
    pub completion_candidates_separator: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            mixin_standard_help_options: true,
            show_default_values_in_help: true,
            default_value_help_template: format!("(default: {DEFAULT_VALUE_PLACEHOLDER})"),
            default_value_on_new_line: false,
            version: None,
            suggest_similar_options: true,
            similar_options_suggestion_template: format!("Did you mean '{SUGGESTION_PLACEHOLDER}'?"),
            help_exit_code: 0,
            usage_errors_to_stdout: false,
            empty_line_after_usage: false,
            empty_line_after_description: false,
            completion_candidates_separator: ", ".to_string(),
        }
    }
}

impl ParserConfig {
    /// Checks that the configured templates carry their placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTemplate`] naming the first template
    /// missing its placeholder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self
            .default_value_help_template
            .contains(DEFAULT_VALUE_PLACEHOLDER)
        {
            return Err(ConfigError::InvalidTemplate {
                template: self.default_value_help_template.clone(),
                placeholder: DEFAULT_VALUE_PLACEHOLDER,
            });
        }
        if !self
            .similar_options_suggestion_template
            .contains(SUGGESTION_PLACEHOLDER)
        {
            return Err(ConfigError::InvalidTemplate {
                template: self.similar_options_suggestion_template.clone(),
                placeholder: SUGGESTION_PLACEHOLDER,
            });
        }
        Ok(())
    }

    /// Loads configuration from a YAML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if parsing fails, or
    /// [`ConfigError::InvalidTemplate`] from validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written, or
    /// [`ConfigError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Renders the suggestion line for `suggestion`.
    pub fn suggestion_line(&self, suggestion: &str) -> String {
        self.similar_options_suggestion_template
            .replace(SUGGESTION_PLACEHOLDER, suggestion)
    }

    /// Renders the default-value template for `default`.
    pub fn default_value_line(&self, default: &str) -> String {
        self.default_value_help_template
            .replace(DEFAULT_VALUE_PLACEHOLDER, default)
    }
}
