//! Parse error taxonomy.
//!
//! One uniform error type covers everything a parse attempt can report.
//! [`HelpRequested`](ParseError::HelpRequested) and
//! [`VersionRequested`](ParseError::VersionRequested) are control-flow
//! interrupts rather than failures; everything else is a usage error that
//! maps to exit code 2. All failures are terminal to the current parse
//! attempt and reported exactly once.

use thiserror::Error;

use crate::agent::AgentError;

/// Errors and interrupts produced while binding a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A help sentinel was seen; render help and stop.
    #[error("help requested")]
    HelpRequested,
    /// A version sentinel was seen; print the version and stop.
    #[error("version requested")]
    VersionRequested,
    /// A dash-prefixed token matched no declared option name.
    #[error("Unknown option: '{name}'")]
    UnknownOption {
        /// The unrecognized token, up to any `=`.
        name: String,
        /// Closest declared name, when the suggestion engine found one.
        suggestion: Option<String>,
    },
    /// A value-bearing option was last on the line with nothing to consume.
    #[error("Missing value for option: {name}")]
    MissingValue {
        /// Canonical name of the option.
        name: String,
    },
    /// A required option never appeared.
    #[error("Missing required option: {name}")]
    MissingRequiredOption {
        /// Canonical name of the option.
        name: String,
    },
    /// A required positional parameter never appeared.
    #[error("Missing required parameter: {label}")]
    MissingRequiredParameter {
        /// The parameter's display label.
        label: String,
    },
    /// Positional tokens remained after every parameter was satisfied.
    #[error("Too many parameters: '{first_extra}'")]
    TooManyParameters {
        /// The first unconsumed token.
        first_extra: String,
    },
    /// A raw value could not be converted to the field's type.
    #[error("Invalid value for {field}: {message}")]
    Conversion {
        /// Display name of the field, e.g. `option '--count'`.
        field: String,
        /// The raw token text.
        raw: String,
        /// The converter's message.
        message: String,
    },
    /// A converted value was rejected by the field's verifier.
    #[error("{message}")]
    Verification {
        /// The verifier's message.
        message: String,
    },
    /// The agent token string could not be translated.
    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl ParseError {
    /// Returns `true` for the help/version control-flow interrupts.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::HelpRequested | Self::VersionRequested)
    }

    /// Exit code for this outcome: the configured help code for help, `0`
    /// for version, `2` for every usage error.
    pub fn exit_code(&self, help_exit_code: i32) -> i32 {
        match self {
            Self::HelpRequested => help_exit_code,
            Self::VersionRequested => 0,
            _ => 2,
        }
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
