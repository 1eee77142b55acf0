use thiserror::Error;

/// Failure raised while consuming a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// One or more mandatory items were not satisfied once the tokens ran out.
    ///
    /// `missing` holds the names of every unmet item in declaration order.
    #[error("missing arguments:{}", format_missing(.missing))]
    MissingArguments { missing: Vec<String> },

    /// A value-taking option got no value: either the tokens ended right
    /// after it, or a long option was written as `--name` instead of
    /// `--name=value`.
    #[error("missing value for option {option}")]
    MissingOptionValue { option: String },

    /// A flag-only option was written as `--name=value`.
    #[error("no value expected for option {option} ({token})")]
    UnexpectedOptionValue { option: String, token: String },

    /// A value-taking short option was not the last key of a combined token.
    #[error(
        "invalid token {token}: option {key} expects a value and must be the last key of the token"
    )]
    InvalidOptionFormat { token: String, key: char },

    /// The token could not be matched to any declared option, positional or command.
    #[error("unknown argument: {token}")]
    UnknownArgument { token: String },

    /// The caller passed no tokens, or an offset past the end of them.
    #[error("no tokens to parse")]
    EmptyInput,
}

impl ParseError {
    /// The offending token, for the kinds that carry one.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::UnexpectedOptionValue { token, .. }
            | Self::InvalidOptionFormat { token, .. }
            | Self::UnknownArgument { token } => Some(token.as_str()),
            _ => None,
        }
    }
}

fn format_missing(missing: &[String]) -> String {
    missing.iter().map(|name| format!(" <{name}>")).collect()
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Inconsistent declarations rejected by [`ParserBuilder::build`](crate::ParserBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("option key '-{0}' is declared more than once")]
    DuplicateKey(char),

    #[error("long option '--{0}' is declared more than once")]
    DuplicateLongKey(String),

    #[error("the bare '-' option is declared more than once")]
    DuplicateDash,

    #[error("long option key must not be blank")]
    EmptyLongKey,

    #[error("long option key '{0}' must not contain '='")]
    InvalidLongKey(String),

    #[error("positional argument '{0}' is declared more than once")]
    DuplicatePositional(String),

    #[error("command '{0}' is declared more than once")]
    DuplicateCommand(String),

    #[error("variadic arguments cannot be combined with named positional argument '{0}'")]
    MixedPositionalModes(String),
}
