use crate::frontend::CompileError;
use filter_env::EnvError;
use thiserror::Error;

/// Errors raised while rendering a tree. None of them are recoverable for
/// the current expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("Unsupported expression kind: {0}")]
    UnsupportedNodeKind(String),

    #[error("Expected identifier `{expected}`, found `{found}`")]
    InvalidSubject { expected: String, found: String },

    #[error("Unsupported function `{0}`")]
    UnsupportedFunction(String),

    #[error("Expected a literal argument in `{function}`, found `{found}`")]
    LiteralRequired { function: String, found: String },

    #[error("Invalid timestamp `{value}`: {message}")]
    InvalidTimestamp { value: String, message: String },

    #[error("Unsupported {type_name} literal in `{function}`")]
    UnsupportedTimestampLiteral { function: String, type_name: String },

    #[error("Invalid arguments for `{function}`: {message}")]
    InvalidArguments { function: String, message: String },

    #[error("Failed to format timestamp with `{0}`")]
    Format(String),
}

/// Errors raised while building a converter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Invalid time zone: {0}")]
    InvalidTimeZone(String),

    #[error("Subject prefix must not be empty")]
    EmptyPrefix,
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}
