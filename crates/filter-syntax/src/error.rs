use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Unsupported construct: {0}")]
    Unsupported(String),
}
