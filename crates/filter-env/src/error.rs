use thiserror::Error;

/// Failures while assembling an environment.
///
/// Cloneable so a cached build failure can be handed to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("Duplicate overload '{overload}' for function '{function}'")]
    DuplicateOverload { function: String, overload: String },

    #[error("Invalid overload '{overload}' for function '{function}': {message}")]
    InvalidOverload {
        function: String,
        overload: String,
        message: String,
    },

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Duplicate variable: {0}")]
    DuplicateVariable(String),
}

/// Failures reported by [`crate::Env::check`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("Undeclared reference: {0}")]
    UndeclaredReference(String),

    #[error("Undeclared function: {0}")]
    UndeclaredFunction(String),

    #[error("No matching overload for '{function}' with {args} argument(s), member call: {member}")]
    NoMatchingOverload {
        function: String,
        args: usize,
        member: bool,
    },
}
