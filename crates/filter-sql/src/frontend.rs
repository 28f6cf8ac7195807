//! Turning filter text into a checked expression tree.

use filter_env::Env;
use filter_syntax::{Expr, parse};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to compile filter `{text}`: {message}")]
pub struct CompileError {
    pub text: String,
    pub message: String,
}

impl CompileError {
    pub fn new(text: &str, message: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            message: message.into(),
        }
    }
}

/// Parses and checks filter text against an environment.
pub trait Frontend {
    fn compile(&self, env: &Env, text: &str) -> Result<Expr, CompileError>;
}

impl<F> Frontend for F
where
    F: Fn(&Env, &str) -> Result<Expr, CompileError>,
{
    fn compile(&self, env: &Env, text: &str) -> Result<Expr, CompileError> {
        self(env, text)
    }
}

/// Parses CEL text and checks the tree against the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct CelFrontend;

impl Frontend for CelFrontend {
    fn compile(&self, env: &Env, text: &str) -> Result<Expr, CompileError> {
        let expr = parse(text).map_err(|e| CompileError::new(text, e.to_string()))?;
        env.check(&expr)
            .map_err(|e| CompileError::new(text, e.to_string()))?;
        Ok(expr)
    }
}
