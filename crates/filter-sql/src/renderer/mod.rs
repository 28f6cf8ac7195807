//! Defines the rendering trait and context for converting trees to SQL.

use crate::{config::GeneratorConfig, error::GenerateError};

pub mod call;
pub mod expr;

/// A trait for any tree node that can be rendered into a SQL fragment.
pub trait Render {
    fn render(&self, renderer: &mut Renderer) -> Result<(), GenerateError>;
}

/// Holds the state during rendering: the SQL accumulated so far and the
/// configuration driving field names and timestamps.
pub struct Renderer<'a> {
    pub sql: String,
    pub config: &'a GeneratorConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            sql: String::new(),
            config,
        }
    }

    /// Consumes the renderer and returns the final SQL fragment.
    pub fn finish(self) -> String {
        self.sql
    }

    /// Renders `inner` between a pair of parentheses.
    pub fn parenthesized<F>(&mut self, inner: F) -> Result<(), GenerateError>
    where
        F: FnOnce(&mut Self) -> Result<(), GenerateError>,
    {
        self.sql.push('(');
        inner(self)?;
        self.sql.push(')');
        Ok(())
    }
}
