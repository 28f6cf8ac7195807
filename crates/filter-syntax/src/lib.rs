//! Expression tree consumed by the SQL generator.
//!
//! Trees come from [`parse`], which reads CEL filter text, or are built
//! directly (or deserialized) by callers with their own front end.

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::{
    build::{binary, call, ident, lit, unary},
    expr::{Call, Expr},
    literal::Value,
    operator::{BinaryOperator, UnaryOperator, functions},
};
pub use error::ParseError;
pub use parser::{ParseResult, parse};
