//! Token and literal syntax of the one SQL dialect the generator targets.
//!
//! String literals are double quoted with backslash escapes, pattern
//! matching uses `LIKE` with `\` as escape character, and epoch seconds are
//! converted with `FROM_UNIXTIME`.

use filter_syntax::{BinaryOperator, UnaryOperator};
use std::fmt::Display;

pub fn binary_token(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::And => "AND",
        BinaryOperator::Or => "OR",
        BinaryOperator::Equal => "==",
        BinaryOperator::NotEqual => "!=",
        BinaryOperator::LessThan => "<",
        BinaryOperator::LessOrEqual => "<=",
        BinaryOperator::GreaterThan => ">",
        BinaryOperator::GreaterOrEqual => ">=",
        BinaryOperator::Add => "+",
        BinaryOperator::Subtract => "-",
        BinaryOperator::Multiply => "*",
        BinaryOperator::Divide => "/",
        BinaryOperator::Modulo => "%",
    }
}

pub fn unary_token(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Not => "NOT",
        UnaryOperator::Negate => "-",
    }
}

/// Wraps `value` in double quotes, escaping `\` and `"`.
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Escapes the `LIKE` wildcards in `value` so it only matches itself.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Quoted pattern matching values that start with `prefix`.
pub fn prefix_pattern(prefix: &str) -> String {
    quote_string(&format!("{}%", escape_like(prefix)))
}

/// Quoted pattern matching values that end with `suffix`.
pub fn suffix_pattern(suffix: &str) -> String {
    quote_string(&format!("%{}", escape_like(suffix)))
}

pub fn from_unixtime(seconds: impl Display) -> String {
    format!("FROM_UNIXTIME({seconds})")
}
