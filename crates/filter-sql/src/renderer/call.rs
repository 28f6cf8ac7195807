use crate::{
    dialect,
    error::GenerateError,
    renderer::{Render, Renderer},
};
use chrono::{DateTime, FixedOffset, SubsecRound};
use filter_syntax::{BinaryOperator, Call, Expr, UnaryOperator, Value, functions};
use std::fmt::Write;

/// Every function the generator knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Binary(BinaryOperator),
    Unary(UnaryOperator),
    StartsWith,
    EndsWith,
    Timestamp,
}

impl Function {
    fn resolve(name: &str) -> Option<Self> {
        if let Some(op) = BinaryOperator::from_name(name) {
            return Some(Function::Binary(op));
        }
        if let Some(op) = UnaryOperator::from_name(name) {
            return Some(Function::Unary(op));
        }
        match name {
            functions::STARTS_WITH => Some(Function::StartsWith),
            functions::ENDS_WITH => Some(Function::EndsWith),
            functions::TIMESTAMP => Some(Function::Timestamp),
            _ => None,
        }
    }
}

impl Render for Call {
    fn render(&self, r: &mut Renderer) -> Result<(), GenerateError> {
        let function = Function::resolve(&self.function)
            .filter(|_| r.config.is_enabled(&self.function))
            .ok_or_else(|| GenerateError::UnsupportedFunction(self.function.clone()))?;

        match function {
            Function::Binary(op) => {
                let [left, right] = global_args(self)?;
                r.parenthesized(|r| {
                    left.render(r)?;
                    r.sql.push(' ');
                    r.sql.push_str(dialect::binary_token(op));
                    r.sql.push(' ');
                    right.render(r)
                })
            }
            Function::Unary(op) => {
                let [operand] = global_args(self)?;
                r.parenthesized(|r| {
                    r.sql.push_str(dialect::unary_token(op));
                    r.sql.push(' ');
                    operand.render(r)
                })
            }
            Function::StartsWith | Function::EndsWith => {
                let (target, [pattern]) = member_args(self)?;
                let value = string_literal(self, pattern)?;
                let pattern = match function {
                    Function::StartsWith => dialect::prefix_pattern(value),
                    _ => dialect::suffix_pattern(value),
                };
                r.parenthesized(|r| {
                    target.render(r)?;
                    r.sql.push_str(" LIKE ");
                    r.sql.push_str(&pattern);
                    Ok(())
                })
            }
            Function::Timestamp => {
                let [arg] = global_args(self)?;
                render_timestamp(self, arg, r)
            }
        }
    }
}

fn render_timestamp(call: &Call, arg: &Expr, r: &mut Renderer) -> Result<(), GenerateError> {
    let value = arg.as_literal().ok_or_else(|| literal_required(call, arg))?;
    match value {
        Value::String(text) => {
            let ts = parse_rfc3339(text)?;
            let local = ts.with_timezone(&r.config.time_zone()).trunc_subsecs(3);

            let mut formatted = String::new();
            write!(formatted, "{}", local.format(r.config.time_format()))
                .map_err(|_| GenerateError::Format(r.config.time_format().to_string()))?;
            r.sql.push_str(&dialect::quote_string(&formatted));
        }
        Value::Int(seconds) => r.sql.push_str(&dialect::from_unixtime(seconds)),
        Value::Uint(seconds) => r.sql.push_str(&dialect::from_unixtime(seconds)),
        other => {
            return Err(GenerateError::UnsupportedTimestampLiteral {
                function: call.function.clone(),
                type_name: other.type_name().to_string(),
            });
        }
    }
    Ok(())
}

/// chrono also accepts a space between date and time; RFC 3339 requires `T`.
fn parse_rfc3339(text: &str) -> Result<DateTime<FixedOffset>, GenerateError> {
    let invalid = |message: String| GenerateError::InvalidTimestamp {
        value: text.to_string(),
        message,
    };
    if !matches!(text.as_bytes().get(10), Some(b'T' | b't')) {
        return Err(invalid("date and time must be separated by `T`".to_string()));
    }
    DateTime::parse_from_rfc3339(text).map_err(|e| invalid(e.to_string()))
}

/// Arguments of a global call (or operator), which must number exactly `N`.
fn global_args<const N: usize>(call: &Call) -> Result<&[Expr; N], GenerateError> {
    if call.target.is_some() {
        return Err(invalid_arguments(call, "unexpected receiver".to_string()));
    }
    fixed_args(call)
}

/// Receiver and arguments of a method-style call.
fn member_args<const N: usize>(call: &Call) -> Result<(&Expr, &[Expr; N]), GenerateError> {
    let target = call
        .target
        .as_deref()
        .ok_or_else(|| invalid_arguments(call, "missing receiver".to_string()))?;
    Ok((target, fixed_args(call)?))
}

fn fixed_args<const N: usize>(call: &Call) -> Result<&[Expr; N], GenerateError> {
    <&[Expr; N]>::try_from(call.args.as_slice()).map_err(|_| {
        invalid_arguments(
            call,
            format!("expected {N} argument(s), got {}", call.args.len()),
        )
    })
}

fn string_literal<'e>(call: &Call, arg: &'e Expr) -> Result<&'e str, GenerateError> {
    match arg {
        Expr::Literal(Value::String(s)) => Ok(s.trim_matches('"')),
        Expr::Literal(other) => Err(invalid_arguments(
            call,
            format!("expected a string literal, got {}", other.type_name()),
        )),
        _ => Err(literal_required(call, arg)),
    }
}

fn literal_required(call: &Call, arg: &Expr) -> GenerateError {
    GenerateError::LiteralRequired {
        function: call.function.clone(),
        found: arg.to_string(),
    }
}

fn invalid_arguments(call: &Call, message: String) -> GenerateError {
    GenerateError::InvalidArguments {
        function: call.function.clone(),
        message,
    }
}
