use crate::ast::{
    literal::Value,
    operator::{BinaryOperator, UnaryOperator},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression node of an already checked filter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Literal(Value),
    Ident(String),
    /// Field access, `operand.field`.
    Select {
        operand: Box<Expr>,
        field: String,
    },
    Call(Call),
    List(Vec<Expr>),
}

/// Function or operator application. Method-style calls such as
/// `i.name.startsWith("j")` carry their receiver in `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub function: String,
    #[serde(default)]
    pub target: Option<Box<Expr>>,
    #[serde(default)]
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::Ident(_) => "ident",
            Expr::Select { .. } => "select",
            Expr::Call(_) => "call",
            Expr::List(_) => "list",
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Expr::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Ident(name) => write!(f, "{name}"),
            Expr::Select { operand, field } => write!(f, "{operand}.{field}"),
            Expr::Call(call) => write!(f, "{call}"),
            Expr::List(elements) => {
                write!(f, "[")?;
                write_joined(f, elements)?;
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.target.is_none() {
            if let (Some(op), [left, right]) =
                (BinaryOperator::from_name(&self.function), self.args.as_slice())
            {
                return write!(f, "({left} {op} {right})");
            }
            if let (Some(op), [operand]) =
                (UnaryOperator::from_name(&self.function), self.args.as_slice())
            {
                return write!(f, "{op}{operand}");
            }
        }

        if let Some(target) = &self.target {
            write!(f, "{target}.")?;
        }
        write!(f, "{}(", self.function)?;
        write_joined(f, &self.args)?;
        write!(f, ")")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{expr}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::ast::build::{binary, call, ident, lit, unary};
    use crate::ast::operator::{BinaryOperator, UnaryOperator};

    #[test]
    fn test_expression_display() {
        let expr = binary(
            BinaryOperator::And,
            binary(BinaryOperator::Equal, ident("i").select("name"), lit("j2gg0s")),
            unary(UnaryOperator::Not, ident("i").select("joined")),
        );
        assert_eq!(expr.to_string(), r#"((i.name == "j2gg0s") && !i.joined)"#);

        let expr = ident("i").select("name").method("startsWith", vec![lit("j")]);
        assert_eq!(expr.to_string(), r#"i.name.startsWith("j")"#);

        let expr = call("timestamp", vec![lit(1704067200)]);
        assert_eq!(expr.to_string(), "timestamp(1704067200)");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ident("i").kind_name(), "ident");
        assert_eq!(ident("i").select("a").kind_name(), "select");
        assert_eq!(lit(1).kind_name(), "literal");
        assert_eq!(call("size", vec![]).kind_name(), "call");
    }
}
