//! Builds expression trees from filter text.
//!
//! Text is parsed by `cel-parser`; its syntax tree is lowered into [`Expr`],
//! with operators turned into calls of their internal names (`_&&_`, `-_`).

use crate::{
    ast::{
        build::{binary, call, unary},
        expr::{Call, Expr},
        literal::Value,
        operator::{BinaryOperator, UnaryOperator},
    },
    error::ParseError,
};
use cel_parser::{ArithmeticOp, Atom, Expression, Member, RelationOp, UnaryOp};

pub type ParseResult<T> = Result<T, ParseError>;

const CONDITIONAL: &str = "_?_:_";
const IN: &str = "@in";
const INDEX: &str = "_[_]";

/// Parse filter text into an expression tree.
pub fn parse(input: &str) -> ParseResult<Expr> {
    let expression =
        cel_parser::parse(input).map_err(|e| ParseError::Syntax(e.to_string()))?;
    build_expr(&expression)
}

fn build_expr(expression: &Expression) -> ParseResult<Expr> {
    match expression {
        Expression::Atom(atom) => build_atom(atom).map(Expr::Literal),
        Expression::Ident(name) => Ok(Expr::Ident(name.to_string())),
        Expression::Member(operand, member) => build_member(operand, member),
        Expression::FunctionCall(function, target, args) => {
            build_call(function, target.as_deref(), args)
        }
        Expression::Arithmetic(left, op, right) => Ok(binary(
            arithmetic_operator(op),
            build_expr(left)?,
            build_expr(right)?,
        )),
        Expression::Relation(left, op, right) => {
            let (left, right) = (build_expr(left)?, build_expr(right)?);
            Ok(match relation_operator(op) {
                Some(op) => binary(op, left, right),
                None => call(IN, vec![left, right]),
            })
        }
        Expression::And(left, right) => Ok(binary(
            BinaryOperator::And,
            build_expr(left)?,
            build_expr(right)?,
        )),
        Expression::Or(left, right) => Ok(binary(
            BinaryOperator::Or,
            build_expr(left)?,
            build_expr(right)?,
        )),
        Expression::Unary(op, operand) => build_unary(op, build_expr(operand)?),
        Expression::Ternary(cond, then, otherwise) => Ok(call(
            CONDITIONAL,
            vec![build_expr(cond)?, build_expr(then)?, build_expr(otherwise)?],
        )),
        Expression::List(items) => items
            .iter()
            .map(build_expr)
            .collect::<ParseResult<Vec<_>>>()
            .map(Expr::List),
        Expression::Map(_) => Err(ParseError::Unsupported("map literal".to_string())),
    }
}

fn build_atom(atom: &Atom) -> ParseResult<Value> {
    Ok(match atom {
        Atom::Null => Value::Null,
        Atom::Bool(b) => Value::Bool(*b),
        Atom::Int(i) => Value::Int(*i),
        Atom::UInt(u) => Value::Uint(*u),
        Atom::Float(f) => Value::Double(*f),
        Atom::String(s) => Value::String(s.to_string()),
        Atom::Bytes(_) => return Err(ParseError::Unsupported("bytes literal".to_string())),
    })
}

fn build_member(operand: &Expression, member: &Member) -> ParseResult<Expr> {
    let operand = build_expr(operand)?;
    match member {
        Member::Attribute(field) => Ok(operand.select(field)),
        Member::Index(index) => Ok(call(INDEX, vec![operand, build_expr(index)?])),
        Member::Fields(_) => Err(ParseError::Unsupported("message construction".to_string())),
    }
}

fn build_call(
    function: &Expression,
    target: Option<&Expression>,
    args: &[Expression],
) -> ParseResult<Expr> {
    let Expression::Ident(name) = function else {
        return Err(ParseError::Unsupported(
            "call of a computed function".to_string(),
        ));
    };

    Ok(Expr::Call(Call {
        function: name.to_string(),
        target: target.map(build_expr).transpose()?.map(Box::new),
        args: args.iter().map(build_expr).collect::<ParseResult<_>>()?,
    }))
}

/// Negative number literals are folded into the literal.
fn build_unary(op: &UnaryOp, operand: Expr) -> ParseResult<Expr> {
    Ok(match op {
        UnaryOp::Not => unary(UnaryOperator::Not, operand),
        UnaryOp::DoubleNot => unary(UnaryOperator::Not, unary(UnaryOperator::Not, operand)),
        UnaryOp::Minus => match operand {
            Expr::Literal(Value::Int(i)) if i.checked_neg().is_some() => {
                Expr::Literal(Value::Int(-i))
            }
            Expr::Literal(Value::Double(f)) => Expr::Literal(Value::Double(-f)),
            operand => unary(UnaryOperator::Negate, operand),
        },
        UnaryOp::DoubleMinus => unary(
            UnaryOperator::Negate,
            unary(UnaryOperator::Negate, operand),
        ),
    })
}

fn arithmetic_operator(op: &ArithmeticOp) -> BinaryOperator {
    match op {
        ArithmeticOp::Add => BinaryOperator::Add,
        ArithmeticOp::Subtract => BinaryOperator::Subtract,
        ArithmeticOp::Multiply => BinaryOperator::Multiply,
        ArithmeticOp::Divide => BinaryOperator::Divide,
        ArithmeticOp::Modulus => BinaryOperator::Modulo,
    }
}

/// `None` for `in`, which has no operator form.
fn relation_operator(op: &RelationOp) -> Option<BinaryOperator> {
    Some(match op {
        RelationOp::Equals => BinaryOperator::Equal,
        RelationOp::NotEquals => BinaryOperator::NotEqual,
        RelationOp::LessThan => BinaryOperator::LessThan,
        RelationOp::LessThanEq => BinaryOperator::LessOrEqual,
        RelationOp::GreaterThan => BinaryOperator::GreaterThan,
        RelationOp::GreaterThanEq => BinaryOperator::GreaterOrEqual,
        RelationOp::In => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::{ident, lit};

    fn field(name: &str) -> Expr {
        ident("i").select(name)
    }

    #[test]
    fn test_parse_comparison() {
        assert_eq!(
            parse(r#"i.name == "j2gg0s""#).unwrap(),
            binary(BinaryOperator::Equal, field("name"), lit("j2gg0s"))
        );
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(
            parse("i.age + 10 < 28").unwrap(),
            binary(
                BinaryOperator::LessThan,
                binary(BinaryOperator::Add, field("age"), lit(10)),
                lit(28),
            )
        );

        assert_eq!(
            parse(r#"i.name == "j" && (i.age > 18 || i.city == "Shanghai")"#).unwrap(),
            binary(
                BinaryOperator::And,
                binary(BinaryOperator::Equal, field("name"), lit("j")),
                binary(
                    BinaryOperator::Or,
                    binary(BinaryOperator::GreaterThan, field("age"), lit(18)),
                    binary(BinaryOperator::Equal, field("city"), lit("Shanghai")),
                ),
            )
        );
    }

    #[test]
    fn test_parse_negation() {
        assert_eq!(
            parse("-i.age > -18").unwrap(),
            binary(
                BinaryOperator::GreaterThan,
                unary(UnaryOperator::Negate, field("age")),
                lit(-18),
            )
        );
        assert_eq!(
            parse("!i.joined").unwrap(),
            unary(UnaryOperator::Not, field("joined"))
        );
    }

    #[test]
    fn test_parse_method_and_global_calls() {
        assert_eq!(
            parse(r#"i.name.startsWith("j")"#).unwrap(),
            field("name").method("startsWith", vec![lit("j")])
        );
        assert_eq!(
            parse("timestamp(1704067200)").unwrap(),
            call("timestamp", vec![lit(1704067200)])
        );
    }

    #[test]
    fn test_parse_nested_select() {
        assert_eq!(
            parse("i.profile.age").unwrap(),
            ident("i").select("profile").select("age")
        );
    }

    #[test]
    fn test_parse_in_and_index() {
        assert_eq!(
            parse("i.city in [\"a\", \"b\"]").unwrap(),
            call(IN, vec![field("city"), Expr::List(vec![lit("a"), lit("b")])])
        );
        assert_eq!(
            parse("i.tags[0]").unwrap(),
            call(INDEX, vec![field("tags"), lit(0)])
        );
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(parse("i.age >"), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn test_map_literal_unsupported() {
        assert_eq!(
            parse(r#"{"a": 1}"#),
            Err(ParseError::Unsupported("map literal".to_string()))
        );
    }
}
