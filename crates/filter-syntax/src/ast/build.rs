//! Constructors for assembling trees by hand, mostly useful to front ends
//! and tests.

use crate::ast::{
    expr::{Call, Expr},
    literal::Value,
    operator::{BinaryOperator, UnaryOperator},
};

pub fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// Global function call, e.g. `timestamp(...)`.
pub fn call(function: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(Call {
        function: function.to_string(),
        target: None,
        args,
    })
}

pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
    call(op.name(), vec![left, right])
}

pub fn unary(op: UnaryOperator, operand: Expr) -> Expr {
    call(op.name(), vec![operand])
}

impl Expr {
    pub fn select(self, field: &str) -> Expr {
        Expr::Select {
            operand: Box::new(self),
            field: field.to_string(),
        }
    }

    /// Method-style call with `self` as receiver.
    pub fn method(self, function: &str, args: Vec<Expr>) -> Expr {
        Expr::Call(Call {
            function: function.to_string(),
            target: Some(Box::new(self)),
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_chain_nests_leaf_outermost() {
        let expr = ident("i").select("profile").select("age");
        match expr {
            Expr::Select { operand, field } => {
                assert_eq!(field, "age");
                assert_eq!(*operand, ident("i").select("profile"));
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_binary_uses_operator_name() {
        let expr = binary(BinaryOperator::Add, lit(1), lit(2));
        let Expr::Call(call) = expr else {
            panic!("expected call");
        };
        assert_eq!(call.function, "_+_");
        assert!(call.target.is_none());
        assert_eq!(call.args.len(), 2);
    }
}
