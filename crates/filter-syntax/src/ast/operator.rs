use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the non-operator functions the generator understands.
pub mod functions {
    pub const STARTS_WITH: &str = "startsWith";
    pub const ENDS_WITH: &str = "endsWith";
    pub const TIMESTAMP: &str = "timestamp";
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 13] = [
        BinaryOperator::Add,
        BinaryOperator::Subtract,
        BinaryOperator::Multiply,
        BinaryOperator::Divide,
        BinaryOperator::Modulo,
        BinaryOperator::Equal,
        BinaryOperator::NotEqual,
        BinaryOperator::GreaterThan,
        BinaryOperator::LessThan,
        BinaryOperator::GreaterOrEqual,
        BinaryOperator::LessOrEqual,
        BinaryOperator::And,
        BinaryOperator::Or,
    ];

    /// Function name used for this operator in call nodes, e.g. `_&&_`.
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "_+_",
            BinaryOperator::Subtract => "_-_",
            BinaryOperator::Multiply => "_*_",
            BinaryOperator::Divide => "_/_",
            BinaryOperator::Modulo => "_%_",
            BinaryOperator::Equal => "_==_",
            BinaryOperator::NotEqual => "_!=_",
            BinaryOperator::GreaterThan => "_>_",
            BinaryOperator::LessThan => "_<_",
            BinaryOperator::GreaterOrEqual => "_>=_",
            BinaryOperator::LessOrEqual => "_<=_",
            BinaryOperator::And => "_&&_",
            BinaryOperator::Or => "_||_",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
            BinaryOperator::Modulo => write!(f, "%"),
            BinaryOperator::Equal => write!(f, "=="),
            BinaryOperator::NotEqual => write!(f, "!="),
            BinaryOperator::GreaterThan => write!(f, ">"),
            BinaryOperator::LessThan => write!(f, "<"),
            BinaryOperator::GreaterOrEqual => write!(f, ">="),
            BinaryOperator::LessOrEqual => write!(f, "<="),
            BinaryOperator::And => write!(f, "&&"),
            BinaryOperator::Or => write!(f, "||"),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
}

impl UnaryOperator {
    pub const ALL: [UnaryOperator; 2] = [UnaryOperator::Not, UnaryOperator::Negate];

    pub fn name(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!_",
            UnaryOperator::Negate => "-_",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "!"),
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}
