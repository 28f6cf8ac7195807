pub mod build;
pub mod expr;
pub mod literal;
pub mod operator;
