//! Allow-list environment for filter expressions.
//!
//! The environment tells an external parser/checker which variables,
//! functions and macros a filter may use, so that every checked tree can be
//! rendered to SQL.

pub mod check;
pub mod decl;
pub mod env;
pub mod error;
pub mod stdlib;

pub use decl::{FunctionDecl, Macro, OverloadDecl, Type, VariableDecl};
pub use env::{DEFAULT_SUBJECT, Env, EnvBuilder, default_allow_list, standard_env};
pub use error::{CheckError, EnvError};
