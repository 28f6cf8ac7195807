//! Renders checked filter expressions as SQL `WHERE` fragments.
//!
//! ```ignore
//! use filter_sql::Converter;
//! use filter_syntax::{BinaryOperator, binary, ident, lit};
//!
//! let converter = Converter::builder().with_sql_name("age", "user_age").build()?;
//! let expr = binary(BinaryOperator::GreaterThan, ident("i").select("age"), lit(18));
//! assert_eq!(converter.generate(&expr)?, "(user_age > 18)");
//! assert_eq!(converter.convert("i.age > 18")?, "(user_age > 18)");
//! ```

pub mod config;
pub mod converter;
pub mod dialect;
pub mod error;
pub mod frontend;
pub mod renderer;

pub use config::{DEFAULT_TIME_FORMAT, GeneratorConfig};
pub use converter::{
    Converter, ConverterBuilder, convert, convert_with, default_converter, generate,
};
pub use error::{ConfigError, FilterError, GenerateError};
pub use frontend::{CelFrontend, CompileError, Frontend};
