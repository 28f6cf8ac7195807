//! Declarations of the expression language's standard functions.
//!
//! The table mirrors the standard library shipped with the language's
//! checker. The environment only exposes the allow-listed subset of it.

use crate::{
    decl::{FunctionDecl, OverloadDecl, Type},
    error::EnvError,
};
use filter_syntax::{BinaryOperator, UnaryOperator, functions};
use std::collections::HashSet;

const COMPARABLE: [(&str, Type); 8] = [
    ("bool", Type::Bool),
    ("int64", Type::Int),
    ("uint64", Type::Uint),
    ("double", Type::Double),
    ("string", Type::String),
    ("bytes", Type::Bytes),
    ("timestamp", Type::Timestamp),
    ("duration", Type::Duration),
];

const NUMERIC: [(&str, Type); 3] = [
    ("int64", Type::Int),
    ("uint64", Type::Uint),
    ("double", Type::Double),
];

/// Loads and validates the standard declaration table.
pub fn load() -> Result<Vec<FunctionDecl>, EnvError> {
    let decls = standard_functions();
    validate(&decls)?;
    Ok(decls)
}

/// Checks overload ids are unique across `decls` and that every member
/// overload declares its receiver.
pub fn validate(decls: &[FunctionDecl]) -> Result<(), EnvError> {
    let mut seen = HashSet::new();
    for decl in decls {
        for overload in &decl.overloads {
            validate_overload(&decl.name, overload)?;
            if !seen.insert(overload.id.as_str()) {
                return Err(EnvError::DuplicateOverload {
                    function: decl.name.clone(),
                    overload: overload.id.clone(),
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn validate_overload(function: &str, overload: &OverloadDecl) -> Result<(), EnvError> {
    if overload.id.is_empty() {
        return Err(EnvError::InvalidOverload {
            function: function.to_string(),
            overload: overload.id.clone(),
            message: "overload id must not be empty".to_string(),
        });
    }
    if overload.member && overload.params.is_empty() {
        return Err(EnvError::InvalidOverload {
            function: function.to_string(),
            overload: overload.id.clone(),
            message: "member overload must declare its receiver".to_string(),
        });
    }
    Ok(())
}

fn standard_functions() -> Vec<FunctionDecl> {
    use OverloadDecl as O;
    use Type::*;

    let a = || Type::param("A");
    let k = || Type::param("K");
    let v = || Type::param("V");

    let mut decls = vec![
        FunctionDecl::new(BinaryOperator::And.name())
            .overload(O::global("logical_and", vec![Bool, Bool], Bool)),
        FunctionDecl::new(BinaryOperator::Or.name())
            .overload(O::global("logical_or", vec![Bool, Bool], Bool)),
        FunctionDecl::new(UnaryOperator::Not.name())
            .overload(O::global("logical_not", vec![Bool], Bool)),
        FunctionDecl::new("_?_:_").overload(O::global("conditional", vec![Bool, a(), a()], a())),
        FunctionDecl::new(BinaryOperator::Equal.name())
            .overload(O::global("equals", vec![a(), a()], Bool)),
        FunctionDecl::new(BinaryOperator::NotEqual.name())
            .overload(O::global("not_equals", vec![a(), a()], Bool)),
    ];

    for (op, prefix) in [
        (BinaryOperator::LessThan, "less"),
        (BinaryOperator::LessOrEqual, "less_equals"),
        (BinaryOperator::GreaterThan, "greater"),
        (BinaryOperator::GreaterOrEqual, "greater_equals"),
    ] {
        let decl = COMPARABLE.iter().fold(FunctionDecl::new(op.name()), |decl, (suffix, ty)| {
            decl.overload(O::global(
                &format!("{prefix}_{suffix}"),
                vec![ty.clone(), ty.clone()],
                Bool,
            ))
        });
        decls.push(decl);
    }

    decls.push(
        numeric(BinaryOperator::Add.name(), "add", &NUMERIC)
            .overload(O::global("add_string", vec![String, String], String))
            .overload(O::global("add_bytes", vec![Bytes, Bytes], Bytes))
            .overload(O::global("add_list", vec![Type::list(a()), Type::list(a())], Type::list(a())))
            .overload(O::global("add_timestamp_duration", vec![Timestamp, Duration], Timestamp))
            .overload(O::global("add_duration_timestamp", vec![Duration, Timestamp], Timestamp))
            .overload(O::global("add_duration_duration", vec![Duration, Duration], Duration)),
    );
    decls.push(
        numeric(BinaryOperator::Subtract.name(), "subtract", &NUMERIC)
            .overload(O::global("subtract_timestamp_timestamp", vec![Timestamp, Timestamp], Duration))
            .overload(O::global("subtract_timestamp_duration", vec![Timestamp, Duration], Timestamp))
            .overload(O::global("subtract_duration_duration", vec![Duration, Duration], Duration)),
    );
    decls.push(numeric(BinaryOperator::Multiply.name(), "multiply", &NUMERIC));
    decls.push(numeric(BinaryOperator::Divide.name(), "divide", &NUMERIC));
    decls.push(numeric(BinaryOperator::Modulo.name(), "modulo", &NUMERIC[..2]));
    decls.push(
        FunctionDecl::new(UnaryOperator::Negate.name())
            .overload(O::global("negate_int64", vec![Int], Int))
            .overload(O::global("negate_double", vec![Double], Double)),
    );

    decls.push(
        FunctionDecl::new("_[_]")
            .overload(O::global("index_list", vec![Type::list(a()), Int], a()))
            .overload(O::global("index_map", vec![Type::map(k(), v()), k()], v())),
    );
    decls.push(
        FunctionDecl::new("@in")
            .overload(O::global("in_list", vec![a(), Type::list(a())], Bool))
            .overload(O::global("in_map", vec![k(), Type::map(k(), v())], Bool)),
    );
    decls.push(
        FunctionDecl::new("size")
            .overload(O::global("size_string", vec![String], Int))
            .overload(O::global("size_bytes", vec![Bytes], Int))
            .overload(O::global("size_list", vec![Type::list(a())], Int))
            .overload(O::global("size_map", vec![Type::map(k(), v())], Int))
            .overload(O::member("string_size", vec![String], Int))
            .overload(O::member("bytes_size", vec![Bytes], Int))
            .overload(O::member("list_size", vec![Type::list(a())], Int))
            .overload(O::member("map_size", vec![Type::map(k(), v())], Int)),
    );

    decls.push(
        FunctionDecl::new("contains")
            .overload(O::member("contains_string", vec![String, String], Bool)),
    );
    decls.push(
        FunctionDecl::new(functions::STARTS_WITH)
            .overload(O::member("starts_with_string", vec![String, String], Bool)),
    );
    decls.push(
        FunctionDecl::new(functions::ENDS_WITH)
            .overload(O::member("ends_with_string", vec![String, String], Bool)),
    );
    decls.push(
        FunctionDecl::new("matches")
            .overload(O::global("matches", vec![String, String], Bool))
            .overload(O::member("matches_string", vec![String, String], Bool)),
    );

    decls.push(
        FunctionDecl::new(functions::TIMESTAMP)
            .overload(O::global("string_to_timestamp", vec![String], Timestamp))
            .overload(O::global("int64_to_timestamp", vec![Int], Timestamp))
            .overload(O::global("timestamp_to_timestamp", vec![Timestamp], Timestamp)),
    );
    decls.push(
        FunctionDecl::new("duration")
            .overload(O::global("string_to_duration", vec![String], Duration))
            .overload(O::global("duration_to_duration", vec![Duration], Duration)),
    );
    decls.push(conversion(
        "int",
        ("int64", Int),
        &[("uint64", Uint), ("double", Double), ("string", String), ("timestamp", Timestamp)],
    ));
    decls.push(conversion("uint", ("uint64", Uint), &[("int64", Int), ("double", Double), ("string", String)]));
    decls.push(conversion("double", ("double", Double), &[("int64", Int), ("uint64", Uint), ("string", String)]));
    decls.push(conversion(
        "string",
        ("string", String),
        &[
            ("int64", Int),
            ("uint64", Uint),
            ("double", Double),
            ("bytes", Bytes),
            ("timestamp", Timestamp),
            ("duration", Duration),
        ],
    ));
    decls.push(conversion("bool", ("bool", Bool), &[("string", String)]));

    decls
}

fn numeric(name: &str, prefix: &str, types: &[(&str, Type)]) -> FunctionDecl {
    types.iter().fold(FunctionDecl::new(name), |decl, (suffix, ty)| {
        decl.overload(OverloadDecl::global(
            &format!("{prefix}_{suffix}"),
            vec![ty.clone(), ty.clone()],
            ty.clone(),
        ))
    })
}

fn conversion(name: &str, target: (&str, Type), sources: &[(&str, Type)]) -> FunctionDecl {
    let (target_name, target) = target;
    sources.iter().fold(FunctionDecl::new(name), |decl, (source, ty)| {
        decl.overload(OverloadDecl::global(
            &format!("{source}_to_{target_name}"),
            vec![ty.clone()],
            target.clone(),
        ))
    })
}
