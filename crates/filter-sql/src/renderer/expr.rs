use crate::{
    dialect,
    error::GenerateError,
    renderer::{Render, Renderer},
};
use filter_syntax::{Expr, Value};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) -> Result<(), GenerateError> {
        match self {
            Expr::Literal(value) => value.render(r),
            Expr::Select { .. } => {
                let path = field_path(self, r.config.prefix())?;
                r.sql.push_str(r.config.column(&path));
                Ok(())
            }
            Expr::Call(call) => call.render(r),
            Expr::Ident(name) => Err(GenerateError::UnsupportedNodeKind(format!("ident `{name}`"))),
            Expr::List(_) => Err(GenerateError::UnsupportedNodeKind("list".to_string())),
        }
    }
}

impl Render for Value {
    fn render(&self, r: &mut Renderer) -> Result<(), GenerateError> {
        match self {
            Value::Double(d) if !d.is_finite() => {
                return Err(GenerateError::UnsupportedNodeKind(format!(
                    "non-finite double `{d}`"
                )));
            }
            Value::String(s) => r.sql.push_str(&dialect::quote_string(s)),
            Value::Null => r.sql.push_str("NULL"),
            Value::Bool(b) => r.sql.push_str(&b.to_string()),
            Value::Int(i) => r.sql.push_str(&i.to_string()),
            Value::Uint(u) => r.sql.push_str(&u.to_string()),
            Value::Double(d) => r.sql.push_str(&d.to_string()),
        }
        Ok(())
    }
}

/// Dotted path of a field access chain rooted at `prefix`, root first:
/// `i.profile.age` yields `profile.age`.
pub(crate) fn field_path(expr: &Expr, prefix: &str) -> Result<String, GenerateError> {
    let mut segments = Vec::new();
    let mut node = expr;
    while let Expr::Select { operand, field } = node {
        segments.push(field.as_str());
        node = operand;
    }

    match node {
        Expr::Ident(name) if name == prefix => {}
        Expr::Ident(name) => {
            return Err(GenerateError::InvalidSubject {
                expected: prefix.to_string(),
                found: name.clone(),
            });
        }
        other => {
            return Err(GenerateError::InvalidSubject {
                expected: prefix.to_string(),
                found: other.to_string(),
            });
        }
    }

    segments.reverse();
    Ok(segments.join("."))
}
