use std::fmt;

/// Types used in function and variable declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Any value; used for the schema-less subject.
    Dyn,
    Null,
    Bool,
    Int,
    Uint,
    Double,
    String,
    Bytes,
    Timestamp,
    Duration,
    List(Box<Type>),
    Map(Box<Type>, Box<Type>),
    /// Type parameter of a generic overload, e.g. `A` in `_==_(A, A)`.
    Param(String),
}

impl Type {
    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn param(name: &str) -> Self {
        Type::Param(name.to_string())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Dyn => write!(f, "dyn"),
            Type::Null => write!(f, "null_type"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Uint => write!(f, "uint"),
            Type::Double => write!(f, "double"),
            Type::String => write!(f, "string"),
            Type::Bytes => write!(f, "bytes"),
            Type::Timestamp => write!(f, "google.protobuf.Timestamp"),
            Type::Duration => write!(f, "google.protobuf.Duration"),
            Type::List(elem) => write!(f, "list({elem})"),
            Type::Map(key, value) => write!(f, "map({key}, {value})"),
            Type::Param(name) => write!(f, "{name}"),
        }
    }
}

/// One signature of a function.
///
/// For member overloads the receiver is the first entry of `params`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadDecl {
    pub id: String,
    pub params: Vec<Type>,
    pub result: Type,
    pub member: bool,
}

impl OverloadDecl {
    pub fn global(id: &str, params: Vec<Type>, result: Type) -> Self {
        Self {
            id: id.to_string(),
            params,
            result,
            member: false,
        }
    }

    pub fn member(id: &str, params: Vec<Type>, result: Type) -> Self {
        Self {
            id: id.to_string(),
            params,
            result,
            member: true,
        }
    }

    /// Whether a call with `args` arguments (plus a receiver when `member`)
    /// could resolve to this overload.
    pub fn accepts(&self, args: usize, member: bool) -> bool {
        self.member == member && self.params.len() == args + usize::from(member)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub overloads: Vec<OverloadDecl>,
}

impl FunctionDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            overloads: Vec::new(),
        }
    }

    pub fn overload(mut self, overload: OverloadDecl) -> Self {
        self.overloads.push(overload);
        self
    }

    pub fn accepts(&self, args: usize, member: bool) -> bool {
        self.overloads.iter().any(|o| o.accepts(args, member))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub name: String,
    pub ty: Type,
}

impl VariableDecl {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// Standard macros a front end may expand while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    Has,
    All,
    Exists,
    ExistsOne,
    Map,
    Filter,
}

impl Macro {
    pub const STANDARD: [Macro; 6] = [
        Macro::Has,
        Macro::All,
        Macro::Exists,
        Macro::ExistsOne,
        Macro::Map,
        Macro::Filter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Macro::Has => "has",
            Macro::All => "all",
            Macro::Exists => "exists",
            Macro::ExistsOne => "exists_one",
            Macro::Map => "map",
            Macro::Filter => "filter",
        }
    }

    /// `has` is a global call; the rest are receiver-style comprehensions.
    pub fn is_member(&self) -> bool {
        !matches!(self, Macro::Has)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_overload_counts_receiver() {
        let starts_with = OverloadDecl::member(
            "starts_with_string",
            vec![Type::String, Type::String],
            Type::Bool,
        );
        assert!(starts_with.accepts(1, true));
        assert!(!starts_with.accepts(2, false));
        assert!(!starts_with.accepts(1, false));
    }

    #[test]
    fn test_type_display() {
        assert_eq!(Type::map(Type::String, Type::list(Type::Int)).to_string(), "map(string, list(int))");
        assert_eq!(Type::param("A").to_string(), "A");
    }
}
