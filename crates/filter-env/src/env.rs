use crate::{
    decl::{FunctionDecl, Macro, Type, VariableDecl},
    error::EnvError,
    stdlib,
};
use filter_syntax::{BinaryOperator, UnaryOperator, functions};
use lazy_static::lazy_static;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};
use tracing::{debug, info, warn};

/// Root identifier every field access goes through, as in `i.name`.
pub const DEFAULT_SUBJECT: &str = "i";

lazy_static! {
    static ref STANDARD_ENV: Result<Arc<Env>, EnvError> = {
        info!("Building standard filter environment");
        EnvBuilder::new().build().map(Arc::new)
    };
}

/// The default environment, built on first use and shared afterwards.
///
/// Only one build is ever attempted; a failure is cached and returned to
/// every caller.
pub fn standard_env() -> Result<Arc<Env>, EnvError> {
    STANDARD_ENV.clone()
}

/// Operators and functions a filter may use unless configured otherwise.
pub fn default_allow_list() -> BTreeSet<String> {
    BinaryOperator::ALL
        .iter()
        .map(|op| op.name())
        .chain(UnaryOperator::ALL.iter().map(|op| op.name()))
        .chain([functions::STARTS_WITH, functions::ENDS_WITH, functions::TIMESTAMP])
        .map(str::to_string)
        .collect()
}

/// Checking environment handed to the external parser/checker.
#[derive(Debug, Clone)]
pub struct Env {
    subject: String,
    variables: BTreeMap<String, Type>,
    functions: BTreeMap<String, FunctionDecl>,
    macros: Vec<Macro>,
}

impl Env {
    pub fn builder() -> EnvBuilder {
        EnvBuilder::new()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn variable(&self, name: &str) -> Option<&Type> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.variables.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.functions.values()
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn macros(&self) -> &[Macro] {
        &self.macros
    }
}

#[derive(Debug, Clone)]
pub struct EnvBuilder {
    subject: String,
    allowed: BTreeSet<String>,
    functions: Vec<FunctionDecl>,
    variables: Vec<VariableDecl>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            allowed: default_allow_list(),
            functions: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn enable_function(mut self, name: &str) -> Self {
        self.allowed.insert(name.to_string());
        self
    }

    /// Removing a name that is not allowed is a no-op.
    pub fn disable_function(mut self, name: &str) -> Self {
        if !self.allowed.remove(name) {
            warn!("Function '{}' is not enabled, nothing to disable", name);
        }
        self
    }

    /// Replaces the allow-list.
    pub fn with_allowed_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declares an additional function. It is visible regardless of the
    /// allow-list and merges with a standard function of the same name.
    pub fn with_function(mut self, decl: FunctionDecl) -> Self {
        self.functions.push(decl);
        self
    }

    pub fn with_variable(mut self, name: &str, ty: Type) -> Self {
        self.variables.push(VariableDecl::new(name, ty));
        self
    }

    pub fn allowed_functions(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    /// True when this builder produces exactly the environment returned by
    /// [`standard_env`].
    pub fn is_standard(&self) -> bool {
        self.subject == DEFAULT_SUBJECT
            && self.functions.is_empty()
            && self.variables.is_empty()
            && self.allowed == default_allow_list()
    }

    pub fn build(self) -> Result<Env, EnvError> {
        let mut functions: BTreeMap<String, FunctionDecl> = stdlib::load()?
            .into_iter()
            .filter(|decl| self.allowed.contains(&decl.name))
            .map(|decl| (decl.name.clone(), decl))
            .collect();

        let mut ids: HashMap<String, String> = functions
            .values()
            .flat_map(|decl| decl.overloads.iter().map(move |o| (o.id.clone(), decl.name.clone())))
            .collect();
        for decl in self.functions {
            merge_function(&mut functions, &mut ids, decl)?;
        }

        if let Some(missing) = self.allowed.iter().find(|name| !functions.contains_key(*name)) {
            return Err(EnvError::UnknownFunction(missing.clone()));
        }

        let mut variables = BTreeMap::new();
        variables.insert(self.subject.clone(), Type::Dyn);
        for var in self.variables {
            if variables.contains_key(&var.name) {
                return Err(EnvError::DuplicateVariable(var.name));
            }
            variables.insert(var.name, var.ty);
        }

        debug!(
            "Built filter environment: subject '{}', {} function(s), {} variable(s)",
            self.subject,
            functions.len(),
            variables.len()
        );

        Ok(Env {
            subject: self.subject,
            variables,
            functions,
            macros: Macro::STANDARD.to_vec(),
        })
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Adds `decl` to `functions`. Overload ids are unique across the whole
/// environment; `ids` maps each id already present to its function.
fn merge_function(
    functions: &mut BTreeMap<String, FunctionDecl>,
    ids: &mut HashMap<String, String>,
    decl: FunctionDecl,
) -> Result<(), EnvError> {
    let entry = functions
        .entry(decl.name.clone())
        .or_insert_with(|| FunctionDecl::new(&decl.name));

    for overload in decl.overloads {
        stdlib::validate_overload(&decl.name, &overload)?;

        match ids.get(&overload.id) {
            Some(owner)
                if *owner == decl.name
                    && entry.overloads.iter().any(|o| *o == overload) => {}
            Some(_) => {
                return Err(EnvError::DuplicateOverload {
                    function: decl.name,
                    overload: overload.id,
                });
            }
            None => {
                ids.insert(overload.id.clone(), decl.name.clone());
                entry.overloads.push(overload);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::OverloadDecl;

    #[test]
    fn test_default_env_exposes_subject_only() {
        let env = EnvBuilder::new().build().unwrap();
        let vars: Vec<_> = env.variables().collect();
        assert_eq!(vars, vec![("i", &Type::Dyn)]);
        assert_eq!(env.subject(), "i");
    }

    #[test]
    fn test_default_env_hides_unlisted_functions() {
        let env = EnvBuilder::new().build().unwrap();
        assert!(env.has_function("_&&_"));
        assert!(env.has_function("startsWith"));
        assert!(env.has_function("timestamp"));
        assert!(!env.has_function("contains"));
        assert!(!env.has_function("size"));
        assert_eq!(env.functions().count(), default_allow_list().len());
    }

    #[test]
    fn test_enable_and_disable() {
        let env = EnvBuilder::new()
            .enable_function("contains")
            .disable_function("_%_")
            .build()
            .unwrap();
        assert!(env.has_function("contains"));
        assert!(!env.has_function("_%_"));
    }

    #[test]
    fn test_disable_unknown_is_noop() {
        let env = EnvBuilder::new().disable_function("no_such_fn").build().unwrap();
        assert_eq!(env.functions().count(), default_allow_list().len());
    }

    #[test]
    fn test_enable_unknown_fails() {
        let result = EnvBuilder::new().enable_function("no_such_fn").build();
        assert_eq!(result.unwrap_err(), EnvError::UnknownFunction("no_such_fn".to_string()));
    }

    #[test]
    fn test_custom_subject() {
        let env = EnvBuilder::new().with_subject("row").build().unwrap();
        assert_eq!(env.variable("row"), Some(&Type::Dyn));
        assert_eq!(env.variable("i"), None);
    }

    #[test]
    fn test_custom_function_merges_with_standard() {
        let env = EnvBuilder::new()
            .with_function(FunctionDecl::new("timestamp").overload(OverloadDecl::global(
                "double_to_timestamp",
                vec![Type::Double],
                Type::Timestamp,
            )))
            .build()
            .unwrap();
        let ts = env.function("timestamp").unwrap();
        assert!(ts.overloads.iter().any(|o| o.id == "string_to_timestamp"));
        assert!(ts.overloads.iter().any(|o| o.id == "double_to_timestamp"));
    }

    #[test]
    fn test_conflicting_overload_rejected() {
        let result = EnvBuilder::new()
            .with_function(FunctionDecl::new("timestamp").overload(OverloadDecl::global(
                "string_to_timestamp",
                vec![Type::Bytes],
                Type::Timestamp,
            )))
            .build();
        assert!(matches!(result, Err(EnvError::DuplicateOverload { .. })));
    }

    #[test]
    fn test_new_function_reusing_standard_overload_id_rejected() {
        let result = EnvBuilder::new()
            .with_function(FunctionDecl::new("lower").overload(OverloadDecl::member(
                "equals",
                vec![Type::String],
                Type::String,
            )))
            .build();
        assert_eq!(
            result.unwrap_err(),
            EnvError::DuplicateOverload {
                function: "lower".to_string(),
                overload: "equals".to_string(),
            }
        );
    }

    #[test]
    fn test_custom_functions_sharing_overload_id_rejected() {
        let result = EnvBuilder::new()
            .with_function(FunctionDecl::new("f").overload(OverloadDecl::global(
                "dup",
                vec![Type::Int],
                Type::Int,
            )))
            .with_function(FunctionDecl::new("g").overload(OverloadDecl::global(
                "dup",
                vec![Type::Int],
                Type::Int,
            )))
            .build();
        assert_eq!(
            result.unwrap_err(),
            EnvError::DuplicateOverload {
                function: "g".to_string(),
                overload: "dup".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_identical_declaration_accepted() {
        let decl = FunctionDecl::new("timestamp").overload(OverloadDecl::global(
            "string_to_timestamp",
            vec![Type::String],
            Type::Timestamp,
        ));
        let env = EnvBuilder::new().with_function(decl).build().unwrap();
        let ts = env.function("timestamp").unwrap();
        assert_eq!(
            ts.overloads.iter().filter(|o| o.id == "string_to_timestamp").count(),
            1
        );
    }

    #[test]
    fn test_variable_shadowing_subject_rejected() {
        let result = EnvBuilder::new().with_variable("i", Type::Int).build();
        assert_eq!(result.unwrap_err(), EnvError::DuplicateVariable("i".to_string()));
    }

    #[test]
    fn test_standard_env_is_shared() {
        let a = standard_env().unwrap();
        let b = standard_env().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(EnvBuilder::new().is_standard());
        assert!(!EnvBuilder::new().with_subject("row").is_standard());
        assert!(!EnvBuilder::new().enable_function("size").is_standard());
    }

    #[test]
    fn test_standard_macros_exposed() {
        let env = standard_env().unwrap();
        let names: Vec<_> = env.macros().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["has", "all", "exists", "exists_one", "map", "filter"]);
    }
}
