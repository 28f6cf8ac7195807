use crate::{
    config::{GeneratorConfig, parse_time_zone},
    error::{ConfigError, FilterError, GenerateError},
    frontend::{CelFrontend, Frontend},
    renderer::{Render, Renderer},
};
use chrono_tz::Tz;
use filter_env::{Env, EnvBuilder, FunctionDecl, Type, VariableDecl, standard_env};
use filter_syntax::Expr;
use lazy_static::lazy_static;
use std::sync::Arc;
use tracing::{debug, info};

lazy_static! {
    static ref DEFAULT_CONVERTER: Result<Converter, ConfigError> = {
        info!("Building default filter converter");
        Converter::new()
    };
}

/// The process-wide converter with default settings. Built on first use;
/// a build failure is cached and returned to every caller.
pub fn default_converter() -> Result<&'static Converter, ConfigError> {
    (*DEFAULT_CONVERTER).as_ref().map_err(Clone::clone)
}

/// Renders `expr` with the default converter.
pub fn generate(expr: &Expr) -> Result<String, FilterError> {
    Ok(default_converter()?.generate(expr)?)
}

/// Parses CEL `text` and renders it with the default converter.
pub fn convert(text: &str) -> Result<String, FilterError> {
    default_converter()?.convert(text)
}

/// Compiles `text` with `frontend` and renders it with the default converter.
pub fn convert_with(frontend: &dyn Frontend, text: &str) -> Result<String, FilterError> {
    default_converter()?.convert_with(frontend, text)
}

/// A generator configuration paired with the environment filters are
/// checked against. Immutable once built and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Converter {
    config: GeneratorConfig,
    env: Arc<Env>,
    declarations: Vec<FunctionDecl>,
    variables: Vec<VariableDecl>,
}

impl Converter {
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn generate(&self, expr: &Expr) -> Result<String, GenerateError> {
        let mut renderer = Renderer::new(&self.config);
        expr.render(&mut renderer)?;
        Ok(renderer.finish())
    }

    /// Parses CEL `text`, checks it against [`Converter::env`] and renders it.
    pub fn convert(&self, text: &str) -> Result<String, FilterError> {
        self.convert_with(&CelFrontend, text)
    }

    pub fn convert_with(&self, frontend: &dyn Frontend, text: &str) -> Result<String, FilterError> {
        let expr = frontend.compile(&self.env, text)?;
        let sql = self.generate(&expr)?;
        debug!("Converted filter `{}` to `{}`", text, sql);
        Ok(sql)
    }

    /// Starts a new builder from copies of this converter's settings.
    /// The converter itself is left untouched.
    pub fn extend(&self) -> ConverterBuilder {
        ConverterBuilder {
            config: self.config.clone(),
            declarations: self.declarations.clone(),
            variables: self.variables.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConverterBuilder {
    config: GeneratorConfig,
    declarations: Vec<FunctionDecl>,
    variables: Vec<VariableDecl>,
}

impl ConverterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the field path `path` (e.g. `profile.age`) to a column name.
    pub fn with_sql_name(mut self, path: &str, column: &str) -> Self {
        self.config
            .sql_names
            .insert(path.to_string(), column.to_string());
        self
    }

    pub fn with_time_zone(mut self, tz: Tz) -> Self {
        self.config.time_zone = tz;
        self
    }

    pub fn with_time_zone_name(self, name: &str) -> Result<Self, ConfigError> {
        let tz = parse_time_zone(name)?;
        Ok(self.with_time_zone(tz))
    }

    /// Sets the strftime layout used for timestamp strings. Checked by
    /// [`ConverterBuilder::build`].
    pub fn with_time_format(mut self, format: &str) -> Self {
        self.config.time_format = format.to_string();
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.config.prefix = prefix.to_string();
        self
    }

    pub fn with_function(mut self, decl: FunctionDecl) -> Self {
        self.declarations.push(decl);
        self
    }

    pub fn with_variable(mut self, name: &str, ty: Type) -> Self {
        self.variables.push(VariableDecl::new(name, ty));
        self
    }

    pub fn enable_function(mut self, name: &str) -> Self {
        self.config.functions.insert(name.to_string());
        self
    }

    pub fn disable_function(mut self, name: &str) -> Self {
        self.config.functions.remove(name);
        self
    }

    pub fn build(self) -> Result<Converter, ConfigError> {
        self.config.validate()?;

        let env = self.env_builder();
        let env = if env.is_standard() {
            standard_env()?
        } else {
            Arc::new(env.build()?)
        };

        Ok(Converter {
            config: self.config,
            env,
            declarations: self.declarations,
            variables: self.variables,
        })
    }

    fn env_builder(&self) -> EnvBuilder {
        let builder = EnvBuilder::new()
            .with_subject(&self.config.prefix)
            .with_allowed_functions(self.config.functions.iter().cloned());
        let builder = self
            .declarations
            .iter()
            .cloned()
            .fold(builder, EnvBuilder::with_function);
        self.variables
            .iter()
            .fold(builder, |b, var| b.with_variable(&var.name, var.ty.clone()))
    }
}
