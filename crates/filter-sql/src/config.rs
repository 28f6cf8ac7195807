use crate::error::ConfigError;
use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use filter_env::{DEFAULT_SUBJECT, default_allow_list};
use std::collections::{BTreeSet, HashMap};

/// Timestamp layout, e.g. `2024-01-01 08:00:00` or `2024-01-01 08:00:00.250`.
/// Fractional seconds are only written when non-zero. Timestamps are cut to
/// millisecond precision before formatting, so at most three digits appear.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Settings controlling one rendering run.
///
/// Built through [`crate::ConverterBuilder`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub(crate) prefix: String,
    pub(crate) sql_names: HashMap<String, String>,
    pub(crate) time_zone: Tz,
    pub(crate) time_format: String,
    pub(crate) functions: BTreeSet<String>,
}

impl GeneratorConfig {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn sql_name(&self, path: &str) -> Option<&str> {
        self.sql_names.get(path).map(String::as_str)
    }

    /// Column for a field path: the mapped name if any, else the path itself.
    pub fn column<'a>(&'a self, path: &'a str) -> &'a str {
        self.sql_name(path).unwrap_or(path)
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    pub fn functions(&self) -> &BTreeSet<String> {
        &self.functions
    }

    pub fn is_enabled(&self, function: &str) -> bool {
        self.functions.contains(function)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        validate_time_format(&self.time_format)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_SUBJECT.to_string(),
            sql_names: HashMap::new(),
            time_zone: chrono_tz::UTC,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            functions: default_allow_list(),
        }
    }
}

pub(crate) fn validate_time_format(format: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidTimeFormat(format.to_string()));
    }
    Ok(())
}

pub(crate) fn parse_time_zone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimeZone(name.to_string()))
}
