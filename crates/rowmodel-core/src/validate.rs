//! Validation rules and the engine that evaluates them.
//!
//! Rules are a closed sum type so the set stays exhaustively matchable;
//! each carries its parameters and a pure `validate`/`message` pair. The
//! engine walks every rule of every field before reporting, so one call
//! surfaces the complete failure list.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result, ValidationError};
use crate::model::Record;
use crate::registry;
use crate::value::Value;

/// Thread-safe cache of compiled regex patterns.
///
/// Pattern rules are declared once per type but evaluated on every
/// validation call; caching avoids recompiling on each one.
struct RegexCache {
    cache: std::sync::RwLock<std::collections::HashMap<String, Regex>>,
}

impl RegexCache {
    fn new() -> Self {
        Self {
            cache: std::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }

    fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        {
            let cache = self.cache.read().unwrap();
            if let Some(regex) = cache.get(pattern) {
                return Ok(regex.clone());
            }
        }

        let regex = Regex::new(pattern)?;
        {
            let mut cache = self.cache.write().unwrap();
            cache.insert(pattern.to_string(), regex.clone());
        }
        Ok(regex)
    }
}

fn regex_cache() -> &'static RegexCache {
    static CACHE: OnceLock<RegexCache> = OnceLock::new();
    CACHE.get_or_init(RegexCache::new)
}

/// Check a string against a regex pattern, compiling through the cache.
///
/// An invalid pattern is treated as a non-match and logged; validation
/// must not panic over a bad declaration.
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
    match regex_cache().get_or_compile(pattern) {
        Ok(regex) => regex.is_match(value),
        Err(e) => {
            tracing::warn!(
                pattern = pattern,
                error = %e,
                "Invalid regex pattern in validation rule, treating as non-match"
            );
            false
        }
    }
}

/// A declarative validation rule attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// The value must not be null or an empty string. Zero, `false` and
    /// empty collections pass.
    Required,
    /// The value must be numeric and at least this large (inclusive).
    Min(f64),
    /// The value must be numeric and at most this large (inclusive).
    Max(f64),
    /// The value must be a string of at least this many characters.
    MinLength(usize),
    /// The value must be a string of at most this many characters.
    MaxLength(usize),
    /// The value must be a string matching this regex.
    Pattern(String),
    /// The value must be numeric and within these inclusive bounds.
    Range(f64, f64),
}

impl Rule {
    /// Whether the value satisfies this rule.
    #[must_use]
    pub fn validate(&self, value: &Value) -> bool {
        match self {
            Rule::Required => !matches!(value, Value::Null) && value.as_str() != Some(""),
            Rule::Min(min) => value.as_numeric().is_some_and(|n| n >= *min),
            Rule::Max(max) => value.as_numeric().is_some_and(|n| n <= *max),
            Rule::MinLength(len) => value.as_str().is_some_and(|s| s.chars().count() >= *len),
            Rule::MaxLength(len) => value.as_str().is_some_and(|s| s.chars().count() <= *len),
            Rule::Pattern(pattern) => value.as_str().is_some_and(|s| matches_pattern(s, pattern)),
            Rule::Range(min, max) => value
                .as_numeric()
                .is_some_and(|n| n >= *min && n <= *max),
        }
    }

    /// The failure message for a named field.
    #[must_use]
    pub fn message(&self, field: &str) -> String {
        match self {
            Rule::Required => format!("{field} is required"),
            Rule::Min(min) => format!("{field} must be at least {}", fmt_number(*min)),
            Rule::Max(max) => format!("{field} must be at most {}", fmt_number(*max)),
            Rule::MinLength(len) => format!("{field} must be at least {len} characters long"),
            Rule::MaxLength(len) => format!("{field} must be at most {len} characters long"),
            Rule::Pattern(pattern) => format!("{field} must match the pattern {pattern}"),
            Rule::Range(min, max) => format!(
                "{field} must be between {} and {}",
                fmt_number(*min),
                fmt_number(*max)
            ),
        }
    }
}

/// Render a rule bound without a trailing `.0` for whole numbers.
fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Evaluate every rule of every field of `record`.
///
/// All fields are evaluated before reporting; a failing call returns an
/// [`Error::Validation`] carrying one message per failing (field, rule)
/// pair, in field-then-rule declaration order.
pub fn validate<M: Record + 'static>(record: &M) -> Result<()> {
    let meta = registry::resolve::<M>()?;
    let values = record.to_row();

    let mut errors = Vec::new();
    for (field, rules) in meta.rules() {
        let value = values
            .iter()
            .find(|(name, _)| name == field)
            .map_or(&Value::Null, |(_, value)| value);

        for rule in rules {
            if !rule.validate(value) {
                errors.push(rule.message(field));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(
            record = std::any::type_name::<M>(),
            failures = errors.len(),
            "Validation failed"
        );
        Err(Error::Validation(ValidationError::new(errors)))
    }
}
