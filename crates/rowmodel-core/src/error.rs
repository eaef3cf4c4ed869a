//! Error taxonomy shared across the workspace.
//!
//! Every fallible operation in rowmodel returns [`Result`]. The variants map
//! to the distinct failure classes of the mapping pipeline: metadata
//! resolution ([`Error::Mapping`]), rule evaluation ([`Error::Validation`]),
//! bind-value conversion ([`Error::Codec`]), lifecycle misuse
//! ([`Error::State`]) and driver failures ([`Error::Execution`]).

use std::fmt;

use crate::state::State;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All errors surfaced by rowmodel operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Metadata is absent, ambiguous, or insufficient to build a statement.
    Mapping(String),
    /// One or more field-level validation rules failed.
    Validation(ValidationError),
    /// A field value could not be converted to a bind-safe representation.
    ///
    /// `record` and `field` are filled in by the lifecycle layer so the
    /// failing declaration can be located; the codec itself only knows the
    /// value and the declared SQL type.
    Codec {
        /// Record type name, when known.
        record: Option<&'static str>,
        /// Field name, when known.
        field: Option<&'static str>,
        /// What went wrong.
        message: String,
    },
    /// An operation was attempted from a disallowed lifecycle state.
    State {
        /// The operation that was refused.
        operation: &'static str,
        /// The record's state at the time of the call.
        state: State,
    },
    /// The execution collaborator (database driver) failed.
    Execution {
        /// Driver-reported message.
        message: String,
        /// The driver's native error code, preserved as reported.
        code: ExecutionCode,
    },
}

impl Error {
    /// Build a [`Error::Mapping`] from any message.
    pub fn mapping(message: impl Into<String>) -> Self {
        Error::Mapping(message.into())
    }

    /// Build a context-free [`Error::Codec`]; the lifecycle layer attaches
    /// the record and field via [`Error::with_field_context`].
    pub fn codec(message: impl Into<String>) -> Self {
        Error::Codec {
            record: None,
            field: None,
            message: message.into(),
        }
    }

    /// Build a [`Error::State`] for a refused lifecycle operation.
    pub fn state(operation: &'static str, state: State) -> Self {
        Error::State { operation, state }
    }

    /// Build an [`Error::Execution`] from a driver message and native code.
    pub fn execution(message: impl Into<String>, code: ExecutionCode) -> Self {
        Error::Execution {
            message: message.into(),
            code,
        }
    }

    /// Attach record/field context to a codec error; other variants pass
    /// through unchanged.
    #[must_use]
    pub fn with_field_context(self, record: &'static str, field: &'static str) -> Self {
        match self {
            Error::Codec { message, .. } => Error::Codec {
                record: Some(record),
                field: Some(field),
                message,
            },
            other => other,
        }
    }

    /// True for [`Error::Validation`].
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// True for [`Error::State`].
    #[must_use]
    pub const fn is_state(&self) -> bool {
        matches!(self, Error::State { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Mapping(message) => write!(f, "{message}"),
            Error::Validation(e) => write!(f, "{e}"),
            Error::Codec {
                record,
                field,
                message,
            } => match (record, field) {
                (Some(record), Some(field)) => {
                    write!(f, "cannot encode `{record}.{field}`: {message}")
                }
                _ => write!(f, "{message}"),
            },
            Error::State { operation, state } => {
                write!(f, "`{operation}` is not allowed on a {state} record")
            }
            Error::Execution { message, code } => match code {
                ExecutionCode::None => write!(f, "{message}"),
                code => write!(f, "{message} (driver code {code})"),
            },
        }
    }
}

impl std::error::Error for Error {}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

/// Aggregated validation failures for one record.
///
/// All fields are evaluated before this is reported, so the list holds one
/// message per failing (field, rule) pair in field-then-rule declaration
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<String>,
}

impl ValidationError {
    /// Wrap an ordered list of failure messages.
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// The complete ordered list of failure messages.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// A driver's native error code, preserved as reported.
///
/// Drivers disagree on the shape: some report numeric codes, others
/// SQLSTATE-like strings. Both are kept verbatim for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExecutionCode {
    /// No native code was reported.
    #[default]
    None,
    /// Numeric driver code.
    Numeric(i64),
    /// Textual driver code (e.g. a SQLSTATE).
    Text(String),
}

impl fmt::Display for ExecutionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionCode::None => write!(f, "-"),
            ExecutionCode::Numeric(code) => write!(f, "{code}"),
            ExecutionCode::Text(code) => write!(f, "{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_display() {
        let e = Error::mapping("no columns declared for table `users`");
        assert_eq!(e.to_string(), "no columns declared for table `users`");
    }

    #[test]
    fn test_validation_error_joins_messages() {
        let e = ValidationError::new(vec![
            "name is required".to_string(),
            "age must be at least 0".to_string(),
        ]);
        assert_eq!(e.to_string(), "name is required, age must be at least 0");
        assert_eq!(e.len(), 2);
    }

    #[test]
    fn test_codec_context_attachment() {
        let e = Error::codec("incorrect temporal/column type combination")
            .with_field_context("User", "created_at");
        assert_eq!(
            e.to_string(),
            "cannot encode `User.created_at`: incorrect temporal/column type combination"
        );
    }

    #[test]
    fn test_codec_without_context() {
        let e = Error::codec("cannot encode array value into a INT column");
        assert_eq!(e.to_string(), "cannot encode array value into a INT column");
    }

    #[test]
    fn test_state_display() {
        let e = Error::state("create", State::Persistent);
        assert_eq!(e.to_string(), "`create` is not allowed on a persistent record");
        assert!(e.is_state());
    }

    #[test]
    fn test_execution_code_preserved() {
        let e = Error::execution("duplicate entry", ExecutionCode::Text("23000".to_string()));
        assert_eq!(e.to_string(), "duplicate entry (driver code 23000)");

        let e = Error::execution("gone away", ExecutionCode::Numeric(2006));
        assert_eq!(e.to_string(), "gone away (driver code 2006)");

        let e = Error::execution("unknown failure", ExecutionCode::None);
        assert_eq!(e.to_string(), "unknown failure");
    }

    #[test]
    fn test_validation_from_impl() {
        let e: Error = ValidationError::new(vec!["name is required".to_string()]).into();
        assert!(e.is_validation());
    }
}
