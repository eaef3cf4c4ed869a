//! The statement value object.

use rowmodel_core::Value;

/// A finished SQL statement: text plus its ordered bind values.
///
/// Created fresh per operation by a
/// [`StatementBuilder`](crate::dialect::StatementBuilder) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    values: Vec<Value>,
}

impl Statement {
    /// Pair statement text with its bind values.
    pub fn new(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }

    /// The statement text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bind values, in placeholder order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}
