//! The execution-collaborator boundary.
//!
//! The mapping core never talks to a database itself: it hands finished
//! SQL text and ordered bind values to a [`Connection`] implementation and
//! consumes the [`ExecResult`] that comes back. Driver crates implement
//! this trait; everything behind it (wire protocol, retries, timeouts) is
//! out of the core's scope.

use crate::error::{Error, ExecutionCode, Result};
use crate::row::Row;
use crate::value::Value;

/// Outcome of one executed statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecResult {
    /// Result rows, for SELECT statements.
    pub rows: Vec<Row>,
    /// The generated identifier, for INSERTs into tables with a
    /// database-generated key. `None` when the driver cannot report one.
    pub generated_id: Option<i64>,
    /// Number of affected rows.
    pub affected: u64,
}

impl ExecResult {
    /// Result of a statement that affected `affected` rows.
    #[must_use]
    pub fn affected(affected: u64) -> Self {
        Self {
            rows: Vec::new(),
            generated_id: None,
            affected,
        }
    }

    /// Result of an INSERT that produced a generated identifier.
    #[must_use]
    pub fn inserted(generated_id: i64) -> Self {
        Self {
            rows: Vec::new(),
            generated_id: Some(generated_id),
            affected: 1,
        }
    }

    /// Result of a SELECT.
    #[must_use]
    pub fn with_rows(rows: Vec<Row>) -> Self {
        let affected = rows.len() as u64;
        Self {
            rows,
            generated_id: None,
            affected,
        }
    }
}

/// A database connection able to execute parameterized statements.
///
/// Implementations report failures as [`Error::Execution`], preserving the
/// driver's native error code. The transaction methods carry their own
/// state checks (see [`TransactionState`]); they are independent of the
/// record lifecycle state machine.
pub trait Connection {
    /// The driver's name (e.g. `"mysql"`).
    fn driver_name(&self) -> &str;

    /// Execute one parameterized statement.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecResult>;

    /// Start a transaction. Fails if one is already active.
    fn begin_transaction(&mut self) -> Result<()>;

    /// Commit the active transaction. Fails if none is active.
    fn commit(&mut self) -> Result<()>;

    /// Roll back the active transaction. Fails if none is active.
    fn rollback(&mut self) -> Result<()>;
}

/// Transaction flag with the state checks every [`Connection`] must apply,
/// so implementations agree on behavior and messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionState {
    active: bool,
}

impl TransactionState {
    /// Fresh, inactive state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transaction is active.
    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.active
    }

    /// Mark a transaction as started.
    pub fn begin(&mut self) -> Result<()> {
        if self.active {
            return Err(Error::execution(
                "A transaction is already active, cannot start a new one",
                ExecutionCode::None,
            ));
        }
        self.active = true;
        Ok(())
    }

    /// Mark the active transaction as committed.
    pub fn commit(&mut self) -> Result<()> {
        if !self.active {
            return Err(Error::execution(
                "There is no active transaction",
                ExecutionCode::None,
            ));
        }
        self.active = false;
        Ok(())
    }

    /// Mark the active transaction as rolled back.
    pub fn rollback(&mut self) -> Result<()> {
        if !self.active {
            return Err(Error::execution(
                "There is no active transaction",
                ExecutionCode::None,
            ));
        }
        self.active = false;
        Ok(())
    }
}
