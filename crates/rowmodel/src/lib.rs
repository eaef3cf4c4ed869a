//! Declarative record-to-table mapping.
//!
//! rowmodel binds plain Rust types to database table rows through
//! per-field metadata declared in code, validates field values before
//! persistence, and produces dialect-specific parameterized SQL with
//! ordered bind values.
//!
//! - Declare fields with [`FieldDef`] in a hand-written [`Record`] impl.
//! - Attach [`Rule`]s for validation; failures are aggregated, never
//!   truncated to the first one.
//! - Drive the lifecycle through a [`Session`]: `create`, `update`,
//!   `delete`, `save`, plus primary-key and column finders.
//! - Swap the SQL dialect by implementing
//!   [`StatementBuilder`](rowmodel_query::StatementBuilder); the
//!   reference dialect is MySQL-style ([`Mysql`](rowmodel_query::Mysql)).
//!
//! The database driver stays behind the
//! [`Connection`](rowmodel_core::Connection) trait and is injected into
//! the session explicitly.

pub use rowmodel_core::{
    ColumnDefault, ColumnMeta, ColumnSpec, Connection, ConnectionConfig, Error, ExecResult,
    ExecutionCode, FieldDef, Record, RecordExt, Result, Row, Rule, SqlType, State, TableMeta,
    TransactionState, ValidationError, Value, codec, registry, validate,
};
pub use rowmodel_query::{Mysql, Statement, StatementBuilder};
pub use rowmodel_session::Session;

/// Everything needed to declare and drive records.
pub mod prelude {
    pub use rowmodel_core::{
        Connection, Error, ExecResult, FieldDef, Record, RecordExt, Result, Row, Rule, SqlType,
        State, Value,
    };
    pub use rowmodel_query::{Mysql, StatementBuilder};
    pub use rowmodel_session::Session;
}
