//! Record lifecycle orchestration.
//!
//! The [`Session`] owns the execution collaborator and sequences every
//! mutating operation the same way: state check, validation, codec,
//! statement building, a single collaborator call, state transition. All
//! operations are fail-fast: a state or validation error aborts before
//! any statement is built or executed, and nothing is retried here.
//!
//! # Example
//!
//! ```ignore
//! let mut session = Session::new(connection);
//!
//! let mut user = User::new("John Doe");
//! session.create(&mut user)?;        // Transient -> Persistent
//!
//! user.name = "Jane Doe".to_string();
//! session.save(&mut user)?;          // dispatches to update()
//!
//! session.delete(&mut user)?;        // Persistent -> Detached
//! ```

use rowmodel_core::{
    Connection, Error, ExecResult, Record, RecordExt, Result, Row, State, Value, codec, registry,
    short_type_name,
};
use rowmodel_query::{Mysql, Statement, StatementBuilder};

/// Sequences record operations against one connection.
///
/// The collaborator is injected explicitly; there is no ambient global
/// connection. The dialect defaults to [`Mysql`] and can be swapped per
/// session.
pub struct Session<C: Connection> {
    connection: C,
    dialect: Box<dyn StatementBuilder>,
}

impl<C: Connection> Session<C> {
    /// Create a session over `connection` with the reference MySQL
    /// dialect.
    pub fn new(connection: C) -> Self {
        Self::with_dialect(connection, Box::new(Mysql))
    }

    /// Create a session with an explicit dialect.
    pub fn with_dialect(connection: C, dialect: Box<dyn StatementBuilder>) -> Self {
        Self {
            connection,
            dialect,
        }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// The driver name reported by the connection.
    pub fn driver_name(&self) -> &str {
        self.connection.driver_name()
    }

    /// Start a transaction on the connection.
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.connection.begin_transaction()
    }

    /// Commit the active transaction.
    pub fn commit(&mut self) -> Result<()> {
        self.connection.commit()
    }

    /// Roll back the active transaction.
    pub fn rollback(&mut self) -> Result<()> {
        self.connection.rollback()
    }

    /// Persist a new record: validate, INSERT, backfill the generated
    /// identifier, transition Transient → Persistent.
    #[tracing::instrument(level = "debug", skip(self, record))]
    pub fn create<M: Record + 'static>(&mut self, record: &mut M) -> Result<()> {
        if record.state() != State::Transient {
            return Err(Error::state("create", record.state()));
        }
        record.validate()?;

        let meta = registry::resolve::<M>()?;
        let columns = persistable_columns(record, meta.auto_increment().map(|c| c.column))?;
        let statement = self.dialect.create(meta.table(), &columns)?;
        let result = self.execute(&statement)?;

        if let Some(generated) = meta.auto_increment() {
            if let Some(id) = result.generated_id {
                record.set_field(generated.field, Value::BigInt(id))?;
            }
        }

        record.set_state(State::Persistent);
        tracing::info!(
            record = short_type_name::<M>(),
            table = meta.table(),
            "Record created"
        );
        Ok(())
    }

    /// Rewrite a persisted record: validate, UPDATE keyed on the primary
    /// key. The record stays Persistent.
    #[tracing::instrument(level = "debug", skip(self, record))]
    pub fn update<M: Record + 'static>(&mut self, record: &mut M) -> Result<()> {
        if record.state() != State::Persistent {
            return Err(Error::state("update", record.state()));
        }
        record.validate()?;

        let meta = registry::resolve::<M>()?;
        let (key, key_value) = record.primary_key()?;
        let columns = persistable_columns(record, meta.auto_increment().map(|c| c.column))?;
        let statement = self
            .dialect
            .update(meta.table(), &columns, (key.column, key_value))?;
        self.execute(&statement)?;

        tracing::info!(
            record = short_type_name::<M>(),
            table = meta.table(),
            "Record updated"
        );
        Ok(())
    }

    /// Remove a persisted record: DELETE keyed on the primary key,
    /// transition Persistent → Detached.
    #[tracing::instrument(level = "debug", skip(self, record))]
    pub fn delete<M: Record + 'static>(&mut self, record: &mut M) -> Result<()> {
        if record.state() != State::Persistent {
            return Err(Error::state("delete", record.state()));
        }

        let meta = registry::resolve::<M>()?;
        let (key, key_value) = record.primary_key()?;
        let statement = self.dialect.delete(meta.table(), (key.column, key_value))?;
        self.execute(&statement)?;

        record.set_state(State::Detached);
        tracing::info!(
            record = short_type_name::<M>(),
            table = meta.table(),
            "Record deleted"
        );
        Ok(())
    }

    /// Create or update depending on the record's state. Detached records
    /// are terminal and refused.
    pub fn save<M: Record + 'static>(&mut self, record: &mut M) -> Result<()> {
        match record.state() {
            State::Transient => self.create(record),
            State::Persistent => self.update(record),
            State::Detached => Err(Error::state("save", record.state())),
        }
    }

    /// Fetch the first record whose primary key equals `value`. The
    /// returned record is Persistent.
    #[tracing::instrument(level = "debug", skip(self, value))]
    pub fn find_first_by_primary_key<M: Record + 'static>(
        &mut self,
        value: impl Into<Value>,
    ) -> Result<Option<M>> {
        let meta = registry::resolve::<M>()?;
        let key = meta.primary_key().ok_or_else(|| {
            Error::mapping(format!(
                "no primary key declared for table `{}`",
                meta.table()
            ))
        })?;

        let encoded = codec::encode(key.sql_type, &value.into())
            .map_err(|e| e.with_field_context(short_type_name::<M>(), key.field))?;
        let statement = self
            .dialect
            .select_by_primary_key(meta.table(), (key.column, encoded))?;
        let result = self.execute(&statement)?;

        hydrate_first(result.rows.first())
    }

    /// Fetch the first record matching every (column, value) filter.
    /// Filter names resolve through field or column names; an unknown
    /// name fails with [`Error::Mapping`].
    #[tracing::instrument(level = "debug", skip(self, filters))]
    pub fn find_first_by_columns<M: Record + 'static>(
        &mut self,
        filters: &[(&str, Value)],
    ) -> Result<Option<M>> {
        let meta = registry::resolve::<M>()?;

        let mut resolved = Vec::with_capacity(filters.len());
        for &(name, ref value) in filters {
            let column = meta.column_for(name).ok_or_else(|| {
                Error::mapping(format!(
                    "unknown column `{name}` for table `{}`",
                    meta.table()
                ))
            })?;
            let encoded = codec::encode(column.sql_type, value)
                .map_err(|e| e.with_field_context(short_type_name::<M>(), column.field))?;
            resolved.push((column.column.to_string(), encoded));
        }

        let statement = self.dialect.select_by_columns(meta.table(), &resolved)?;
        let result = self.execute(&statement)?;

        hydrate_first(result.rows.first())
    }

    fn execute(&mut self, statement: &Statement) -> Result<ExecResult> {
        self.connection.execute(statement.sql(), statement.values())
    }
}

impl<C: Connection> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("driver", &self.connection.driver_name())
            .field("dialect", &self.dialect.dialect())
            .finish()
    }
}

/// The encoded column map minus the database-generated column, which
/// never appears in INSERT value lists or UPDATE SET clauses.
fn persistable_columns<M: Record + 'static>(
    record: &M,
    auto_increment: Option<&'static str>,
) -> Result<Vec<(String, Value)>> {
    Ok(record
        .columns()?
        .into_iter()
        .filter(|(name, _)| Some(name.as_str()) != auto_increment)
        .collect())
}

/// Map the first result row, if any, into a Persistent record.
fn hydrate_first<M: Record>(row: Option<&Row>) -> Result<Option<M>> {
    match row {
        Some(row) => {
            let mut record = M::from_row(row)?;
            record.set_state(State::Persistent);
            Ok(Some(record))
        }
        None => Ok(None),
    }
}
