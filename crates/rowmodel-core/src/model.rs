//! The `Record` trait and record-level operations.
//!
//! A mapped type implements [`Record`] by hand: it names its table, lists
//! its field declarations in order, and converts between itself and
//! [`Value`]s. There is no runtime reflection; the declarations are plain
//! data built once and cached by the registry.
//!
//! [`RecordExt`] layers the derived operations on top: the resolved,
//! encoded column map, primary-key lookup, bulk assignment and
//! validation.

use crate::codec;
use crate::error::{Error, Result};
use crate::field::{ColumnDefault, FieldDef};
use crate::registry::{self, ColumnMeta};
use crate::row::Row;
use crate::state::State;
use crate::validate;
use crate::value::Value;

/// A type mapped to a database table.
///
/// # Example
///
/// ```ignore
/// struct User {
///     id: Option<i64>,
///     name: String,
///     state: State,
/// }
///
/// impl Record for User {
///     const TABLE: &'static str = "users";
///
///     fn fields() -> Vec<FieldDef> {
///         vec![
///             FieldDef::column("id", SqlType::Integer)
///                 .primary_key()
///                 .auto_increment(),
///             FieldDef::column("name", SqlType::VarChar)
///                 .length(100)
///                 .rule(Rule::Required),
///         ]
///     }
///     // to_row / from_row / set_field / state accessors ...
/// }
/// ```
pub trait Record: Sized {
    /// The database table name.
    const TABLE: &'static str;

    /// Field declarations, in declaration order. Scanned once per type by
    /// the registry.
    fn fields() -> Vec<FieldDef>;

    /// Current field values, keyed by field name, in declaration order.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Hydrate an instance from a result row. The caller owns the
    /// lifecycle state of the returned instance.
    fn from_row(row: &Row) -> Result<Self>;

    /// Set one field from a value. Fails with [`Error::Mapping`] when the
    /// value cannot be represented by the field's host type.
    fn set_field(&mut self, field: &'static str, value: Value) -> Result<()>;

    /// Current lifecycle state.
    fn state(&self) -> State;

    /// Replace the lifecycle state. Only the lifecycle layer should call
    /// this.
    fn set_state(&mut self, state: State);
}

/// The unqualified name of a record type, for diagnostics.
#[must_use]
pub fn short_type_name<M: 'static>() -> &'static str {
    let full = std::any::type_name::<M>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Derived record-level operations, available on every [`Record`].
pub trait RecordExt: Record + 'static {
    /// The resolved column map: (column name, encoded bind value) pairs in
    /// field declaration order.
    ///
    /// A `Null` current value falls back to the declared column default
    /// when one is defined. Encoding failures carry the record type and
    /// field name.
    fn columns(&self) -> Result<Vec<(String, Value)>> {
        let meta = registry::resolve::<Self>()?;
        if meta.columns().is_empty() {
            return Err(Error::mapping(format!(
                "record type `{}` resolves to no columns",
                short_type_name::<Self>()
            )));
        }

        let values = self.to_row();
        let mut resolved = Vec::with_capacity(meta.columns().len());
        for column in meta.columns() {
            let encoded = encode_column::<Self>(&values, column)?;
            resolved.push((column.column.to_string(), encoded));
        }
        Ok(resolved)
    }

    /// The primary-key descriptor and the record's current, encoded key
    /// value.
    ///
    /// The first field in declaration order that is both column-bound and
    /// flagged primary key wins, deterministically on every call. Fails
    /// with [`Error::Mapping`] when no field qualifies.
    fn primary_key(&self) -> Result<(ColumnMeta, Value)> {
        let meta = registry::resolve::<Self>()?;
        let column = meta.primary_key().ok_or_else(|| {
            Error::mapping(format!(
                "no primary key declared for table `{}`",
                meta.table()
            ))
        })?;

        let values = self.to_row();
        let encoded = encode_column::<Self>(&values, column)?;
        Ok((column.clone(), encoded))
    }

    /// Bulk-set fields from (name, value) pairs.
    ///
    /// Names resolve through either the field name or its mapped column
    /// name; unknown names are skipped. A value incompatible with the
    /// field's declared SQL type fails with [`Error::Mapping`] naming the
    /// field, before anything is written.
    fn assign(&mut self, fields: &[(&str, Value)]) -> Result<()> {
        let meta = registry::resolve::<Self>()?;

        for &(name, ref value) in fields {
            if let Some(column) = meta.column_for(name) {
                if !column.sql_type.accepts(value) {
                    return Err(Error::mapping(format!(
                        "{} value is not compatible with field `{}` of type {}",
                        value.kind(),
                        column.field,
                        column.sql_type
                    )));
                }
                self.set_field(column.field, value.clone())?;
            } else if let Some(field) = meta.bare_fields().iter().copied().find(|f| *f == name) {
                self.set_field(field, value.clone())?;
            }
        }
        Ok(())
    }

    /// Run every validation rule of every field. See
    /// [`validate::validate`].
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

impl<M: Record + 'static> RecordExt for M {}

/// Resolve and encode one column's bind value from the record's current
/// values.
fn encode_column<M: Record + 'static>(
    values: &[(&'static str, Value)],
    column: &ColumnMeta,
) -> Result<Value> {
    let raw = values
        .iter()
        .find(|(name, _)| *name == column.field)
        .map_or(&Value::Null, |(_, value)| value);

    let resolved = match (raw, &column.default) {
        (Value::Null, ColumnDefault::Value(default)) => default,
        _ => raw,
    };

    codec::encode(column.sql_type, resolved)
        .map_err(|e| e.with_field_context(short_type_name::<M>(), column.field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SqlType;
    use crate::validate::Rule;

    #[derive(Default)]
    struct Account {
        id: Option<i64>,
        handle: String,
        balance: f64,
        currency: Option<String>,
        note: Option<String>,
        state: State,
    }

    impl Record for Account {
        const TABLE: &'static str = "accounts";

        fn fields() -> Vec<FieldDef> {
            vec![
                FieldDef::column("id", SqlType::Integer)
                    .primary_key()
                    .auto_increment(),
                FieldDef::column("handle", SqlType::VarChar)
                    .length(32)
                    .rule(Rule::Required)
                    .rule(Rule::MaxLength(32)),
                FieldDef::column("balance", SqlType::Double),
                FieldDef::column("currency", SqlType::Char)
                    .length(3)
                    .default_value("EUR"),
                FieldDef::bare("note"),
            ]
        }

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("id", Value::from(self.id)),
                ("handle", Value::from(self.handle.clone())),
                ("balance", Value::from(self.balance)),
                ("currency", Value::from(self.currency.clone())),
                ("note", Value::from(self.note.clone())),
            ]
        }

        fn from_row(row: &Row) -> Result<Self> {
            Ok(Self {
                id: row.get("id").and_then(Value::as_i64),
                handle: row
                    .get("handle")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                balance: row
                    .get("balance")
                    .and_then(Value::as_numeric)
                    .unwrap_or_default(),
                currency: row
                    .get("currency")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                note: None,
                state: State::Transient,
            })
        }

        fn set_field(&mut self, field: &'static str, value: Value) -> Result<()> {
            match field {
                "id" => self.id = value.as_i64(),
                "handle" => {
                    self.handle = value
                        .as_str()
                        .ok_or_else(|| Error::mapping("handle expects text"))?
                        .to_string();
                }
                "balance" => {
                    self.balance = value
                        .as_numeric()
                        .ok_or_else(|| Error::mapping("balance expects a number"))?;
                }
                "currency" => self.currency = value.as_str().map(str::to_string),
                "note" => self.note = value.as_str().map(str::to_string),
                _ => {}
            }
            Ok(())
        }

        fn state(&self) -> State {
            self.state
        }

        fn set_state(&mut self, state: State) {
            self.state = state;
        }
    }

    fn account() -> Account {
        Account {
            id: Some(7),
            handle: "jdoe".to_string(),
            balance: 12.5,
            currency: Some("USD".to_string()),
            note: None,
            state: State::Transient,
        }
    }

    #[test]
    fn test_columns_keyed_by_resolved_name_in_order() {
        let columns = account().columns().unwrap();
        let names: Vec<_> = columns.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["id", "handle", "balance", "currency"]);
    }

    #[test]
    fn test_columns_apply_declared_default_on_null() {
        let mut record = account();
        record.currency = None;
        let columns = record.columns().unwrap();
        let currency = columns.iter().find(|(name, _)| name == "currency").unwrap();
        assert_eq!(currency.1, Value::Text("EUR".to_string()));
    }

    #[test]
    fn test_primary_key_descriptor_and_value() {
        let (meta, value) = account().primary_key().unwrap();
        assert_eq!(meta.field, "id");
        assert_eq!(value, Value::BigInt(7));
    }

    #[test]
    fn test_assign_resolves_field_and_column_names() {
        let mut record = account();
        record
            .assign(&[
                ("handle", Value::Text("froom".to_string())),
                ("balance", Value::Double(99.0)),
            ])
            .unwrap();
        assert_eq!(record.handle, "froom");
        assert_eq!(record.balance, 99.0);
    }

    #[test]
    fn test_assign_skips_unknown_names() {
        let mut record = account();
        record
            .assign(&[("no_such_field", Value::Int(1))])
            .unwrap();
        assert_eq!(record.handle, "jdoe");
    }

    #[test]
    fn test_assign_rejects_incompatible_value() {
        let mut record = account();
        let err = record
            .assign(&[("balance", Value::Text("lots".to_string()))])
            .unwrap_err();
        assert!(err.to_string().contains("balance"));
        assert!(matches!(err, Error::Mapping(_)));
    }

    #[test]
    fn test_assign_reaches_bare_fields() {
        let mut record = account();
        record
            .assign(&[("note", Value::Text("vip".to_string()))])
            .unwrap();
        assert_eq!(record.note.as_deref(), Some("vip"));
    }

    #[test]
    fn test_validate_aggregates_in_declaration_order() {
        let mut record = account();
        record.handle = String::new();
        let err = record.validate().unwrap_err();
        let Error::Validation(validation) = err else {
            panic!("expected validation error");
        };
        assert_eq!(validation.errors(), ["handle is required"]);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Account>(), "Account");
    }
}
