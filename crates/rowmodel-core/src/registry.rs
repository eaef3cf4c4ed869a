//! Per-type metadata resolution and caching.
//!
//! A record type's field declarations are scanned exactly once; the result
//! is cached process-wide keyed by `TypeId`. The cache is written at most
//! once per type and read concurrently afterwards, which is the only
//! shared state in the crate.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::{Error, Result};
use crate::field::{ColumnDefault, FieldDef};
use crate::model::Record;
use crate::types::SqlType;
use crate::validate::Rule;

/// Resolved, immutable descriptor of one mapped column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    /// Field name on the record type.
    pub field: &'static str,
    /// Resolved column name (override or field name).
    pub column: &'static str,
    /// Declared SQL type.
    pub sql_type: SqlType,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Declared default, if any.
    pub default: ColumnDefault,
    /// Declared data-type length, if any.
    pub length: Option<u32>,
    /// Whether this column is the primary key.
    pub primary_key: bool,
    /// Whether this column's value is database-generated.
    pub auto_increment: bool,
}

/// Resolution result for one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMeta {
    table: &'static str,
    columns: Vec<ColumnMeta>,
    primary_key: Option<usize>,
    auto_increment: Option<usize>,
    rules: Vec<(&'static str, Vec<Rule>)>,
    bare_fields: Vec<&'static str>,
}

impl TableMeta {
    /// The mapped table name.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// The mapped columns, in field declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// The primary-key column.
    ///
    /// When several fields carry the flag, the first in declaration order
    /// wins; declaring more than one is a configuration smell.
    #[must_use]
    pub fn primary_key(&self) -> Option<&ColumnMeta> {
        self.primary_key.map(|idx| &self.columns[idx])
    }

    /// The auto-increment column, if one is declared.
    #[must_use]
    pub fn auto_increment(&self) -> Option<&ColumnMeta> {
        self.auto_increment.map(|idx| &self.columns[idx])
    }

    /// Validation rules per field, in field declaration order. Only fields
    /// with at least one rule appear.
    #[must_use]
    pub fn rules(&self) -> &[(&'static str, Vec<Rule>)] {
        &self.rules
    }

    /// Names of declared fields with no column binding, in declaration
    /// order.
    #[must_use]
    pub fn bare_fields(&self) -> &[&'static str] {
        &self.bare_fields
    }

    /// Find a column by field name or resolved column name.
    #[must_use]
    pub fn column_for(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns
            .iter()
            .find(|c| c.field == name || c.column == name)
    }
}

fn cache() -> &'static RwLock<HashMap<TypeId, Arc<TableMeta>>> {
    static CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<TableMeta>>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolve the metadata of a record type, scanning its declarations on
/// first use and serving the cached result afterwards.
pub fn resolve<M: Record + 'static>() -> Result<Arc<TableMeta>> {
    let type_id = TypeId::of::<M>();

    {
        let cache = cache().read().unwrap();
        if let Some(meta) = cache.get(&type_id) {
            return Ok(Arc::clone(meta));
        }
    }

    let meta = Arc::new(scan::<M>()?);
    let mut cache = cache().write().unwrap();
    Ok(Arc::clone(cache.entry(type_id).or_insert(meta)))
}

/// One-time scan of a type's field declarations.
fn scan<M: Record + 'static>() -> Result<TableMeta> {
    tracing::debug!(
        record = std::any::type_name::<M>(),
        table = M::TABLE,
        "Resolving table metadata"
    );

    let fields = M::fields();
    let mut columns = Vec::new();
    let mut primary_key = None;
    let mut auto_increment = None;
    let mut rules = Vec::new();
    let mut bare_fields = Vec::new();

    for field in fields {
        check_annotations(&field)?;

        if !field.rules.is_empty() {
            rules.push((field.name, field.rules.clone()));
        }

        let Some(spec) = field.column else {
            bare_fields.push(field.name);
            continue;
        };
        let column = ColumnMeta {
            field: field.name,
            column: spec.name.unwrap_or(field.name),
            sql_type: spec.sql_type,
            nullable: spec.nullable,
            default: spec.default,
            length: spec.length,
            primary_key: field.primary_key,
            auto_increment: field.auto_increment,
        };

        if column.primary_key && primary_key.is_none() {
            primary_key = Some(columns.len());
        }
        if column.auto_increment && auto_increment.is_none() {
            auto_increment = Some(columns.len());
        }
        columns.push(column);
    }

    Ok(TableMeta {
        table: M::TABLE,
        columns,
        primary_key,
        auto_increment,
        rules,
        bare_fields,
    })
}

/// Reject declarations that contradict themselves.
fn check_annotations(field: &FieldDef) -> Result<()> {
    if field.auto_increment {
        match &field.column {
            None => {
                return Err(Error::mapping(format!(
                    "field `{}` is marked auto-increment but declares no column",
                    field.name
                )));
            }
            Some(spec) if !spec.sql_type.is_integer() => {
                return Err(Error::mapping(format!(
                    "field `{}` is marked auto-increment but its column type is {}",
                    field.name,
                    spec.sql_type.sql_name()
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}
