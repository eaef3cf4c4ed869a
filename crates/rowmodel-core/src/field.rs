//! Declarative per-field metadata.
//!
//! A [`FieldDef`] is what a record type declares for each of its fields:
//! an optional column binding plus key flags and validation rules. The
//! registry turns a type's ordered `FieldDef` list into resolved
//! [`ColumnMeta`](crate::registry::ColumnMeta) descriptors.

use crate::types::SqlType;
use crate::validate::Rule;
use crate::value::Value;

/// Declared default for a column.
///
/// `Undefined` is the sentinel distinguishing "no default declared" from a
/// declared default of NULL.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ColumnDefault {
    /// No default declared.
    #[default]
    Undefined,
    /// Declared default value. A [`Value::Computed`] default is resolved
    /// by the codec when the column map is encoded.
    Value(Value),
}

impl ColumnDefault {
    /// True when a default was declared.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        matches!(self, ColumnDefault::Value(_))
    }
}

/// The column half of a field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name override; the field name is used when absent.
    pub name: Option<&'static str>,
    /// Declared SQL type.
    pub sql_type: SqlType,
    /// Whether the column accepts NULL. Off by default.
    pub nullable: bool,
    /// Declared default value, if any.
    pub default: ColumnDefault,
    /// Declared length of the data type, if any.
    pub length: Option<u32>,
}

/// One declared field of a record type.
///
/// Built field by field in [`Record::fields`](crate::model::Record::fields),
/// in declaration order. Most fields bind a column
/// ([`FieldDef::column`]); a bare field ([`FieldDef::bare`]) carries no
/// column but may still declare validation rules.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name on the record type.
    pub name: &'static str,
    /// Column binding, absent for bare fields.
    pub column: Option<ColumnSpec>,
    /// Whether this field is flagged as the primary key.
    pub primary_key: bool,
    /// Whether this field's column value is generated by the database.
    pub auto_increment: bool,
    /// Validation rules, in declaration order.
    pub rules: Vec<Rule>,
}

impl FieldDef {
    /// Declare a field bound to a column of the given SQL type.
    pub fn column(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            column: Some(ColumnSpec {
                name: None,
                sql_type,
                nullable: false,
                default: ColumnDefault::Undefined,
                length: None,
            }),
            primary_key: false,
            auto_increment: false,
            rules: Vec::new(),
        }
    }

    /// Declare a field with no column binding.
    pub fn bare(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            primary_key: false,
            auto_increment: false,
            rules: Vec::new(),
        }
    }

    /// Override the column name (defaults to the field name).
    pub fn column_name(mut self, name: &'static str) -> Self {
        if let Some(column) = self.column.as_mut() {
            column.name = Some(name);
        }
        self
    }

    /// Mark the column as nullable.
    pub fn nullable(mut self) -> Self {
        if let Some(column) = self.column.as_mut() {
            column.nullable = true;
        }
        self
    }

    /// Declare a default value for the column.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        if let Some(column) = self.column.as_mut() {
            column.default = ColumnDefault::Value(value.into());
        }
        self
    }

    /// Declare the length of the data type.
    pub fn length(mut self, length: u32) -> Self {
        if let Some(column) = self.column.as_mut() {
            column.length = Some(length);
        }
        self
    }

    /// Flag this field as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Flag this field's column as database-generated.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Attach a validation rule. Rules are evaluated in attachment order.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Attach several validation rules at once.
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// The resolved column name: the override when present, else the field
    /// name. `None` for bare fields.
    #[must_use]
    pub fn resolved_column_name(&self) -> Option<&'static str> {
        self.column
            .as_ref()
            .map(|column| column.name.unwrap_or(self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name_defaults_to_field_name() {
        let field = FieldDef::column("name", SqlType::VarChar);
        assert_eq!(field.resolved_column_name(), Some("name"));
    }

    #[test]
    fn test_column_name_override() {
        let field = FieldDef::column("email", SqlType::VarChar).column_name("email_address");
        assert_eq!(field.resolved_column_name(), Some("email_address"));
    }

    #[test]
    fn test_bare_field_has_no_column() {
        let field = FieldDef::bare("scratch").rule(Rule::MaxLength(16));
        assert!(field.column.is_none());
        assert_eq!(field.resolved_column_name(), None);
        assert_eq!(field.rules.len(), 1);
    }

    #[test]
    fn test_builder_flags() {
        let field = FieldDef::column("id", SqlType::Integer)
            .primary_key()
            .auto_increment();
        assert!(field.primary_key);
        assert!(field.auto_increment);
    }

    #[test]
    fn test_default_sentinel() {
        let without = FieldDef::column("a", SqlType::Integer);
        assert!(!without.column.unwrap().default.is_defined());

        let with_null = FieldDef::column("b", SqlType::Integer).default_value(Value::Null);
        assert_eq!(
            with_null.column.unwrap().default,
            ColumnDefault::Value(Value::Null)
        );
    }

    #[test]
    fn test_length() {
        let field = FieldDef::column("name", SqlType::VarChar).length(255);
        assert_eq!(field.column.unwrap().length, Some(255));
    }
}
