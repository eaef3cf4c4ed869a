//! SQL column types and their host-value compatibility.

use std::fmt;

use crate::value::Value;

/// The SQL type a column is declared with.
///
/// The set mirrors the common MySQL column types; each maps to a canonical
/// host representation (integers, floats, strings, temporals, JSON) which
/// drives the codec's coercion strategy and the `assign` compatibility
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    /// Integer type for primary keys and foreign keys.
    Integer,
    /// Unsigned integer type for ids and positive numbers.
    UnsignedInteger,
    /// Small integer type for flags and status codes.
    SmallInteger,
    /// Tiny integer type.
    TinyInteger,
    /// Boolean type (TINYINT(1)).
    Boolean,
    /// Decimal type for exact numbers.
    Decimal,
    /// Float type for approximate numbers.
    Float,
    /// Double precision floating point.
    Double,
    /// Fixed-length character type.
    Char,
    /// Variable-length character string.
    VarChar,
    /// Text type for longer strings.
    Text,
    /// Medium text type.
    MediumText,
    /// Long text type.
    LongText,
    /// Calendar date.
    Date,
    /// Wall-clock time.
    Time,
    /// Date and time.
    DateTime,
    /// Date and time, server-zoned.
    Timestamp,
    /// Fixed-length binary data.
    Binary,
    /// Variable-length binary data.
    VarBinary,
    /// Binary large object.
    Blob,
    /// Medium binary large object.
    MediumBlob,
    /// Long binary large object.
    LongBlob,
    /// JSON document.
    Json,
}

impl SqlType {
    /// The SQL spelling of the type.
    #[must_use]
    pub const fn sql_name(&self) -> &'static str {
        match self {
            SqlType::Integer => "INT",
            SqlType::UnsignedInteger => "INT UNSIGNED",
            SqlType::SmallInteger => "SMALLINT",
            SqlType::TinyInteger => "TINYINT",
            SqlType::Boolean => "TINYINT(1)",
            SqlType::Decimal => "DECIMAL",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Char => "CHAR",
            SqlType::VarChar => "VARCHAR",
            SqlType::Text => "TEXT",
            SqlType::MediumText => "MEDIUMTEXT",
            SqlType::LongText => "LONGTEXT",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::DateTime => "DATETIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::Blob => "BLOB",
            SqlType::MediumBlob => "MEDIUMBLOB",
            SqlType::LongBlob => "LONGBLOB",
            SqlType::Json => "JSON",
        }
    }

    /// True for the integer column types (excluding `Boolean`).
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            SqlType::Integer
                | SqlType::UnsignedInteger
                | SqlType::SmallInteger
                | SqlType::TinyInteger
        )
    }

    /// True for integer, decimal and float column types.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, SqlType::Decimal | SqlType::Float | SqlType::Double)
    }

    /// True for the character column types.
    #[must_use]
    pub const fn is_character(&self) -> bool {
        matches!(
            self,
            SqlType::Char
                | SqlType::VarChar
                | SqlType::Text
                | SqlType::MediumText
                | SqlType::LongText
        )
    }

    /// True for date, time and date-time column types.
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            SqlType::Date | SqlType::Time | SqlType::DateTime | SqlType::Timestamp
        )
    }

    /// True for the binary column types.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(
            self,
            SqlType::Binary
                | SqlType::VarBinary
                | SqlType::Blob
                | SqlType::MediumBlob
                | SqlType::LongBlob
        )
    }

    /// Whether a runtime value is compatible with this column type.
    ///
    /// This is the pre-flight check behind `assign`: it rejects values
    /// that could never encode for the declared type. `Null` is accepted
    /// everywhere (nullability is the validation engine's concern) and
    /// `Computed` is accepted everywhere since its result is only known at
    /// encode time. Preformatted `Text` is accepted for temporal columns
    /// because scalars pass the codec unchanged.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Null | Value::Computed(_) => true,
            Value::Bool(_) => matches!(self, SqlType::Boolean | SqlType::TinyInteger),
            Value::TinyInt(_) | Value::SmallInt(_) | Value::Int(_) | Value::BigInt(_) => {
                self.is_numeric() || matches!(self, SqlType::Boolean)
            }
            Value::Float(_) | Value::Double(_) => {
                matches!(self, SqlType::Decimal | SqlType::Float | SqlType::Double)
            }
            Value::Decimal(_) => self.is_numeric(),
            Value::Text(_) => {
                self.is_character()
                    || self.is_temporal()
                    || self.is_binary()
                    || matches!(self, SqlType::Json | SqlType::Decimal)
            }
            Value::Bytes(_) => self.is_binary(),
            Value::Date(_) => matches!(self, SqlType::Date | SqlType::DateTime | SqlType::Timestamp),
            Value::Time(_) => matches!(self, SqlType::Time),
            Value::DateTime(_) => self.is_temporal(),
            Value::Json(_) => !self.is_temporal(),
            Value::Array(_) => matches!(self, SqlType::Json),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}
