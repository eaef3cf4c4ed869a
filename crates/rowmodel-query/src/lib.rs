//! SQL statement builders for rowmodel.
//!
//! This crate turns a record's resolved column map into parameterized
//! CRUD statements. The assembly is dialect-parameterized: the
//! [`StatementBuilder`] trait owns the statement shapes, a dialect such as
//! [`Mysql`] supplies identifier quoting and placeholder syntax.

pub mod dialect;
pub mod statement;

pub use dialect::{Mysql, StatementBuilder};
pub use statement::Statement;
