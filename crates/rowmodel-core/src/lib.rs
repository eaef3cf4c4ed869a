//! Core types and traits for rowmodel.
//!
//! `rowmodel-core` is the foundation layer for the workspace. It defines
//! the traits and data types all other crates build on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: [`Record`] is implemented by mapped types,
//!   [`Connection`] by database drivers.
//! - **Metadata**: [`FieldDef`] declarations resolve through the
//!   [`registry`] into cached, immutable [`TableMeta`] descriptors.
//! - **Data model**: [`Value`], [`SqlType`] and [`Row`] are shared across
//!   the query and session crates.
//! - **Rules and coercion**: the [`validate`] engine evaluates declared
//!   rules; the [`codec`] turns field values into driver-safe bind values.
//!
//! Most applications should use the `rowmodel` facade; reach for
//! `rowmodel-core` directly when writing drivers or advanced
//! integrations.

pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod field;
pub mod model;
pub mod registry;
pub mod row;
pub mod state;
pub mod types;
pub mod validate;
pub mod value;

pub use codec::encode;
pub use config::ConnectionConfig;
pub use connection::{Connection, ExecResult, TransactionState};
pub use error::{Error, ExecutionCode, Result, ValidationError};
pub use field::{ColumnDefault, ColumnSpec, FieldDef};
pub use model::{Record, RecordExt, short_type_name};
pub use registry::{ColumnMeta, TableMeta, resolve};
pub use row::Row;
pub use state::State;
pub use types::SqlType;
pub use validate::Rule;
pub use value::Value;
