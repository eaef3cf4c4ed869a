//! Statement builders, parameterized by dialect.
//!
//! The SQL assembly lives in provided trait methods; a dialect only
//! supplies its identifier quoting and placeholder conventions. Swapping
//! in another database family means implementing the two hooks and
//! keeping the contract of the five builders intact.

use rowmodel_core::{Error, Result, Value};

use crate::statement::Statement;

/// Builds the CRUD statements for one SQL dialect.
///
/// Inputs are the resolved column map ((column name, encoded bind value)
/// pairs in declaration order) and the resolved primary key, both produced
/// upstream by the metadata and codec layers.
pub trait StatementBuilder {
    /// The dialect's name (e.g. `"mysql"`).
    fn dialect(&self) -> &'static str;

    /// Quote an identifier for this dialect.
    fn quote_ident(&self, ident: &str) -> String;

    /// The bind placeholder at 1-based position `index`.
    fn placeholder(&self, index: usize) -> String;

    /// Build an INSERT over the full column map, values bound in column
    /// order. Fails when the column map is empty.
    fn create(&self, table: &str, columns: &[(String, Value)]) -> Result<Statement> {
        if columns.is_empty() {
            return Err(Error::mapping(format!(
                "cannot build INSERT for table `{table}`: no columns resolved"
            )));
        }

        let names: Vec<String> = columns
            .iter()
            .map(|(name, _)| self.quote_ident(name))
            .collect();
        let placeholders: Vec<String> = (1..=columns.len())
            .map(|index| self.placeholder(index))
            .collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.quote_ident(table),
            names.join(", "),
            placeholders.join(", ")
        );
        tracing::debug!(dialect = self.dialect(), sql = %sql, "Built INSERT");

        let values = columns.iter().map(|(_, value)| value.clone()).collect();
        Ok(Statement::new(sql, values))
    }

    /// Build an UPDATE. The primary-key column is removed from the SET
    /// list (updating a key column is unsupported); its value is bound
    /// last, after the SET values. Fails when no column remains to set.
    fn update(
        &self,
        table: &str,
        columns: &[(String, Value)],
        primary_key: (&str, Value),
    ) -> Result<Statement> {
        let (key_column, key_value) = primary_key;
        let set: Vec<&(String, Value)> = columns
            .iter()
            .filter(|(name, _)| name.as_str() != key_column)
            .collect();
        if set.is_empty() {
            return Err(Error::mapping(format!(
                "cannot build UPDATE for table `{table}`: no columns besides the primary key"
            )));
        }

        let assignments: Vec<String> = set
            .iter()
            .enumerate()
            .map(|(index, (name, _))| {
                format!("{} = {}", self.quote_ident(name), self.placeholder(index + 1))
            })
            .collect();

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            self.quote_ident(table),
            assignments.join(", "),
            self.quote_ident(key_column),
            self.placeholder(set.len() + 1)
        );
        tracing::debug!(dialect = self.dialect(), sql = %sql, "Built UPDATE");

        let mut values: Vec<Value> = set.iter().map(|(_, value)| value.clone()).collect();
        values.push(key_value);
        Ok(Statement::new(sql, values))
    }

    /// Build a DELETE keyed on the primary key.
    fn delete(&self, table: &str, primary_key: (&str, Value)) -> Result<Statement> {
        let (key_column, key_value) = primary_key;
        let sql = format!(
            "DELETE FROM {} WHERE {} = {}",
            self.quote_ident(table),
            self.quote_ident(key_column),
            self.placeholder(1)
        );
        tracing::debug!(dialect = self.dialect(), sql = %sql, "Built DELETE");

        Ok(Statement::new(sql, vec![key_value]))
    }

    /// Build a SELECT keyed on the primary key.
    fn select_by_primary_key(&self, table: &str, primary_key: (&str, Value)) -> Result<Statement> {
        let (key_column, key_value) = primary_key;
        let sql = format!(
            "SELECT * FROM {} WHERE {} = {}",
            self.quote_ident(table),
            self.quote_ident(key_column),
            self.placeholder(1)
        );
        tracing::debug!(dialect = self.dialect(), sql = %sql, "Built SELECT");

        Ok(Statement::new(sql, vec![key_value]))
    }

    /// Build a SELECT filtered on several columns, ANDed in the given
    /// order, values bound in the same order. Fails when the filter is
    /// empty.
    fn select_by_columns(&self, table: &str, columns: &[(String, Value)]) -> Result<Statement> {
        if columns.is_empty() {
            return Err(Error::mapping(format!(
                "cannot build SELECT for table `{table}`: no filter columns resolved"
            )));
        }

        let clauses: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(index, (name, _))| {
                format!("{} = {}", self.quote_ident(name), self.placeholder(index + 1))
            })
            .collect();

        let sql = format!(
            "SELECT * FROM {} WHERE {}",
            self.quote_ident(table),
            clauses.join(" AND ")
        );
        tracing::debug!(dialect = self.dialect(), sql = %sql, "Built SELECT");

        let values = columns.iter().map(|(_, value)| value.clone()).collect();
        Ok(Statement::new(sql, values))
    }
}

/// The reference dialect: backtick-quoted identifiers, bare `?`
/// placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mysql;

impl StatementBuilder for Mysql {
    fn dialect(&self) -> &'static str {
        "mysql"
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}
