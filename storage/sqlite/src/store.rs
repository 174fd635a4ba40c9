//! Store facade: opens the connection and hands out per-table builders.

use std::path::PathBuf;

use sqlgate_core::ColumnRef;

use crate::builder::{CreateBuilder, DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
use crate::connection::{Connection, SqliteConfig};
use crate::error::SqliteError;

/// Entry point. Construction starts opening the store in the background and returns at once.
#[derive(Clone, Debug)]
pub struct Store {
    connection: Connection,
}

impl Store {
    /// Open (creating if needed) a file-backed store
    pub fn open(path: impl Into<PathBuf>) -> Self { Self::with_config(SqliteConfig::File(path.into())) }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Self { Self::with_config(SqliteConfig::Memory) }

    pub fn with_config(config: SqliteConfig) -> Self { Self::from_connection(Connection::open(config)) }

    pub(crate) fn from_connection(connection: Connection) -> Self { Self { connection } }

    /// Builders for `name`.
    ///
    /// Table names are spliced into statements as-is, so only alphanumerics, `_` and `.` are accepted.
    pub fn table(&self, name: impl Into<String>) -> Result<Table, SqliteError> {
        let name = name.into();
        if !Self::sane_name(&name) {
            return Err(SqliteError::InvalidTableName(name));
        }
        Ok(Table { name, connection: self.connection.clone() })
    }

    /// Check if a table name is valid
    pub fn sane_name(name: &str) -> bool { !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') }

    pub fn connection(&self) -> &Connection { &self.connection }

    /// Resolves once the store is open
    pub async fn ready(&self) { self.connection.ready().await }
}

/// Builder factories for a single table
#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    connection: Connection,
}

impl Table {
    pub fn name(&self) -> &str { &self.name }

    /// Columns are plain names or `(name, alias)` pairs. No columns selects `*`.
    pub fn select<I, C>(&self, columns: I) -> SelectBuilder
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        SelectBuilder::new(self.connection.clone(), self.name.clone(), columns.into_iter().map(Into::into).collect())
    }

    /// Each column is bound from the placeholder of the same name.
    pub fn insert<I, C>(&self, columns: I) -> InsertBuilder
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        InsertBuilder::new(self.connection.clone(), self.name.clone(), columns.into_iter().map(Into::into).collect())
    }

    pub fn update<I, C>(&self, columns: I) -> UpdateBuilder
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        UpdateBuilder::new(self.connection.clone(), self.name.clone(), columns.into_iter().map(Into::into).collect())
    }

    pub fn delete(&self) -> DeleteBuilder { DeleteBuilder::new(self.connection.clone(), self.name.clone()) }

    pub fn create(&self) -> CreateBuilder { CreateBuilder::new(self.connection.clone(), self.name.clone()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sane_name() {
        assert!(Store::sane_name("users"));
        assert!(Store::sane_name("main.users_2"));
        assert!(!Store::sane_name(""));
        assert!(!Store::sane_name("users; DROP TABLE x"));
        assert!(!Store::sane_name("\"quoted\""));
    }
}
