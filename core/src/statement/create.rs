use std::fmt;

use super::{Statement, StatementKind};
use crate::field::Field;

/// `CREATE TABLE IF NOT EXISTS`, column clauses first, then one foreign key clause per
/// referencing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Create {
    pub table: String,
    pub fields: Vec<Field>,
}

impl Create {
    pub fn new(table: impl Into<String>) -> Self { Self { table: table.into(), fields: Vec::new() } }
}

impl Statement for Create {
    const KIND: StatementKind = StatementKind::Create;

    fn table(&self) -> &str { &self.table }
}

impl fmt::Display for Create {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses = self
            .fields
            .iter()
            .map(Field::clause)
            .chain(self.fields.iter().filter_map(Field::foreign_key_clause))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "CREATE TABLE IF NOT EXISTS {} ({});", self.table, clauses)
    }
}
