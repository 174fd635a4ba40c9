use std::fmt;

use super::{placeholder, Statement, StatementKind};
use crate::predicate::{conjunction, Predicate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub table: String,
    pub columns: Vec<String>,
    pub predicates: Vec<Predicate>,
}

impl Update {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self { table: table.into(), columns, predicates: Vec::new() }
    }
}

impl Statement for Update {
    const KIND: StatementKind = StatementKind::Update;

    fn table(&self) -> &str { &self.table }
}

impl fmt::Display for Update {
    /// `WHERE` is written even when there are no predicates. Such a statement does not
    /// compile, so a whole-table update cannot be expressed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assignments = self.columns.iter().map(|c| format!("{}={}", c, placeholder(c))).collect::<Vec<_>>().join(", ");
        write!(f, "UPDATE {} SET {} WHERE", self.table, assignments)?;
        if let Some(predicates) = conjunction(&self.predicates) {
            write!(f, " {}", predicates)?;
        }
        f.write_str(";")
    }
}
