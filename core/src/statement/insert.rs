use std::fmt;

use super::{placeholder, Statement, StatementKind};

/// `INSERT INTO <table> (<c1>,<c2>) VALUES ($c1,$c2);`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
}

impl Insert {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self { Self { table: table.into(), columns } }
}

impl Statement for Insert {
    const KIND: StatementKind = StatementKind::Insert;

    fn table(&self) -> &str { &self.table }
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.columns.iter().map(|c| placeholder(c)).collect::<Vec<_>>();
        write!(f, "INSERT INTO {} ({}) VALUES ({});", self.table, self.columns.join(","), values.join(","))
    }
}
