use std::fmt;

use super::{Page, Statement, StatementKind};
use crate::predicate::{conjunction, Predicate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delete {
    pub table: String,
    pub predicates: Vec<Predicate>,
    pub page: Option<Page>,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self { Self { table: table.into(), predicates: Vec::new(), page: None } }
}

impl Statement for Delete {
    const KIND: StatementKind = StatementKind::Delete;

    fn table(&self) -> &str { &self.table }
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        if let Some(predicates) = conjunction(&self.predicates) {
            write!(f, " WHERE {}", predicates)?;
        }
        if let Some(page) = &self.page {
            write!(f, " {}", page)?;
        }
        f.write_str(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_table() {
        assert_eq!(Delete::new("t").to_string(), "DELETE FROM t;");
    }

    #[test]
    fn test_where_and_limit() {
        let mut stmt = Delete::new("t");
        stmt.predicates.push("id < 5".into());
        stmt.page = Some(Page::Fixed { limit: 2, offset: 1 });
        assert_eq!(stmt.to_string(), "DELETE FROM t WHERE id < 5 LIMIT 2 OFFSET 1;");
    }
}
