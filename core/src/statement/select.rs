use std::fmt;

use super::{Order, Page, Statement, StatementKind};
use crate::column::ColumnRef;
use crate::predicate::{conjunction, Predicate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub table: String,
    /// Projection. Empty selects every column.
    pub columns: Vec<ColumnRef>,
    pub predicates: Vec<Predicate>,
    pub order: Option<Order>,
    pub page: Option<Page>,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into(), columns: Vec::new(), predicates: Vec::new(), order: None, page: None }
    }
}

impl Statement for Select {
    const KIND: StatementKind = StatementKind::Select;

    fn table(&self) -> &str { &self.table }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        };
        write!(f, "SELECT {} FROM {}", columns, self.table)?;
        if let Some(predicates) = conjunction(&self.predicates) {
            write!(f, " WHERE {}", predicates)?;
        }
        if let Some(order) = &self.order {
            write!(f, " ORDER BY {}", order)?;
        }
        if let Some(page) = &self.page {
            write!(f, " {}", page)?;
        }
        f.write_str(";")
    }
}
