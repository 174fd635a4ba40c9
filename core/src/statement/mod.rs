//! Statement shapes and their text rendering.
//!
//! Every statement renders deterministically through [`fmt::Display`]: tokens are
//! space-separated, optional clauses are left out entirely when empty, and the text ends in `;`.
//! Values never appear in the text. Inserts and updates use a named placeholder per column
//! (`$column`) and auto-paginated selects use `$limit` / `$offset`.

use std::fmt;

mod create;
mod delete;
mod insert;
mod select;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Create => "create",
        })
    }
}

/// A renderable statement against a single table.
pub trait Statement: fmt::Display + Send + Sync + 'static {
    const KIND: StatementKind;

    fn table(&self) -> &str;

    fn sql(&self) -> String { self.to_string() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn ascending(ascending: bool) -> Self {
        if ascending {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        write!(f, "{} {}", self.column, direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Fixed { limit: u64, offset: u64 },
    /// Limit and offset are bound at execution time as `$limit` and `$offset`
    Bound,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Fixed { limit, offset } => write!(f, "LIMIT {} OFFSET {}", limit, offset),
            Page::Bound => f.write_str("LIMIT $limit OFFSET $offset"),
        }
    }
}

/// `$column` placeholder for a column name
pub(crate) fn placeholder(column: &str) -> String { format!("${}", column) }
