//! Fluent builders, one per statement kind.
//!
//! Builders accumulate synchronously and are consumed by `build()`, which hands the statement
//! to the connection for compilation and returns the [`Request`] at once. Nothing waits on the
//! store here; a request can be built and even executed before the store has finished opening.

use sqlgate_core::{ColumnRef, Create, Delete, Direction, Field, FieldOptions, Insert, Order, Page, Predicate, Select, Update};

use crate::connection::Connection;
use crate::request::Request;

pub struct SelectBuilder {
    connection: Connection,
    statement: Select,
}

impl SelectBuilder {
    pub(crate) fn new(connection: Connection, table: String, columns: Vec<ColumnRef>) -> Self {
        let mut statement = Select::new(table);
        statement.columns = columns;
        Self { connection, statement }
    }

    /// AND a trusted condition onto the `WHERE` clause. See [`Predicate`] for what "trusted" means.
    pub fn filter(mut self, predicate: impl Into<Predicate>) -> Self {
        self.statement.predicates.push(predicate.into());
        self
    }

    pub fn limit(mut self, limit: u64, offset: u64) -> Self {
        self.statement.page = Some(Page::Fixed { limit, offset });
        self
    }

    /// Paginate with `$limit` / `$offset`, bound at execution time.
    pub fn auto_limit(mut self) -> Self {
        self.statement.page = Some(Page::Bound);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.statement.order = Some(Order { column: column.into(), direction: Direction::ascending(ascending) });
        self
    }

    pub fn build(self) -> Request<Select> { self.connection.compile(self.statement) }
}

pub struct InsertBuilder {
    connection: Connection,
    statement: Insert,
}

impl InsertBuilder {
    pub(crate) fn new(connection: Connection, table: String, columns: Vec<String>) -> Self {
        Self { connection, statement: Insert::new(table, columns) }
    }

    pub fn build(self) -> Request<Insert> { self.connection.compile(self.statement) }
}

pub struct UpdateBuilder {
    connection: Connection,
    statement: Update,
}

impl UpdateBuilder {
    pub(crate) fn new(connection: Connection, table: String, columns: Vec<String>) -> Self {
        Self { connection, statement: Update::new(table, columns) }
    }

    pub fn filter(mut self, predicate: impl Into<Predicate>) -> Self {
        self.statement.predicates.push(predicate.into());
        self
    }

    /// An update without any filter renders a bare `WHERE` and fails to compile.
    pub fn build(self) -> Request<Update> { self.connection.compile(self.statement) }
}

pub struct DeleteBuilder {
    connection: Connection,
    statement: Delete,
}

impl DeleteBuilder {
    pub(crate) fn new(connection: Connection, table: String) -> Self { Self { connection, statement: Delete::new(table) } }

    pub fn filter(mut self, predicate: impl Into<Predicate>) -> Self {
        self.statement.predicates.push(predicate.into());
        self
    }

    // NOTE: DELETE ... LIMIT only compiles when SQLite is built with SQLITE_ENABLE_UPDATE_DELETE_LIMIT
    pub fn limit(mut self, limit: u64, offset: u64) -> Self {
        self.statement.page = Some(Page::Fixed { limit, offset });
        self
    }

    pub fn auto_limit(mut self) -> Self {
        self.statement.page = Some(Page::Bound);
        self
    }

    pub fn build(self) -> Request<Delete> { self.connection.compile(self.statement) }
}

pub struct CreateBuilder {
    connection: Connection,
    statement: Create,
}

impl CreateBuilder {
    pub(crate) fn new(connection: Connection, table: String) -> Self { Self { connection, statement: Create::new(table) } }

    /// Add a column definition. Columns render in the order they are added.
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>, options: FieldOptions) -> Self {
        self.statement.fields.push(Field::new(name, ty, options));
        self
    }

    /// Add a column with no constraints
    pub fn column(self, name: impl Into<String>, ty: impl Into<String>) -> Self { self.field(name, ty, FieldOptions::new()) }

    pub fn build(self) -> Request<Create> { self.connection.compile(self.statement) }
}
