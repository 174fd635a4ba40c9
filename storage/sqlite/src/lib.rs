//! SQLite query builders with deferred readiness
//!
//! Client code assembles typed requests through fluent builders; each request renders to SQL,
//! is compiled against a single SQLite connection, and executes asynchronously.
//!
//! Two gates order everything:
//!
//! - the connection gate opens once the store file is open and foreign keys are enabled, and
//!   holds back every compile submitted before that;
//! - each request's own gate opens once its statement has compiled, and holds back every
//!   execution submitted before that.
//!
//! So builders can be used and requests executed straight after [`Store::open`] returns. Each
//! execution runs exactly once, after its prerequisites, in the order it was submitted.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlgate_sqlite::{FieldOptions, Store};
//!
//! let store = Store::open("app.db");
//! let users = store.table("users")?;
//!
//! users.create().field("id", "INTEGER", FieldOptions::new().primary()).column("name", "TEXT").build().exec().await?;
//! users.insert(["name"]).build().exec_with([("name", "ada")]).await?;
//!
//! let rows = users.select(["id", "name"]).filter("name = $name").build().exec_with([("name", "ada")]).await?;
//! ```

mod builder;
mod connection;
mod error;
mod request;
mod store;
mod value;

pub use builder::{CreateBuilder, DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
pub use connection::{Connection, SqliteConfig};
pub use error::SqliteError;
pub use request::{Compiled, Execute, Request};
pub use sqlgate_core::{ColumnRef, Create, Delete, Direction, Field, FieldOptions, Insert, Page, Predicate, Select, Statement, StatementKind, Update};
pub use store::{Store, Table};
pub use value::{Params, Row, Value};
