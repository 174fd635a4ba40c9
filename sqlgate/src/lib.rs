//! # sqlgate
//!
//! Typed query builders over a single-file SQLite store. Client code never writes statements
//! by hand: it chains builder calls per table, and every `build()` returns a request that
//! compiles in the background and executes asynchronously.
//!
//! Nothing has to wait for the store. Builders work straight after [`Store::open`] returns, and
//! executions issued before a statement has compiled are queued and run, in the order they were
//! issued, as soon as it has.
//!
//! ## Example
//!
//! ```rust
//! use sqlgate::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = Store::open_in_memory();
//! let t = store.table("t")?;
//!
//! t.create()
//!     .field("id", "INTEGER", FieldOptions::new().primary().unique())
//!     .field("name", "TEXT", FieldOptions::new().default_value("'test'"))
//!     .column("info", "TEXT")
//!     .build()
//!     .exec()
//!     .await?;
//!
//! t.insert(["name", "info"]).build().exec_with([("name", "a"), ("info", "b")]).await?;
//!
//! let rows = t.select(["id", "name", "info"]).limit(10, 0).build().exec().await?;
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].get("name"), Some(&Value::from("a")));
//! # Ok(())
//! # }
//! ```
//!
//! ## Predicates
//!
//! `filter` takes a [`Predicate`]: raw SQL text, trusted and spliced in verbatim. Bind outside
//! values through named placeholders (`name = $name`) rather than formatting them into it.

pub use sqlgate_core as core;
pub use sqlgate_sqlite as sqlite;

pub use sqlgate_core::{ColumnRef, Field, FieldOptions, Gate, Predicate, Statement, StatementKind};
pub use sqlgate_sqlite::{Compiled, Params, Request, Row, SqliteConfig, SqliteError, Store, Table, Value};

pub mod prelude {
    pub use sqlgate_core::{FieldOptions, Predicate};
    pub use sqlgate_sqlite::{Params, Request, Row, SqliteError, Store, Table, Value};
}
