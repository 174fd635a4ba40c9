use std::str::FromStr;

use sqlgate_sqlite::{Create, FieldOptions, Request, Store, Table};
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// `t(id INTEGER PRIMARY KEY UNIQUE, name TEXT DEFAULT 'test', info TEXT)`
#[allow(unused)]
pub fn create_t(table: &Table) -> Request<Create> {
    table
        .create()
        .field("id", "INTEGER", FieldOptions::new().primary().unique())
        .field("name", "TEXT", FieldOptions::new().default_value("'test'"))
        .column("info", "TEXT")
        .build()
}

#[allow(unused)]
pub async fn store_with_t() -> anyhow::Result<(Store, Table)> {
    let store = Store::open_in_memory();
    let table = store.table("t")?;
    create_t(&table).exec().await?;
    Ok((store, table))
}
