//! Basic sqlgate example: create a table, insert a row, read it back.
//!
//! Run with `LOG_LEVEL=debug` to see every statement as it compiles.

use std::str::FromStr;

use sqlgate_sqlite::{FieldOptions, Store};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let level = std::env::var("LOG_LEVEL").ok().and_then(|l| Level::from_str(&l).ok()).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let store = Store::open("example.db");
    let t = store.table("test")?;

    t.create()
        .field("id", "INTEGER", FieldOptions::new().primary().unique())
        .field("name", "TEXT", FieldOptions::new().default_value("'test'"))
        .column("info", "TEXT")
        .build()
        .exec()
        .await?;

    t.insert(["name", "info"]).build().exec_with([("name", "example"), ("info", "inserted by examples/basic.rs")]).await?;

    for row in t.select(["id", "name", "info"]).limit(10, 0).build().exec().await? {
        println!("{}", row.to_json());
    }

    Ok(())
}
