//! Readiness and ordering: work submitted before the store or a statement is ready still runs,
//! once, in submission order, and failures stay local to the execution that caused them.

mod common;

use std::time::Duration;

use anyhow::Result;
use sqlgate_sqlite::{FieldOptions, Params, SqliteError, Store, Value};

#[tokio::test]
async fn test_build_and_exec_before_store_is_ready() -> Result<()> {
    let store = Store::open_in_memory();
    let t = store.table("t")?;

    // nothing has been awaited: the compile waits on the connection gate and the execution
    // waits on the request gate
    let create = common::create_t(&t);
    let created = create.exec();
    created.await?;
    assert!(store.connection().is_ready());
    assert!(create.is_compiled());

    let compiled = create.ready().await?;
    assert!(compiled.columns.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_store_ready_resolves() -> Result<()> {
    let store = Store::open_in_memory();
    tokio::time::timeout(Duration::from_secs(5), store.ready()).await?;
    assert!(store.connection().is_ready());
    Ok(())
}

#[tokio::test]
async fn test_execs_run_in_submission_order() -> Result<()> {
    let store = Store::open_in_memory();
    let t = store.table("seq")?;
    t.create().column("n", "INTEGER").build().exec().await?;

    let insert = t.insert(["n"]).build();
    let pending = (0..8).map(|n| insert.exec_with([("n", n)])).collect::<Vec<_>>();

    // awaiting in reverse does not change the order the inserts ran in
    for exec in pending.into_iter().rev() {
        exec.await?;
    }

    let rows = t.select(["n"]).order_by("rowid", true).build().exec().await?;
    let values = rows.iter().filter_map(|r| r.get("n").and_then(Value::as_i64)).collect::<Vec<_>>();
    assert_eq!(values, (0..8).collect::<Vec<i64>>());

    Ok(())
}

#[tokio::test]
async fn test_requests_compile_in_build_order() -> Result<()> {
    let store = Store::open_in_memory();
    let t = store.table("t")?;

    // the insert is built before the create has run, but after it was built: the create is
    // compiled first, then the insert, whose compile fails because the table does not exist yet
    let create = common::create_t(&t);
    let early_insert = t.insert(["name"]).build();
    create.exec().await?;

    let err = early_insert.exec_with([("name", "x")]).await.unwrap_err();
    assert!(matches!(err, SqliteError::Compile { .. }), "unexpected error: {err}");

    Ok(())
}

#[tokio::test]
async fn test_compile_error_reported_on_every_exec() -> Result<()> {
    let store = Store::open_in_memory();
    let missing = store.table("missing")?.select(["id"]).build();

    let first = missing.exec();
    let second = missing.exec();

    match first.await {
        Err(SqliteError::Compile { sql, .. }) => assert_eq!(sql, "SELECT id FROM missing;"),
        other => panic!("expected a compile error, got {other:?}"),
    }
    assert!(matches!(second.await, Err(SqliteError::Compile { .. })));

    assert!(missing.is_compiled());
    assert!(missing.compiled().is_none());
    assert!(missing.ready().await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_compile_error_marks_request_compiled() -> Result<()> {
    let store = Store::open_in_memory();
    let table = store.table("missing")?;

    for _ in 0..50 {
        let missing = table.select(["id"]).build();
        assert!(matches!(missing.exec().await, Err(SqliteError::Compile { .. })));
        assert!(missing.is_compiled());
        assert!(missing.compiled().is_none());
    }

    Ok(())
}

#[tokio::test]
async fn test_exec_failure_is_local() -> Result<()> {
    let store = Store::open_in_memory();
    let t = store.table("names")?;
    t.create().field("name", "TEXT", FieldOptions::new().unique().not_null()).build().exec().await?;

    let insert = t.insert(["name"]).build();
    let first = insert.exec_with([("name", "a")]);
    let duplicate = insert.exec_with([("name", "a")]);
    let third = insert.exec_with([("name", "b")]);

    first.await?;
    assert!(matches!(duplicate.await, Err(SqliteError::Rusqlite(_))));
    third.await?;

    let rows = t.select(["name"]).build().exec().await?;
    assert_eq!(rows.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_unknown_parameter_is_an_exec_error() -> Result<()> {
    let (_store, t) = common::store_with_t().await?;

    let insert = t.insert(["name"]).build();
    let err = insert.exec_with(Params::new().bind("name", "a").bind("nope", 1)).await.unwrap_err();
    assert!(matches!(err, SqliteError::Rusqlite(rusqlite::Error::InvalidParameterName(_))), "unexpected error: {err}");

    // the request is still usable
    insert.exec_with([("name", "a")]).await?;
    assert_eq!(insert.compiled().map(|c| c.parameters.clone()), Some(vec!["$name".to_string()]));

    Ok(())
}

#[tokio::test]
async fn test_execs_from_concurrent_tasks() -> Result<()> {
    let (_store, t) = common::store_with_t().await?;
    let insert = t.insert(["name"]).build();

    let handles = (0..10)
        .map(|i| {
            let insert = insert.clone();
            tokio::spawn(async move { insert.exec_with([("name", format!("task {i}"))]).await })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.await??;
    }

    let rows = t.select(["id"]).build().exec().await?;
    assert_eq!(rows.len(), 10);

    Ok(())
}
