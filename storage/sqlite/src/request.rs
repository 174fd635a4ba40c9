//! Statement requests
//!
//! A [`Request`] pairs a rendered statement with its own [`Gate`]. The gate opens when the
//! connection worker has compiled the statement, so a request is runnable only once the
//! connection is ready *and* its statement has compiled. Executions submitted earlier wait on
//! the gate and then run in the order they were submitted.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use sqlgate_core::{action_debug, action_warn, Create, Delete, Gate, Insert, Select, Statement, Update};
use tokio::sync::oneshot;

use crate::connection::Connection;
use crate::error::SqliteError;
use crate::value::{Params, Row, Value};

/// What the engine reported when it compiled a statement. The prepared statement itself stays
/// on the connection worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub sql: String,
    /// Result column names, empty for statements that return no rows
    pub columns: Vec<String>,
    /// Named placeholders, sigil included, in declaration order
    pub parameters: Vec<String>,
}

impl Compiled {
    pub(crate) fn describe(sql: &str, stmt: &rusqlite::Statement<'_>) -> Self {
        let columns = stmt.column_names().into_iter().map(String::from).collect();
        let parameters = (1..=stmt.parameter_count()).filter_map(|i| stmt.parameter_name(i)).map(String::from).collect();
        Self { sql: sql.to_string(), columns, parameters }
    }
}

/// Runs a compiled statement and shapes its outcome.
pub trait Execute: Statement {
    type Output: Send + 'static;

    fn execute(stmt: &mut rusqlite::Statement<'_>, params: &Params) -> rusqlite::Result<Self::Output>;
}

impl Execute for Select {
    type Output = Vec<Row>;

    fn execute(stmt: &mut rusqlite::Statement<'_>, params: &Params) -> rusqlite::Result<Self::Output> {
        let columns: Arc<[String]> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params.as_named().as_slice())?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..columns.len()).map(|i| row.get::<_, rusqlite::types::Value>(i).map(Value::from)).collect::<Result<Vec<_>, _>>()?;
            result.push(Row::new(columns.clone(), values));
        }
        Ok(result)
    }
}

fn run_mutation(stmt: &mut rusqlite::Statement<'_>, params: &Params) -> rusqlite::Result<()> {
    stmt.execute(params.as_named().as_slice())?;
    Ok(())
}

macro_rules! mutation {
    ($($ty:ty),+) => {
        $(
            impl Execute for $ty {
                type Output = ();

                fn execute(stmt: &mut rusqlite::Statement<'_>, params: &Params) -> rusqlite::Result<()> { run_mutation(stmt, params) }
            }
        )+
    };
}

mutation!(Insert, Update, Delete, Create);

/// A statement submitted for compilation. Cloning is cheap; clones share the compiled
/// statement and its execution order. The prepared statement is finalized once the last clone
/// is dropped.
pub struct Request<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    id: u64,
    statement: S,
    sql: String,
    gate: Gate,
    compiled: OnceLock<Result<Compiled, Arc<rusqlite::Error>>>,
    connection: Connection,
}

impl<S> Clone for Request<S> {
    fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<S: Execute> Request<S> {
    pub(crate) fn new(id: u64, statement: S, connection: Connection) -> Self {
        let sql = statement.sql();
        Self { inner: Arc::new(Inner { id, statement, sql, gate: Gate::new(), compiled: OnceLock::new(), connection }) }
    }

    pub fn sql(&self) -> &str { &self.inner.sql }

    pub fn statement(&self) -> &S { &self.inner.statement }

    /// True once compilation has finished, successfully or not
    pub fn is_compiled(&self) -> bool { self.inner.compiled.get().is_some() }

    /// The compiled statement, if compilation has finished and succeeded
    pub fn compiled(&self) -> Option<&Compiled> { self.inner.compiled.get().and_then(|c| c.as_ref().ok()) }

    /// Wait for compilation to finish
    pub async fn ready(&self) -> Result<&Compiled, SqliteError> {
        self.inner.gate.opened().await;
        self.compile_result()
    }

    /// Execute with no bindings. See [`Request::exec_with`].
    pub fn exec(&self) -> impl Future<Output = Result<S::Output, SqliteError>> + Send + 'static { self.exec_with(Params::new()) }

    /// Execute with named bindings.
    ///
    /// The execution is queued when this is called, not when the future is first polled, so
    /// executions run in call order even if their futures are awaited in a different one.
    /// A failure only affects the future it is reported to.
    pub fn exec_with(&self, params: impl Into<Params>) -> impl Future<Output = Result<S::Output, SqliteError>> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        let request = self.clone();
        let params = params.into();
        self.inner.gate.submit(move || request.run(params, tx));
        async move { rx.await.map_err(|_| SqliteError::WorkerGone)? }
    }

    fn run(self, params: Params, tx: oneshot::Sender<Result<S::Output, SqliteError>>) {
        if let Err(err) = self.compile_result() {
            let _ = tx.send(Err(err));
            return;
        }

        let connection = self.inner.connection.clone();
        connection.run(self.inner.id, move |stmt| {
            let result = match stmt {
                Some(stmt) => {
                    // bindings left over from an earlier run read as NULL, not as stale values
                    stmt.clear_bindings();
                    S::execute(stmt, &params).map_err(SqliteError::from)
                }
                None => Err(SqliteError::Released(self.inner.sql.clone())),
            };
            if let Err(err) = &result {
                action_debug!(S::KIND, "failed", "{}: {}", self.inner.sql, err);
            }
            // drop this clone before replying, so a release it triggers is queued ahead of the caller's next job
            drop(self);
            let _ = tx.send(result);
        });
    }

    /// Record the outcome of compilation and release whatever is waiting on this request.
    pub(crate) fn attach(&self, compiled: Result<Compiled, rusqlite::Error>) {
        match &compiled {
            Ok(_) => action_debug!(S::KIND, "compiled", "{}", self.inner.sql),
            Err(err) => action_warn!(S::KIND, "compile failed", "{}: {}", self.inner.sql, err),
        }
        let _ = self.inner.compiled.set(compiled.map_err(Arc::new));
        self.inner.gate.open();
    }

    fn compile_result(&self) -> Result<&Compiled, SqliteError> {
        match self.inner.compiled.get() {
            Some(Ok(compiled)) => Ok(compiled),
            Some(Err(source)) => Err(SqliteError::Compile { sql: self.inner.sql.clone(), source: source.clone() }),
            // the gate opens only after a result is attached
            None => Err(SqliteError::WorkerGone),
        }
    }
}

impl<S> Drop for Inner<S> {
    fn drop(&mut self) {
        if let Some(Ok(_)) = self.compiled.get() {
            self.connection.release(self.id);
        }
    }
}

impl<S: Execute> fmt::Debug for Request<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request").field("sql", &self.inner.sql).field("gate", &self.inner.gate).finish()
    }
}
