//! The single engine connection
//!
//! A dedicated worker thread owns the `rusqlite::Connection`. Work reaches it as jobs on an
//! unbounded channel and runs one at a time in arrival order, so no two prepare or execute
//! calls ever race on the handle. Each compiled request's prepared statement is held by the
//! worker until the last handle to that request is dropped.
//!
//! The connection [`Gate`] stays closed until the worker has opened the store and enabled
//! foreign keys; compile tasks queue behind it.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rusqlite::OpenFlags;
use sqlgate_core::{action_debug, action_error, action_warn, Gate};
use tokio::sync::{mpsc, oneshot};

use crate::error::SqliteError;
use crate::request::{Compiled, Execute, Request};

/// Applied on every open, before anything is compiled
const SETUP: &str = "PRAGMA foreign_keys = ON;";

/// Configuration for SQLite connections
#[derive(Clone, Debug)]
pub enum SqliteConfig {
    /// File-based database, opened read-write and created if missing
    File(PathBuf),
    /// In-memory database (for testing)
    Memory,
}

impl SqliteConfig {
    fn label(&self) -> String {
        match self {
            SqliteConfig::File(path) => path.display().to_string(),
            SqliteConfig::Memory => ":memory:".to_string(),
        }
    }

    fn connect(&self) -> Result<rusqlite::Connection, SqliteError> {
        let conn = match self {
            SqliteConfig::File(path) => rusqlite::Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?,
            SqliteConfig::Memory => rusqlite::Connection::open_in_memory()?,
        };
        conn.execute_batch(SETUP)?;
        Ok(conn)
    }
}

type Attach = Box<dyn FnOnce(Result<Compiled, rusqlite::Error>) + Send + 'static>;
type Run = Box<dyn FnOnce(Option<&mut rusqlite::Statement<'_>>) + Send + 'static>;

/// Work for the connection worker. Prepared statements live on the worker, keyed by request id.
enum Job {
    Prepare { id: u64, sql: String, attach: Attach },
    Run { id: u64, run: Run },
    Release { id: u64 },
    Count { reply: oneshot::Sender<usize> },
}

/// Handle to the connection worker. Clones share the worker; it shuts down, closing the store,
/// once the last clone is dropped.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<Inner>,
}

struct Inner {
    gate: Gate,
    jobs: mpsc::UnboundedSender<Job>,
    next_id: AtomicU64,
    label: String,
}

impl Connection {
    /// Start opening the store and return immediately.
    ///
    /// Failing to open the store is fatal: the error is logged and the process exits.
    pub fn open(config: SqliteConfig) -> Self {
        let (connection, jobs) = Self::unstarted(config.label());
        connection.start(config, jobs);
        connection
    }

    /// A handle with no worker yet. Everything compiled through it queues on the closed gate.
    fn unstarted(label: String) -> (Self, mpsc::UnboundedReceiver<Job>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { inner: Arc::new(Inner { gate: Gate::new(), jobs: tx, next_id: AtomicU64::new(0), label }) }, rx)
    }

    fn start(&self, config: SqliteConfig, jobs: mpsc::UnboundedReceiver<Job>) {
        let gate = self.inner.gate.clone();
        let spawned = std::thread::Builder::new().name(format!("sqlgate {}", self.inner.label)).spawn(move || run_worker(config, gate, jobs));
        if let Err(err) = spawned {
            fatal(&self.inner.label, &err);
        }
    }

    pub fn label(&self) -> &str { &self.inner.label }

    pub fn is_ready(&self) -> bool { self.inner.gate.is_open() }

    /// Resolves once the store is open and every compile queued before that has been handed
    /// to the worker.
    pub async fn ready(&self) { self.inner.gate.opened().await }

    /// Wrap `statement` in a request and schedule its compilation behind the connection gate.
    pub fn compile<S: Execute>(&self, statement: S) -> Request<S> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::new(id, statement, self.clone());
        let connection = self.clone();
        let pending = request.clone();
        self.inner.gate.submit(move || {
            let sql = pending.sql().to_string();
            connection.send(Job::Prepare { id, sql, attach: Box::new(move |compiled| pending.attach(compiled)) });
        });
        request
    }

    /// Number of prepared statements currently held for live requests
    pub async fn prepared(&self) -> Result<usize, SqliteError> {
        let (tx, rx) = oneshot::channel();
        self.send(Job::Count { reply: tx });
        rx.await.map_err(|_| SqliteError::WorkerGone)
    }

    /// Queue a run of the statement prepared for request `id`. Runs happen in queue order.
    pub(crate) fn run<F>(&self, id: u64, run: F)
    where F: FnOnce(Option<&mut rusqlite::Statement<'_>>) + Send + 'static {
        self.send(Job::Run { id, run: Box::new(run) });
    }

    /// Finalize the statement prepared for request `id`
    pub(crate) fn release(&self, id: u64) {
        // a stopped worker has already finalized everything
        let _ = self.inner.jobs.send(Job::Release { id });
    }

    fn send(&self, job: Job) {
        if self.inner.jobs.send(job).is_err() {
            action_warn!("Connection", "send failed", "{}: worker has stopped", self.inner.label);
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("label", &self.inner.label).field("gate", &self.inner.gate).finish()
    }
}

fn run_worker(config: SqliteConfig, gate: Gate, mut jobs: mpsc::UnboundedReceiver<Job>) {
    let label = config.label();
    let conn = match config.connect() {
        Ok(conn) => conn,
        Err(err) => fatal(&label, &err),
    };
    action_debug!("Connection", "open", "{}", label);

    gate.open();

    let mut statements: HashMap<u64, rusqlite::Statement<'_>> = HashMap::new();
    while let Some(job) = jobs.blocking_recv() {
        match job {
            Job::Prepare { id, sql, attach } => match conn.prepare(&sql) {
                Ok(stmt) => {
                    let compiled = Compiled::describe(&sql, &stmt);
                    statements.insert(id, stmt);
                    attach(Ok(compiled));
                }
                Err(err) => attach(Err(err)),
            },
            Job::Run { id, run } => run(statements.get_mut(&id)),
            Job::Release { id } => {
                statements.remove(&id);
            }
            Job::Count { reply } => {
                let _ = reply.send(statements.len());
            }
        }
    }
    drop(statements);
    action_debug!("Connection", "closed", "{}", label);
}

fn fatal(label: &str, err: &dyn fmt::Display) -> ! {
    action_error!("Connection", "open failed", "{}: {}", label, err);
    std::process::exit(1)
}
