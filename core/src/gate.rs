//! One-shot readiness gate with an ordered backlog.
//!
//! A [`Gate`] starts closed. Tasks submitted while it is closed are queued. Opening the gate
//! runs the queue oldest-first, each task to completion before the next one starts; once the
//! queue is empty the gate is open and later submissions run inline on the caller's thread.
//!
//! Tasks are plain synchronous closures. A task that has to wait on I/O hands the work off
//! (to a worker, a channel) and returns, so the gate itself never blocks.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Queueing submitted tasks
    Closed,
    /// `open` was called and the backlog is being run. New tasks still queue behind it.
    Draining,
    /// Backlog is empty, tasks run inline
    Open,
}

#[derive(Clone)]
pub struct Gate {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    notify: Notify,
}

struct State {
    phase: Phase,
    pending: VecDeque<Task>,
}

impl Gate {
    pub fn new() -> Self {
        Self { inner: Arc::new(Inner { state: Mutex::new(State { phase: Phase::Closed, pending: VecDeque::new() }), notify: Notify::new() }) }
    }

    /// Run `task` now if the gate is open, otherwise append it to the backlog.
    pub fn submit<F>(&self, task: F)
    where F: FnOnce() + Send + 'static {
        {
            let mut state = self.lock();
            if state.phase != Phase::Open {
                state.pending.push_back(Box::new(task));
                return;
            }
        }
        task();
    }

    /// Open the gate and run the backlog in submission order.
    ///
    /// Only the first call has any effect. The lock is released while each task runs, so a task
    /// may submit to this same gate; such a task lands behind whatever is still queued. A task
    /// that panics is logged and skipped; the rest of the backlog still runs.
    pub fn open(&self) {
        {
            let mut state = self.lock();
            if state.phase != Phase::Closed {
                return;
            }
            state.phase = Phase::Draining;
        }

        loop {
            let task = {
                let mut state = self.lock();
                match state.pending.pop_front() {
                    Some(task) => task,
                    None => {
                        state.phase = Phase::Open;
                        break;
                    }
                }
            };
            if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(task)) {
                crate::action_warn!("Gate", "task panicked", "{}", panic_message(panic.as_ref()));
            }
        }

        self.inner.notify.notify_waiters();
    }

    pub fn phase(&self) -> Phase { self.lock().phase }

    pub fn is_open(&self) -> bool { self.phase() == Phase::Open }

    /// Number of tasks waiting for the gate to open
    pub fn pending(&self) -> usize { self.lock().pending.len() }

    /// Resolves once the gate is open and its backlog has been run.
    pub async fn opened(&self) {
        let mut notified = std::pin::pin!(self.inner.notify.notified());
        notified.as_mut().enable();
        if self.is_open() {
            return;
        }
        notified.await;
    }

    fn lock(&self) -> MutexGuard<'_, State> { self.inner.state.lock().unwrap_or_else(PoisonError::into_inner) }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

impl Default for Gate {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Gate").field("phase", &state.phase).field("pending", &state.pending.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> Box<dyn FnOnce() + Send>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let push_log = log.clone();
        let push = move |n: u32| {
            let log = push_log.clone();
            Box::new(move || log.lock().unwrap().push(n)) as Box<dyn FnOnce() + Send>
        };
        (log, push)
    }

    #[test]
    fn test_backlog_runs_in_submission_order() {
        let gate = Gate::new();
        let (log, push) = recorder();

        for n in 1..=5 {
            gate.submit(push(n));
        }
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(gate.pending(), 5);

        gate.open();
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(gate.pending(), 0);
        assert!(gate.is_open());
    }

    #[test]
    fn test_open_twice_does_not_rerun() {
        let gate = Gate::new();
        let (log, push) = recorder();

        gate.submit(push(1));
        gate.open();
        gate.open();
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_submit_after_open_runs_inline() {
        let gate = Gate::new();
        let (log, push) = recorder();

        gate.open();
        gate.submit(push(7));
        // no open() needed, the task ran in this call
        assert_eq!(*log.lock().unwrap(), vec![7]);
    }

    #[test]
    fn test_reentrant_submit_queues_behind_backlog() {
        let gate = Gate::new();
        let (log, push) = recorder();

        let inner_gate = gate.clone();
        let late = push(3);
        let first = push(1);
        gate.submit(move || {
            first();
            inner_gate.submit(late);
        });
        gate.submit(push(2));

        gate.open();
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_chained_gates() {
        // outer gate must open before the task that opens the inner gate can run
        let outer = Gate::new();
        let inner = Gate::new();
        let (log, push) = recorder();

        inner.submit(push(2));
        let opener = inner.clone();
        let first = push(1);
        outer.submit(move || {
            first();
            opener.open();
        });

        assert_eq!(inner.phase(), Phase::Closed);
        assert!(log.lock().unwrap().is_empty());

        outer.open();
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_panicking_task_does_not_strand_backlog() {
        let gate = Gate::new();
        let (log, push) = recorder();

        gate.submit(push(1));
        gate.submit(|| panic!("task failed"));
        gate.submit(push(2));

        gate.open();
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
        assert_eq!(gate.phase(), Phase::Open);
        assert_eq!(gate.pending(), 0);

        gate.submit(push(3));
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_opened_resolves_after_panicking_task() {
        let gate = Gate::new();
        gate.submit(|| panic!("task failed"));
        gate.open();
        tokio::time::timeout(Duration::from_millis(50), gate.opened()).await.unwrap();
    }

    #[tokio::test]
    async fn test_opened_resolves_after_open() {
        let gate = Gate::new();
        let waiter = gate.clone();
        let handle = tokio::spawn(async move { waiter.opened().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        gate.open();
        tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();

        // already open: resolves immediately
        tokio::time::timeout(Duration::from_millis(50), gate.opened()).await.unwrap();
    }
}
