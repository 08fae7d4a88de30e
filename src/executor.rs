//! Deferred navigation and background work.
//!
//! Navigation runs on one thread: every operation takes `&mut Navigator`.
//! Code that cannot borrow the navigator (a lifecycle callback of the
//! navigation in flight, a worker thread, a timer) goes through a
//! [`Dispatcher`] instead. The dispatcher queues the request; the navigation
//! thread executes it later with
//! [`Navigator::process_pending`](crate::Navigator::process_pending) or
//! [`Navigator::wait_pending`](crate::Navigator::wait_pending).
//!
//! Background work runs on a [`TaskExecutor`]. Its result is marshalled back
//! through the same queue, so the completion callback only ever touches the
//! stack and display surface from the navigation thread. A job that panics
//! reaches its completion as `Err(TaskError)`.
//!
//! ```ignore
//! let pool = ThreadExecutor::new();
//! let dispatcher = navigator.dispatcher();
//! dispatcher.submit(&pool, || fetch_report(), |nav, report| match report {
//!     Ok(report) => { nav.to("report", Args::new(report)).ok(); }
//!     Err(err) => eprintln!("{err}"),
//! });
//! // ... in the UI loop:
//! navigator.process_pending();
//! ```

use crate::args::Args;
use crate::error::TaskError;
use crate::navigator::Navigator;
use crate::{debug_log, error_log, trace_log};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Worker count of [`ThreadExecutor::new`].
pub const DEFAULT_WORKERS: usize = 4;

// ============================================================================
// Commands
// ============================================================================

/// A navigation operation queued for later execution.
#[derive(Debug, Clone)]
pub enum NavigationCommand {
    /// [`Navigator::to`](crate::Navigator::to)
    To { route: String, args: Args },
    /// [`Navigator::off`](crate::Navigator::off)
    Off { route: String, args: Args },
    /// [`Navigator::off_all`](crate::Navigator::off_all)
    OffAll { route: String, args: Args },
    /// [`Navigator::back`](crate::Navigator::back)
    Back,
    /// [`Navigator::pop`](crate::Navigator::pop)
    Pop,
    /// [`Navigator::refresh`](crate::Navigator::refresh)
    Refresh { args: Option<Args> },
}

/// Closure executed on the navigation thread.
pub type NavigatorTask<R> = Box<dyn FnOnce(&mut Navigator<R>) + Send + 'static>;

pub(crate) enum Pending<R: 'static> {
    Command(NavigationCommand),
    Task(NavigatorTask<R>),
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Cloneable, thread-safe handle that queues work for the navigation thread.
///
/// Every method returns `false` when the navigator has been dropped.
pub struct Dispatcher<R: 'static> {
    tx: Sender<Pending<R>>,
}

impl<R: 'static> Dispatcher<R> {
    pub(crate) fn new(tx: Sender<Pending<R>>) -> Self {
        Self { tx }
    }

    /// Queue a navigation command.
    pub fn dispatch(&self, command: NavigationCommand) -> bool {
        trace_log!("Queued {:?}", command);
        self.tx.send(Pending::Command(command)).is_ok()
    }

    /// Queue a closure that gets the navigator on the navigation thread.
    pub fn run<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut Navigator<R>) + Send + 'static,
    {
        self.tx.send(Pending::Task(Box::new(task))).is_ok()
    }

    /// Queue `to(route, args)`.
    pub fn to(&self, route: impl Into<String>, args: Args) -> bool {
        self.dispatch(NavigationCommand::To {
            route: route.into(),
            args,
        })
    }

    /// Queue `off(route, args)`.
    pub fn off(&self, route: impl Into<String>, args: Args) -> bool {
        self.dispatch(NavigationCommand::Off {
            route: route.into(),
            args,
        })
    }

    /// Queue `off_all(route, args)`.
    pub fn off_all(&self, route: impl Into<String>, args: Args) -> bool {
        self.dispatch(NavigationCommand::OffAll {
            route: route.into(),
            args,
        })
    }

    /// Queue `back()`.
    pub fn back(&self) -> bool {
        self.dispatch(NavigationCommand::Back)
    }

    /// Queue `pop()`.
    pub fn pop(&self) -> bool {
        self.dispatch(NavigationCommand::Pop)
    }

    /// Queue `refresh(args)`.
    pub fn refresh(&self, args: Option<Args>) -> bool {
        self.dispatch(NavigationCommand::Refresh { args })
    }

    /// Run `work` on `executor` and queue `on_complete` with its output for
    /// the navigation thread.
    ///
    /// A panic in `work` is caught and delivered as `Err(TaskError)`.
    pub fn submit<T, W, C>(&self, executor: &dyn TaskExecutor, work: W, on_complete: C)
    where
        T: Send + 'static,
        W: FnOnce() -> T + Send + 'static,
        C: FnOnce(&mut Navigator<R>, Result<T, TaskError>) + Send + 'static,
    {
        let tx = self.tx.clone();
        executor.execute(Box::new(move || {
            let output = panic::catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
                let err = TaskError::from_panic(payload.as_ref());
                error_log!("Background task panicked: {}", err.message);
                err
            });
            let task: NavigatorTask<R> = Box::new(move |navigator| on_complete(navigator, output));
            if tx.send(Pending::Task(task)).is_err() {
                trace_log!("Navigator dropped before background task completed");
            }
        }));
    }
}

impl<R: 'static> Clone for Dispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<R: 'static> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

// ============================================================================
// Executors
// ============================================================================

/// Job handed to a [`TaskExecutor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs background jobs.
pub trait TaskExecutor {
    /// Run `job`, on whatever thread the executor chooses.
    fn execute(&self, job: Job);
}

/// Fixed-size pool of worker threads sharing one job queue.
///
/// Dropping the pool lets the workers finish the queued jobs and exit
/// without waiting for them; [`shutdown`](Self::shutdown) waits.
pub struct ThreadExecutor {
    sender: Option<Mutex<Sender<Job>>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadExecutor {
    /// Pool of [`DEFAULT_WORKERS`] threads.
    pub fn new() -> Self {
        Self::with_workers(DEFAULT_WORKERS)
    }

    /// Pool of `count` threads, at least one.
    pub fn with_workers(count: usize) -> Self {
        let count = count.max(1);
        let (tx, rx) = mpsc::channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));
        let workers = (0..count)
            .filter_map(|index| {
                let rx = Arc::clone(&rx);
                thread::Builder::new()
                    .name(format!("navigator-worker-{index}"))
                    .spawn(move || Self::work(&rx))
                    .map_err(|err| {
                        error_log!("Failed to spawn worker {}: {}", index, err);
                    })
                    .ok()
            })
            .collect();
        debug_log!("Started {} background workers", count);
        Self {
            sender: Some(Mutex::new(tx)),
            workers,
        }
    }

    /// Number of running worker threads.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Stop accepting jobs and wait for the queued ones to finish.
    pub fn shutdown(mut self) {
        self.sender = None;
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error_log!("Background worker exited with a panic");
            }
        }
    }

    fn work(rx: &Mutex<Receiver<Job>>) {
        loop {
            let job = match rx.lock() {
                Ok(rx) => rx.recv(),
                Err(_) => return,
            };
            let Ok(job) = job else {
                trace_log!("Job queue closed, worker exiting");
                return;
            };
            if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                error_log!("Background job panicked");
            }
        }
    }
}

impl Default for ThreadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskExecutor for ThreadExecutor {
    fn execute(&self, job: Job) {
        let sent = match &self.sender {
            Some(sender) => sender.lock().map(|tx| tx.send(job).is_ok()).unwrap_or(false),
            None => false,
        };
        if !sent {
            error_log!("Background pool is shut down, job dropped");
        }
    }
}

impl fmt::Debug for ThreadExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadExecutor")
            .field("workers", &self.workers.len())
            .finish()
    }
}

/// Runs every job immediately on the calling thread.
///
/// The completion callback is still queued, never called inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl TaskExecutor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}
