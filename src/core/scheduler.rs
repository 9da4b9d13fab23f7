//! # Scheduler: registry and stop/wait coordination.
//!
//! The [`Scheduler`] owns a guarded registry of named tasks, spawns one
//! [`TaskActor`] per task at [`Scheduler::start`], and drives the
//! stop-with-timeout protocol:
//!
//! ```text
//! stop_task(name):
//!   take RunHandle (atomic, under write lock)   ── unknown name → error
//!   spawn detached:                             ── already taken → no-op
//!     cancel token
//!     race stop_timeout vs actor JoinHandle
//!       ├─ joined     → "task stopped"
//!       └─ timed out  → WARN, loop keeps draining but is already
//!                       cancelled; never force-killed
//!     completion.done()      (exactly once, on every branch)
//!
//! wait(): blocks until completion count reaches zero
//! ```
//!
//! ## Rules
//! - Registration is closed once started; `add_task` after `start`
//!   fails loudly.
//! - The registry is a `tokio::sync::RwLock`; concurrent `stop_task`
//!   and `stop` calls are race-free.
//! - Stop is idempotent: the first request takes the task's handle,
//!   later requests no-op. The completion counter is decremented
//!   exactly once per started task, so `wait` can never hang.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::core::actor::TaskActor;
use crate::core::completion::Completion;
use crate::error::RuntimeError;
use crate::logging::{Level, LogWriter, LoggerRef, SCHEDULER_SCOPE};
use crate::tasks::TaskSpec;

/// Scheduler-wide configuration.
///
/// ## Field semantics
/// - `stop_timeout`: how long a stop request waits for a task's loop to
///   acknowledge before giving up on it (per-task override via
///   [`TaskSpec::with_stop_timeout`]). The wait is bookkeeping only —
///   the loop is never force-killed.
/// - `logger`: default logging sink, shared with every task loop unless
///   overridden via [`TaskSpec::with_logger`].
#[derive(Clone)]
pub struct Config {
    /// Default wait for a task's stop acknowledgement.
    pub stop_timeout: Duration,
    /// Default logging sink.
    pub logger: LoggerRef,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `stop_timeout = 30s`
    /// - `logger = LogWriter` (stdout)
    fn default() -> Self {
        Self {
            stop_timeout: Duration::from_secs(30),
            logger: Arc::new(LogWriter),
        }
    }
}

/// Handle to a running task loop.
struct RunHandle {
    /// Join handle for the actor's tokio task; completion is the stop
    /// acknowledgement.
    join: JoinHandle<()>,
    /// Cancellation token observed by the actor's loop.
    cancel: CancellationToken,
}

/// Registry entry: the task's spec plus its runtime state.
struct Entry {
    spec: TaskSpec,
    stop_timeout: Duration,
    /// `Some` while the task runs and no stop has been requested.
    /// Taken (exactly once) by the first stop request.
    run: Option<RunHandle>,
}

/// Coordinates named recurring tasks: registration, start, cooperative
/// stop with per-task timeout, and wait-for-all-stopped.
///
/// ## Example
/// ```no_run
/// use std::time::Duration;
/// use cronvisor::{Config, Scheduler, TaskSpec, WorkFn};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let sched = Scheduler::new(Config::default());
///
/// sched.add_task(
///     TaskSpec::new("heartbeat", "*/1 * * * * *", WorkFn::arc(|| async {
///         // ping...
///     }))?
///     .with_stop_timeout(Duration::from_secs(2)),
/// ).await?;
///
/// sched.start().await;
/// // ... later:
/// sched.stop().await;
/// sched.wait().await;
/// # Ok(())
/// # }
/// ```
pub struct Scheduler {
    cfg: Config,
    tasks: RwLock<HashMap<String, Entry>>,
    completion: Arc<Completion>,
    started: AtomicBool,
}

impl Scheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            tasks: RwLock::new(HashMap::new()),
            completion: Arc::new(Completion::new()),
            started: AtomicBool::new(false),
        }
    }

    /// Registers a task. Must be called before [`Scheduler::start`].
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::AlreadyStarted`] after `start`.
    /// - [`RuntimeError::DuplicateTask`] if the name is taken.
    pub async fn add_task(&self, spec: TaskSpec) -> Result<(), RuntimeError> {
        let mut tasks = self.tasks.write().await;
        if self.started.load(Ordering::Acquire) {
            return Err(RuntimeError::AlreadyStarted);
        }

        let name = spec.name().to_string();
        if tasks.contains_key(&name) {
            return Err(RuntimeError::DuplicateTask { name });
        }

        let stop_timeout = spec.stop_timeout().unwrap_or(self.cfg.stop_timeout);
        tasks.insert(
            name,
            Entry {
                spec,
                stop_timeout,
                run: None,
            },
        );
        Ok(())
    }

    /// Starts every registered task's loop. Returns immediately.
    ///
    /// Each task gets its own tokio task and cancellation token, and is
    /// counted toward [`Scheduler::wait`]. A second call is a no-op.
    pub async fn start(&self) {
        let mut tasks = self.tasks.write().await;
        if self.started.swap(true, Ordering::AcqRel) {
            return;
        }

        for (name, entry) in tasks.iter_mut() {
            let logger = entry
                .spec
                .logger()
                .cloned()
                .unwrap_or_else(|| Arc::clone(&self.cfg.logger));

            let actor = TaskActor::new(
                name.as_str(),
                entry.spec.schedule().clone(),
                Arc::clone(entry.spec.work()),
                entry.spec.detached(),
                logger,
            );

            self.completion.add(1);
            self.cfg.logger.log(
                SCHEDULER_SCOPE,
                Level::Info,
                &format!("task {name} started"),
            );

            let cancel = CancellationToken::new();
            let join = tokio::spawn(actor.run(cancel.clone()));
            entry.run = Some(RunHandle { join, cancel });
        }
    }

    /// Requests a stop of one task and drives the timeout-bounded stop
    /// protocol for it as a detached activity; the caller is never
    /// blocked on the task's acknowledgement.
    ///
    /// Idempotent: stopping a task that is already stopping (or was
    /// never started) is a logged no-op.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::TaskNotFound`] if no task with that name was
    /// ever registered.
    pub async fn stop_task(&self, name: &str) -> Result<(), RuntimeError> {
        let (run, stop_timeout) = {
            let mut tasks = self.tasks.write().await;
            let entry = tasks
                .get_mut(name)
                .ok_or_else(|| RuntimeError::TaskNotFound {
                    name: name.to_string(),
                })?;
            (entry.run.take(), entry.stop_timeout)
        };

        match run {
            None => {
                self.cfg.logger.log(
                    SCHEDULER_SCOPE,
                    Level::Info,
                    &format!("task {name} already stopped"),
                );
            }
            Some(handle) => {
                self.cfg
                    .logger
                    .log(SCHEDULER_SCOPE, Level::Info, &format!("task {name} stop"));
                self.drive_stop(name.to_string(), handle, stop_timeout);
            }
        }
        Ok(())
    }

    /// Requests a stop of every registered task.
    pub async fn stop(&self) {
        let names: Vec<String> = {
            let tasks = self.tasks.read().await;
            tasks.keys().cloned().collect()
        };
        for name in names {
            // Names were just read from the registry; lookups cannot miss.
            let _ = self.stop_task(&name).await;
        }
    }

    /// Blocks until every started task has stopped or its stop timed
    /// out. After [`Scheduler::stop`] this is bounded by the largest
    /// per-task stop timeout.
    pub async fn wait(&self) {
        self.completion.wait().await;
    }

    /// Returns the sorted names of registered tasks.
    pub async fn names(&self) -> Vec<String> {
        let tasks = self.tasks.read().await;
        let mut names: Vec<String> = tasks.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Spawns the stop protocol for one taken handle: cancel, race the
    /// timeout against the loop's acknowledgement, then mark the task
    /// done exactly once regardless of which side won.
    fn drive_stop(&self, name: String, handle: RunHandle, stop_timeout: Duration) {
        let completion = Arc::clone(&self.completion);
        let logger = Arc::clone(&self.cfg.logger);

        tokio::spawn(async move {
            handle.cancel.cancel();
            match time::timeout(stop_timeout, handle.join).await {
                Ok(Ok(())) => {
                    logger.log(
                        SCHEDULER_SCOPE,
                        Level::Info,
                        &format!("task {name} stopped"),
                    );
                }
                Ok(Err(_join_err)) => {
                    // Actor loops contain work panics; reaching this arm
                    // means the loop itself died.
                    logger.log(
                        SCHEDULER_SCOPE,
                        Level::Warn,
                        &format!("task {name} loop panicked"),
                    );
                }
                Err(_elapsed) => {
                    logger.log(
                        SCHEDULER_SCOPE,
                        Level::Warn,
                        &format!("task {name} stop timed out after {stop_timeout:?}"),
                    );
                }
            }
            completion.done();
        });
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
