//! # TaskActor: one task's recurrence loop.
//!
//! Runs the work function of a single task at each occurrence of its
//! [`Schedule`], until cancelled:
//! - timer-driven wakeups via `tokio::time::sleep_until`,
//! - cooperative stop via [`CancellationToken`],
//! - panic containment per invocation,
//! - duration instrumentation per invocation.
//!
//! ## Loop structure
//! ```text
//! arm first deadline
//! loop {
//!   select! {
//!     stop cancelled  ─► return          (acknowledged by loop exit)
//!     deadline fires  ─► re-arm next deadline
//!                        dispatch work (awaited, or spawned if detached)
//!   }
//! }
//! ```
//!
//! ## Rules
//! - The deadline is re-armed **before** dispatch, so an attached
//!   invocation that overruns its interval makes the next occurrence
//!   immediately due when it returns. Missed ticks are not replayed:
//!   one late fire, then the schedule realigns.
//! - Attached mode serializes invocations by construction: the loop is
//!   inside `dispatch` while work runs, so occurrence N+1 cannot start
//!   before N's wrapper returns.
//! - A schedule with no future occurrence parks the loop (one WARN,
//!   then wait for stop). It never busy-loops and never exits on its
//!   own.
//! - Cancellation wins a simultaneous wakeup: once stop is observed, no
//!   further occurrence fires.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::time::{self, Instant as Deadline};
use tokio_util::sync::CancellationToken;

use crate::logging::{Level, LoggerRef};
use crate::schedule::Schedule;
use crate::tasks::WorkRef;

/// Executes one task's recurrence loop.
///
/// Owned by the tokio task spawned at [`Scheduler::start`]; completion
/// of [`TaskActor::run`] is the stop acknowledgement the scheduler's
/// stop protocol waits for.
///
/// [`Scheduler::start`]: crate::Scheduler::start
pub struct TaskActor {
    name: Arc<str>,
    schedule: Schedule,
    work: WorkRef,
    detached: bool,
    logger: LoggerRef,
}

impl TaskActor {
    /// Creates an actor for one task.
    pub fn new(
        name: impl Into<Arc<str>>,
        schedule: Schedule,
        work: WorkRef,
        detached: bool,
        logger: LoggerRef,
    ) -> Self {
        Self {
            name: name.into(),
            schedule,
            work,
            detached,
            logger,
        }
    }

    /// Runs the loop until `stop` is cancelled.
    ///
    /// Work in flight is never interrupted: cancellation only prevents
    /// further occurrences from being scheduled. In attached mode the
    /// loop observes cancellation after the current invocation returns.
    pub async fn run(self, stop: CancellationToken) {
        let Some(mut deadline) = self.arm() else {
            return self.park(&stop).await;
        };

        loop {
            tokio::select! {
                biased;
                () = stop.cancelled() => return,
                () = time::sleep_until(deadline) => {
                    deadline = match self.arm() {
                        Some(d) => d,
                        None => return self.park(&stop).await,
                    };
                    self.dispatch().await;
                }
            }
        }
    }

    /// Computes the next occurrence as a timer deadline.
    ///
    /// An occurrence already in the past maps to an expired deadline,
    /// i.e. an immediate fire.
    fn arm(&self) -> Option<Deadline> {
        let until = self.schedule.until_next(Utc::now())?;
        Some(Deadline::now() + until)
    }

    /// Terminal state for a schedule with no future occurrence: report
    /// once, then hold until stopped.
    async fn park(&self, stop: &CancellationToken) {
        self.logger.log(
            &self.name,
            Level::Warn,
            "schedule yields no future occurrence",
        );
        stop.cancelled().await;
    }

    /// Runs one invocation through the instrumented wrapper.
    ///
    /// The work future itself executes inside `tokio::spawn`, so a
    /// panicking invocation surfaces as a `JoinError` here instead of
    /// unwinding through the loop. Detached mode spawns the wrapper as
    /// well and returns immediately.
    async fn dispatch(&self) {
        let name = Arc::clone(&self.name);
        let logger = Arc::clone(&self.logger);
        let work = Arc::clone(&self.work);

        let wrapper = async move {
            let started = Instant::now();
            match tokio::spawn(async move { work.invoke().await }).await {
                Ok(()) => {
                    let elapsed = started.elapsed();
                    logger.log(&name, Level::Info, &format!("finished in {elapsed:?}"));
                }
                Err(err) if err.is_panic() => {
                    let payload = panic_message(err.into_panic());
                    logger.log(&name, Level::Warn, &payload);
                }
                Err(_) => {} // runtime shutting down, invocation never completed
            }
        };

        if self.detached {
            tokio::spawn(wrapper);
        } else {
            wrapper.await;
        }
    }
}

/// Renders a panic payload for the log.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
