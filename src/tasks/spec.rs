//! # Task specification.
//!
//! [`TaskSpec`] bundles everything the scheduler needs to run one
//! recurring task: a unique name, a parsed [`Schedule`], the work to
//! run, and per-task overrides (detached execution, stop timeout,
//! logger).
//!
//! The recurrence rule is parsed inside [`TaskSpec::new`] — a malformed
//! rule is rejected here, at registration time, instead of surfacing as
//! log noise once the task is running.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use cronvisor::{TaskSpec, WorkFn};
//!
//! let spec = TaskSpec::new("sync-prices", "*/3 * * * * *", WorkFn::arc(|| async {
//!     // fetch and store...
//! }))
//! .unwrap()
//! .with_detached(true)
//! .with_stop_timeout(Duration::from_secs(2));
//!
//! assert_eq!(spec.name(), "sync-prices");
//! assert!(spec.detached());
//! ```

use std::time::Duration;

use crate::error::ScheduleError;
use crate::logging::LoggerRef;
use crate::schedule::Schedule;
use crate::tasks::work::WorkRef;

/// Specification for one recurring task.
///
/// Defaults: attached execution (occurrence N+1 is scheduled only after
/// invocation N returns), scheduler-wide stop timeout, scheduler-wide
/// logger. Each default can be overridden with the `with_*` methods.
#[derive(Clone)]
pub struct TaskSpec {
    name: String,
    schedule: Schedule,
    work: WorkRef,
    detached: bool,
    stop_timeout: Option<Duration>,
    logger: Option<LoggerRef>,
}

impl TaskSpec {
    /// Creates a specification, parsing `rule` eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Parse`] if `rule` is not a valid cron
    /// expression.
    pub fn new(
        name: impl Into<String>,
        rule: &str,
        work: WorkRef,
    ) -> Result<Self, ScheduleError> {
        Ok(Self {
            name: name.into(),
            schedule: Schedule::parse(rule)?,
            work,
            detached: false,
            stop_timeout: None,
            logger: None,
        })
    }

    /// Detached execution: each invocation runs as its own tokio task
    /// and the next occurrence is scheduled immediately, so invocations
    /// may overlap. When `false` (default) invocations are strictly
    /// serialized per task.
    pub fn with_detached(mut self, detached: bool) -> Self {
        self.detached = detached;
        self
    }

    /// Overrides how long the scheduler waits for this task's loop to
    /// acknowledge a stop request before giving up on it.
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = Some(timeout);
        self
    }

    /// Overrides the logger for this task's loop.
    pub fn with_logger(mut self, logger: LoggerRef) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns the task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parsed recurrence rule.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Returns the work handle.
    pub fn work(&self) -> &WorkRef {
        &self.work
    }

    /// Returns whether invocations run detached.
    pub fn detached(&self) -> bool {
        self.detached
    }

    /// Returns the stop-timeout override, if configured.
    pub fn stop_timeout(&self) -> Option<Duration> {
        self.stop_timeout
    }

    /// Returns the logger override, if configured.
    pub fn logger(&self) -> Option<&LoggerRef> {
        self.logger.as_ref()
    }
}
