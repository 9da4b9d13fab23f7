//! Error types used by the cronvisor scheduler.
//!
//! This module defines two error enums:
//!
//! - [`RuntimeError`] — errors raised by the scheduler's registry and
//!   control operations (`add_task`, `stop_task`).
//! - [`ScheduleError`] — errors raised while parsing a recurrence rule.
//!
//! Both types provide `as_label` helpers producing short stable strings
//! for logging and metrics.

use thiserror::Error;

/// # Errors produced by scheduler control operations.
///
/// These represent misuse of the registry rather than failures of the
/// tasks themselves: task execution never surfaces an error to the
/// caller (panics are contained and reported through the logger).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A task with the same name is already registered.
    #[error("task {name:?} is already registered")]
    DuplicateTask {
        /// The conflicting task name.
        name: String,
    },

    /// No task with the given name is registered.
    #[error("task {name:?} is not registered")]
    TaskNotFound {
        /// The requested task name.
        name: String,
    },

    /// The scheduler has already been started; registration is closed.
    #[error("scheduler already started; tasks must be added before start")]
    AlreadyStarted,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use cronvisor::RuntimeError;
    ///
    /// let err = RuntimeError::TaskNotFound { name: "reaper".into() };
    /// assert_eq!(err.as_label(), "task_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::DuplicateTask { .. } => "duplicate_task",
            RuntimeError::TaskNotFound { .. } => "task_not_found",
            RuntimeError::AlreadyStarted => "already_started",
        }
    }
}

/// # Errors produced while parsing a recurrence rule.
///
/// Rules are parsed once, at registration time. A rule that does not
/// parse never reaches the execution loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The cron expression could not be parsed.
    #[error("invalid cron expression: {0}")]
    Parse(#[from] cron::error::Error),
}

impl ScheduleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ScheduleError::Parse(_) => "schedule_parse",
        }
    }
}
