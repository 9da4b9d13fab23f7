//! # Logging capability.
//!
//! Provides [`Logger`], the observability seam of the scheduler. The
//! scheduler and every task loop hold a [`LoggerRef`] and call it
//! synchronously at defined points (task started/stopped, invocation
//! duration, panic, stop timeout, schedule exhaustion). The core never
//! inspects the sink's behavior.
//!
//! There is no process-wide default: the logger is injected through
//! [`Config`](crate::Config) or per task via
//! [`TaskSpec::with_logger`](crate::TaskSpec::with_logger).
//!
//! ## Rules
//! - Calls are synchronous and must be cheap; do not block the executor.
//! - Handle errors internally; do not panic.
//!
//! ## Example
//! ```rust
//! use cronvisor::{Level, Logger};
//!
//! struct Collector;
//!
//! impl Logger for Collector {
//!     fn log(&self, task: &str, level: Level, payload: &str) {
//!         if level == Level::Warn {
//!             eprintln!("{task}: {payload}");
//!         }
//!     }
//! }
//! ```

use std::sync::Arc;

/// Log scope used for scheduler-level entries (start/stop bookkeeping),
/// as opposed to entries attributed to an individual task.
pub const SCHEDULER_SCOPE: &str = "scheduler";

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Routine lifecycle information (task started, invocation duration).
    Info,
    /// Something went wrong but the scheduler keeps going
    /// (work panic, stop timeout, exhausted schedule).
    Warn,
}

impl Level {
    /// Returns a short stable label for the level.
    pub fn as_label(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
        }
    }
}

/// Injected logging sink.
///
/// `task` is the task name the entry is attributed to, or
/// [`SCHEDULER_SCOPE`] for scheduler-level entries.
pub trait Logger: Send + Sync + 'static {
    /// Records one entry. Called synchronously from the scheduler and
    /// from task loops; implementations must not block.
    fn log(&self, task: &str, level: Level, payload: &str);
}

/// Shared handle to a logger.
pub type LoggerRef = Arc<dyn Logger>;

/// Simple stdout logger.
///
/// Prints one line per entry in a `[level] task=... msg` format.
/// Useful for development and demos; implement [`Logger`] yourself for
/// structured logging or metrics collection.
pub struct LogWriter;

impl Logger for LogWriter {
    fn log(&self, task: &str, level: Level, payload: &str) {
        println!("[{}] task={task} {payload}", level.as_label());
    }
}

/// Logger that discards everything. Handy for quiet embedding and tests.
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _task: &str, _level: Level, _payload: &str) {}
}
