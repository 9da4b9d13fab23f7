//! # Recurrence rules.
//!
//! [`Schedule`] is a validated cron expression. Parsing happens once, at
//! registration time — a rule that does not parse is rejected with
//! [`ScheduleError`] before a task can be registered, so the execution
//! loop only ever sees well-formed rules.
//!
//! The expression format is the six-field cron syntax
//! (`sec min hour day-of-month month day-of-week`, with an optional
//! seventh year field), supporting `*`, steps (`*/N`), ranges and lists.
//! Field semantics are delegated entirely to the [`cron`] crate.
//!
//! ## Example
//! ```rust
//! use chrono::Utc;
//! use cronvisor::Schedule;
//!
//! // every third second
//! let every_3s = Schedule::parse("*/3 * * * * *").unwrap();
//! let next = every_3s.next_after(Utc::now()).unwrap();
//! assert!(next > Utc::now() - chrono::Duration::seconds(1));
//!
//! // malformed rules are rejected up front
//! assert!(Schedule::parse("not a rule").is_err());
//! ```

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::ScheduleError;

/// A validated recurrence rule.
///
/// Construct with [`Schedule::parse`]; query with [`Schedule::next_after`]
/// or [`Schedule::until_next`]. Both return `None` when the rule yields
/// no further occurrence (e.g. a spent year field) — the loop treats
/// that as "park until stopped", never as an error.
#[derive(Clone, Debug)]
pub struct Schedule {
    expr: String,
    inner: cron::Schedule,
}

impl Schedule {
    /// Parses a cron expression into a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Parse`] if the expression is malformed.
    pub fn parse(expr: &str) -> Result<Self, ScheduleError> {
        let inner = cron::Schedule::from_str(expr)?;
        Ok(Self {
            expr: expr.to_string(),
            inner,
        })
    }

    /// Returns the original expression string.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// Returns the first occurrence strictly after `from`, if any.
    pub fn next_after(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.inner.after(&from).next()
    }

    /// Returns the time remaining from `now` until the next occurrence.
    ///
    /// `None` means the rule yields no further occurrence. An occurrence
    /// computed in the past (clock moved during computation) is clamped
    /// to `Duration::ZERO`, i.e. immediately due.
    pub fn until_next(&self, now: DateTime<Utc>) -> Option<Duration> {
        let next = self.next_after(now)?;
        Some((next - now).to_std().unwrap_or(Duration::ZERO))
    }
}
