//! # Completion tracking for started tasks.
//!
//! [`Completion`] counts tasks that have been started but whose stop
//! protocol has not yet finished. [`Completion::wait`] resolves once the
//! count reaches zero — that is the only way a caller observes "every
//! started task has fully stopped or timed out".
//!
//! The counter tracks *stop-protocol completions*, not loop joins: a
//! task whose loop outlives its stop timeout is still counted as done
//! (the scheduler gave up waiting on it), so `wait` is bounded even
//! with stuck work.
//!
//! ## Rules
//! - `add` happens once per task at start.
//! - `done` happens exactly once per started task, on every stop branch
//!   (acknowledged or timed out).
//! - `wait` with nothing started returns immediately.

use tokio::sync::watch;

/// Shared count of started-but-not-yet-stopped tasks.
///
/// Built on [`tokio::sync::watch`] so waiters are woken on every change
/// instead of polling.
pub struct Completion {
    count: watch::Sender<usize>,
}

impl Completion {
    /// Creates a tracker with a count of zero.
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self { count }
    }

    /// Adds `n` started tasks to the count.
    pub fn add(&self, n: usize) {
        self.count.send_modify(|c| *c += n);
    }

    /// Marks one task's stop protocol as finished.
    pub fn done(&self) {
        self.count.send_modify(|c| *c = c.saturating_sub(1));
    }

    /// Resolves once the count reaches zero.
    pub async fn wait(&self) {
        let mut rx = self.count.subscribe();
        // Cannot fail: `self` keeps the sender alive for the whole wait.
        let _ = rx.wait_for(|c| *c == 0).await;
    }

    /// Returns the current count.
    pub fn pending(&self) -> usize {
        *self.count.borrow()
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}
