//! # Work function abstraction (`Work`, `WorkFn`).
//!
//! [`Work`] is the unit the scheduler runs at each occurrence. One call
//! to [`Work::invoke`] is one invocation; implementations produce a
//! fresh future per call, so there is no hidden state shared between
//! occurrences. If shared state is needed, capture an `Arc<...>`
//! explicitly inside the closure.
//!
//! Work receives no cancellation handle: the scheduler never interrupts
//! an invocation in flight. Stopping a task only stops the *scheduling*
//! of further occurrences.
//!
//! ## Example
//! ```rust
//! use cronvisor::{WorkFn, WorkRef};
//!
//! let work: WorkRef = WorkFn::arc(|| async {
//!     // do work...
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

/// # One schedulable unit of work.
///
/// Each occurrence of a task calls [`invoke`](Work::invoke) once. The
/// scheduler wraps the call with panic containment and duration
/// instrumentation, so implementations may panic without killing the
/// task's loop (the panic is logged and the next occurrence still
/// fires).
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Executes one invocation to completion.
    async fn invoke(&self);
}

/// Shared handle to a work implementation.
pub type WorkRef = Arc<dyn Work>;

/// Function-backed work implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct WorkFn<F> {
    f: F,
}

impl<F> WorkFn<F> {
    /// Creates new function-backed work.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a [`WorkRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the work and returns it as a shared handle (`Arc<Self>`).
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn invoke(&self) {
        (self.f)().await;
    }
}
