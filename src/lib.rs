//! # cronvisor
//!
//! **Cronvisor** is a lightweight recurring-task scheduler for Rust.
//!
//! Callers register named tasks, each pairing a cron-style recurrence
//! rule with a work function; the scheduler runs the work at every
//! occurrence and supports cooperative, timeout-bounded shutdown of one
//! task or all tasks.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TaskSpec   │   │   TaskSpec   │   │   TaskSpec   │
//!     │ (name, rule, │   │ (name, rule, │   │ (name, rule, │
//!     │    work)     │   │    work)     │   │    work)     │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Scheduler                                                    │
//! │  - Registry (RwLock map: name → spec + RunHandle)             │
//! │  - Completion (started-but-not-stopped counter, backs wait()) │
//! │  - Logger (injected sink, shared with every loop)             │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  TaskActor   │   │  TaskActor   │   │  TaskActor   │
//!     │ (timer loop) │   │ (timer loop) │   │ (timer loop) │
//!     └──────────────┘   └──────────────┘   └──────────────┘
//!       sleep_until ◄── Schedule::until_next (cron expression)
//!       dispatch ──► work invocation (panic-contained, timed,
//!                    awaited or detached)
//! ```
//!
//! ### Lifecycle
//! ```text
//! add_task(spec)      rule parsed here; bad rules never register
//!    │
//! start()             one tokio task + CancellationToken per task,
//!    │                completion counter += 1 each
//!    ▼
//! TaskActor::run()
//!    loop {
//!      ├─► sleep until next occurrence
//!      ├─► re-arm, then dispatch work
//!      │     ├─ attached  → await wrapper (strictly serialized)
//!      │     └─ detached  → spawn wrapper (may overlap)
//!      └─► on cancel → exit loop (this IS the stop acknowledgement)
//!    }
//!
//! stop() / stop_task(name)
//!    take handle ─► cancel token ─► race stop_timeout vs join
//!                     ├─ joined    → "task stopped"
//!                     └─ timed out → WARN; loop drains on its own
//!                   completion counter -= 1 (exactly once, both branches)
//!
//! wait()              resolves when the counter reaches zero
//! ```
//!
//! ## Features
//! | Area              | Description                                             | Key types / traits              |
//! |-------------------|---------------------------------------------------------|---------------------------------|
//! | **Scheduling**    | Six-field cron rules, parsed once at registration.      | [`Schedule`], [`ScheduleError`] |
//! | **Tasks**         | Work as functions or trait impls; attached or detached. | [`Work`], [`WorkFn`], [`TaskSpec`] |
//! | **Coordination**  | Start, idempotent stop with timeout, wait-for-all.      | [`Scheduler`], [`Config`]       |
//! | **Observability** | Injected synchronous logging capability.                | [`Logger`], [`LogWriter`]       |
//! | **Errors**        | Typed registry/rule errors; loud on misuse.             | [`RuntimeError`], [`ScheduleError`] |
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use cronvisor::{Config, Scheduler, TaskSpec, WorkFn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sched = Scheduler::new(Config::default());
//!
//!     // Runs every 3rd second; invocations are serialized.
//!     sched.add_task(TaskSpec::new(
//!         "sync-prices",
//!         "*/3 * * * * *",
//!         WorkFn::arc(|| async {
//!             // fetch and store...
//!         }),
//!     )?).await?;
//!
//!     // Runs every second, detached: invocations may overlap.
//!     sched.add_task(
//!         TaskSpec::new("heartbeat", "*/1 * * * * *", WorkFn::arc(|| async {
//!             // ping...
//!         }))?
//!         .with_detached(true)
//!         .with_stop_timeout(Duration::from_secs(1)),
//!     ).await?;
//!
//!     sched.start().await;
//!     tokio::time::sleep(Duration::from_secs(10)).await;
//!     sched.stop().await;
//!     sched.wait().await;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod logging;
mod schedule;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{Config, Scheduler};
pub use error::{RuntimeError, ScheduleError};
pub use logging::{Level, LogWriter, Logger, LoggerRef, NullLogger, SCHEDULER_SCOPE};
pub use schedule::Schedule;
pub use tasks::{TaskSpec, Work, WorkFn, WorkRef};
