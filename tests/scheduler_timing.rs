//! End-to-end timing behavior of the scheduler: occurrence spacing,
//! attached vs detached execution, panic containment, and the bounded
//! stop/wait protocol.
//!
//! These tests run against the real clock with second-granularity rules,
//! so every assertion leaves generous slack around scheduling jitter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cronvisor::{Config, Level, Logger, LoggerRef, NullLogger, Scheduler, TaskSpec, WorkFn};

/// Logger test double collecting every entry.
#[derive(Default)]
struct RecordingLogger {
    entries: Mutex<Vec<(String, Level, String)>>,
}

impl RecordingLogger {
    fn arc() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn contains(&self, task: &str, level: Level, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|(t, l, p)| t == task && *l == level && p.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn log(&self, task: &str, level: Level, payload: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((task.to_string(), level, payload.to_string()));
    }
}

fn quiet() -> Config {
    Config {
        stop_timeout: Duration::from_secs(5),
        logger: Arc::new(NullLogger),
    }
}

#[tokio::test]
async fn one_second_rule_fires_three_to_four_times_in_3500ms() {
    let sched = Scheduler::new(quiet());
    let count = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&count);
    sched
        .add_task(
            TaskSpec::new(
                "ticker",
                "*/1 * * * * *",
                WorkFn::arc(move || {
                    let c = Arc::clone(&c);
                    async move {
                        c.fetch_add(1, Ordering::SeqCst);
                    }
                }),
            )
            .unwrap(),
        )
        .await
        .unwrap();

    sched.start().await;
    tokio::time::sleep(Duration::from_millis(3500)).await;
    sched.stop().await;
    sched.wait().await;

    let fired = count.load(Ordering::SeqCst);
    assert!(
        (3..=4).contains(&fired),
        "expected 3-4 invocations in 3.5s, got {fired}"
    );
}

#[tokio::test]
async fn occurrences_are_spaced_at_least_the_rule_period() {
    let sched = Scheduler::new(quiet());
    let starts = Arc::new(Mutex::new(Vec::<Instant>::new()));

    let s = Arc::clone(&starts);
    sched
        .add_task(
            TaskSpec::new(
                "spaced",
                "*/2 * * * * *",
                WorkFn::arc(move || {
                    let s = Arc::clone(&s);
                    async move {
                        s.lock().unwrap().push(Instant::now());
                    }
                }),
            )
            .unwrap(),
        )
        .await
        .unwrap();

    sched.start().await;
    tokio::time::sleep(Duration::from_millis(5200)).await;
    sched.stop().await;
    sched.wait().await;

    let starts = starts.lock().unwrap();
    assert!(starts.len() >= 2, "expected at least 2 fires, got {}", starts.len());
    for pair in starts.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(
            gap >= Duration::from_millis(1800),
            "consecutive fires of a */2 rule only {gap:?} apart"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn attached_invocations_never_overlap() {
    let sched = Scheduler::new(quiet());
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let inf = Arc::clone(&in_flight);
    let max = Arc::clone(&max_seen);
    sched
        .add_task(
            TaskSpec::new(
                "serial",
                "*/1 * * * * *",
                WorkFn::arc(move || {
                    let inf = Arc::clone(&inf);
                    let max = Arc::clone(&max);
                    async move {
                        let now = inf.fetch_add(1, Ordering::SeqCst) + 1;
                        max.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(1500)).await;
                        inf.fetch_sub(1, Ordering::SeqCst);
                    }
                }),
            )
            .unwrap(),
        )
        .await
        .unwrap();

    sched.start().await;
    tokio::time::sleep(Duration::from_millis(4000)).await;
    sched.stop().await;
    sched.wait().await;

    assert_eq!(
        max_seen.load(Ordering::SeqCst),
        1,
        "attached invocations overlapped"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn detached_invocations_do_overlap() {
    let sched = Scheduler::new(quiet());
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let inf = Arc::clone(&in_flight);
    let max = Arc::clone(&max_seen);
    sched
        .add_task(
            TaskSpec::new(
                "overlapping",
                "*/1 * * * * *",
                WorkFn::arc(move || {
                    let inf = Arc::clone(&inf);
                    let max = Arc::clone(&max);
                    async move {
                        let now = inf.fetch_add(1, Ordering::SeqCst) + 1;
                        max.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(1500)).await;
                        inf.fetch_sub(1, Ordering::SeqCst);
                    }
                }),
            )
            .unwrap()
            .with_detached(true),
        )
        .await
        .unwrap();

    sched.start().await;
    tokio::time::sleep(Duration::from_millis(4000)).await;
    sched.stop().await;
    sched.wait().await;

    assert!(
        max_seen.load(Ordering::SeqCst) >= 2,
        "detached invocations with 1.5s work on a 1s rule should overlap"
    );
}

#[tokio::test]
async fn panicking_work_does_not_kill_the_loop() {
    let recorder = RecordingLogger::arc();
    let logger: LoggerRef = recorder.clone();
    let sched = Scheduler::new(Config {
        stop_timeout: Duration::from_secs(5),
        logger,
    });

    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    sched
        .add_task(
            TaskSpec::new(
                "crasher",
                "*/1 * * * * *",
                WorkFn::arc(move || {
                    let c = Arc::clone(&c);
                    async move {
                        c.fetch_add(1, Ordering::SeqCst);
                        panic!("boom");
                    }
                }),
            )
            .unwrap(),
        )
        .await
        .unwrap();

    sched.start().await;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    sched.stop().await;
    sched.wait().await;

    assert!(
        count.load(Ordering::SeqCst) >= 2,
        "loop died after the first panic"
    );
    assert!(
        recorder.contains("crasher", Level::Warn, "boom"),
        "panic payload was not logged"
    );
}

#[tokio::test]
async fn stop_of_a_blocking_task_times_out_quickly_and_wait_is_bounded() {
    let recorder = RecordingLogger::arc();
    let logger: LoggerRef = recorder.clone();
    let sched = Scheduler::new(Config {
        // "slow-stop" tasks fall back to this generous default.
        stop_timeout: Duration::from_secs(10),
        logger,
    });

    // Work blocks for 5s but its stop timeout is only 1s.
    sched
        .add_task(
            TaskSpec::new(
                "blocker",
                "*/1 * * * * *",
                WorkFn::arc(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }),
            )
            .unwrap()
            .with_stop_timeout(Duration::from_secs(1)),
        )
        .await
        .unwrap();

    // Companion task with the 10s default; stops instantly.
    sched
        .add_task(
            TaskSpec::new("prompt", "*/1 * * * * *", WorkFn::arc(|| async {}))
                .unwrap(),
        )
        .await
        .unwrap();

    sched.start().await;
    // Let the blocker enter its 5s invocation.
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let stopped_at = Instant::now();
    sched.stop().await;
    sched.wait().await;
    let waited = stopped_at.elapsed();

    assert!(
        waited < Duration::from_secs(4),
        "wait took {waited:?}; should be bounded by the 1s stop timeout, not the 5s work"
    );
    assert!(
        recorder.contains("scheduler", Level::Warn, "blocker"),
        "expected a stop-timeout warning for the blocker"
    );
    assert!(
        recorder.contains("scheduler", Level::Info, "task prompt stopped"),
        "companion task should have acknowledged its stop"
    );
}

#[tokio::test]
async fn immediate_stop_after_start_terminates_cleanly() {
    let sched = Scheduler::new(quiet());
    sched
        .add_task(
            TaskSpec::new("unfired", "*/1 * * * * *", WorkFn::arc(|| async {}))
                .unwrap(),
        )
        .await
        .unwrap();

    sched.start().await;
    sched.stop().await;

    tokio::time::timeout(Duration::from_secs(2), sched.wait())
        .await
        .expect("wait() hung after stop with zero occurrences");
}

#[tokio::test]
async fn stop_and_wait_are_bounded_with_never_returning_detached_work() {
    let sched = Scheduler::new(Config {
        stop_timeout: Duration::from_secs(2),
        logger: Arc::new(NullLogger),
    });

    sched
        .add_task(
            TaskSpec::new(
                "hung",
                "*/1 * * * * *",
                WorkFn::arc(|| async {
                    std::future::pending::<()>().await;
                }),
            )
            .unwrap()
            .with_detached(true),
        )
        .await
        .unwrap();

    sched.start().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    sched.stop().await;
    // Detached work never blocks the loop, so the ack must come fast
    // even though the invocations themselves never complete.
    tokio::time::timeout(Duration::from_secs(2), sched.wait())
        .await
        .expect("wait() hung on never-returning detached work");
}

#[tokio::test]
async fn per_task_logger_override_receives_invocation_logs() {
    let scheduler_log = RecordingLogger::arc();
    let task_log = RecordingLogger::arc();

    let sched = Scheduler::new(Config {
        stop_timeout: Duration::from_secs(5),
        logger: scheduler_log.clone(),
    });

    let override_ref: LoggerRef = task_log.clone();
    sched
        .add_task(
            TaskSpec::new("custom", "*/1 * * * * *", WorkFn::arc(|| async {}))
                .unwrap()
                .with_logger(override_ref),
        )
        .await
        .unwrap();

    sched.start().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    sched.stop().await;
    sched.wait().await;

    // Invocation logs go to the task's own logger...
    assert!(task_log.contains("custom", Level::Info, "finished in"));
    assert!(!scheduler_log.contains("custom", Level::Info, "finished in"));
    // ...while lifecycle bookkeeping stays with the scheduler's logger.
    assert!(scheduler_log.contains("scheduler", Level::Info, "task custom started"));
}

#[tokio::test]
async fn per_invocation_duration_is_logged() {
    let recorder = RecordingLogger::arc();
    let logger: LoggerRef = recorder.clone();
    let sched = Scheduler::new(Config {
        stop_timeout: Duration::from_secs(5),
        logger,
    });

    sched
        .add_task(
            TaskSpec::new("timed", "*/1 * * * * *", WorkFn::arc(|| async {}))
                .unwrap(),
        )
        .await
        .unwrap();

    sched.start().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    sched.stop().await;
    sched.wait().await;

    assert!(
        recorder.contains("timed", Level::Info, "finished in"),
        "invocation duration was not logged"
    );
}
