//! Run lifecycle tests: ordering, single-flight, failure reporting and reset.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lesson_console_core::error::StepError;
use lesson_console_core::log::lock_log;
use lesson_console_core::{
    ConsoleError, EntryKind, InstantPacer, OutputLog, OutputLogHandle, Pacer, ResetOutcome,
    RunOutcome, RunState, RunnerOptions, Script, Severity, Step, Task, TaskRunner,
};
use tokio::sync::Semaphore;

/// Holds every non-zero pause until the test hands out permits.
struct GatePacer {
    gate: Semaphore,
}

impl GatePacer {
    fn closed() -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
        })
    }

    fn open(&self) {
        self.gate.add_permits(1024);
    }
}

#[async_trait]
impl Pacer for GatePacer {
    async fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            tokio::task::yield_now().await;
            return;
        }
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
    }
}

fn texts(log: &OutputLogHandle) -> Vec<String> {
    lock_log(log).iter().map(|entry| entry.text.clone()).collect()
}

fn instant_runner(script: Script) -> TaskRunner {
    TaskRunner::new(OutputLog::new().shared(), script, Arc::new(InstantPacer))
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[tokio::test]
async fn test_prologue_task_epilogue_order_and_indices() {
    let script = Script::new(vec![Task::builder("only").line("A", Severity::Info, 10).build()])
        .with_prologue(vec![
            Step::line("booting", Severity::System, ms(10)),
            Step::line("ready", Severity::Success, ms(10)),
        ])
        .with_epilogue(vec![Step::line("done", Severity::Success, ms(10))]);
    let runner = instant_runner(script);

    let outcome = runner.run().await;
    assert_eq!(outcome, RunOutcome::Completed { appended: 4 });

    let log = lock_log(runner.log());
    let entries: Vec<(u64, &str)> = log
        .iter()
        .map(|entry| (entry.sequence_index, entry.text.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![(0, "booting"), (1, "ready"), (2, "A"), (3, "done")]
    );
}

#[tokio::test]
async fn test_run_clears_previous_output() {
    let runner = instant_runner(Script::new(vec![
        Task::builder("only").line("A", Severity::Info, 0).build(),
    ]));
    lock_log(runner.log()).line("left over", Severity::Info);

    assert!(runner.run().await.is_success());
    assert_eq!(texts(runner.log()), vec!["A"]);
}

#[tokio::test]
async fn test_run_without_clear_keeps_previous_output() {
    let options = RunnerOptions {
        clear_on_run: false,
        ..RunnerOptions::default()
    };
    let runner = instant_runner(Script::new(vec![
        Task::builder("only").line("A", Severity::Info, 0).build(),
    ]))
    .with_options(options);
    lock_log(runner.log()).line("left over", Severity::Info);

    assert!(runner.run().await.is_success());
    assert_eq!(texts(runner.log()), vec!["left over", "A"]);
}

#[tokio::test]
async fn test_concurrent_run_is_rejected_with_one_warning() {
    let runner = instant_runner(Script::new(vec![
        Task::builder("slow")
            .line("one", Severity::Info, 100)
            .line("two", Severity::Info, 100)
            .build(),
    ]));

    let (first, second) = tokio::join!(runner.run(), runner.run());

    assert!(first.is_success());
    assert_eq!(second, RunOutcome::Rejected);
    assert_eq!(second.into_result(), Err(ConsoleError::AlreadyRunning));

    let busy = &runner.options().busy_notice.text;
    let log = lock_log(runner.log());
    let warnings: Vec<_> = log
        .iter()
        .filter(|entry| entry.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(&warnings[0].text, busy);
    assert_eq!(
        log.iter().filter(|entry| entry.text == "one").count(),
        1,
        "the rejected run must not replay the script"
    );
}

#[tokio::test]
async fn test_failing_step_stops_the_run() {
    let script = Script::new(vec![
        Task::builder("broken")
            .line("step1", Severity::Info, 0)
            .compute(Severity::Info, 0, || Err(StepError::new("boom")))
            .line("step3", Severity::Info, 0)
            .line("step4", Severity::Info, 0)
            .line("step5", Severity::Info, 0)
            .build(),
    ])
    .with_epilogue(vec![Step::line("never", Severity::Success, Duration::ZERO)]);
    let runner = instant_runner(script);

    let outcome = runner.run().await;
    let expected = ConsoleError::StepFailure {
        task: "broken".to_string(),
        step: 2,
        source: StepError::new("boom"),
    };
    assert_eq!(outcome, RunOutcome::Failed(expected));

    let log = lock_log(runner.log());
    let entries: Vec<(&str, Severity)> = log
        .iter()
        .map(|entry| (entry.text.as_str(), entry.severity))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("step1", Severity::Info),
            ("💥 Error: step 2 of 'broken' failed: boom", Severity::Error),
        ]
    );
    drop(log);

    assert!(!runner.is_running());
    assert_eq!(runner.state(), RunState::Idle);
}

#[tokio::test]
async fn test_runner_accepts_a_new_run_after_failure() {
    let script = Script::new(vec![
        Task::builder("broken")
            .compute(Severity::Info, 0, || Err(StepError::new("boom")))
            .build(),
    ]);
    let runner = instant_runner(script);

    assert!(!runner.run().await.is_success());
    assert!(!runner.is_running());
    // Rejection would leave a busy warning instead of a second error entry.
    assert!(matches!(runner.run().await, RunOutcome::Failed(_)));
}

#[tokio::test]
async fn test_follow_up_fires_only_after_success() {
    let calls = Arc::new(AtomicUsize::new(0));

    let ok = {
        let calls = calls.clone();
        instant_runner(Script::new(vec![
            Task::builder("ok").line("fine", Severity::Info, 0).build(),
        ]))
        .with_follow_up(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    assert!(ok.run().await.is_success());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let failing = {
        let calls = calls.clone();
        instant_runner(Script::new(vec![
            Task::builder("bad")
                .compute(Severity::Info, 0, || Err(StepError::new("nope")))
                .build(),
        ]))
        .with_follow_up(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    assert!(!failing.run().await.is_success());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_reset_while_idle_clears_and_announces() {
    let runner = instant_runner(Script::new(vec![
        Task::builder("only").line("A", Severity::Info, 0).build(),
    ]));
    assert!(runner.run().await.is_success());

    assert_eq!(runner.reset().await, ResetOutcome::Cleared);

    let log = lock_log(runner.log());
    let entries: Vec<(u64, &str)> = log
        .iter()
        .map(|entry| (entry.sequence_index, entry.text.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            (0, "Console cleared"),
            (1, "Run the tasks again to replay the lesson")
        ]
    );
}

#[tokio::test]
async fn test_reset_during_run_is_refused() {
    let pacer = GatePacer::closed();
    let runner = Arc::new(TaskRunner::new(
        OutputLog::new().shared(),
        Script::new(vec![
            Task::builder("gated")
                .line("first", Severity::Info, 0)
                .line("second", Severity::Info, 50)
                .line("third", Severity::Info, 50)
                .build(),
        ]),
        pacer.clone(),
    ));

    let mut state = runner.subscribe();
    let run = {
        let runner = runner.clone();
        tokio::spawn(async move { runner.run().await })
    };
    state
        .wait_for(|state| *state == RunState::Running)
        .await
        .unwrap();

    assert_eq!(runner.reset().await, ResetOutcome::Refused);
    assert!(runner.is_running());

    pacer.open();
    let outcome = run.await.unwrap();
    assert!(outcome.is_success());

    let log = lock_log(runner.log());
    let refused = &runner.options().reset_refused.text;
    assert!(log.iter().any(|entry| &entry.text == refused));
    assert!(log.iter().any(|entry| entry.text == "third"));
    let indices: Vec<u64> = log.iter().map(|entry| entry.sequence_index).collect();
    assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_ready_notices_dropped_when_a_run_starts() {
    let pacer = GatePacer::closed();
    let runner = TaskRunner::new(
        OutputLog::new().shared(),
        Script::new(vec![
            Task::builder("quick").line("lesson", Severity::Info, 0).build(),
        ]),
        pacer.clone(),
    );

    // The reset parks on its pause before announcing; the run slips in meanwhile.
    let (reset, outcome) = tokio::join!(runner.reset(), async {
        tokio::task::yield_now().await;
        let outcome = runner.run().await;
        pacer.open();
        outcome
    });

    assert_eq!(reset, ResetOutcome::Cleared);
    assert!(outcome.is_success());
    assert_eq!(texts(runner.log()), vec!["lesson"]);
}

#[tokio::test]
async fn test_bonus_appends_without_clearing() {
    let runner = instant_runner(Script::default());
    lock_log(runner.log()).line("lesson output", Severity::Info);

    let bonus = Task::builder("Bonus")
        .separator("*", 0)
        .line("surprise", Severity::Warning, 0)
        .build();
    assert_eq!(
        runner.run_bonus(&bonus).await,
        RunOutcome::Completed { appended: 2 }
    );

    let log = lock_log(runner.log());
    let kinds: Vec<EntryKind> = log.iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        vec![EntryKind::Line, EntryKind::Separator, EntryKind::Line]
    );
    assert_eq!(log.iter().next().map(|entry| entry.text.as_str()), Some("lesson output"));
}

#[tokio::test]
async fn test_blank_step_is_not_counted() {
    let runner = instant_runner(Script::new(vec![
        Task::builder("gaps")
            .line("A", Severity::Info, 0)
            .line("   ", Severity::Info, 0)
            .line("B", Severity::Info, 0)
            .build(),
    ]));

    assert_eq!(runner.run().await, RunOutcome::Completed { appended: 2 });
    let indices: Vec<u64> = lock_log(runner.log())
        .iter()
        .map(|entry| entry.sequence_index)
        .collect();
    assert_eq!(indices, vec![0, 1]);
}
