/*
[INPUT]:  Script (prologue, tasks, epilogue), OutputLogHandle, Pacer, RunnerOptions
[OUTPUT]: Single-flight paced playback with Idle/Running state broadcast
[POS]:    Execution layer - drives lesson scripts against the output log
[UPDATE]: When changing run/reset guarantees or notice wording
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{Instrument, debug, error, info, warn};
use uuid::Uuid;

use crate::error::ConsoleError;
use crate::log::{OutputLogHandle, Severity, lock_log};
use crate::pacing::Pacer;
use crate::task::{Script, Step, Task};

/// Invoked once after a successful run, e.g. to reveal a follow-up action.
pub type FollowUpHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { appended: usize },
    Failed(ConsoleError),
    Rejected,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }

    pub fn into_result(self) -> Result<usize, ConsoleError> {
        match self {
            RunOutcome::Completed { appended } => Ok(appended),
            RunOutcome::Failed(err) => Err(err),
            RunOutcome::Rejected => Err(ConsoleError::AlreadyRunning),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Cleared,
    Refused,
}

/// A message the runner writes on its own behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
    pub delay: Duration,
}

impl Notice {
    pub fn new(text: impl Into<String>, severity: Severity, delay: Duration) -> Self {
        Self {
            text: text.into(),
            severity,
            delay,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Clear the log before playing the prologue
    pub clear_on_run: bool,
    /// Written by a `run()` that found another run in flight
    pub busy_notice: Notice,
    /// Written by a `reset()` that found a run in flight
    pub reset_refused: Notice,
    /// Prepended to the failure description in the error entry
    pub failure_prefix: String,
    pub failure_delay: Duration,
    /// Wait between clearing and the ready notices of `reset()`
    pub reset_delay: Duration,
    pub reset_notices: Vec<Notice>,
    /// Played by `announce_ready()` when the host starts
    pub greeting: Vec<Notice>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            clear_on_run: true,
            busy_notice: Notice::new(
                "Tasks are already running! Please wait for them to finish.",
                Severity::Warning,
                Duration::from_millis(300),
            ),
            reset_refused: Notice::new(
                "Cannot clear the console while tasks are running.",
                Severity::Warning,
                Duration::ZERO,
            ),
            failure_prefix: "💥 Error: ".to_string(),
            failure_delay: Duration::from_millis(300),
            reset_delay: Duration::from_millis(800),
            reset_notices: vec![
                Notice::new("Console cleared", Severity::System, Duration::from_millis(500)),
                Notice::new(
                    "Run the tasks again to replay the lesson",
                    Severity::Info,
                    Duration::from_millis(500),
                ),
            ],
            greeting: vec![
                Notice::new("System ready", Severity::Info, Duration::from_millis(500)),
                Notice::new(
                    "Run the tasks to start the lesson",
                    Severity::Info,
                    Duration::from_millis(500),
                ),
            ],
        }
    }
}

/// Plays one script at a time against an output log.
pub struct TaskRunner {
    log: OutputLogHandle,
    script: Arc<Script>,
    pacer: Arc<dyn Pacer>,
    options: RunnerOptions,
    running: AtomicBool,
    // Bumped by every run start and every reset; stale ready notices compare against it.
    epoch: AtomicU64,
    state_tx: watch::Sender<RunState>,
    follow_up: Option<FollowUpHook>,
}

struct RunGuard<'a> {
    runner: &'a TaskRunner,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.runner.running.store(false, Ordering::Release);
        self.runner.state_tx.send_replace(RunState::Idle);
        debug!("run state released");
    }
}

impl TaskRunner {
    pub fn new(log: OutputLogHandle, script: Script, pacer: Arc<dyn Pacer>) -> Self {
        let (state_tx, _) = watch::channel(RunState::Idle);
        Self {
            log,
            script: Arc::new(script),
            pacer,
            options: RunnerOptions::default(),
            running: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            state_tx,
            follow_up: None,
        }
    }

    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_follow_up<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.follow_up = Some(Arc::new(hook));
        self
    }

    pub fn log(&self) -> &OutputLogHandle {
        &self.log
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn state(&self) -> RunState {
        *self.state_tx.borrow()
    }

    /// Receiver for busy indicators; yields every Idle/Running change.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state_tx.subscribe()
    }

    /// Play the whole script, or reject if a run is already in flight.
    pub async fn run(&self) -> RunOutcome {
        let Some(guard) = self.try_begin() else {
            return self.reject().await;
        };

        let span = tracing::info_span!("run", run_id = %Uuid::new_v4());
        let outcome = async {
            if self.options.clear_on_run {
                lock_log(&self.log).clear();
            }
            info!(tasks = self.script.tasks.len(), "run started");

            match self.walk().await {
                Ok(appended) => {
                    info!(appended, "run completed");
                    if let Some(hook) = &self.follow_up {
                        hook();
                    }
                    RunOutcome::Completed { appended }
                }
                Err(err) => {
                    self.report_failure(&err).await;
                    RunOutcome::Failed(err)
                }
            }
        }
        .instrument(span)
        .await;

        drop(guard);
        outcome
    }

    /// Play a single extra task under the same single-flight guard.
    ///
    /// The log is not cleared and the follow-up hook is not invoked.
    pub async fn run_bonus(&self, task: &Task) -> RunOutcome {
        let Some(guard) = self.try_begin() else {
            return self.reject().await;
        };

        let span = tracing::info_span!("bonus", run_id = %Uuid::new_v4(), task = task.name());
        let outcome = async {
            match self.play(task.name(), task.steps()).await {
                Ok(appended) => RunOutcome::Completed { appended },
                Err(err) => {
                    self.report_failure(&err).await;
                    RunOutcome::Failed(err)
                }
            }
        }
        .instrument(span)
        .await;

        drop(guard);
        outcome
    }

    /// Clear the log and return to Idle.
    ///
    /// While a run is in flight this only writes a warning: the log and the
    /// running script are left untouched.
    pub async fn reset(&self) -> ResetOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("reset requested while a run is in flight; ignoring");
            self.emit(&self.options.reset_refused).await;
            return ResetOutcome::Refused;
        }

        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        lock_log(&self.log).clear();
        self.running.store(false, Ordering::Release);
        self.state_tx.send_replace(RunState::Idle);
        info!("console reset");

        self.pacer.pause(self.options.reset_delay).await;
        self.announce(&self.options.reset_notices, epoch).await;
        ResetOutcome::Cleared
    }

    /// Write the startup greeting without clearing anything.
    pub async fn announce_ready(&self) {
        let epoch = self.epoch.load(Ordering::Acquire);
        self.announce(&self.options.greeting, epoch).await;
    }

    fn try_begin(&self) -> Option<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.state_tx.send_replace(RunState::Running);
        Some(RunGuard { runner: self })
    }

    async fn reject(&self) -> RunOutcome {
        warn!("run requested while another run is in flight");
        self.emit(&self.options.busy_notice).await;
        RunOutcome::Rejected
    }

    async fn walk(&self) -> Result<usize, ConsoleError> {
        let mut appended = self.play("prologue", &self.script.prologue).await?;
        for task in &self.script.tasks {
            debug!(task = task.name(), steps = task.len(), "task started");
            appended += self.play(task.name(), task.steps()).await?;
        }
        appended += self.play("epilogue", &self.script.epilogue).await?;
        Ok(appended)
    }

    async fn play(&self, label: &str, steps: &[Step]) -> Result<usize, ConsoleError> {
        let mut appended = 0;
        for (index, step) in steps.iter().enumerate() {
            self.pacer.pause(step.delay()).await;
            let rendered = step
                .render()
                .map_err(|source| ConsoleError::StepFailure {
                    task: label.to_string(),
                    step: index + 1,
                    source,
                })?;
            let accepted = {
                let mut log = lock_log(&self.log);
                log.append(rendered.kind, rendered.text, rendered.severity)
                    .is_some()
            };
            if accepted {
                appended += 1;
            }
        }
        Ok(appended)
    }

    async fn report_failure(&self, err: &ConsoleError) {
        error!(error = %err, "run failed");
        self.pacer.pause(self.options.failure_delay).await;
        let text = format!("{}{}", self.options.failure_prefix, err);
        lock_log(&self.log).line(text, Severity::Error);
    }

    async fn emit(&self, notice: &Notice) {
        self.pacer.pause(notice.delay).await;
        lock_log(&self.log).line(notice.text.clone(), notice.severity);
    }

    async fn announce(&self, notices: &[Notice], epoch: u64) {
        for notice in notices {
            self.pacer.pause(notice.delay).await;
            if self.epoch.load(Ordering::Acquire) != epoch || self.is_running() {
                debug!("dropping stale ready notice");
                return;
            }
            lock_log(&self.log).line(notice.text.clone(), notice.severity);
        }
    }
}
