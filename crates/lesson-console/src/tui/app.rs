/*
[INPUT]:  Shared TaskRunner, selected lesson, UI event sender
[OUTPUT]: AppState with run / reset / bonus actions spawned off the UI loop
[POS]:    TUI app state
[UPDATE]: When adding TUI actions or status fields
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::Event as CrosstermEvent;
use tokio::sync::mpsc;
use tracing::debug;

use lesson_console_core::{
    Lesson, OutputLogHandle, ResetOutcome, RunOutcome, RunState, TaskRunner,
};

pub(super) enum UiEvent {
    Input(CrosstermEvent),
    /// A spawned action finished; carries the status line to show
    Finished(String),
}

pub(super) struct AppState {
    pub(super) runner: Arc<TaskRunner>,
    pub(super) lesson: Lesson,
    pub(super) bonus_revealed: Arc<AtomicBool>,
    pub(super) run_state: RunState,
    pub(super) status_message: String,
    pub(super) spinner: usize,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl AppState {
    pub(super) fn new(
        runner: Arc<TaskRunner>,
        lesson: Lesson,
        bonus_revealed: Arc<AtomicBool>,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> Self {
        let run_state = runner.state();
        Self {
            runner,
            lesson,
            bonus_revealed,
            run_state,
            status_message: "Ready".to_string(),
            spinner: 0,
            events,
        }
    }

    pub(super) fn log(&self) -> &OutputLogHandle {
        self.runner.log()
    }

    pub(super) fn bonus_available(&self) -> bool {
        self.lesson.bonus.is_some() && self.bonus_revealed.load(Ordering::Acquire)
    }

    pub(super) fn start_run(&mut self) {
        let runner = self.runner.clone();
        let events = self.events.clone();
        self.status_message = format!("playing {}", self.lesson.id);
        tokio::spawn(async move {
            let message = outcome_message("run", runner.run().await);
            let _ = events.send(UiEvent::Finished(message));
        });
    }

    pub(super) fn start_reset(&mut self) {
        // The bonus stays hidden until the next successful run.
        if !self.runner.is_running() {
            self.bonus_revealed.store(false, Ordering::Release);
        }
        let runner = self.runner.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let message = match runner.reset().await {
                ResetOutcome::Cleared => "console cleared".to_string(),
                ResetOutcome::Refused => "reset refused: a run is in flight".to_string(),
            };
            let _ = events.send(UiEvent::Finished(message));
        });
    }

    pub(super) fn start_bonus(&mut self) {
        let Some(bonus) = self.lesson.bonus.clone() else {
            self.status_message = "this lesson has no bonus".to_string();
            return;
        };
        if !self.bonus_available() {
            self.status_message = "finish the lesson to unlock the bonus".to_string();
            return;
        }

        let runner = self.runner.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let message = outcome_message("bonus", runner.run_bonus(&bonus).await);
            let _ = events.send(UiEvent::Finished(message));
        });
    }

    pub(super) fn on_state_change(&mut self, state: RunState) {
        debug!(?state, "run state changed");
        self.run_state = state;
    }
}

fn outcome_message(action: &str, outcome: RunOutcome) -> String {
    match outcome {
        RunOutcome::Completed { appended } => format!("{action} completed ({appended} entries)"),
        RunOutcome::Failed(err) => format!("{action} failed: {err}"),
        RunOutcome::Rejected => format!("{action} ignored: tasks are already running"),
    }
}
