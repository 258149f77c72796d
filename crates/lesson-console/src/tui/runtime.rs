/*
[INPUT]:  ConsoleConfig, crossterm input, runner state channel, output log changes
[OUTPUT]: Ratatui run loop driving one lesson interactively
[POS]:    TUI runtime loop
[UPDATE]: When changing the event sources or redraw policy
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use tokio::sync::{Notify, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use lesson_console_core::log::lock_log;
use lesson_console_core::{
    ConsoleConfig, LogEntry, OutputLog, RenderTarget, TaskRunner, lessons,
};

use super::app::{AppState, UiEvent};
use super::events::handle_key_event;
use super::terminal::Screen;
use super::ui::draw_ui;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
/// Smoke-test hook: draw offscreen and quit after this many ticks.
const TEST_EXIT_AFTER_TICKS_ENV: &str = "LESSON_CONSOLE_TUI_TEST_EXIT_AFTER_TICKS";

/// Wakes the UI loop whenever the output log changes.
#[derive(Default)]
struct RedrawSignal {
    notify: Notify,
}

impl RenderTarget for RedrawSignal {
    fn on_append(&self, _entry: &LogEntry) {}

    fn on_clear(&self) {
        self.notify.notify_one();
    }

    fn scroll_to_latest(&self) {
        self.notify.notify_one();
    }
}

pub async fn run_tui(config: ConsoleConfig) -> Result<()> {
    let exit_after_ticks = test_exit_after_ticks();
    let lesson = lessons::find(&config.lesson)?;

    let redraw = Arc::new(RedrawSignal::default());
    let log = OutputLog::with_separator_width(config.display.separator_width).shared();
    lock_log(&log).attach(redraw.clone());

    let bonus_revealed = Arc::new(AtomicBool::new(false));
    let has_bonus = lesson.bonus.is_some();
    let runner = {
        let bonus_revealed = bonus_revealed.clone();
        Arc::new(
            TaskRunner::new(log, lesson.script.clone(), config.pacer())
                .with_options(config.runner_options())
                .with_follow_up(move || {
                    if has_bonus {
                        bonus_revealed.store(true, Ordering::Release);
                    }
                }),
        )
    };

    let mut screen = match exit_after_ticks {
        Some(_) => Screen::headless()?,
        None => Screen::live()?,
    };
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();

    if !screen.is_headless() {
        let input_shutdown = input_shutdown.clone();
        let event_tx = event_tx.clone();
        tokio::task::spawn_blocking(move || {
            while !input_shutdown.is_cancelled() {
                if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                    if let Ok(event) = crossterm::event::read() {
                        let _ = event_tx.send(UiEvent::Input(event));
                    }
                }
            }
        });
    }

    {
        let runner = runner.clone();
        tokio::spawn(async move { runner.announce_ready().await });
    }

    let mut state_rx = runner.subscribe();
    let mut app = AppState::new(runner, lesson, bonus_revealed, event_tx);
    info!(lesson = app.lesson.id, headless = screen.is_headless(), "tui started");

    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut ticks: u64 = 0;
    let mut should_quit = false;

    while !should_quit {
        tokio::select! {
            _ = tick.tick() => {
                ticks += 1;
                app.spinner = app.spinner.wrapping_add(1);
                if exit_after_ticks.is_some_and(|limit| ticks >= limit) {
                    debug!(ticks, "test tick limit reached");
                    should_quit = true;
                }
            }
            _ = redraw.notify.notified() => {}
            changed = state_rx.changed() => {
                if changed.is_ok() {
                    let state = *state_rx.borrow_and_update();
                    app.on_state_change(state);
                }
            }
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(UiEvent::Input(CrosstermEvent::Key(key))) => {
                        if handle_key_event(&mut app, key) {
                            should_quit = true;
                        }
                    }
                    Some(UiEvent::Finished(message)) => {
                        app.status_message = message;
                    }
                    Some(UiEvent::Input(_)) | None => {}
                }
            }
        }

        screen.draw(|frame| draw_ui(frame, &app))?;
    }

    input_shutdown.cancel();
    info!("tui stopped");
    Ok(())
}

fn test_exit_after_ticks() -> Option<u64> {
    std::env::var(TEST_EXIT_AFTER_TICKS_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
}
