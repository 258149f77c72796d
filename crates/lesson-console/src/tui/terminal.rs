/*
[INPUT]:  Crossterm stdout, terminal raw mode, ratatui backends
[OUTPUT]: Screen drawing either to the real terminal or an offscreen buffer
[POS]:    TUI terminal lifecycle guard
[UPDATE]: When changing how the TUI acquires or releases the terminal
*/

use std::io;

use anyhow::Result;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, terminal};
use ratatui::Terminal;
use ratatui::backend::{CrosstermBackend, TestBackend};

const HEADLESS_SIZE: (u16, u16) = (100, 30);

pub(super) struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    pub(super) fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Where frames go: the user's terminal, or an offscreen buffer for smoke runs.
pub(super) enum Screen {
    Live(TerminalGuard),
    Headless(Terminal<TestBackend>),
}

impl Screen {
    pub(super) fn live() -> Result<Self> {
        Ok(Self::Live(TerminalGuard::new()?))
    }

    pub(super) fn headless() -> Result<Self> {
        let (width, height) = HEADLESS_SIZE;
        Ok(Self::Headless(Terminal::new(TestBackend::new(width, height))?))
    }

    pub(super) fn is_headless(&self) -> bool {
        matches!(self, Self::Headless(_))
    }

    pub(super) fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        match self {
            Self::Live(guard) => {
                guard.terminal.draw(f)?;
            }
            Self::Headless(terminal) => {
                terminal.draw(f)?;
            }
        }
        Ok(())
    }
}
