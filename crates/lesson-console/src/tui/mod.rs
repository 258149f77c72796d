/*
[INPUT]:  ConsoleConfig selecting the lesson and pacing
[OUTPUT]: Ratatui-based TUI with output panel, busy indicator and controls
[POS]:    TUI module for the lesson-console binary
[UPDATE]: When adding TUI submodules
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

pub use runtime::run_tui;
