/*
[INPUT]:  Crossterm key events
[OUTPUT]: Run / reset / bonus / quit actions on AppState
[POS]:    TUI key routing
[UPDATE]: When changing keybindings
*/

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::AppState;

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) fn handle_key_event(app: &mut AppState, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char('r') | KeyCode::Enter => {
            app.start_run();
            false
        }
        KeyCode::Char('c') => {
            app.start_reset();
            false
        }
        KeyCode::Char('b') => {
            app.start_bonus();
            false
        }
        _ => false,
    }
}
