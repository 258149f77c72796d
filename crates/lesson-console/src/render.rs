/*
[INPUT]:  LogEntry notifications from the OutputLog
[OUTPUT]: Streamed stdout rendering (styled text or JSON lines)
[POS]:    Render targets for the `run` subcommand
[UPDATE]: When changing how entries look in non-interactive mode
*/

use console::{StyledObject, Term, style};
use tracing::debug;

use lesson_console_core::{EntryKind, LogEntry, RenderTarget, Severity};

const CODE_GUTTER: &str = "  │ ";

/// Styled terminal lines, one or more per entry.
pub struct TextRenderer {
    term: Term,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl RenderTarget for TextRenderer {
    fn on_append(&self, entry: &LogEntry) {
        for line in format_entry(entry) {
            if let Err(err) = self.term.write_line(&line) {
                debug!(error = %err, "stdout closed");
                return;
            }
        }
    }
}

pub fn format_entry(entry: &LogEntry) -> Vec<String> {
    match entry.kind {
        EntryKind::Line => vec![severity_style(entry.severity, &entry.text).to_string()],
        EntryKind::CodeBlock => {
            let mut lines: Vec<String> = entry
                .text
                .lines()
                .map(|line| style(format!("{CODE_GUTTER}{line}")).dim().to_string())
                .collect();
            if lines.is_empty() {
                lines.push(style(CODE_GUTTER).dim().to_string());
            }
            lines
        }
        EntryKind::Separator => vec![style(&entry.text).dim().to_string()],
        EntryKind::GroupHeader => vec![
            String::new(),
            style(&entry.text).bold().cyan().to_string(),
        ],
    }
}

fn severity_style(severity: Severity, text: &str) -> StyledObject<&str> {
    match severity {
        Severity::Info => style(text),
        Severity::Success => style(text).green(),
        Severity::Warning => style(text).yellow(),
        Severity::Error => style(text).red().bold(),
        Severity::System => style(text).magenta(),
    }
}

/// One JSON object per entry, for piping into other tools.
pub struct JsonRenderer;

impl RenderTarget for JsonRenderer {
    fn on_append(&self, entry: &LogEntry) {
        match serde_json::to_string(entry) {
            Ok(line) => println!("{line}"),
            Err(err) => debug!(error = %err, seq = entry.sequence_index, "entry not serializable"),
        }
    }
}
