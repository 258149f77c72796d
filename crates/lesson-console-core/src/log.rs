/*
[INPUT]:  Append/clear requests from TaskRunner steps and hosts
[OUTPUT]: Ordered, append-only sequence of LogEntry records + render target fan-out
[POS]:    Output layer - leaf component shared between runner and renderers
[UPDATE]: When changing entry kinds, severities or the separator layout
*/

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

pub const DEFAULT_SEPARATOR_WIDTH: usize = 80;
pub const DEFAULT_SEPARATOR_PATTERN: &str = "=";

/// Shape of a rendered entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Line,
    CodeBlock,
    Separator,
    GroupHeader,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Line => "line",
            EntryKind::CodeBlock => "code-block",
            EntryKind::Separator => "separator",
            EntryKind::GroupHeader => "group-header",
        }
    }
}

/// Presentation-only classification of an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    System,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::System => "system",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One appended record. Never mutated after append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub sequence_index: u64,
    pub kind: EntryKind,
    pub severity: Severity,
    pub text: String,
    pub recorded_at: DateTime<Utc>,
}

/// Anything that displays the log as it grows.
///
/// Callbacks run while the log is locked, so implementations must not lock
/// the same [`OutputLogHandle`] again.
pub trait RenderTarget: Send + Sync {
    fn on_append(&self, entry: &LogEntry);

    fn on_clear(&self) {}

    fn scroll_to_latest(&self) {}
}

pub type OutputLogHandle = Arc<Mutex<OutputLog>>;

/// Lock a shared log, recovering the data if a render target panicked.
pub fn lock_log(handle: &OutputLogHandle) -> MutexGuard<'_, OutputLog> {
    handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct OutputLog {
    entries: Vec<LogEntry>,
    next_index: u64,
    separator_width: usize,
    targets: Vec<Arc<dyn RenderTarget>>,
}

impl Default for OutputLog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OutputLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputLog")
            .field("entries", &self.entries.len())
            .field("next_index", &self.next_index)
            .field("separator_width", &self.separator_width)
            .field("targets", &self.targets.len())
            .finish()
    }
}

impl OutputLog {
    pub fn new() -> Self {
        Self::with_separator_width(DEFAULT_SEPARATOR_WIDTH)
    }

    pub fn with_separator_width(separator_width: usize) -> Self {
        Self {
            entries: Vec::new(),
            next_index: 0,
            separator_width: separator_width.max(1),
            targets: Vec::new(),
        }
    }

    /// Wrap the log into the handle shared by runners and renderers.
    pub fn shared(self) -> OutputLogHandle {
        Arc::new(Mutex::new(self))
    }

    pub fn attach(&mut self, target: Arc<dyn RenderTarget>) {
        self.targets.push(target);
    }

    /// Append an entry and return its sequence index.
    ///
    /// Blank `Line` text is skipped and yields `None`. Separator text is the
    /// pattern, expanded to the configured display width.
    pub fn append(
        &mut self,
        kind: EntryKind,
        text: impl Into<String>,
        severity: Severity,
    ) -> Option<u64> {
        let text = text.into();
        if kind == EntryKind::Line && text.trim().is_empty() {
            tracing::trace!("skipping blank line");
            return None;
        }

        let text = match kind {
            EntryKind::Separator => fill_separator(&text, self.separator_width),
            _ => text,
        };

        let entry = LogEntry {
            sequence_index: self.next_index,
            kind,
            severity,
            text,
            recorded_at: Utc::now(),
        };
        self.next_index += 1;

        echo(&entry);
        for target in &self.targets {
            target.on_append(&entry);
            target.scroll_to_latest();
        }

        let index = entry.sequence_index;
        self.entries.push(entry);
        Some(index)
    }

    pub fn line(&mut self, text: impl Into<String>, severity: Severity) -> Option<u64> {
        self.append(EntryKind::Line, text, severity)
    }

    pub fn code(&mut self, text: impl Into<String>) -> Option<u64> {
        self.append(EntryKind::CodeBlock, text, Severity::Info)
    }

    pub fn separator(&mut self, pattern: impl Into<String>) -> Option<u64> {
        self.append(EntryKind::Separator, pattern, Severity::System)
    }

    pub fn group_header(&mut self, title: impl Into<String>) -> Option<u64> {
        self.append(EntryKind::GroupHeader, title, Severity::System)
    }

    /// Drop every entry and restart numbering at zero.
    pub fn clear(&mut self) {
        let discarded = self.entries.len();
        self.entries.clear();
        self.next_index = 0;
        tracing::debug!(discarded, "output log cleared");
        for target in &self.targets {
            target.on_clear();
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Last `count` entries, oldest first.
    pub fn tail(&self, count: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_sequence_index(&self) -> u64 {
        self.next_index
    }

    pub fn separator_width(&self) -> usize {
        self.separator_width
    }
}

fn fill_separator(pattern: &str, width: usize) -> String {
    let pattern_width: usize = pattern.chars().map(|ch| ch.width().unwrap_or(0)).sum();
    let pattern = if pattern_width == 0 {
        DEFAULT_SEPARATOR_PATTERN
    } else {
        pattern
    };

    let mut out = String::new();
    let mut used = 0;
    for ch in pattern.chars().cycle() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out
}

fn echo(entry: &LogEntry) {
    let seq = entry.sequence_index;
    let kind = entry.kind.as_str();
    match entry.severity {
        Severity::Error => {
            tracing::error!(target: "lesson_console::output", seq, kind, "{}", entry.text)
        }
        Severity::Warning => {
            tracing::warn!(target: "lesson_console::output", seq, kind, "{}", entry.text)
        }
        severity => {
            tracing::info!(
                target: "lesson_console::output",
                seq,
                kind,
                severity = severity.as_str(),
                "{}",
                entry.text
            )
        }
    }
}
