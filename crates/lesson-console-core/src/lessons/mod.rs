/*
[INPUT]:  Lesson ids requested by hosts
[OUTPUT]: Built-in lesson catalog (scripts + optional bonus task)
[POS]:    Content layer - static scripts played by TaskRunner
[UPDATE]: When adding or renaming lessons
*/

use std::fmt::Display;
use std::time::Duration;

use crate::error::ConsoleError;
use crate::log::Severity;
use crate::task::{Script, Step, Task};

pub mod arrays;
pub mod basics;
pub mod objects;

/// A playable lesson.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub script: Script,
    /// Offered by hosts once a run has completed
    pub bonus: Option<Task>,
}

type LessonFactory = fn() -> Lesson;

const CATALOG: &[(&str, LessonFactory)] = &[
    ("basics", basics::lesson),
    ("arrays", arrays::lesson),
    ("objects", objects::lesson),
];

pub fn ids() -> Vec<&'static str> {
    CATALOG.iter().map(|(id, _)| *id).collect()
}

pub fn catalog() -> Vec<Lesson> {
    CATALOG.iter().map(|(_, build)| build()).collect()
}

pub fn find(id: &str) -> Result<Lesson, ConsoleError> {
    CATALOG
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(id.trim()))
        .map(|(_, build)| build())
        .ok_or_else(|| ConsoleError::UnknownLesson(id.to_string()))
}

/// Startup notices every lesson opens with.
pub(crate) fn prologue(lines: &[(&str, Severity, u64)]) -> Vec<Step> {
    lines
        .iter()
        .map(|(text, severity, delay_ms)| {
            Step::line(*text, *severity, Duration::from_millis(*delay_ms))
        })
        .collect()
}

/// Full separator, success banner and report lines.
pub(crate) fn epilogue(banner: &str, report: &[&str]) -> Vec<Step> {
    let mut steps = vec![
        Step::separator("=", Duration::from_millis(600)),
        Step::line(banner, Severity::Success, Duration::from_millis(600)),
    ];
    if !report.is_empty() {
        steps.push(Step::line(
            "Execution report:",
            Severity::System,
            Duration::from_millis(400),
        ));
        steps.extend(
            report
                .iter()
                .map(|line| Step::line(*line, Severity::Success, Duration::from_millis(200))),
        );
    }
    steps
}

/// Render items the way the lessons print arrays: `[1, 2, 3]`.
pub(crate) fn bracketed<T: Display>(items: &[T]) -> String {
    format!("[{}]", joined(items, ", "))
}

pub(crate) fn joined<T: Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
