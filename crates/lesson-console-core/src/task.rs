/*
[INPUT]:  Lesson definitions (static text, computed demonstrations, delays)
[OUTPUT]: Immutable Step / Task / Script values consumed by TaskRunner
[POS]:    Task domain layer - what a run plays, in order
[UPDATE]: When adding new step kinds or script sections
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::StepError;
use crate::log::{EntryKind, Severity};

/// Computes step text at execution time. Failing resolvers abort the run.
pub type TextResolver = Arc<dyn Fn() -> Result<String, StepError> + Send + Sync>;

#[derive(Clone)]
pub enum StepText {
    Literal(String),
    Resolved(TextResolver),
}

impl StepText {
    pub fn resolve(&self) -> Result<String, StepError> {
        match self {
            StepText::Literal(text) => Ok(text.clone()),
            StepText::Resolved(resolver) => resolver(),
        }
    }
}

impl fmt::Debug for StepText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepText::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            StepText::Resolved(_) => f.write_str("Resolved(..)"),
        }
    }
}

impl From<&str> for StepText {
    fn from(text: &str) -> Self {
        StepText::Literal(text.to_string())
    }
}

impl From<String> for StepText {
    fn from(text: String) -> Self {
        StepText::Literal(text)
    }
}

#[derive(Debug, Clone)]
pub enum StepAction {
    Line { text: StepText, severity: Severity },
    Code { text: StepText },
    Separator { pattern: String },
    GroupHeader { title: String },
}

/// Output of a step, ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub kind: EntryKind,
    pub text: String,
    pub severity: Severity,
}

/// One paced append: wait `delay`, then emit `action`.
#[derive(Debug, Clone)]
pub struct Step {
    action: StepAction,
    delay: Duration,
}

impl Step {
    pub fn new(action: StepAction, delay: Duration) -> Self {
        Self { action, delay }
    }

    pub fn line(text: impl Into<StepText>, severity: Severity, delay: Duration) -> Self {
        Self::new(
            StepAction::Line {
                text: text.into(),
                severity,
            },
            delay,
        )
    }

    pub fn resolved_line<F>(severity: Severity, delay: Duration, resolver: F) -> Self
    where
        F: Fn() -> Result<String, StepError> + Send + Sync + 'static,
    {
        Self::line(StepText::Resolved(Arc::new(resolver)), severity, delay)
    }

    pub fn code(text: impl Into<StepText>, delay: Duration) -> Self {
        Self::new(StepAction::Code { text: text.into() }, delay)
    }

    pub fn separator(pattern: impl Into<String>, delay: Duration) -> Self {
        Self::new(
            StepAction::Separator {
                pattern: pattern.into(),
            },
            delay,
        )
    }

    pub fn group_header(title: impl Into<String>, delay: Duration) -> Self {
        Self::new(
            StepAction::GroupHeader {
                title: title.into(),
            },
            delay,
        )
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn action(&self) -> &StepAction {
        &self.action
    }

    pub fn render(&self) -> Result<Rendered, StepError> {
        let rendered = match &self.action {
            StepAction::Line { text, severity } => Rendered {
                kind: EntryKind::Line,
                text: text.resolve()?,
                severity: *severity,
            },
            StepAction::Code { text } => Rendered {
                kind: EntryKind::CodeBlock,
                text: text.resolve()?,
                severity: Severity::Info,
            },
            StepAction::Separator { pattern } => Rendered {
                kind: EntryKind::Separator,
                text: pattern.clone(),
                severity: Severity::System,
            },
            StepAction::GroupHeader { title } => Rendered {
                kind: EntryKind::GroupHeader,
                text: title.clone(),
                severity: Severity::System,
            },
        };
        Ok(rendered)
    }
}

/// Named, immutable list of steps representing one lesson segment.
#[derive(Debug, Clone)]
pub struct Task {
    name: String,
    steps: Arc<[Step]>,
}

impl Task {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps: steps.into(),
        }
    }

    pub fn builder(name: impl Into<String>) -> TaskBuilder {
        TaskBuilder {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Builder taking delays in milliseconds, the unit lessons are authored in.
#[derive(Debug)]
pub struct TaskBuilder {
    name: String,
    steps: Vec<Step>,
}

impl TaskBuilder {
    pub fn line(mut self, text: impl Into<StepText>, severity: Severity, delay_ms: u64) -> Self {
        self.steps
            .push(Step::line(text, severity, Duration::from_millis(delay_ms)));
        self
    }

    pub fn compute<F>(mut self, severity: Severity, delay_ms: u64, resolver: F) -> Self
    where
        F: Fn() -> Result<String, StepError> + Send + Sync + 'static,
    {
        self.steps.push(Step::resolved_line(
            severity,
            Duration::from_millis(delay_ms),
            resolver,
        ));
        self
    }

    pub fn code(mut self, text: impl Into<StepText>, delay_ms: u64) -> Self {
        self.steps
            .push(Step::code(text, Duration::from_millis(delay_ms)));
        self
    }

    pub fn separator(mut self, pattern: impl Into<String>, delay_ms: u64) -> Self {
        self.steps
            .push(Step::separator(pattern, Duration::from_millis(delay_ms)));
        self
    }

    pub fn group_header(mut self, title: impl Into<String>, delay_ms: u64) -> Self {
        self.steps
            .push(Step::group_header(title, Duration::from_millis(delay_ms)));
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps<I>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = Step>,
    {
        self.steps.extend(steps);
        self
    }

    pub fn build(self) -> Task {
        Task::new(self.name, self.steps)
    }
}

/// Everything one `run()` plays: prologue, tasks, epilogue.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub prologue: Vec<Step>,
    pub tasks: Vec<Task>,
    pub epilogue: Vec<Step>,
}

impl Script {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            prologue: Vec::new(),
            tasks,
            epilogue: Vec::new(),
        }
    }

    pub fn with_prologue(mut self, prologue: Vec<Step>) -> Self {
        self.prologue = prologue;
        self
    }

    pub fn with_epilogue(mut self, epilogue: Vec<Step>) -> Self {
        self.epilogue = epilogue;
        self
    }

    pub fn step_count(&self) -> usize {
        self.prologue.len() + self.tasks.iter().map(Task::len).sum::<usize>() + self.epilogue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order_and_delays() {
        let task = Task::builder("Demo")
            .separator("~", 500)
            .line("Title", Severity::System, 0)
            .code("let a = 1;", 400)
            .group_header("GROUP", 300)
            .build();

        assert_eq!(task.name(), "Demo");
        assert_eq!(task.len(), 4);
        let delays: Vec<u64> = task
            .steps()
            .iter()
            .map(|step| step.delay().as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![500, 0, 400, 300]);

        let kinds: Vec<EntryKind> = task
            .steps()
            .iter()
            .map(|step| step.render().unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EntryKind::Separator,
                EntryKind::Line,
                EntryKind::CodeBlock,
                EntryKind::GroupHeader
            ]
        );
    }

    #[test]
    fn test_resolved_text_is_computed_on_render() {
        let step = Step::resolved_line(Severity::Success, Duration::ZERO, || {
            Ok(format!("Result: {}", 2 + 3))
        });
        let rendered = step.render().unwrap();
        assert_eq!(rendered.text, "Result: 5");
        assert_eq!(rendered.severity, Severity::Success);
    }

    #[test]
    fn test_resolver_failure_surfaces_step_error() {
        let step = Step::resolved_line(Severity::Info, Duration::ZERO, || {
            Err(StepError::new("value not found"))
        });
        assert_eq!(step.render(), Err(StepError::new("value not found")));
    }

    #[test]
    fn test_script_step_count() {
        let script = Script::new(vec![
            Task::builder("a").line("1", Severity::Info, 0).build(),
            Task::builder("b")
                .line("2", Severity::Info, 0)
                .line("3", Severity::Info, 0)
                .build(),
        ])
        .with_prologue(vec![Step::line("start", Severity::System, Duration::ZERO)])
        .with_epilogue(vec![Step::line("done", Severity::Success, Duration::ZERO)]);
        assert_eq!(script.step_count(), 5);
    }

    #[test]
    fn test_literal_debug_is_readable() {
        let text = StepText::from("hello");
        assert_eq!(format!("{text:?}"), "Literal(\"hello\")");
    }
}
