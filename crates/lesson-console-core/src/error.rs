/*
[INPUT]:  Failures raised while resolving step text or driving a run
[OUTPUT]: Typed errors surfaced by TaskRunner and the lesson catalog
[POS]:    Error layer - shared by runner, task and lessons modules
[UPDATE]: When adding new failure modes to the run lifecycle
*/

use thiserror::Error;

/// Failure produced by a single step while computing its output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StepError {
    message: String,
}

impl StepError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors occurring while running lesson scripts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("tasks are already running")]
    AlreadyRunning,

    #[error("step {step} of '{task}' failed: {source}")]
    StepFailure {
        task: String,
        step: usize,
        #[source]
        source: StepError,
    },

    #[error("unknown lesson: {0}")]
    UnknownLesson(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_failure_message_names_task_and_position() {
        let err = ConsoleError::StepFailure {
            task: "Countdown".to_string(),
            step: 2,
            source: StepError::new("n must be a positive integer"),
        };
        assert_eq!(
            err.to_string(),
            "step 2 of 'Countdown' failed: n must be a positive integer"
        );
    }

    #[test]
    fn step_error_exposes_message() {
        let err = StepError::new("missing value");
        assert_eq!(err.message(), "missing value");
        assert_eq!(err.to_string(), "missing value");
    }
}
