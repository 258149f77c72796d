/*
[INPUT]:  Public API exports for lesson-console-core crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod error;
pub mod lessons;
pub mod log;
pub mod pacing;
pub mod runner;
pub mod task;

// Re-export main types for convenience
pub use config::ConsoleConfig;
pub use error::{ConsoleError, StepError};
pub use lessons::Lesson;
pub use log::{EntryKind, LogEntry, OutputLog, OutputLogHandle, RenderTarget, Severity};
pub use pacing::{InstantPacer, Pacer, TokioPacer};
pub use runner::{ResetOutcome, RunOutcome, RunState, RunnerOptions, TaskRunner};
pub use task::{Script, Step, Task};
