/*
[INPUT]:  Optional YAML configuration file + LESSON_CONSOLE__* environment overrides
[OUTPUT]: Parsed console configuration, RunnerOptions and Pacer built from it
[POS]:    Configuration layer - lesson selection, pacing, display, notice wording
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::log::{DEFAULT_SEPARATOR_WIDTH, Severity};
use crate::pacing::{Pacer, TokioPacer};
use crate::runner::{Notice, RunnerOptions};

pub const ENV_PREFIX: &str = "LESSON_CONSOLE";
pub const MAX_PACING_SCALE: f64 = 100.0;
const MAX_SEPARATOR_WIDTH: usize = 400;

/// Top-level configuration for the lesson console
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Lesson played when none is given on the command line
    #[serde(default = "default_lesson")]
    pub lesson: String,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Pacing of step delays
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Multiplier applied to every authored delay; 0 plays instantly
    #[serde(default = "default_scale")]
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Display columns filled by separators
    #[serde(default = "default_separator_width")]
    pub separator_width: usize,
    /// Clear previous output when a new run starts
    #[serde(default = "default_true")]
    pub clear_on_run: bool,
}

/// Wording of the notices the runner writes itself
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MessagesConfig {
    #[serde(default = "default_busy")]
    pub busy: String,
    #[serde(default = "default_reset_refused")]
    pub reset_refused: String,
    #[serde(default = "default_failure_prefix")]
    pub failure_prefix: String,
    #[serde(default = "default_greeting")]
    pub greeting: Vec<String>,
    #[serde(default = "default_cleared")]
    pub cleared: Vec<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            lesson: default_lesson(),
            pacing: PacingConfig::default(),
            display: DisplayConfig::default(),
            messages: MessagesConfig::default(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            separator_width: default_separator_width(),
            clear_on_run: true,
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            busy: default_busy(),
            reset_refused: default_reset_refused(),
            failure_prefix: default_failure_prefix(),
            greeting: default_greeting(),
            cleared: default_cleared(),
        }
    }
}

fn default_lesson() -> String {
    "basics".to_string()
}

fn default_scale() -> f64 {
    1.0
}

fn default_separator_width() -> usize {
    DEFAULT_SEPARATOR_WIDTH
}

fn default_true() -> bool {
    true
}

fn default_busy() -> String {
    RunnerOptions::default().busy_notice.text
}

fn default_reset_refused() -> String {
    RunnerOptions::default().reset_refused.text
}

fn default_failure_prefix() -> String {
    RunnerOptions::default().failure_prefix
}

fn default_greeting() -> Vec<String> {
    texts(&RunnerOptions::default().greeting)
}

fn default_cleared() -> Vec<String> {
    texts(&RunnerOptions::default().reset_notices)
}

fn texts(notices: &[Notice]) -> Vec<String> {
    notices.iter().map(|notice| notice.text.clone()).collect()
}

impl ConsoleConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer the optional YAML file under `LESSON_CONSOLE__*` overrides,
    /// e.g. `LESSON_CONSOLE__PACING__SCALE=0`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_layered(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn load_layered(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }
        builder = builder.add_source(environment);

        let config: Self = builder
            .build()
            .context("build configuration")?
            .try_deserialize()
            .context("deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.lesson.trim().is_empty() {
            bail!("lesson cannot be empty");
        }
        if !(0.0..=MAX_PACING_SCALE).contains(&self.pacing.scale) {
            bail!(
                "pacing.scale must be between 0 and {MAX_PACING_SCALE} (got {})",
                self.pacing.scale
            );
        }
        if self.display.separator_width == 0 || self.display.separator_width > MAX_SEPARATOR_WIDTH
        {
            bail!(
                "display.separator_width must be between 1 and {MAX_SEPARATOR_WIDTH} (got {})",
                self.display.separator_width
            );
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("serialize configuration")
    }

    pub fn pacer(&self) -> Arc<dyn Pacer> {
        Arc::new(TokioPacer::new(self.pacing.scale))
    }

    pub fn runner_options(&self) -> RunnerOptions {
        let defaults = RunnerOptions::default();
        let messages = &self.messages;
        RunnerOptions {
            clear_on_run: self.display.clear_on_run,
            busy_notice: Notice {
                text: messages.busy.clone(),
                ..defaults.busy_notice
            },
            reset_refused: Notice {
                text: messages.reset_refused.clone(),
                ..defaults.reset_refused
            },
            failure_prefix: messages.failure_prefix.clone(),
            greeting: notices(&messages.greeting, Severity::Info),
            reset_notices: notices(&messages.cleared, Severity::System),
            ..defaults
        }
    }
}

/// First notice takes `lead`, the rest are informational.
fn notices(texts: &[String], lead: Severity) -> Vec<Notice> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let severity = if index == 0 { lead } else { Severity::Info };
            Notice::new(text.clone(), severity, Duration::from_millis(500))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "lesson-console-config-{}.yaml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.lesson, "basics");
        assert_eq!(config.pacing.scale, 1.0);
        assert_eq!(config.display.separator_width, 80);
        assert!(config.display.clear_on_run);
        assert_ok!(config.validate());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ConsoleConfig = serde_yaml::from_str("lesson: arrays\npacing:\n  scale: 0.25\n").unwrap();
        assert_eq!(config.lesson, "arrays");
        assert_eq!(config.pacing.scale, 0.25);
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.messages, MessagesConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ConsoleConfig::default();
        config.pacing.scale = -1.0;
        assert_err!(config.validate());

        let mut config = ConsoleConfig::default();
        config.pacing.scale = 1e20;
        assert_err!(config.validate());

        let mut config = ConsoleConfig::default();
        config.pacing.scale = f64::NAN;
        assert_err!(config.validate());

        let mut config = ConsoleConfig::default();
        config.pacing.scale = MAX_PACING_SCALE;
        assert_ok!(config.validate());

        let mut config = ConsoleConfig::default();
        config.display.separator_width = 0;
        assert_err!(config.validate());

        let mut config = ConsoleConfig::default();
        config.lesson = "  ".to_string();
        assert_err!(config.validate());
    }

    #[test]
    fn test_from_file_round_trips_init_output() {
        let mut config = ConsoleConfig::default();
        config.lesson = "objects".to_string();
        config.display.separator_width = 60;
        let path = write_temp(&config.to_yaml().unwrap());

        let loaded = ConsoleConfig::from_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_layers_yaml_file() {
        let path = write_temp("lesson: objects\ndisplay:\n  clear_on_run: false\n");
        let config = ConsoleConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.lesson, "objects");
        assert!(!config.display.clear_on_run);
        assert_eq!(config.display.separator_width, 80);
    }

    fn environment_of(vars: &[(&str, &str)]) -> config::Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ConsoleConfig::environment().source(Some(vars))
    }

    #[test]
    fn test_environment_overrides_yaml_file() {
        let path = write_temp("lesson: arrays\npacing:\n  scale: 3.0\n");
        let environment = environment_of(&[
            ("LESSON_CONSOLE__PACING__SCALE", "0"),
            ("LESSON_CONSOLE__LESSON", "objects"),
        ]);
        let config = ConsoleConfig::load_layered(Some(&path), environment).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.lesson, "objects");
        assert_eq!(config.pacing.scale, 0.0);
    }

    #[test]
    fn test_environment_override_is_validated() {
        let environment = environment_of(&[("LESSON_CONSOLE__PACING__SCALE", "1e20")]);
        assert_err!(ConsoleConfig::load_layered(None, environment));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("lesson-console-definitely-missing.yaml");
        assert!(ConsoleConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_runner_options_use_configured_wording() {
        let mut config = ConsoleConfig::default();
        config.messages.busy = "Hold on".to_string();
        config.messages.cleared = vec!["Wiped".to_string(), "Go again".to_string()];
        config.display.clear_on_run = false;

        let options = config.runner_options();
        assert!(!options.clear_on_run);
        assert_eq!(options.busy_notice.text, "Hold on");
        assert_eq!(options.busy_notice.severity, Severity::Warning);
        assert_eq!(options.reset_notices[0].severity, Severity::System);
        assert_eq!(options.reset_notices[1].text, "Go again");
        assert_eq!(options.reset_notices[1].severity, Severity::Info);
    }
}
