/*
[INPUT]:  CLI arguments, optional YAML configuration file, OS shutdown signals
[OUTPUT]: Lesson playback in the terminal (streamed or interactive TUI)
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod render;
mod tui;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use lesson_console_core::log::lock_log;
use lesson_console_core::{ConsoleConfig, OutputLog, RenderTarget, TaskRunner, lessons};

use crate::render::{JsonRenderer, TextRenderer};

const LOG_FILE_NAME: &str = "lesson-console.log";

#[derive(Parser, Debug)]
#[command(name = "lesson-console", version, about = "Paced lesson console player")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    /// Tracing filter; defaults to `warn` for `run` and `info` for `tui`
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one lesson to completion and stream its output
    Run {
        #[arg(long)]
        lesson: Option<String>,
        /// Delay multiplier; 0 plays instantly
        #[arg(long, value_name = "F")]
        pace: Option<f64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Interactive terminal UI with run / reset / bonus controls
    Tui {
        #[arg(long)]
        lesson: Option<String>,
        #[arg(long, value_name = "F")]
        pace: Option<f64>,
    },
    /// List the built-in lessons
    List,
    /// Write a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH", default_value = "lesson-console.yaml")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    match args.command {
        Command::List => cli::list::print_catalog(),
        Command::Init { output } => cli::init::run_init(output),
        Command::Run {
            lesson,
            pace,
            format,
        } => {
            init_tracing(args.log_level.as_deref().unwrap_or("warn"))?;
            let config = load_config(args.config_path.as_deref(), lesson, pace)?;
            run_lesson(config, format).await
        }
        Command::Tui { lesson, pace } => {
            let _guard = init_file_tracing(args.log_level.as_deref().unwrap_or("info"))?;
            let config = load_config(args.config_path.as_deref(), lesson, pace)?;
            info!(lesson = %config.lesson, "starting tui");
            tui::run_tui(config).await
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

/// The TUI owns the terminal, so its logs go to a file in the data dir.
fn init_file_tracing(log_level: &str) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    let log_dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("lesson-console");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn load_config(
    path: Option<&Path>,
    lesson: Option<String>,
    pace: Option<f64>,
) -> Result<ConsoleConfig> {
    let mut config = ConsoleConfig::load(path).context("load config")?;
    if let Some(lesson) = lesson {
        config.lesson = lesson;
    }
    if let Some(pace) = pace {
        config.pacing.scale = pace;
    }
    config.validate().context("invalid settings")?;
    Ok(config)
}

async fn run_lesson(config: ConsoleConfig, format: OutputFormat) -> Result<()> {
    let lesson = lessons::find(&config.lesson)?;
    info!(lesson = lesson.id, scale = config.pacing.scale, "playing lesson");

    let target: Arc<dyn RenderTarget> = match format {
        OutputFormat::Text => Arc::new(TextRenderer::new()),
        OutputFormat::Json => Arc::new(JsonRenderer),
    };
    let log = OutputLog::with_separator_width(config.display.separator_width).shared();
    lock_log(&log).attach(target);

    let runner = TaskRunner::new(log, lesson.script, config.pacer())
        .with_options(config.runner_options());

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    tokio::select! {
        outcome = runner.run() => {
            let appended = outcome.into_result()?;
            info!(appended, "lesson finished");
            Ok(())
        }
        _ = shutdown.cancelled() => {
            bail!("interrupted before the lesson finished");
        }
    }
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
