/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When ConsoleConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::path::PathBuf;

use lesson_console_core::config::MAX_PACING_SCALE;
use lesson_console_core::{ConsoleConfig, lessons};

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to lesson-console init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a console configuration.").dim()
    );

    let theme = ColorfulTheme::default();
    let defaults = ConsoleConfig::default();

    let lesson_ids = lessons::ids();
    let default_lesson = lesson_ids
        .iter()
        .position(|id| *id == defaults.lesson)
        .unwrap_or(0);
    let lesson_selection = Select::with_theme(&theme)
        .with_prompt("Default lesson")
        .items(&lesson_ids)
        .default(default_lesson)
        .interact()?;

    println!("\n{}", style("--- Pacing ---").bold());
    let scale: f64 = Input::with_theme(&theme)
        .with_prompt("Delay multiplier (1 = authored pace, 0 = instant)")
        .default(defaults.pacing.scale)
        .validate_with(|value: &f64| -> Result<(), &str> {
            if (0.0..=MAX_PACING_SCALE).contains(value) {
                Ok(())
            } else {
                Err("must be between 0 and 100")
            }
        })
        .interact_text()?;

    println!("\n{}", style("--- Display ---").bold());
    let separator_width: usize = Input::with_theme(&theme)
        .with_prompt("Separator width (columns)")
        .default(defaults.display.separator_width)
        .interact_text()?;

    let clear_on_run = Confirm::with_theme(&theme)
        .with_prompt("Clear previous output when a run starts?")
        .default(defaults.display.clear_on_run)
        .interact()?;

    let mut config = defaults;
    config.lesson = lesson_ids[lesson_selection].to_string();
    config.pacing.scale = scale;
    config.display.separator_width = separator_width;
    config.display.clear_on_run = clear_on_run;
    config.validate().context("invalid configuration")?;

    let yaml = config
        .to_yaml()
        .context("failed to serialize config to YAML")?;

    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}
