/*
[INPUT]:  Built-in lesson catalog
[OUTPUT]: Human-readable catalog table on stdout
[POS]:    `list` subcommand
[UPDATE]: When Lesson gains fields worth listing
*/

use anyhow::Result;
use console::style;

use lesson_console_core::{Lesson, lessons};

pub fn print_catalog() -> Result<()> {
    println!("{}", style("Available lessons").bold().cyan());
    for lesson in lessons::catalog() {
        println!("{}", catalog_row(&lesson));
        println!("    {}", style(lesson.summary).dim());
    }
    Ok(())
}

fn catalog_row(lesson: &Lesson) -> String {
    let bonus = if lesson.bonus.is_some() { "  +bonus" } else { "" };
    format!(
        "  {:<8} {} ({} tasks){bonus}",
        lesson.id,
        lesson.title,
        lesson.script.tasks.len()
    )
}
