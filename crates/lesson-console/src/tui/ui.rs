/*
[INPUT]:  AppState and OutputLog snapshots
[OUTPUT]: Header, log panel and status bar rendered into a Ratatui frame
[POS]:    TUI rendering
[UPDATE]: When changing TUI layout or palette
*/

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use lesson_console_core::log::lock_log;
use lesson_console_core::{EntryKind, LogEntry, RunState, Severity};

use super::app::AppState;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub(super) fn draw_ui(frame: &mut ratatui::Frame, app: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, layout[0], app);
    draw_output(frame, layout[1], app);
    draw_status(frame, layout[2], app);
}

fn draw_header(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let title = Line::from(vec![
        Span::styled(app.lesson.title, header_style()),
        Span::raw("  "),
        Span::styled(app.lesson.summary, Style::default().fg(Color::DarkGray)),
    ]);
    let widget = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(format!("Lesson: {}", app.lesson.id)),
    );
    frame.render_widget(widget, area);
}

fn draw_output(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;

    // Entries are at least one row each, so the tail bounds what can be visible.
    let lines: Vec<Line<'static>> = {
        let log = lock_log(app.log());
        log.tail(inner_height).iter().flat_map(entry_lines).collect()
    };
    let view = latest_rows(lines, inner_width, inner_height);

    let widget = Paragraph::new(Text::from(view))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Output"),
        );
    frame.render_widget(widget, area);
}

fn draw_status(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let disabled_style = Style::default().fg(Color::DarkGray);

    let busy = match app.run_state {
        RunState::Running => Span::styled(
            format!("{} running", SPINNER[app.spinner % SPINNER.len()]),
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ),
        RunState::Idle => Span::styled("idle", Style::default().fg(Color::LightGreen)),
    };

    let mut keys = vec![
        Span::styled("[r]", key_style),
        Span::raw(" Run  "),
        Span::styled("[c]", key_style),
        Span::raw(" Clear  "),
    ];
    if app.lesson.bonus.is_some() {
        let style = if app.bonus_available() {
            key_style
        } else {
            disabled_style
        };
        keys.push(Span::styled("[b]", style));
        keys.push(Span::raw(" Bonus  "));
    }
    keys.push(Span::styled("[q]", key_style));
    keys.push(Span::raw(" Quit"));

    let status = Line::from(vec![
        busy,
        Span::raw("  |  "),
        Span::raw(app.status_message.clone()),
    ]);

    let widget = Paragraph::new(Text::from(vec![Line::from(keys), status])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Status"),
    );
    frame.render_widget(widget, area);
}

fn entry_lines(entry: &LogEntry) -> Vec<Line<'static>> {
    match entry.kind {
        EntryKind::Line => vec![Line::from(Span::styled(
            entry.text.clone(),
            severity_style(entry.severity),
        ))],
        EntryKind::CodeBlock => {
            let gutter = || Span::styled("│ ", Style::default().fg(Color::DarkGray));
            let mut lines: Vec<Line<'static>> = entry
                .text
                .lines()
                .map(|line| {
                    Line::from(vec![
                        gutter(),
                        Span::styled(line.to_string(), Style::default().fg(Color::LightCyan)),
                    ])
                })
                .collect();
            if lines.is_empty() {
                lines.push(Line::from(gutter()));
            }
            lines
        }
        EntryKind::Separator => vec![Line::from(Span::styled(
            entry.text.clone(),
            Style::default().fg(Color::DarkGray),
        ))],
        EntryKind::GroupHeader => vec![Line::from(Span::styled(
            entry.text.clone(),
            header_style(),
        ))],
    }
}

/// Keep the newest lines that fit `height` rows once wrapped at `width`.
fn latest_rows(lines: Vec<Line<'static>>, width: usize, height: usize) -> Vec<Line<'static>> {
    let mut used = 0;
    let mut start = lines.len();
    for line in lines.iter().rev() {
        let rows = rows_for(line, width);
        if used + rows > height {
            break;
        }
        used += rows;
        start -= 1;
    }
    lines.into_iter().skip(start).collect()
}

fn rows_for(line: &Line<'_>, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    let columns: usize = line
        .spans
        .iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum();
    columns.div_ceil(width).max(1)
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Info => Style::default(),
        Severity::Success => Style::default().fg(Color::LightGreen),
        Severity::Warning => Style::default().fg(Color::LightYellow),
        Severity::Error => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        Severity::System => Style::default().fg(Color::LightMagenta),
    }
}

fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Line<'static> {
        Line::from(text.to_string())
    }

    #[test]
    fn test_latest_rows_keeps_the_tail() {
        let lines = vec![plain("one"), plain("two"), plain("three")];
        let view = latest_rows(lines, 20, 2);
        let texts: Vec<String> = view.iter().map(|line| line.to_string()).collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[test]
    fn test_wrapped_lines_take_several_rows() {
        let lines = vec![plain("short"), plain(&"x".repeat(25))];
        // The long line needs three rows at width 10, leaving no room above it.
        let view = latest_rows(lines, 10, 3);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_empty_code_block_still_takes_a_row() {
        let entry = LogEntry {
            sequence_index: 0,
            kind: EntryKind::CodeBlock,
            severity: Severity::Info,
            text: String::new(),
            recorded_at: chrono::Utc::now(),
        };
        let lines = entry_lines(&entry);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].to_string(), "│ ");
    }

    #[test]
    fn test_rows_count_display_width() {
        assert_eq!(rows_for(&plain("界界界"), 4), 2);
        assert_eq!(rows_for(&plain(""), 4), 1);
    }
}
