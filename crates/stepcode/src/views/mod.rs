//! View rendering modules

mod step_pane;

pub use step_pane::render_code_pane;

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use stepcode_core::Snapshot;

const HELP: &[(&str, &str)] = &[
    ("l / → / space", "next step"),
    ("h / ←", "previous step"),
    ("g / G", "first / last step"),
    ("<n> Enter", "jump to step n"),
    ("j / k", "scroll code"),
    ("r", "reload file"),
    ("?", "toggle help"),
    ("q", "quit"),
];

/// Draw the whole screen for the current step
pub fn render(frame: &mut Frame, app: &mut App) {
    let snapshot = app.snapshot();
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, &snapshot, chunks[0]);

    match &snapshot.current {
        Some(step) => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(chunks[1]);
            render_code_pane(frame, app, step, &snapshot.diffs, body[0]);

            let desc = Paragraph::new(step.desc().to_string())
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::TOP).title(" Notes "));
            frame.render_widget(desc, body[1]);
        }
        None => render_empty_state(frame, chunks[1]),
    }

    render_progress(frame, &snapshot, chunks[2]);
    render_status(frame, app, chunks[3]);

    if app.show_help {
        render_help(frame, area);
    }
}

fn render_header(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let mut spans = Vec::new();
    if let Some(step) = &snapshot.current {
        if let Some(title) = step.title() {
            spans.push(Span::styled(
                title.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(file) = step.file() {
            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(file.to_string(), Style::default().fg(Color::Cyan)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let counter = format!("{}/{}", snapshot.current_no.min(snapshot.last_no), snapshot.last_no);
    frame.render_widget(Paragraph::new(counter).alignment(Alignment::Right), area);
}

fn render_progress(frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let ratio = if snapshot.last_no == 0 {
        0.0
    } else {
        (snapshot.current_no.min(snapshot.last_no) as f64 / snapshot.last_no as f64).clamp(0.0, 1.0)
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label("");
    frame.render_widget(gauge, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.status, app.pending_count()) {
        (_, Some(count)) => format!(":{count}"),
        (Some(status), None) => status.clone(),
        (None, None) => "? help  q quit".to_string(),
    };
    let status = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}

fn render_empty_state(frame: &mut Frame, area: Rect) {
    let message = Paragraph::new("No steps to show")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(message, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let width = 40.min(area.width);
    let height = (HELP.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<16}"), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Keys ")),
        popup,
    );
}
