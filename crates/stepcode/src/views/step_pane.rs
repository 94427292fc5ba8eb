//! Code pane - the current step with changed lines highlighted

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use stepcode_core::Step;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CHANGED_BG: Color = Color::Rgb(30, 60, 35);

/// Width of the gutter: marker, line number, one space of padding
pub(crate) fn gutter_width(marker: &str, line_count: usize, line_numbers: bool) -> u16 {
    let digits = if line_numbers {
        line_count.max(1).to_string().len() + 1
    } else {
        0
    };
    u16::try_from(marker.width() + digits + 1).unwrap_or(u16::MAX)
}

/// Break `text` into rows of at most `width` display columns.
///
/// Always yields at least one row, so an empty line still takes up a row.
pub(crate) fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.width() <= width {
        return vec![text.to_string()];
    }

    let mut rows = Vec::new();
    let mut row = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        row.push(ch);
        used += ch_width;
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

/// Render the code of `step`, marking the 1-based lines in `diffs`.
///
/// Wrapping is done here rather than by the paragraph, so every wrapped row
/// gets a matching gutter row and markers stay on the line they label.
pub fn render_code_pane(
    frame: &mut Frame,
    app: &mut App,
    step: &Step,
    diffs: &[usize],
    area: Rect,
) {
    let lines = step.code_lines();
    let visible_height = area.height as usize;
    let wrap = app.config.ui.wrap;
    if !wrap {
        app.clamp_scroll(lines.len(), visible_height);
    }

    let marker = app.config.ui.changed_marker.clone();
    let blank_marker = " ".repeat(marker.width());
    let line_numbers = app.config.ui.line_numbers;
    let gutter = gutter_width(&marker, lines.len(), line_numbers);
    let blank_gutter = " ".repeat(usize::from(gutter));
    let number_width = lines.len().max(1).to_string().len();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(gutter), Constraint::Min(0)])
        .split(area);
    let content_width = usize::from(chunks[1].width);

    let mut gutter_lines: Vec<Line> = Vec::new();
    let mut content_lines: Vec<Line> = Vec::new();

    for (idx, text) in lines.iter().enumerate().skip(app.scroll_offset) {
        if gutter_lines.len() >= visible_height {
            break;
        }
        let line_no = idx + 1;
        let changed = diffs.binary_search(&line_no).is_ok();

        let (mark, mark_style, content_style) = if changed {
            (
                marker.as_str(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                Style::default().bg(CHANGED_BG),
            )
        } else {
            (blank_marker.as_str(), Style::default(), Style::default())
        };

        let expanded = app.config.expand_tabs(text);
        let rows = if wrap {
            wrap_columns(&expanded, content_width)
        } else {
            vec![expanded]
        };

        for (row_idx, row) in rows.into_iter().enumerate() {
            if gutter_lines.len() >= visible_height {
                break;
            }
            if row_idx == 0 {
                let mut gutter_spans = vec![Span::styled(mark.to_string(), mark_style)];
                if line_numbers {
                    gutter_spans.push(Span::styled(
                        format!("{line_no:>number_width$}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                gutter_spans.push(Span::raw(" "));
                gutter_lines.push(Line::from(gutter_spans));
            } else {
                gutter_lines.push(Line::from(blank_gutter.clone()));
            }
            content_lines.push(Line::from(Span::styled(row, content_style)));
        }
    }

    frame.render_widget(Paragraph::new(gutter_lines), chunks[0]);
    frame.render_widget(Paragraph::new(content_lines), chunks[1]);

    if lines.len() > visible_height {
        let mut state = ScrollbarState::new(lines.len()).position(app.scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut state,
        );
    }
}
