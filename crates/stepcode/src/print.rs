//! Non-interactive output: every step in order with changed lines marked

use crate::config::Config;
use std::io::{self, Write};
use stepcode_core::Navigator;
use unicode_width::UnicodeWidthStr;

/// Write all steps of `navigator` to `out`, leaving the cursor on the last
/// step.
pub fn print_steps<W: Write>(
    navigator: &mut Navigator,
    config: &Config,
    out: &mut W,
) -> io::Result<()> {
    if !navigator.is_available() {
        writeln!(out, "(no steps)")?;
        return Ok(());
    }

    let marker = config.ui.changed_marker.as_str();
    let blank = " ".repeat(marker.width());

    navigator.first();
    loop {
        let snapshot = navigator.snapshot();
        if let Some(step) = &snapshot.current {
            let heading = match (step.title(), step.file()) {
                (Some(title), Some(file)) => format!("{title} ({file})"),
                (Some(title), None) => title.to_string(),
                (None, Some(file)) => file.to_string(),
                (None, None) => String::new(),
            };
            writeln!(out, "== Step {}/{} {heading}", snapshot.current_no, snapshot.last_no)?;

            let lines = step.code_lines();
            let width = lines.len().max(1).to_string().len();
            for (idx, line) in lines.iter().enumerate() {
                let no = idx + 1;
                let mark = if snapshot.diffs.contains(&no) { marker } else { blank.as_str() };
                if config.ui.line_numbers {
                    writeln!(out, "{mark}{no:>width$} {}", config.expand_tabs(line))?;
                } else {
                    writeln!(out, "{mark} {}", config.expand_tabs(line))?;
                }
            }
            if !step.desc().is_empty() {
                writeln!(out)?;
                writeln!(out, "{}", step.desc())?;
            }
            writeln!(out)?;
        }

        if !navigator.to_next() {
            break;
        }
    }
    Ok(())
}
