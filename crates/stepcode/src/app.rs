//! Viewer state: the navigator plus scroll and input bookkeeping

use crate::config::{Config, StartAt};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use stepcode_core::{Navigator, Snapshot};

pub struct App {
    pub navigator: Navigator,
    pub config: Config,
    pub source: PathBuf,
    /// First visible code line
    pub scroll_offset: usize,
    pub show_help: bool,
    pub should_quit: bool,
    /// Pending step number typed before `Enter`
    count: Option<usize>,
    /// Transient message for the status line
    pub status: Option<String>,
}

impl App {
    pub fn new(navigator: Navigator, config: Config, source: PathBuf) -> Self {
        let mut app = Self {
            navigator,
            config,
            source,
            scroll_offset: 0,
            show_help: false,
            should_quit: false,
            count: None,
            status: None,
        };
        app.install_hooks();
        app.go_to_start();
        app
    }

    fn install_hooks(&mut self) {
        self.navigator
            .on_after_next(|no| tracing::debug!(step = no, "advanced"));
        self.navigator
            .on_after_prev(|no| tracing::debug!(step = no, "went back"));
    }

    fn go_to_start(&mut self) {
        match self.config.navigation.start {
            StartAt::First => self.navigator.first(),
            StartAt::Last => self.navigator.last(),
        }
    }

    /// Jump to a 1-based step number
    pub fn goto_step(&mut self, number: usize) {
        let index = isize::try_from(number).unwrap_or(isize::MAX) - 1;
        self.navigator.at(index);
        self.scroll_offset = 0;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.navigator.snapshot()
    }

    pub fn pending_count(&self) -> Option<usize> {
        self.count
    }

    pub fn next_step(&mut self) {
        if self.navigator.to_next() {
            self.scroll_offset = 0;
        }
    }

    pub fn prev_step(&mut self) {
        if self.navigator.to_prev() {
            self.scroll_offset = 0;
        }
    }

    pub fn first_step(&mut self) {
        self.navigator.first();
        self.scroll_offset = 0;
    }

    pub fn last_step(&mut self) {
        self.navigator.last();
        self.scroll_offset = 0;
    }

    pub fn scroll_down(&mut self) {
        let lines = self
            .navigator
            .current()
            .map(|step| step.code_line_count())
            .unwrap_or(0);
        if self.scroll_offset + 1 < lines {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Keep the scroll offset inside the code for the given viewport
    pub fn clamp_scroll(&mut self, total_lines: usize, viewport_height: usize) {
        let max = total_lines.saturating_sub(viewport_height);
        self.scroll_offset = self.scroll_offset.min(max);
    }

    /// Re-read the source file and apply it in place
    pub fn reload(&mut self) -> Result<()> {
        let text = std::fs::read_to_string(&self.source)
            .with_context(|| format!("reading {}", self.source.display()))?;
        let data: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", self.source.display()))?;

        self.status = Some(match self.navigator.apply(&data) {
            Some(warning) => warning.to_string(),
            None => format!("reloaded {} steps", self.navigator.count()),
        });
        self.scroll_offset = 0;
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;

        if let KeyCode::Char(ch @ '0'..='9') = key.code {
            let digit = ch.to_digit(10).map(|d| d as usize).unwrap_or(0);
            self.count = Some(self.count.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Enter => {
                if let Some(number) = self.count.take() {
                    self.goto_step(number);
                }
            }
            KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Char(' ') | KeyCode::Right => {
                self.next_step()
            }
            KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => self.prev_step(),
            KeyCode::Char('g') | KeyCode::Home => self.first_step(),
            KeyCode::Char('G') | KeyCode::End => self.last_step(),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            KeyCode::Char('r') => {
                if let Err(err) = self.reload() {
                    tracing::warn!("reload failed: {err:#}");
                    self.status = Some(format!("reload failed: {err:#}"));
                }
            }
            _ => {}
        }
        self.count = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn app() -> App {
        let navigator = Navigator::new(&json!({
            "steps": [
                { "code": "a", "desc": "one" },
                { "code": "a\nb", "desc": "two" },
                { "code": "a\nb\nc", "desc": "three" },
            ]
        }));
        App::new(navigator, Config::default(), PathBuf::from("steps.json"))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_keys_navigate() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.snapshot().current_no, 2);
        assert_eq!(app.snapshot().diffs, vec![2]);

        press(&mut app, KeyCode::Char('G'));
        assert!(app.snapshot().is_last);

        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('g'));
        assert!(app.snapshot().is_first);
    }

    #[test]
    fn test_count_then_enter_jumps() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.pending_count(), Some(3));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.snapshot().current_no, 3);

        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.snapshot().current_no, 3);
        assert_eq!(app.pending_count(), None);
    }

    #[test]
    fn test_start_at_last() {
        let navigator = Navigator::new(&json!({ "steps": [{ "code": "a" }, { "code": "b" }] }));
        let mut config = Config::default();
        config.navigation.start = StartAt::Last;
        let app = App::new(navigator, config, PathBuf::from("steps.json"));
        assert_eq!(app.snapshot().current_no, 2);
    }

    #[test]
    fn test_scroll_stays_in_code() {
        let mut app = app();
        app.last_step();
        for _ in 0..10 {
            app.scroll_down();
        }
        assert_eq!(app.scroll_offset, 2);

        app.clamp_scroll(3, 2);
        assert_eq!(app.scroll_offset, 1);
        app.next_step();
        assert_eq!(app.scroll_offset, 1);
        app.prev_step();
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_reload_replaces_steps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.json");
        std::fs::write(&path, r#"{ "steps": [{ "code": "x" }] }"#).unwrap();

        let mut app = app();
        app.source = path.clone();
        app.last_step();
        app.reload().unwrap();
        assert_eq!(app.snapshot().last_no, 1);
        assert_eq!(app.snapshot().current_no, 1);
        assert_eq!(app.status.as_deref(), Some("reloaded 1 steps"));

        std::fs::write(&path, r#"{ "steps": "bad" }"#).unwrap();
        app.reload().unwrap();
        assert_eq!(app.snapshot().last_no, 1);
        assert_eq!(app.status.as_deref(), Some("expected an array of steps, got string"));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
