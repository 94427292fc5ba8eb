//! Cursor over a step collection with per-step diff highlighting

use crate::diff::DiffEngine;
use crate::step::Step;
use crate::steps::{ApplyWarning, Steps};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read steps file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Steps file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Direction of the most recent cursor move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
    #[default]
    None,
}

/// What a renderer needs to draw the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub current: Option<Step>,
    /// 1-based changed lines of `current`
    pub diffs: Vec<usize>,
    pub current_no: usize,
    pub last_no: usize,
    pub is_first: bool,
    pub is_last: bool,
}

/// Callback invoked around `to_prev`/`to_next` with the 1-based current step
/// number at the time of the call
pub type NavHook = Box<dyn FnMut(usize)>;

#[derive(Default)]
struct Hooks {
    before_prev: Option<NavHook>,
    after_prev: Option<NavHook>,
    before_next: Option<NavHook>,
    after_next: Option<NavHook>,
}

impl Hooks {
    fn fire(slot: &mut Option<NavHook>, current_no: usize) {
        if let Some(hook) = slot.as_mut() {
            hook(current_no);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_prev", &self.before_prev.is_some())
            .field("after_prev", &self.after_prev.is_some())
            .field("before_next", &self.before_next.is_some())
            .field("after_next", &self.after_next.is_some())
            .finish()
    }
}

/// Walks a [`Steps`] collection and reports which lines changed at each step.
///
/// The cursor is signed: on an empty collection `at` parks it at `-1`, where
/// every index read is `None`.
#[derive(Debug, Default)]
pub struct Navigator {
    steps: Steps,
    cursor: isize,
    direction: StepDirection,
    engine: DiffEngine,
    hooks: Hooks,
}

impl Navigator {
    /// Build from an untrusted value shaped like `{"steps": [...]}`.
    ///
    /// Malformed input yields an empty, unavailable navigator.
    pub fn new(data: &Value) -> Self {
        let mut navigator = Self::default();
        navigator.apply(data);
        navigator
    }

    pub fn from_steps(steps: Steps) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let data: Value = serde_json::from_str(text)?;
        Ok(Self::new(&data))
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reload from `data`, then rewind to the first step
    pub fn apply(&mut self, data: &Value) -> Option<ApplyWarning> {
        let empty = Value::Array(Vec::new());
        let raw = data.get("steps").unwrap_or(&empty);
        let warning = self.steps.apply(raw);
        self.cursor = 0;
        self.direction = StepDirection::None;
        warning
    }

    pub fn steps(&self) -> &Steps {
        &self.steps
    }

    /// Mutable access to the collection; the cursor is not adjusted.
    pub fn steps_mut(&mut self) -> &mut Steps {
        &mut self.steps
    }

    pub fn count(&self) -> usize {
        self.steps.count()
    }

    pub fn is_available(&self) -> bool {
        self.count() > 0
    }

    /// Index of the current step, if the cursor points at one
    pub fn cursor(&self) -> Option<usize> {
        self.index(self.cursor)
    }

    pub fn direction(&self) -> StepDirection {
        self.direction
    }

    fn index(&self, position: isize) -> Option<usize> {
        usize::try_from(position)
            .ok()
            .filter(|&index| self.steps.has(index))
    }

    fn step_at(&self, position: isize) -> Option<&Step> {
        usize::try_from(position)
            .ok()
            .and_then(|index| self.steps.get(index))
    }

    pub fn current(&self) -> Option<&Step> {
        self.step_at(self.cursor)
    }

    pub fn previous(&self) -> Option<&Step> {
        if self.is_first() {
            return None;
        }
        self.step_at(self.cursor - 1)
    }

    pub fn current_no(&self) -> usize {
        usize::try_from(self.cursor + 1).unwrap_or(0)
    }

    pub fn last_no(&self) -> usize {
        self.count()
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.count() > 0 && self.current_no() == self.last_no()
    }

    /// Lines of the current step that changed since the previous one
    pub fn diffs(&self) -> Vec<usize> {
        self.engine.changed_lines(self.previous(), self.current())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current: self.current().cloned(),
            diffs: self.diffs(),
            current_no: self.current_no(),
            last_no: self.last_no(),
            is_first: self.is_first(),
            is_last: self.is_last(),
        }
    }

    /// Move to `point`, clamped into range. On an empty collection the
    /// cursor lands on `-1`.
    pub fn at(&mut self, point: isize) {
        let count = isize::try_from(self.count()).unwrap_or(isize::MAX);
        let point = point.max(0);
        let cursor = (count - 1).min(point);

        self.direction = match cursor.cmp(&self.cursor) {
            std::cmp::Ordering::Greater => StepDirection::Forward,
            std::cmp::Ordering::Less => StepDirection::Backward,
            std::cmp::Ordering::Equal => self.direction,
        };
        self.cursor = cursor;
    }

    pub fn first(&mut self) {
        self.at(0);
    }

    pub fn last(&mut self) {
        let count = isize::try_from(self.count()).unwrap_or(isize::MAX);
        self.at(count - 1);
    }

    /// Step back one; returns whether the cursor moved
    pub fn to_prev(&mut self) -> bool {
        let before = self.cursor;
        let no = self.current_no();
        Hooks::fire(&mut self.hooks.before_prev, no);
        self.at(self.cursor - 1);
        tracing::debug!(from = before, to = self.cursor, "step back");
        let no = self.current_no();
        Hooks::fire(&mut self.hooks.after_prev, no);
        self.cursor != before
    }

    /// Step forward one; returns whether the cursor moved
    pub fn to_next(&mut self) -> bool {
        let before = self.cursor;
        let no = self.current_no();
        Hooks::fire(&mut self.hooks.before_next, no);
        self.at(self.cursor + 1);
        tracing::debug!(from = before, to = self.cursor, "step forward");
        let no = self.current_no();
        Hooks::fire(&mut self.hooks.after_next, no);
        self.cursor != before
    }

    pub fn on_before_prev(&mut self, hook: impl FnMut(usize) + 'static) {
        self.hooks.before_prev = Some(Box::new(hook));
    }

    pub fn on_after_prev(&mut self, hook: impl FnMut(usize) + 'static) {
        self.hooks.after_prev = Some(Box::new(hook));
    }

    pub fn on_before_next(&mut self, hook: impl FnMut(usize) + 'static) {
        self.hooks.before_next = Some(Box::new(hook));
    }

    pub fn on_after_next(&mut self, hook: impl FnMut(usize) + 'static) {
        self.hooks.after_next = Some(Box::new(hook));
    }

    pub fn to_json(&self) -> Value {
        json!({ "steps": self.steps.to_json() })
    }
}

impl Serialize for Navigator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
