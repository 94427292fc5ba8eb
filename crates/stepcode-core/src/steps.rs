//! Ordered, bounds-checked collection of steps

use crate::step::Step;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Non-fatal diagnostic returned when `apply` receives something that is not
/// a list of steps. The collection is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected an array of steps, got {found}")]
pub struct ApplyWarning {
    pub found: &'static str,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The steps of a presentation, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Steps {
    items: Vec<Step>,
}

impl Steps {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a raw list; anything that is not an array gives an empty
    /// collection.
    pub fn from_value(raw: &Value) -> Self {
        let mut steps = Self::new();
        let _ = steps.apply(raw);
        steps
    }

    /// Number of steps
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no steps
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if `index` points at a step
    pub fn has(&self, index: usize) -> bool {
        index < self.items.len()
    }

    /// Get a step by index; `None` when out of range
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.items.get(index)
    }

    /// Get a step by index for editing in place
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Step> {
        self.items.get_mut(index)
    }

    /// The first step, if any
    pub fn first(&self) -> Option<&Step> {
        self.items.first()
    }

    /// The last step, if any
    pub fn last(&self) -> Option<&Step> {
        self.items.last()
    }

    /// Iterate over the steps in order
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.items.iter()
    }

    /// Replace the whole contents with steps built from `raw`.
    ///
    /// A non-array is ignored with a warning, both logged and returned.
    pub fn apply(&mut self, raw: &Value) -> Option<ApplyWarning> {
        let Some(list) = raw.as_array() else {
            let warning = ApplyWarning {
                found: json_kind(raw),
            };
            tracing::warn!(found = warning.found, "ignoring steps: {warning}");
            return Some(warning);
        };

        self.items = list.iter().map(Step::from_value).collect();
        tracing::debug!(count = self.items.len(), "applied steps");
        None
    }

    /// Append a step at the end
    pub fn push(&mut self, step: Step) {
        self.items.push(step);
    }

    /// Prepend a step at the front
    pub fn unshift(&mut self, step: Step) {
        self.items.insert(0, step);
    }

    /// Insert before the step currently at `index`; an index at or past the
    /// end appends.
    pub fn add(&mut self, index: usize, step: Step) {
        let index = index.min(self.items.len());
        self.items.insert(index, step);
    }

    /// Remove the last step; `None` when empty
    pub fn pop(&mut self) -> Option<Step> {
        self.items.pop()
    }

    /// Remove the first step; `None` when empty
    pub fn shift(&mut self) -> Option<Step> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.remove(0))
    }

    /// Remove the step at `index`, doing nothing when out of range
    pub fn remove(&mut self, index: usize) -> Option<Step> {
        if !self.has(index) {
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Each step's JSON projection, in order
    pub fn to_json(&self) -> Value {
        Value::Array(self.items.iter().map(Step::to_json).collect())
    }
}

impl From<Vec<Step>> for Steps {
    fn from(items: Vec<Step>) -> Self {
        Self { items }
    }
}

impl FromIterator<Step> for Steps {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn three() -> Steps {
        let mut steps = Steps::new();
        steps.push(Step::new("a", "first"));
        steps.push(Step::new("b", "second"));
        steps.push(Step::new("c", "third"));
        steps
    }

    #[test]
    fn test_has_and_get_agree() {
        let steps = three();
        for index in 0..6 {
            assert_eq!(steps.has(index), index < 3);
            assert_eq!(steps.get(index).is_some(), steps.has(index));
        }
    }

    #[test]
    fn test_first_last_empty() {
        let steps = Steps::new();
        assert_eq!(steps.count(), 0);
        assert!(steps.first().is_none());
        assert!(steps.last().is_none());
    }

    #[test]
    fn test_remove_middle() {
        let mut steps = three();
        let removed = steps.remove(1);

        assert_eq!(removed.map(|s| s.code().to_owned()), Some("b".into()));
        assert_eq!(steps.count(), 2);
        assert_eq!(steps.first().map(Step::code), Some("a"));
        assert_eq!(steps.last().map(Step::code), Some("c"));
    }

    #[test]
    fn test_removals_on_empty_are_noops() {
        let mut steps = Steps::new();
        assert!(steps.pop().is_none());
        assert!(steps.shift().is_none());
        assert!(steps.remove(0).is_none());
        assert!(steps.is_empty());
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut steps = three();
        assert!(steps.remove(3).is_none());
        assert_eq!(steps.count(), 3);
    }

    #[test]
    fn test_front_and_back() {
        let mut steps = three();
        steps.unshift(Step::new("z", ""));
        assert_eq!(steps.first().map(Step::code), Some("z"));

        assert_eq!(steps.shift().map(|s| s.code().to_owned()), Some("z".into()));
        assert_eq!(steps.pop().map(|s| s.code().to_owned()), Some("c".into()));
        assert_eq!(steps.count(), 2);
    }

    #[test]
    fn test_add_inserts_before_index() {
        let mut steps = three();
        steps.add(1, Step::new("x", ""));
        let codes: Vec<_> = steps.iter().map(Step::code).collect();
        assert_eq!(codes, vec!["a", "x", "b", "c"]);

        steps.add(steps.count(), Step::new("end", ""));
        assert_eq!(steps.last().map(Step::code), Some("end"));
    }

    #[test]
    fn test_add_past_end_appends() {
        let mut steps = three();
        steps.add(99, Step::new("far", ""));
        assert_eq!(steps.count(), 4);
        assert_eq!(steps.last().map(Step::code), Some("far"));
    }

    #[test]
    fn test_apply_replaces_contents() {
        let mut steps = three();
        let warning = steps.apply(&json!([{ "code": "1" }, { "desc": "d" }, 7]));

        assert!(warning.is_none());
        assert_eq!(steps.count(), 3);
        assert_eq!(steps.get(0).map(Step::code), Some("1"));
        assert_eq!(steps.get(1).map(Step::desc), Some("d"));
        assert_eq!(steps.get(2), Some(&Step::default()));
    }

    #[test]
    fn test_apply_non_array_is_ignored() {
        let mut steps = three();
        let warning = steps.apply(&json!({ "code": "1" }));

        assert_eq!(warning, Some(ApplyWarning { found: "object" }));
        assert_eq!(steps, three());
    }

    #[test]
    fn test_from_value_invalid_is_empty() {
        assert!(Steps::from_value(&json!("nope")).is_empty());
        assert!(Steps::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn test_from_vec_and_iterate() {
        let steps = Steps::from(vec![Step::new("a", ""), Step::new("b", "")]);
        let codes: Vec<&str> = (&steps).into_iter().map(Step::code).collect();
        assert_eq!(codes, vec!["a", "b"]);
    }

    #[test]
    fn test_to_json_preserves_order() {
        let steps = three();
        assert_eq!(
            steps.to_json(),
            json!([
                { "code": "a", "desc": "first" },
                { "code": "b", "desc": "second" },
                { "code": "c", "desc": "third" },
            ])
        );
    }
}
