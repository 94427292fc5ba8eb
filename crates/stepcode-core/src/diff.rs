//! Changed-line computation between two steps

use crate::step::Step;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

/// How a run of lines relates the base step to the target step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HunkKind {
    /// Present in both, identical
    Unchanged,
    /// Only in the target
    Added,
    /// Only in the base
    Removed,
}

impl From<ChangeTag> for HunkKind {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Equal => HunkKind::Unchanged,
            ChangeTag::Insert => HunkKind::Added,
            ChangeTag::Delete => HunkKind::Removed,
        }
    }
}

/// A maximal run of lines classified the same way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub kind: HunkKind,
    pub count: usize,
}

/// The line diff engine.
///
/// Alignment is always Myers, so the same pair of steps yields the same
/// changed lines everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine;

impl DiffEngine {
    pub fn new() -> Self {
        Self
    }

    /// Split two line sequences into ordered hunks.
    ///
    /// Whole lines are compared; duplicates are matched left to right.
    pub fn hunks(&self, old: &[&str], new: &[&str]) -> Vec<Hunk> {
        let text_diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_slices(old, new);

        let mut hunks: Vec<Hunk> = Vec::new();
        for change in text_diff.iter_all_changes() {
            let kind = HunkKind::from(change.tag());
            match hunks.last_mut() {
                Some(last) if last.kind == kind => last.count += 1,
                _ => hunks.push(Hunk { kind, count: 1 }),
            }
        }
        hunks
    }

    /// 1-based line numbers of `target` that are new or changed relative to
    /// `base`, ascending.
    ///
    /// Without a target there is nothing to highlight; without a base every
    /// target line counts as changed.
    pub fn changed_lines(&self, base: Option<&Step>, target: Option<&Step>) -> Vec<usize> {
        let Some(target) = target else {
            return Vec::new();
        };
        let Some(base) = base else {
            return (1..=target.code_line_count()).collect();
        };

        let hunks = self.hunks(&base.code_lines(), &target.code_lines());

        let mut line = 0usize;
        let mut changed = Vec::new();
        for hunk in hunks {
            match hunk.kind {
                HunkKind::Removed => {}
                HunkKind::Unchanged => line += hunk.count,
                HunkKind::Added => {
                    for _ in 0..hunk.count {
                        line += 1;
                        changed.push(line);
                    }
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(engine: &DiffEngine, base: &str, target: &str) -> Vec<usize> {
        let base = Step::new(base, "");
        let target = Step::new(target, "");
        engine.changed_lines(Some(&base), Some(&target))
    }

    #[test]
    fn test_no_target() {
        let engine = DiffEngine::new();
        let base = Step::new("a", "");
        assert!(engine.changed_lines(Some(&base), None).is_empty());
        assert!(engine.changed_lines(None, None).is_empty());
    }

    #[test]
    fn test_no_base_marks_every_line() {
        let engine = DiffEngine::new();
        let cases: [(&str, Vec<usize>); 4] = [
            ("", vec![]),
            ("1", vec![1]),
            ("\n", vec![1, 2]),
            ("1\n1", vec![1, 2]),
        ];
        for (code, expected) in cases {
            let target = Step::new(code, "");
            assert_eq!(engine.changed_lines(None, Some(&target)), expected, "code: {code:?}");
        }
    }

    #[test]
    fn test_no_changes() {
        let engine = DiffEngine::new();
        let text = "foo\nbar\nbaz";
        assert!(lines(&engine, text, text).is_empty());
    }

    #[test]
    fn test_simple_replace() {
        let engine = DiffEngine::new();
        assert_eq!(lines(&engine, "foo\nbar\nbaz", "foo\nqux\nbaz"), vec![2]);
    }

    #[test]
    fn test_pure_removal_marks_nothing() {
        let engine = DiffEngine::new();
        assert!(lines(&engine, "a\nb\nc", "a\nc").is_empty());
    }

    #[test]
    fn test_crlf_matches_lf() {
        let engine = DiffEngine::new();
        assert_eq!(lines(&engine, "a\r\nb", "a\nb\nc"), vec![3]);
    }

    #[test]
    fn test_duplicate_lines_consumed_once() {
        let engine = DiffEngine::new();
        // The existing "x" matches the first copy; the second is new.
        assert_eq!(lines(&engine, "x", "x\nx"), vec![2]);
        assert_eq!(lines(&engine, "x\ny", "y\nx\ny"), vec![1]);
    }

    #[test]
    fn test_swapped_lines_are_stable() {
        let engine = DiffEngine::new();
        assert_eq!(lines(&engine, "a\nb", "b\na"), vec![1]);
        assert_eq!(lines(&engine, "a\nb\nc", "c\na\nb"), vec![1]);
    }

    #[test]
    fn test_hunks_grouping() {
        let engine = DiffEngine::new();
        let hunks = engine.hunks(&["", "1", "2", "3"], &["", "1", "", "3", "4"]);

        let added: usize = hunks
            .iter()
            .filter(|h| h.kind == HunkKind::Added)
            .map(|h| h.count)
            .sum();
        let removed: usize = hunks
            .iter()
            .filter(|h| h.kind == HunkKind::Removed)
            .map(|h| h.count)
            .sum();

        assert_eq!(hunks.first(), Some(&Hunk { kind: HunkKind::Unchanged, count: 2 }));
        assert_eq!(added, 2);
        assert_eq!(removed, 1);
        for pair in hunks.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }
}
