//! Stepcode Core - step model and line-diff navigation
//!
//! This library provides the data structures for a sequence of code steps
//! and a navigator that walks through them, reporting which lines of each
//! step are new or changed relative to the one before it.

pub mod diff;
pub mod navigator;
pub mod step;
pub mod steps;

pub use diff::{DiffEngine, Hunk, HunkKind};
pub use navigator::{LoadError, NavHook, Navigator, Snapshot, StepDirection};
pub use step::Step;
pub use steps::{ApplyWarning, Steps};
