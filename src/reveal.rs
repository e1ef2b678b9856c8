//! One-shot reveal-on-view latches.
//!
//! A [`RevealTrigger`] watches a single target. The first intersection
//! notification that finds the target inside the (margin-adjusted) viewport
//! latches it; nothing latches it back. To replay an entry animation, build a
//! new trigger.
//!
//! ## Margin Semantics
//!
//! Margins follow CSS `rootMargin`: the viewport box is grown by a positive
//! margin and shrunk by a negative one before testing. With the default
//! section margin of `-100px`, a section reveals once its top edge has
//! travelled 100px above the bottom of the screen.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vertical geometry of a target relative to the viewport top, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub top: f64,
    pub bottom: f64,
    pub viewport_height: f64,
}

impl Intersection {
    /// Whether the target overlaps the viewport after applying `margin`.
    pub fn is_visible(&self, margin: i32) -> bool {
        let margin = f64::from(margin);
        let view_top = -margin;
        let view_bottom = self.viewport_height + margin;
        if view_bottom <= view_top {
            return false;
        }
        self.bottom > view_top && self.top < view_bottom
    }
}

/// Latch keyed to one target element.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealTrigger {
    target: String,
    margin: i32,
    revealed: bool,
}

impl RevealTrigger {
    pub fn new(target: impl Into<String>, margin: i32) -> Self {
        Self {
            target: target.into(),
            margin,
            revealed: false,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Feed an intersection notification. Returns `true` only on the
    /// notification that latches the trigger.
    pub fn observe(&mut self, entry: &Intersection) -> bool {
        if self.revealed || !entry.is_visible(self.margin) {
            return false;
        }
        self.revealed = true;
        true
    }
}

/// Independent triggers keyed by target id.
#[derive(Debug, Clone, Default)]
pub struct RevealSet {
    triggers: BTreeMap<String, RevealTrigger>,
}

impl RevealSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target. Re-registering an existing target replaces its
    /// trigger with a fresh, unrevealed one.
    pub fn watch(&mut self, target: &str, margin: i32) {
        self.triggers
            .insert(target.to_string(), RevealTrigger::new(target, margin));
    }

    /// Route a notification to its trigger. Unknown targets are ignored.
    pub fn observe(&mut self, target: &str, entry: &Intersection) -> bool {
        self.triggers
            .get_mut(target)
            .map(|t| t.observe(entry))
            .unwrap_or(false)
    }

    pub fn is_revealed(&self, target: &str) -> bool {
        self.triggers
            .get(target)
            .map(RevealTrigger::is_revealed)
            .unwrap_or(false)
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.triggers.keys().map(String::as_str)
    }

    pub fn revealed_targets(&self) -> impl Iterator<Item = &str> {
        self.triggers
            .values()
            .filter(|t| t.is_revealed())
            .map(RevealTrigger::target)
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
