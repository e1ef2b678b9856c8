//! Light/dark theme toggle.
//!
//! The transition is a pure flip of [`ThemeState::is_dark`]. Applying the
//! matching palette is a separate command, [`apply_theme`], which hands all
//! nine variables to the document in one batch.
//!
//! The theme is deliberately session-only: unlike the locale, it is not
//! written to the preference store and every visit starts dark.

use crate::config::{ColorConfig, Palette};
use crate::dom::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    is_dark: bool,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self { is_dark: true }
    }
}

impl ThemeState {
    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn toggle(&mut self) {
        self.is_dark = !self.is_dark;
    }

    pub fn name(&self) -> &'static str {
        if self.is_dark { "dark" } else { "light" }
    }

    /// Palette for the current state.
    pub fn palette<'a>(&self, colors: &'a ColorConfig) -> &'a Palette {
        if self.is_dark {
            &colors.dark
        } else {
            &colors.light
        }
    }
}

/// Rewrite the root color variables for `state` in a single batch.
pub fn apply_theme(state: ThemeState, colors: &ColorConfig, doc: &mut dyn Document) {
    let entries = state.palette(colors).entries();
    doc.apply_properties(&entries);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Effect, RecordingDocument};

    #[test]
    fn defaults_to_dark() {
        assert!(ThemeState::default().is_dark());
        assert_eq!(ThemeState::default().name(), "dark");
    }

    #[test]
    fn apply_writes_all_keys_in_one_batch() {
        let colors = ColorConfig::default();
        let mut doc = RecordingDocument::new();
        apply_theme(ThemeState::default(), &colors, &mut doc);

        assert_eq!(doc.effects(), &[Effect::Properties(9)]);
        for (name, value) in colors.dark.entries() {
            assert_eq!(doc.property(name), Some(value));
        }
    }

    #[test]
    fn toggle_switches_every_variable() {
        let colors = ColorConfig::default();
        let mut doc = RecordingDocument::new();
        let mut state = ThemeState::default();
        apply_theme(state, &colors, &mut doc);

        state.toggle();
        apply_theme(state, &colors, &mut doc);
        assert!(!state.is_dark());
        for (name, value) in colors.light.entries() {
            assert_eq!(doc.property(name), Some(value));
        }
    }

    #[test]
    fn double_toggle_round_trips() {
        let colors = ColorConfig::default();
        let mut doc = RecordingDocument::new();
        let mut state = ThemeState::default();
        apply_theme(state, &colors, &mut doc);
        let original = doc.properties().clone();

        state.toggle();
        apply_theme(state, &colors, &mut doc);
        state.toggle();
        apply_theme(state, &colors, &mut doc);

        assert_eq!(doc.properties(), &original);
        assert!(state.is_dark());
    }
}
