//! Document-level side effects.
//!
//! State modules never touch the page directly. Transitions are pure; the
//! effects that follow them (writing `lang`, rewriting the color variables,
//! locking body scroll) are issued as explicit commands against a
//! [`Document`]. The browser script performs the same commands against the
//! real DOM; [`RecordingDocument`] captures them for previews and tests.

use std::collections::BTreeMap;

/// A target for document-level side effects.
pub trait Document {
    /// Set the `lang` attribute on the root element.
    fn set_lang(&mut self, lang: &str);

    /// Write a batch of custom properties on the root element.
    ///
    /// Implementations must apply the whole batch together: a reader never
    /// observes some keys from the new batch and some from the old one.
    fn apply_properties(&mut self, properties: &[(&str, &str)]);

    /// Lock or unlock page scrolling (`body { overflow: hidden }`).
    fn set_scroll_locked(&mut self, locked: bool);
}

impl<T: Document + ?Sized> Document for &mut T {
    fn set_lang(&mut self, lang: &str) {
        (**self).set_lang(lang);
    }

    fn apply_properties(&mut self, properties: &[(&str, &str)]) {
        (**self).apply_properties(properties);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        (**self).set_scroll_locked(locked);
    }
}

/// One recorded effect, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Lang(String),
    Properties(usize),
    ScrollLock(bool),
}

/// In-memory [`Document`] that keeps the current root state plus an effect log.
#[derive(Debug, Default, Clone)]
pub struct RecordingDocument {
    lang: Option<String>,
    properties: BTreeMap<String, String>,
    scroll_locked: bool,
    effects: Vec<Effect>,
}

impl RecordingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Current value of a root custom property.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }
}

impl Document for RecordingDocument {
    fn set_lang(&mut self, lang: &str) {
        self.lang = Some(lang.to_string());
        self.effects.push(Effect::Lang(lang.to_string()));
    }

    fn apply_properties(&mut self, properties: &[(&str, &str)]) {
        // Build the next map first so a batch lands in one assignment.
        let mut next = self.properties.clone();
        for (name, value) in properties {
            next.insert((*name).to_string(), (*value).to_string());
        }
        self.properties = next;
        self.effects.push(Effect::Properties(properties.len()));
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
        self.effects.push(Effect::ScrollLock(locked));
    }
}
