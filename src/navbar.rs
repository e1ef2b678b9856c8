//! Navbar state: the scrolled look and the mobile menu.

use crate::dom::Document;

/// Scroll offset past which the navbar switches to its solid style.
pub const SCROLL_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavbarState {
    scrolled: bool,
    menu_open: bool,
}

impl NavbarState {
    pub fn scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Returns whether the scrolled flag changed.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        let scrolled = scroll_y > SCROLL_THRESHOLD;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    /// Open or close the mobile menu, locking body scroll while it is open.
    pub fn set_menu_open(&mut self, open: bool, doc: &mut dyn Document) {
        if self.menu_open != open {
            self.menu_open = open;
            doc.set_scroll_locked(open);
        }
    }

    pub fn toggle_menu(&mut self, doc: &mut dyn Document) {
        self.set_menu_open(!self.menu_open, doc);
    }

    /// Release the scroll lock on teardown.
    pub fn release(&mut self, doc: &mut dyn Document) {
        self.set_menu_open(false, doc);
    }
}
