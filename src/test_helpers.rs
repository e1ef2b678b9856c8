//! Shared test utilities for the folio-site test suite.
//!
//! Provides stock config and content, a quick-submitting config for session
//! tests, and a fixture directory copier.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = load_config(tmp.path()).unwrap();
//! assert_eq!(config.contact.submit_delay_ms, 10);
//!
//! let state = view(Locale::Id);
//! assert_eq!(state.open_faq, Some(0));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::content::{SiteContent, resolve_content, stock_content_value};
use crate::locale::Locale;
use crate::session::ViewState;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Stock data
// =========================================================================

/// The compiled-in content document.
pub fn stock_content() -> SiteContent {
    resolve_content(stock_content_value().unwrap()).unwrap()
}

/// Stock config with a 10ms submission delay.
pub fn fast_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.contact.submit_delay_ms = 10;
    config
}

/// Initial view state for `locale` over the stock content.
pub fn view(locale: Locale) -> ViewState {
    ViewState::initial(locale, &stock_content())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::content::load_content;

    #[test]
    fn fixtures_load() {
        let tmp = setup_fixtures();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.contact.submit_delay_ms, 10);
        assert_eq!(config.site.brand, "Nadia");
        let content = load_content(tmp.path()).unwrap();
        assert_eq!(content.faq.en.len(), 2);
    }

    #[test]
    fn initial_view() {
        let state = view(Locale::Id);
        assert_eq!(state.open_faq, Some(0));
        assert_eq!(state.active_project, 0);
        assert!(state.dark);
        assert!(state.revealed.is_empty());
    }
}
