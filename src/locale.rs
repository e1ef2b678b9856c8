//! Locale state, persistence, and the provider scope.
//!
//! The page has exactly one active [`Locale`]. It starts as English, is
//! replaced by a previously stored preference when one exists, and changes
//! only through [`LocaleContext::set_locale`] or
//! [`LocaleContext::toggle_locale`]. Every change is written back to the
//! [`PreferenceStore`] and to the document's `lang` attribute.
//!
//! ## Provider Scope
//!
//! Renderers do not reach for a global. They receive a [`Scope`], and a
//! scope only carries a locale when it was created inside a provider:
//!
//! ```rust
//! use folio_site::locale::{Locale, Scope, ContextError};
//!
//! let inside = Scope::with_locale(Locale::Id);
//! assert_eq!(inside.language().unwrap(), Locale::Id);
//!
//! let outside = Scope::root();
//! assert!(matches!(outside.language(), Err(ContextError::MissingProvider)));
//! ```
//!
//! Consuming the locale outside a provider is a programming error; the
//! generator propagates it and aborts the build.

use crate::dom::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("locale consumed outside of a locale provider")]
    MissingProvider,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported locale '{0}' (expected 'en' or 'id')")]
pub struct ParseLocaleError(pub String);

/// Display language. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Id];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Id => "id",
        }
    }

    /// The other locale.
    pub fn flipped(self) -> Locale {
        match self {
            Locale::En => Locale::Id,
            Locale::Id => Locale::En,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "id" => Ok(Locale::Id),
            other => Err(ParseLocaleError(other.to_string())),
        }
    }
}

/// A value with one variant per locale.
///
/// Lists that must stay in lockstep across languages are stored as a
/// `Localized<Vec<_>>` and checked for matching shape when content loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Localized<T> {
    pub en: T,
    pub id: T,
}

impl<T> Localized<T> {
    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::En => &self.en,
            Locale::Id => &self.id,
        }
    }
}

impl Localized<String> {
    pub fn text(&self, locale: Locale) -> &str {
        self.get(locale)
    }
}

// ============================================================================
// Preference storage
// ============================================================================

/// Key-value storage for user preferences (the page's `localStorage`).
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store. Every session created with it starts without a preference.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk.
///
/// Used by `preview` so a preference chosen in one run is visible to the
/// next, the same way a browser keeps `localStorage` between visits.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store, treating a missing file as empty.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let entries = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json)?;
        self.entries = entries;
        Ok(())
    }
}

// ============================================================================
// Context
// ============================================================================

/// Owner of the page locale.
///
/// Single writer: only this value mutates the locale. Readers get a copy
/// through [`LocaleContext::scope`].
#[derive(Debug)]
pub struct LocaleContext<S> {
    locale: Locale,
    store: S,
    key: String,
}

impl<S: PreferenceStore> LocaleContext<S> {
    /// Create the context, restoring a stored preference if it is valid.
    ///
    /// The resolved locale is written back immediately, matching the page's
    /// behavior of persisting on every settled value.
    pub fn init(store: S, key: &str, doc: &mut dyn Document) -> Result<Self, StoreError> {
        let locale = store
            .load(key)
            .and_then(|saved| saved.parse::<Locale>().ok())
            .unwrap_or_default();
        let mut ctx = Self {
            locale,
            store,
            key: key.to_string(),
        };
        ctx.commit(locale, doc)?;
        Ok(ctx)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Persist `locale`, then adopt it. A failed save leaves the context and
    /// the document on the previous locale.
    pub fn set_locale(&mut self, locale: Locale, doc: &mut dyn Document) -> Result<(), StoreError> {
        self.commit(locale, doc)
    }

    pub fn toggle_locale(&mut self, doc: &mut dyn Document) -> Result<Locale, StoreError> {
        self.set_locale(self.locale.flipped(), doc)?;
        Ok(self.locale)
    }

    /// A provider scope carrying the current locale.
    pub fn scope(&self) -> Scope {
        Scope::with_locale(self.locale)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn commit(&mut self, locale: Locale, doc: &mut dyn Document) -> Result<(), StoreError> {
        self.store.save(&self.key, locale.code())?;
        self.locale = locale;
        doc.set_lang(locale.code());
        Ok(())
    }
}

/// The view of the locale handed down the render tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope {
    locale: Option<Locale>,
}

impl Scope {
    /// A scope with no locale provider above it.
    pub fn root() -> Self {
        Self { locale: None }
    }

    pub fn with_locale(locale: Locale) -> Self {
        Self {
            locale: Some(locale),
        }
    }

    /// The provided locale, or [`ContextError::MissingProvider`].
    pub fn language(&self) -> Result<Locale, ContextError> {
        self.locale.ok_or(ContextError::MissingProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::RecordingDocument;
    use tempfile::TempDir;

    /// Accepts writes until `broken` is set.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        broken: bool,
    }

    impl PreferenceStore for FlakyStore {
        fn load(&self, key: &str) -> Option<String> {
            self.inner.load(key)
        }

        fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.broken {
                return Err(StoreError::Io(std::io::Error::other("quota exceeded")));
            }
            self.inner.save(key, value)
        }
    }

    fn fresh() -> (LocaleContext<MemoryStore>, RecordingDocument) {
        let mut doc = RecordingDocument::new();
        let ctx = LocaleContext::init(MemoryStore::new(), "locale", &mut doc).unwrap();
        (ctx, doc)
    }

    #[test]
    fn defaults_to_english_without_preference() {
        let (ctx, doc) = fresh();
        assert_eq!(ctx.locale(), Locale::En);
        assert_eq!(doc.lang(), Some("en"));
    }

    #[test]
    fn toggle_flips_and_persists() {
        let (mut ctx, mut doc) = fresh();

        assert_eq!(ctx.toggle_locale(&mut doc).unwrap(), Locale::Id);
        assert_eq!(ctx.store().load("locale").as_deref(), Some("id"));
        assert_eq!(doc.lang(), Some("id"));

        assert_eq!(ctx.toggle_locale(&mut doc).unwrap(), Locale::En);
        assert_eq!(ctx.store().load("locale").as_deref(), Some("en"));
        assert_eq!(doc.lang(), Some("en"));
    }

    #[test]
    fn restores_stored_preference() {
        let mut doc = RecordingDocument::new();
        let store = MemoryStore::with_entry("locale", "id");
        let ctx = LocaleContext::init(store, "locale", &mut doc).unwrap();
        assert_eq!(ctx.locale(), Locale::Id);
        assert_eq!(doc.lang(), Some("id"));
    }

    #[test]
    fn invalid_preference_falls_back_to_english() {
        let mut doc = RecordingDocument::new();
        let store = MemoryStore::with_entry("locale", "fr");
        let ctx = LocaleContext::init(store, "locale", &mut doc).unwrap();
        assert_eq!(ctx.locale(), Locale::En);
        // The invalid value is overwritten
        assert_eq!(ctx.store().load("locale").as_deref(), Some("en"));
    }

    #[test]
    fn set_locale_is_idempotent() {
        let (mut ctx, mut doc) = fresh();
        ctx.set_locale(Locale::Id, &mut doc).unwrap();
        ctx.set_locale(Locale::Id, &mut doc).unwrap();
        assert_eq!(ctx.locale(), Locale::Id);
        assert_eq!(ctx.store().load("locale").as_deref(), Some("id"));
    }

    #[test]
    fn failed_save_keeps_previous_locale() {
        let mut doc = RecordingDocument::new();
        let mut ctx = LocaleContext::init(FlakyStore::default(), "locale", &mut doc).unwrap();
        ctx.store.broken = true;

        assert!(ctx.set_locale(Locale::Id, &mut doc).is_err());
        assert_eq!(ctx.locale(), Locale::En);
        assert_eq!(ctx.scope().language().unwrap(), Locale::En);
        assert_eq!(doc.lang(), Some("en"));
        assert_eq!(ctx.store().load("locale").as_deref(), Some("en"));

        assert!(ctx.toggle_locale(&mut doc).is_err());
        assert_eq!(ctx.locale(), Locale::En);

        ctx.store.broken = false;
        assert_eq!(ctx.toggle_locale(&mut doc).unwrap(), Locale::Id);
        assert_eq!(doc.lang(), Some("id"));
    }

    #[test]
    fn init_fails_when_store_rejects_writes() {
        let mut doc = RecordingDocument::new();
        let store = FlakyStore {
            broken: true,
            ..Default::default()
        };
        assert!(LocaleContext::init(store, "locale", &mut doc).is_err());
        assert_eq!(doc.lang(), None);
    }

    #[test]
    fn json_store_keeps_entries_when_write_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.save("locale", "en").unwrap();

        // A directory in place of the file makes the write fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        assert!(store.save("locale", "id").is_err());
        assert_eq!(store.load("locale").as_deref(), Some("en"));
    }

    #[test]
    fn custom_storage_key() {
        let mut doc = RecordingDocument::new();
        let store = MemoryStore::with_entry("site-lang", "id");
        let ctx = LocaleContext::init(store, "site-lang", &mut doc).unwrap();
        assert_eq!(ctx.locale(), Locale::Id);
        assert_eq!(ctx.store().load("locale"), None);
    }

    #[test]
    fn parse_accepts_only_known_codes() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("id".parse::<Locale>(), Ok(Locale::Id));
        assert!("EN".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn scope_outside_provider_fails() {
        assert!(matches!(
            Scope::root().language(),
            Err(ContextError::MissingProvider)
        ));
        assert!(matches!(
            Scope::default().language(),
            Err(ContextError::MissingProvider)
        ));
    }

    #[test]
    fn context_scope_tracks_locale() {
        let (mut ctx, mut doc) = fresh();
        assert_eq!(ctx.scope().language().unwrap(), Locale::En);
        ctx.toggle_locale(&mut doc).unwrap();
        assert_eq!(ctx.scope().language().unwrap(), Locale::Id);
    }

    #[test]
    fn localized_lookup() {
        let l = Localized {
            en: "Hello".to_string(),
            id: "Halo".to_string(),
        };
        assert_eq!(l.text(Locale::En), "Hello");
        assert_eq!(l.text(Locale::Id), "Halo");
    }

    #[test]
    fn json_store_persists_between_opens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.load("locale"), None);
        store.save("locale", "id").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.load("locale").as_deref(), Some("id"));
    }

    #[test]
    fn json_store_rejects_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json(_))));
    }
}
