//! Site content: every piece of copy and every list the page renders.
//!
//! Content is a single TOML document (`content.toml`). The stock document is
//! compiled into the binary; a `content.toml` in the content directory is
//! deep-merged on top of it, so a site can replace just the FAQ or just the
//! project list and inherit everything else.
//!
//! Lists that carry per-locale copy are split in two: locale-independent
//! attributes (`services.items`, `plans.items`) and the copy itself
//! (`services.copy.en`, `services.copy.id`, ...). [`SiteContent::validate`]
//! rejects a document whose locales disagree on shape, which is what lets
//! the renderer switch languages by index without bounds surprises.

use crate::config::merge_toml;
use crate::icons;
use crate::locale::{Locale, Localized};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

const STOCK_CONTENT: &str = include_str!("../static/content.toml");

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{list}: en has {en} entries but id has {id}")]
    LengthMismatch {
        list: String,
        en: usize,
        id: usize,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{field}: unknown icon '{icon}'")]
    UnknownIcon { field: String, icon: String },
}

/// The full content document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteContent {
    pub ui: Localized<UiCopy>,
    pub services: Services,
    pub projects: Vec<Project>,
    pub plans: Plans,
    pub faq: Localized<Vec<FaqEntry>>,
    pub socials: Vec<Social>,
}

// ============================================================================
// Interface copy
// ============================================================================

/// Interface strings for one locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiCopy {
    pub nav: NavCopy,
    pub hero: HeroCopy,
    pub services: SectionCopy,
    pub work: WorkCopy,
    pub pricing: PricingCopy,
    pub faq: FaqCopy,
    pub contact: ContactCopy,
    pub footer: FooterCopy,
}

/// Section heading with an emphasized middle part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Heading {
    pub lead: String,
    pub em: String,
    #[serde(default)]
    pub tail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavCopy {
    pub services: String,
    pub work: String,
    pub pricing: String,
    pub faq: String,
    pub contact: String,
    pub toggle_theme: String,
    pub toggle_menu: String,
}

impl NavCopy {
    /// `(section id, label)` pairs in page order.
    pub fn links(&self) -> [(&'static str, &str); 5] {
        [
            ("services", &self.services),
            ("work", &self.work),
            ("pricing", &self.pricing),
            ("faq", &self.faq),
            ("contact", &self.contact),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroCopy {
    /// Tagline lines, rendered one per line.
    pub tagline: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionCopy {
    pub heading: Heading,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkCopy {
    pub heading: Heading,
    pub view_project: String,
    pub previous: String,
    pub next: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingCopy {
    pub heading: Heading,
    pub popular: String,
    pub note: String,
    pub note_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaqCopy {
    pub heading: Heading,
    pub cta_title: String,
    pub cta_body: String,
    pub cta_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactCopy {
    pub heading: Heading,
    pub form_title: String,
    pub name_label: String,
    pub name_placeholder: String,
    pub email_label: String,
    pub email_placeholder: String,
    pub message_label: String,
    pub message_placeholder: String,
    pub submit: String,
    pub sending: String,
    pub sent_title: String,
    pub sent_body: String,
    pub send_another: String,
    pub error_title: String,
    pub error_body: String,
    pub retry: String,
    pub available: String,
    pub info_title: String,
    pub info_body: String,
    pub find_me: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterCopy {
    pub rights: String,
    pub built_with: String,
}

// ============================================================================
// Lists
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Services {
    pub items: Vec<ServiceStyle>,
    pub copy: Localized<Vec<ServiceCopy>>,
}

/// Locale-independent presentation of a service card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceStyle {
    pub number: String,
    pub icon: String,
    pub accent: String,
    pub accent_muted: String,
    pub accent_border: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceCopy {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// A work gallery entry. Title and link are shared across locales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub title: String,
    pub description: Localized<String>,
    pub tags: Localized<Vec<String>>,
    pub color: String,
    /// CSS background for the preview panel.
    pub background: String,
    /// Screenshot path; takes precedence over `mockup`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Emoji placeholder shown when there is no screenshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mockup: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plans {
    pub items: Vec<PlanStyle>,
    pub copy: Localized<Vec<PlanCopy>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanStyle {
    pub price: String,
    pub accent: String,
    pub accent_muted: String,
    pub accent_border: String,
    #[serde(default)]
    pub popular: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanCopy {
    pub name: String,
    pub label: String,
    pub period: String,
    pub description: String,
    pub features: Vec<String>,
    pub cta: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Social {
    pub label: String,
    pub handle: String,
    pub href: String,
    pub icon: String,
}

/// A service card resolved for one locale.
#[derive(Debug, Clone, Copy)]
pub struct ServiceView<'a> {
    pub style: &'a ServiceStyle,
    pub copy: &'a ServiceCopy,
}

/// A pricing plan resolved for one locale.
#[derive(Debug, Clone, Copy)]
pub struct PlanView<'a> {
    pub style: &'a PlanStyle,
    pub copy: &'a PlanCopy,
}

// ============================================================================
// Validation and lookup
// ============================================================================

fn check_lengths(list: impl Into<String>, en: usize, id: usize) -> Result<(), ContentError> {
    if en == id {
        Ok(())
    } else {
        Err(ContentError::LengthMismatch {
            list: list.into(),
            en,
            id,
        })
    }
}

fn check_icon(field: String, icon: &str) -> Result<(), ContentError> {
    if icons::svg(icon).is_some() {
        Ok(())
    } else {
        Err(ContentError::UnknownIcon {
            field,
            icon: icon.to_string(),
        })
    }
}

impl SiteContent {
    /// Check that every localized list has the same shape in both locales
    /// and lines up with its locale-independent counterpart.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.projects.is_empty() {
            return Err(ContentError::Empty("projects"));
        }
        if self.ui.en.hero.tagline.is_empty() || self.ui.id.hero.tagline.is_empty() {
            return Err(ContentError::Empty("ui.hero.tagline"));
        }

        let services = &self.services;
        check_lengths("services.copy", services.copy.en.len(), services.copy.id.len())?;
        check_lengths("services.items", services.items.len(), services.copy.en.len())?;
        for (i, (en, id)) in services.copy.en.iter().zip(&services.copy.id).enumerate() {
            check_lengths(
                format!("services.copy[{i}].tags"),
                en.tags.len(),
                id.tags.len(),
            )?;
        }
        for (i, style) in services.items.iter().enumerate() {
            check_icon(format!("services.items[{i}].icon"), &style.icon)?;
        }

        for (i, project) in self.projects.iter().enumerate() {
            check_lengths(
                format!("projects[{i}].tags"),
                project.tags.en.len(),
                project.tags.id.len(),
            )?;
        }

        let plans = &self.plans;
        check_lengths("plans.copy", plans.copy.en.len(), plans.copy.id.len())?;
        check_lengths("plans.items", plans.items.len(), plans.copy.en.len())?;
        for (i, (en, id)) in plans.copy.en.iter().zip(&plans.copy.id).enumerate() {
            check_lengths(
                format!("plans.copy[{i}].features"),
                en.features.len(),
                id.features.len(),
            )?;
        }

        check_lengths("faq", self.faq.en.len(), self.faq.id.len())?;

        for (i, social) in self.socials.iter().enumerate() {
            check_icon(format!("socials[{i}].icon"), &social.icon)?;
        }
        Ok(())
    }

    pub fn ui(&self, locale: Locale) -> &UiCopy {
        self.ui.get(locale)
    }

    pub fn services(&self, locale: Locale) -> impl Iterator<Item = ServiceView<'_>> {
        self.services
            .items
            .iter()
            .zip(self.services.copy.get(locale))
            .map(|(style, copy)| ServiceView { style, copy })
    }

    pub fn plans(&self, locale: Locale) -> impl Iterator<Item = PlanView<'_>> {
        self.plans
            .items
            .iter()
            .zip(self.plans.copy.get(locale))
            .map(|(style, copy)| PlanView { style, copy })
    }

    pub fn faq(&self, locale: Locale) -> &[FaqEntry] {
        self.faq.get(locale)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// The stock content document as a TOML value.
pub fn stock_content_value() -> Result<toml::Value, ContentError> {
    Ok(toml::from_str(STOCK_CONTENT)?)
}

/// Returns the stock `content.toml`.
///
/// Used by the `gen-content` CLI command.
pub fn stock_content_toml() -> &'static str {
    STOCK_CONTENT
}

/// Deserialize and validate a content value.
pub fn resolve_content(value: toml::Value) -> Result<SiteContent, ContentError> {
    let content: SiteContent = value.try_into()?;
    content.validate()?;
    Ok(content)
}

/// Load content for a content directory.
///
/// A `content.toml` in `dir` is merged over the stock document; without
/// one the stock content is used as-is.
pub fn load_content(dir: &Path) -> Result<SiteContent, ContentError> {
    let base = stock_content_value()?;
    let path = dir.join("content.toml");
    let merged = if path.exists() {
        let overlay: toml::Value = toml::from_str(&fs::read_to_string(&path)?)?;
        merge_toml(base, overlay)
    } else {
        base
    };
    resolve_content(merged)
}
