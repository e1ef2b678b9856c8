//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is deep-merged on top, so a
//! config file only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Ainura — Web Developer"
//! description = "Designing quiet, confident digital experiences."
//! brand = "Ainura"
//! avatar = "/avatar.jpg"
//! # copyright_year = 2026   # omitted: filled in by the browser
//!
//! [locale]
//! storage_key = "locale"   # localStorage key for the saved preference
//!
//! [reveal]
//! section_margin = -100    # rootMargin (px) for section entry animations
//! heading_margin = -80     # rootMargin (px) for heading reveals
//!
//! [contact]
//! submit_delay_ms = 1500   # simulated submission latency
//!
//! [colors.accent]
//! accent = "#7c6aff"
//! accent_light = "#a89bff"
//! accent_glow = "rgba(124,106,255,0.35)"
//!
//! [colors.dark]             # applied while the theme toggle is dark (default)
//! bg = "#0a0a0a"
//! bg_secondary = "#0f0f0f"
//! text = "#f0f0ff"
//! text_muted = "#6b6b8a"
//! text_subtle = "#2a2a3a"
//! surface = "rgba(255,255,255,0.04)"
//! surface_hover = "rgba(255,255,255,0.07)"
//! border = "rgba(255,255,255,0.08)"
//! border_hover = "rgba(255,255,255,0.15)"
//!
//! [colors.light]            # applied while the theme toggle is light
//! bg = "#f5f5f5"
//! # ...same nine keys
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Document metadata and branding.
    pub site: SiteMeta,
    /// Locale persistence settings.
    pub locale: LocaleConfig,
    /// Reveal-on-view margins.
    pub reveal: RevealConfig,
    /// Contact form behavior.
    pub contact: ContactConfig,
    /// Accent colors and the two theme palettes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locale.storage_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "locale.storage_key must not be empty".into(),
            ));
        }
        if self.contact.submit_delay_ms > 60_000 {
            return Err(ConfigError::Validation(
                "contact.submit_delay_ms must be at most 60000".into(),
            ));
        }
        for (name, margin) in [
            ("reveal.section_margin", self.reveal.section_margin),
            ("reveal.heading_margin", self.reveal.heading_margin),
        ] {
            if !(-1000..=1000).contains(&margin) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be between -1000 and 1000"
                )));
            }
        }
        for (scheme, palette) in [("dark", &self.colors.dark), ("light", &self.colors.light)] {
            if let Some((key, _)) = palette.entries().into_iter().find(|(_, v)| v.trim().is_empty())
            {
                return Err(ConfigError::Validation(format!(
                    "colors.{scheme} value for {key} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Document metadata and branding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// `<title>` of the page.
    pub title: String,
    /// `<meta name="description">`.
    pub description: String,
    /// Brand name used in the hero marquee and footer.
    pub brand: String,
    /// Avatar image path shown in the navbar.
    pub avatar: String,
    /// Footer year. When absent the browser fills in the current year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright_year: Option<u32>,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Ainura — Web Developer".to_string(),
            description: "Designing quiet, confident digital experiences.".to_string(),
            brand: "Ainura".to_string(),
            avatar: "/avatar.jpg".to_string(),
            copyright_year: None,
        }
    }
}

/// Locale persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocaleConfig {
    /// Key under which the preference is stored.
    pub storage_key: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            storage_key: "locale".to_string(),
        }
    }
}

/// Reveal-on-view margins, in CSS pixels (`rootMargin` semantics).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub section_margin: i32,
    pub heading_margin: i32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            section_margin: -100,
            heading_margin: -80,
        }
    }
}

/// Contact form behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Latency of the simulated submission.
    pub submit_delay_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1500,
        }
    }
}

/// Accent colors plus the dark and light palettes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub accent: AccentColors,
    #[serde(deserialize_with = "dark_palette")]
    pub dark: Palette,
    #[serde(deserialize_with = "light_palette")]
    pub light: Palette,
}

/// A partial `[colors.dark]` table, filled from the stock dark palette.
fn dark_palette<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Palette, D::Error> {
    palette_over(Palette::default_dark(), deserializer)
}

/// A partial `[colors.light]` table, filled from the stock light palette.
fn light_palette<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Palette, D::Error> {
    palette_over(Palette::default_light(), deserializer)
}

fn palette_over<'de, D: Deserializer<'de>>(
    base: Palette,
    deserializer: D,
) -> Result<Palette, D::Error> {
    let overlay = toml::Value::deserialize(deserializer)?;
    let base = toml::Value::try_from(base).map_err(D::Error::custom)?;
    merge_toml(base, overlay).try_into().map_err(D::Error::custom)
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            accent: AccentColors::default(),
            dark: Palette::default_dark(),
            light: Palette::default_light(),
        }
    }
}

/// Theme-independent accent colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccentColors {
    pub accent: String,
    pub accent_light: String,
    pub accent_glow: String,
}

impl Default for AccentColors {
    fn default() -> Self {
        Self {
            accent: "#7c6aff".to_string(),
            accent_light: "#a89bff".to_string(),
            accent_glow: "rgba(124,106,255,0.35)".to_string(),
        }
    }
}

/// The nine color variables the theme toggle rewrites.
///
/// There is no single default: missing keys come from the stock palette of
/// the same theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Palette {
    pub bg: String,
    pub bg_secondary: String,
    pub text: String,
    pub text_muted: String,
    pub text_subtle: String,
    pub surface: String,
    pub surface_hover: String,
    pub border: String,
    pub border_hover: String,
}

impl Palette {
    pub fn default_dark() -> Self {
        Self {
            bg: "#0a0a0a".to_string(),
            bg_secondary: "#0f0f0f".to_string(),
            text: "#f0f0ff".to_string(),
            text_muted: "#6b6b8a".to_string(),
            text_subtle: "#2a2a3a".to_string(),
            surface: "rgba(255,255,255,0.04)".to_string(),
            surface_hover: "rgba(255,255,255,0.07)".to_string(),
            border: "rgba(255,255,255,0.08)".to_string(),
            border_hover: "rgba(255,255,255,0.15)".to_string(),
        }
    }

    pub fn default_light() -> Self {
        Self {
            bg: "#f5f5f5".to_string(),
            bg_secondary: "#ebebeb".to_string(),
            text: "#0a0a0a".to_string(),
            text_muted: "#555566".to_string(),
            text_subtle: "#ccccdd".to_string(),
            surface: "rgba(0,0,0,0.04)".to_string(),
            surface_hover: "rgba(0,0,0,0.07)".to_string(),
            border: "rgba(0,0,0,0.08)".to_string(),
            border_hover: "rgba(0,0,0,0.15)".to_string(),
        }
    }

    /// `(css variable, value)` pairs in a fixed order.
    pub fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("--bg", &self.bg),
            ("--bg-secondary", &self.bg_secondary),
            ("--text", &self.text),
            ("--text-muted", &self.text_muted),
            ("--text-subtle", &self.text_subtle),
            ("--surface", &self.surface),
            ("--surface-hover", &self.surface_hover),
            ("--border", &self.border),
            ("--border-hover", &self.border_hover),
        ]
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio-site configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Document metadata and branding
# ---------------------------------------------------------------------------
[site]
title = "Ainura — Web Developer"
description = "Designing quiet, confident digital experiences."
brand = "Ainura"
avatar = "/avatar.jpg"
# Footer year. Leave unset to let the browser fill in the current year.
# copyright_year = 2026

# ---------------------------------------------------------------------------
# Locale
# ---------------------------------------------------------------------------
[locale]
# localStorage key holding "en" or "id".
storage_key = "locale"

# ---------------------------------------------------------------------------
# Reveal-on-view (IntersectionObserver rootMargin, in px)
# ---------------------------------------------------------------------------
[reveal]
section_margin = -100
heading_margin = -80

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[contact]
# Submission is simulated; this is how long "Sending..." is shown.
submit_delay_ms = 1500

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors.accent]
accent = "#7c6aff"
accent_light = "#a89bff"
accent_glow = "rgba(124,106,255,0.35)"

# Dark palette (default theme)
[colors.dark]
bg = "#0a0a0a"
bg_secondary = "#0f0f0f"
text = "#f0f0ff"
text_muted = "#6b6b8a"
text_subtle = "#2a2a3a"
surface = "rgba(255,255,255,0.04)"
surface_hover = "rgba(255,255,255,0.07)"
border = "rgba(255,255,255,0.08)"
border_hover = "rgba(255,255,255,0.15)"

# Light palette
[colors.light]
bg = "#f5f5f5"
bg_secondary = "#ebebeb"
text = "#0a0a0a"
text_muted = "#555566"
text_subtle = "#ccccdd"
surface = "rgba(0,0,0,0.04)"
surface_hover = "rgba(0,0,0,0.07)"
border = "rgba(0,0,0,0.08)"
border_hover = "rgba(0,0,0,0.15)"
"##
}

/// Generate the root custom properties: accents plus the palette for the
/// initial theme.
pub fn generate_color_css(colors: &ColorConfig, palette: &Palette) -> String {
    let mut css = String::from(":root {\n");
    css.push_str(&format!("    --accent: {};\n", colors.accent.accent));
    css.push_str(&format!("    --accent-light: {};\n", colors.accent.accent_light));
    css.push_str(&format!("    --accent-glow: {};\n", colors.accent.accent_glow));
    for (name, value) in palette.entries() {
        css.push_str(&format!("    {name}: {value};\n"));
    }
    css.push('}');
    css
}
