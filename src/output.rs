//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Projects and FAQ
//! entries are listed by positional index and title, with sources and links
//! shown as indented context lines. A preview run is shown as a numbered
//! transition log followed by the state the page ended in.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Config
//!     Source: content/config.toml
//!     Locale key: locale
//!     Submit delay: 1500ms
//!
//! Content
//!     Source: stock
//!     4 services, 6 projects, 3 plans, 7 FAQ entries, 4 socials
//!
//! Projects
//! 001 HeavenTrip
//!     Link: https://heaventrip.vercel.app/
//!     Description: Travel and Umrah platform with clear pa...
//! ```
//!
//! ## Build
//!
//! ```text
//! en → index.html (48213 bytes)
//! id → id/index.html (49002 bytes)
//!
//! Generated 2 pages
//! ```
//!
//! ## Preview
//!
//! ```text
//! 001 scroll y=140
//!     navbar scrolled=true
//! 002 paginate +1
//!     project 0 -> 1 (enter from right)
//!
//! Final state
//!     Locale: en
//!     Theme: dark
//!     Project: 2
//!     FAQ open: 1
//!     Form: idle
//!     Revealed: services, services-heading
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::content::SiteContent;
use crate::generate::GeneratedPage;
use crate::locale::Locale;
use crate::session::{Transition, ViewState};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head.trim_end())
    }
}

/// `Source:` line for a file that may be absent.
fn source_line(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("{}Source: {}", indent(1), p.display()),
        None => format!("{}Source: stock", indent(1)),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Inventory of the resolved config and content.
///
/// `config_path` and `content_path` are the files that were merged over
/// stock, or `None` when stock was used unchanged.
pub fn format_check_output(
    config: &SiteConfig,
    content: &SiteContent,
    config_path: Option<&Path>,
    content_path: Option<&Path>,
) -> Vec<String> {
    let mut lines = vec!["Config".to_string(), source_line(config_path)];
    lines.push(format!("{}Locale key: {}", indent(1), config.locale.storage_key));
    lines.push(format!(
        "{}Submit delay: {}ms",
        indent(1),
        config.contact.submit_delay_ms
    ));
    lines.push(format!(
        "{}Reveal margins: section {}px, heading {}px",
        indent(1),
        config.reveal.section_margin,
        config.reveal.heading_margin
    ));

    lines.push(String::new());
    lines.push("Content".to_string());
    lines.push(source_line(content_path));
    lines.push(format!(
        "{}{}, {}, {}, {}, {}",
        indent(1),
        plural(content.services.items.len(), "service", "services"),
        plural(content.projects.len(), "project", "projects"),
        plural(content.plans.items.len(), "plan", "plans"),
        plural(content.faq.en.len(), "FAQ entry", "FAQ entries"),
        plural(content.socials.len(), "social", "socials"),
    ));

    lines.push(String::new());
    lines.push("Projects".to_string());
    for (i, project) in content.projects.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), project.title));
        lines.push(format!("{}Link: {}", indent(1), project.url));
        lines.push(format!(
            "{}Description: {}",
            indent(1),
            truncate_desc(project.description.text(Locale::En), 40)
        ));
    }
    lines
}

pub fn print_check_output(
    config: &SiteConfig,
    content: &SiteContent,
    config_path: Option<&Path>,
    content_path: Option<&Path>,
) {
    for line in format_check_output(config, content, config_path, content_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(pages: &[GeneratedPage]) -> Vec<String> {
    let mut lines: Vec<String> = pages
        .iter()
        .map(|page| {
            format!(
                "{} → {} ({} bytes)",
                page.locale,
                page.path.display(),
                page.bytes
            )
        })
        .collect();
    lines.push(String::new());
    lines.push(format!("Generated {}", plural(pages.len(), "page", "pages")));
    lines
}

pub fn print_build_output(pages: &[GeneratedPage]) {
    for line in format_build_output(pages) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

/// Numbered transition log followed by the final view state.
pub fn format_preview_output(transitions: &[Transition], state: &ViewState) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, t) in transitions.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), t.event));
        lines.push(format!("{}{}", indent(1), t.outcome));
    }
    if !transitions.is_empty() {
        lines.push(String::new());
    }
    lines.extend(format_state(state));
    lines
}

fn format_state(state: &ViewState) -> Vec<String> {
    let open_faq = match state.open_faq {
        Some(i) => (i + 1).to_string(),
        None => "none".to_string(),
    };
    let revealed = if state.revealed.is_empty() {
        "none".to_string()
    } else {
        state
            .revealed
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    vec![
        "Final state".to_string(),
        format!("{}Locale: {}", indent(1), state.locale),
        format!(
            "{}Theme: {}",
            indent(1),
            if state.dark { "dark" } else { "light" }
        ),
        format!("{}Project: {}", indent(1), state.active_project + 1),
        format!("{}FAQ open: {}", indent(1), open_faq),
        format!("{}Form: {}", indent(1), state.form.status),
        format!("{}Revealed: {}", indent(1), revealed),
    ]
}

pub fn print_preview_output(transitions: &[Transition], state: &ViewState) {
    for line in format_preview_output(transitions, state) {
        println!("{}", line);
    }
}
