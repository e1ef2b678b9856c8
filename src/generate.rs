//! HTML site generation.
//!
//! Renders the single-page site for a [`ViewState`] with maud. A build renders
//! the initial state once per locale; the `preview` command renders whatever
//! state a scripted session ended in.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html        # English
//! └── id/
//!     └── index.html    # Indonesian
//! ```
//!
//! ## Locale Scope
//!
//! Every section renderer reads its language from a [`Scope`] rather than
//! from the view state. [`render_page`] opens the provider scope;
//! rendering under [`Scope::root`] fails with
//! [`ContextError::MissingProvider`] instead of silently picking a language.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: layout and components (colors injected from config)
//! - `static/site.js`: the browser side of every interactive component
//!
//! The script reads its settings from `data-*` attributes on `<body>` and the
//! two palettes from a JSON island, so the generated page is the only input
//! it needs.

use crate::carousel::{Carousel, Transition};
use crate::config::{self, ColorConfig, SiteConfig};
use crate::contact::{Field, Status};
use crate::content::{Heading, SiteContent};
use crate::icons;
use crate::locale::{ContextError, Locale, Scope};
use crate::session::{ViewState, heading_target};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("render error: {0}")]
    Context(#[from] ContextError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Everything a render reads that does not change with interaction.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub content: &'a SiteContent,
}

/// A written document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub locale: Locale,
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub bytes: usize,
}

/// URL of the document for `locale`.
pub fn locale_href(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "/",
        Locale::Id => "/id/",
    }
}

/// Output path of the document for `locale`, relative to the output root.
pub fn page_path(locale: Locale) -> PathBuf {
    match locale {
        Locale::En => PathBuf::from("index.html"),
        Locale::Id => PathBuf::from("id").join("index.html"),
    }
}

/// Write one document per locale, each in its initial state.
pub fn generate(site: &Site<'_>, output_dir: &Path) -> Result<Vec<GeneratedPage>, GenerateError> {
    let mut pages = Vec::new();
    for locale in Locale::ALL {
        let view = ViewState::initial(locale, site.content);
        let path = page_path(locale);
        let bytes = write_page(site, &view, &output_dir.join(&path))?;
        tracing::debug!(%locale, path = %path.display(), bytes, "page written");
        pages.push(GeneratedPage {
            locale,
            path,
            bytes,
        });
    }
    Ok(pages)
}

/// Render `view` and write it to `path`, creating parent directories.
pub fn write_page(site: &Site<'_>, view: &ViewState, path: &Path) -> Result<usize, GenerateError> {
    let html = render_page(site, view)?.into_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &html)?;
    Ok(html.len())
}

/// Render the page inside a locale provider for `view.locale`.
pub fn render_page(site: &Site<'_>, view: &ViewState) -> Result<Markup, GenerateError> {
    render_document(site, Scope::with_locale(view.locale), view)
}

/// Render the page under an explicit scope.
pub fn render_document(
    site: &Site<'_>,
    scope: Scope,
    view: &ViewState,
) -> Result<Markup, GenerateError> {
    let locale = scope.language()?;
    let colors = &site.config.colors;
    let palette = if view.dark { &colors.dark } else { &colors.light };
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(colors, palette),
        CSS_STATIC
    );

    let content = html! {
        (render_navbar(site, scope, view)?)
        main {
            (render_hero(site, scope, view)?)
            (render_services(site, scope, view)?)
            (render_work(site, scope, view)?)
            (render_pricing(site, scope, view)?)
            (render_faq(site, scope, view)?)
            (render_contact(site, scope, view)?)
        }
        (render_footer(site, scope)?)
        script #palettes type="application/json" { (PreEscaped(palettes_json(colors)?)) }
        script { (PreEscaped(JS)) }
    };

    Ok(base_document(site, locale, view, &css, content))
}

/// The two palettes as `{"dark": {...}, "light": {...}}`, safe to inline.
pub fn palettes_json(colors: &ColorConfig) -> Result<String, serde_json::Error> {
    let scheme = |palette: &config::Palette| -> BTreeMap<String, String> {
        palette
            .entries()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    };
    let json = serde_json::to_string(&serde_json::json!({
        "dark": scheme(&colors.dark),
        "light": scheme(&colors.light),
    }))?;
    // A literal "</" would close the surrounding <script>
    Ok(json.replace("</", "<\\/"))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    site: &Site<'_>,
    locale: Locale,
    view: &ViewState,
    css: &str,
    content: Markup,
) -> Markup {
    let config = site.config;
    let theme = if view.dark { "dark" } else { "light" };
    html! {
        (DOCTYPE)
        html lang=(locale.code()) data-theme=(theme) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.site.title) }
                meta name="description" content=(config.site.description);
                @for alt in Locale::ALL {
                    link rel="alternate" hreflang=(alt.code()) href=(locale_href(alt));
                }
                style { (PreEscaped(css)) }
            }
            body
                data-locale=(locale.code())
                data-locale-key=(config.locale.storage_key)
                data-submit-delay=(config.contact.submit_delay_ms)
                data-en-href=(locale_href(Locale::En))
                data-id-href=(locale_href(Locale::Id))
                class=[view.menu_open.then_some("menu-open")]
            {
                (content)
            }
        }
    }
}

/// Section heading: `lead <em>em</em> tail`, wrapped in its reveal target.
fn section_heading(site: &Site<'_>, view: &ViewState, section: &str, heading: &Heading) -> Markup {
    let target = heading_target(section);
    html! {
        div.section-heading.reveal.is-revealed[view.is_revealed(&target)]
            id=(target)
            data-reveal-margin=(site.config.reveal.heading_margin)
        {
            h2 {
                (heading.lead) em { (heading.em) } (heading.tail)
            }
        }
    }
}

fn section_margin(site: &Site<'_>) -> i32 {
    site.config.reveal.section_margin
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn icon(name: &str) -> Markup {
    PreEscaped(icons::svg(name).unwrap_or_default().to_string())
}

// ============================================================================
// Sections
// ============================================================================

/// Fixed navbar, locale switch, theme toggle and the mobile menu.
pub fn render_navbar(
    site: &Site<'_>,
    scope: Scope,
    view: &ViewState,
) -> Result<Markup, ContextError> {
    let locale = scope.language()?;
    let nav = &site.content.ui(locale).nav;
    let links = nav.links();
    // Contact gets its own button
    let (menu_links, contact) = links.split_at(links.len() - 1);
    Ok(html! {
        header #navbar.navbar.scrolled[view.scrolled] {
            nav.navbar-inner {
                div.navbar-left {
                    a.avatar href="#" {
                        img src=(site.config.site.avatar) alt=(site.config.site.brand) width="44" height="44";
                    }
                    span.divider {}
                    div.nav-links {
                        @for (id, label) in menu_links {
                            a.nav-link href={ "#" (id) } { (label) }
                        }
                    }
                }
                div.navbar-right {
                    div.locale-switch role="group" aria-label="Language" {
                        @for option in Locale::ALL {
                            button.locale-option.active[option == locale]
                                type="button"
                                data-locale=(option.code())
                                aria-pressed=(flag(option == locale))
                            {
                                (option.code().to_uppercase())
                            }
                        }
                    }
                    button #theme-toggle.icon-button type="button" aria-label=(nav.toggle_theme) {
                        span.icon-moon hidden[!view.dark] { (PreEscaped(icons::MOON)) }
                        span.icon-sun hidden[view.dark] { (PreEscaped(icons::SUN)) }
                    }
                    @for (id, label) in contact {
                        a.contact-button href={ "#" (id) } { (label) }
                    }
                    button #menu-toggle.icon-button.menu-button
                        type="button"
                        aria-label=(nav.toggle_menu)
                        aria-expanded=(flag(view.menu_open))
                        aria-controls="mobile-menu"
                    {
                        span.bar {} span.bar {} span.bar {}
                    }
                }
            }
        }
        div #menu-overlay.menu-overlay.open[view.menu_open] {}
        div #mobile-menu.mobile-menu.open[view.menu_open] {
            div.locale-switch.mobile {
                @for option in Locale::ALL {
                    button.locale-option.active[option == locale] type="button" data-locale=(option.code()) {
                        (option.code().to_uppercase())
                    }
                }
            }
            @for (id, label) in links {
                a.mobile-link href={ "#" (id) } data-close-menu="true" { (label) }
            }
        }
    })
}

/// Brand marquee and the tilting profile card.
pub fn render_hero(
    site: &Site<'_>,
    scope: Scope,
    view: &ViewState,
) -> Result<Markup, ContextError> {
    let locale = scope.language()?;
    let hero = &site.content.ui(locale).hero;
    let marquee = format!("{}® ", site.config.site.brand.to_uppercase()).repeat(10);
    let tilt = &view.tilt;
    Ok(html! {
        section #hero.hero {
            div.hero-grid aria-hidden="true" { div {} div {} div {} }
            div.marquee aria-hidden="true" {
                div.marquee-track {
                    span { (marquee) }
                    span { (marquee) }
                }
            }
            div.hero-vignette {}
            div.hero-glow {}
            div.tilt-stage {
                div #tilt-card.tilt-card style={ "transform: " (tilt.to_css()) } {
                    div.card-shadow.one {}
                    div.card-shadow.two {}
                    div.card-face {
                        img src=(site.config.site.avatar) alt=(site.config.site.brand);
                        div.card-caption {
                            p {
                                @for (i, line) in hero.tagline.iter().enumerate() {
                                    @if i > 0 { br; }
                                    (line)
                                }
                            }
                        }
                        div.glare style={
                            "background: radial-gradient(circle at "
                            (format!("{:.0}", tilt.glare_x)) "% "
                            (format!("{:.0}", tilt.glare_y))
                            "%, rgba(255,255,255,0.08) 0%, transparent 55%)"
                        } {}
                    }
                }
            }
        }
    })
}

pub fn render_services(
    site: &Site<'_>,
    scope: Scope,
    view: &ViewState,
) -> Result<Markup, ContextError> {
    let locale = scope.language()?;
    let copy = &site.content.ui(locale).services;
    Ok(html! {
        section #services.section.reveal.is-revealed[view.is_revealed("services")]
            data-reveal-margin=(section_margin(site))
        {
            (section_heading(site, view, "services", &copy.heading))
            div.service-grid {
                @for service in site.content.services(locale) {
                    @let style = service.style;
                    article.service-card style={
                        "--card-accent: " (style.accent) "; "
                        "--card-accent-muted: " (style.accent_muted) "; "
                        "--card-accent-border: " (style.accent_border)
                    } {
                        div.service-top {
                            span.service-icon { (icon(&style.icon)) }
                            span.service-number { (style.number) }
                        }
                        h3 { (service.copy.title) }
                        p { (service.copy.description) }
                        ul.tags {
                            @for tag in &service.copy.tags {
                                li { (tag) }
                            }
                        }
                    }
                }
            }
        }
    })
}

/// Work gallery: every project panel is rendered, only the active one shown.
pub fn render_work(
    site: &Site<'_>,
    scope: Scope,
    view: &ViewState,
) -> Result<Markup, ContextError> {
    let locale = scope.language()?;
    let copy = &site.content.ui(locale).work;
    let projects = &site.content.projects;
    let active = view.active_project.min(projects.len().saturating_sub(1));
    // Neighbor indices come from the same wrap-around rules as the session
    let (prev, next) = match Carousel::with_active(projects.len(), active) {
        Ok(carousel) => (carousel.prev_index(), carousel.next_index()),
        Err(_) => (0, 0),
    };
    let title = |i: usize| projects.get(i).map(|p| p.title.as_str()).unwrap_or_default();
    let enter_from = Transition::from_direction(view.direction).enter_from;

    Ok(html! {
        section #work.section.reveal.is-revealed[view.is_revealed("work")]
            data-reveal-margin=(section_margin(site))
        {
            (section_heading(site, view, "work", &copy.heading))
            div #carousel.carousel
                data-active=(active)
                data-direction=(view.direction)
                data-count=(projects.len())
            {
                button.preview.preview-prev type="button" data-jump=(prev) aria-label=(copy.previous) {
                    span.preview-title { (title(prev)) }
                }
                div.stage {
                    @for (i, project) in projects.iter().enumerate() {
                        @let is_active = i == active;
                        article.project.active[is_active]
                            data-index=(i)
                            data-title=(project.title)
                            data-enter=[is_active.then(|| enter_from.as_str())]
                            hidden[!is_active]
                            style={ "--project-color: " (project.color) }
                        {
                            div.project-visual style={ "background: " (project.background) } {
                                @if let Some(image) = &project.image {
                                    img src=(image) alt=(project.title) loading="lazy";
                                } @else if let Some(mockup) = &project.mockup {
                                    span.mockup aria-hidden="true" { (mockup) }
                                }
                            }
                            div.project-body {
                                h3 { (project.title) }
                                p { (project.description.text(locale)) }
                                ul.tags {
                                    @for tag in project.tags.get(locale) {
                                        li { (tag) }
                                    }
                                }
                                a.project-link href=(project.url) target="_blank" rel="noopener" {
                                    (copy.view_project) " " (PreEscaped(icons::ARROW))
                                }
                            }
                        }
                    }
                }
                button.preview.preview-next type="button" data-jump=(next) aria-label=(copy.next) {
                    span.preview-title { (title(next)) }
                }
                div.carousel-controls {
                    button.arrow type="button" data-step="-1" aria-label=(copy.previous) { "‹" }
                    div.dots {
                        @for (i, project) in projects.iter().enumerate() {
                            button.dot.active[i == active]
                                type="button"
                                data-jump=(i)
                                aria-label=(project.title)
                                aria-current=[(i == active).then_some("true")]
                            {}
                        }
                    }
                    button.arrow type="button" data-step="1" aria-label=(copy.next) { "›" }
                }
            }
        }
    })
}

pub fn render_pricing(
    site: &Site<'_>,
    scope: Scope,
    view: &ViewState,
) -> Result<Markup, ContextError> {
    let locale = scope.language()?;
    let copy = &site.content.ui(locale).pricing;
    Ok(html! {
        section #pricing.section.reveal.is-revealed[view.is_revealed("pricing")]
            data-reveal-margin=(section_margin(site))
        {
            (section_heading(site, view, "pricing", &copy.heading))
            div.plan-grid {
                @for plan in site.content.plans(locale) {
                    @let style = plan.style;
                    article.plan-card.popular[style.popular] style={
                        "--card-accent: " (style.accent) "; "
                        "--card-accent-muted: " (style.accent_muted) "; "
                        "--card-accent-border: " (style.accent_border)
                    } {
                        @if style.popular {
                            span.badge { (copy.popular) }
                        }
                        div.plan-head {
                            span.plan-label { (plan.copy.label) }
                            h3 { (plan.copy.name) }
                        }
                        div.plan-price {
                            span.price { (style.price) }
                            span.period { (plan.copy.period) }
                        }
                        p.plan-description { (plan.copy.description) }
                        ul.features {
                            @for feature in &plan.copy.features {
                                li { (feature) }
                            }
                        }
                        a.plan-cta href="#contact" { (plan.copy.cta) }
                    }
                }
            }
            p.pricing-note {
                (copy.note) " " a href="#contact" { (copy.note_link) }
            }
        }
    })
}

/// FAQ accordion; the open entry's answer is visible in the markup.
pub fn render_faq(
    site: &Site<'_>,
    scope: Scope,
    view: &ViewState,
) -> Result<Markup, ContextError> {
    let locale = scope.language()?;
    let copy = &site.content.ui(locale).faq;
    Ok(html! {
        section #faq.section.reveal.is-revealed[view.is_revealed("faq")]
            data-reveal-margin=(section_margin(site))
        {
            (section_heading(site, view, "faq", &copy.heading))
            div #faq-list.faq-list {
                @for (i, entry) in site.content.faq(locale).iter().enumerate() {
                    @let open = view.open_faq == Some(i);
                    div.faq-item.open[open] {
                        button.faq-question
                            type="button"
                            data-faq-index=(i)
                            aria-expanded=(flag(open))
                            aria-controls={ "faq-answer-" (i) }
                        {
                            span { (entry.question) }
                            span.faq-sign aria-hidden="true" { "+" }
                        }
                        div.faq-answer id={ "faq-answer-" (i) } hidden[!open] {
                            p { (entry.answer) }
                        }
                    }
                }
            }
            div.faq-cta {
                div {
                    h3 { (copy.cta_title) }
                    p { (copy.cta_body) }
                }
                a.contact-button href="#contact" { (copy.cta_link) }
            }
        }
    })
}

/// Contact info and the form, with all three status panels present.
pub fn render_contact(
    site: &Site<'_>,
    scope: Scope,
    view: &ViewState,
) -> Result<Markup, ContextError> {
    let locale = scope.language()?;
    let copy = &site.content.ui(locale).contact;
    let form = &view.form;
    let status = form.status;
    let editable = status == Status::Idle;
    let sending = status == Status::Sending;
    let show_form = matches!(status, Status::Idle | Status::Sending);

    Ok(html! {
        section #contact.section.reveal.is-revealed[view.is_revealed("contact")]
            data-reveal-margin=(section_margin(site))
        {
            (section_heading(site, view, "contact", &copy.heading))
            div.contact-grid {
                div.contact-info {
                    span.available { span.pulse {} (copy.available) }
                    h3 { (copy.info_title) }
                    p { (copy.info_body) }
                    p.find-me { (copy.find_me) }
                    ul.socials {
                        @for social in &site.content.socials {
                            li {
                                a href=(social.href) target="_blank" rel="noopener" {
                                    span.social-icon { (icon(&social.icon)) }
                                    span.social-text {
                                        span.social-label { (social.label) }
                                        span.social-handle { (social.handle) }
                                    }
                                }
                            }
                        }
                    }
                }
                div #contact-card.contact-card data-status=(status.to_string()) {
                    form #contact-form hidden[!show_form] {
                        h3 { (copy.form_title) }
                        label {
                            span { (copy.name_label) }
                            input type="text" name=(Field::Name.name()) required
                                placeholder=(copy.name_placeholder)
                                value=(form.value(Field::Name))
                                disabled[!editable];
                        }
                        label {
                            span { (copy.email_label) }
                            input type="email" name=(Field::Email.name()) required
                                placeholder=(copy.email_placeholder)
                                value=(form.value(Field::Email))
                                disabled[!editable];
                        }
                        label {
                            span { (copy.message_label) }
                            textarea name=(Field::Message.name()) rows="5" required
                                placeholder=(copy.message_placeholder)
                                disabled[!editable]
                            { (form.value(Field::Message)) }
                        }
                        button #submit-button.submit type="submit"
                            disabled[sending]
                            data-label-idle=(copy.submit)
                            data-label-sending=(copy.sending)
                        {
                            @if sending { (copy.sending) } @else { (copy.submit) }
                        }
                    }
                    div #form-sent.form-result hidden[status != Status::Sent] {
                        h3 { (copy.sent_title) }
                        p { (copy.sent_body) }
                        button #send-another type="button" { (copy.send_another) }
                    }
                    div #form-error.form-result.error hidden[status != Status::Error] {
                        h3 { (copy.error_title) }
                        p { (copy.error_body) }
                        button #retry type="button" { (copy.retry) }
                    }
                }
            }
        }
    })
}

pub fn render_footer(site: &Site<'_>, scope: Scope) -> Result<Markup, ContextError> {
    let locale = scope.language()?;
    let copy = &site.content.ui(locale).footer;
    Ok(html! {
        footer.site-footer {
            p {
                "© "
                span #year { @if let Some(year) = site.config.site.copyright_year { (year) } }
                " " (site.config.site.brand) ". " (copy.rights)
            }
            p.built-with { (copy.built_with) }
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
