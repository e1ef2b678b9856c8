//! # Folio Site
//!
//! A generator for a bilingual (English / Indonesian) single-page portfolio:
//! hero, services, work carousel, pricing, FAQ and a contact form, rendered
//! from two TOML files into one static HTML document per locale.
//!
//! # Architecture: State Machines, Rendered
//!
//! Every interactive piece of the page is modelled as a small Rust state
//! machine that knows nothing about the browser. A [`session::Session`] wires
//! them together behind a [`dom::Document`] and feeds them typed events; the
//! [`generate`] module renders any [`session::ViewState`] with Maud.
//!
//! ```text
//! config.toml + content.toml ──→ SiteConfig + SiteContent
//!                                      │
//!          events ──→ Session ──→ ViewState ──→ generate ──→ index.html
//! ```
//!
//! A `build` renders the initial state for each locale. A `preview` replays an
//! event script first, so the same transitions a visitor would trigger can be
//! inspected (and tested) without a browser. The inlined `static/site.js`
//! implements the same contracts in the page itself.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`locale`] | Locale type, localized values, preference stores, the locale provider scope |
//! | [`theme`] | Light/dark toggle and batch palette application |
//! | [`reveal`] | One-shot reveal-on-view latches with `rootMargin` semantics |
//! | [`carousel`] | Wrap-around project carousel with entry direction |
//! | [`accordion`] | Single-open FAQ accordion |
//! | [`contact`] | Contact form FSM, validation and the cancellable submitter |
//! | [`navbar`] | Scroll state and mobile menu with scroll lock |
//! | [`tilt`] | Spring-smoothed hero card tilt from pointer or device input |
//! | [`runtime`] | Listener registration with scoped release |
//! | [`dom`] | The document seam: `lang`, root properties, scroll lock |
//! | [`session`] | Headless page: components, listeners, event scripts |
//! | [`config`] | `config.toml` loading, merging, validation and color CSS |
//! | [`content`] | `content.toml` loading and shape validation |
//! | [`icons`] | Inline SVG icons referenced from content |
//! | [`generate`] | Maud rendering of a view state into HTML |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed markup is a build error, interpolation is escaped
//! by default, and there is no template directory to ship.
//!
//! ## Explicit Locale Provider
//!
//! Section renderers take a [`locale::Scope`] and ask it for the language.
//! Rendering outside a provider is a [`locale::ContextError`], never a silent
//! fallback to English.
//!
//! ## Stock Everything
//!
//! Both config and content ship compiled in. User files are deep-merged on
//! top, so a site only states what differs: a brand name, a palette, its own
//! FAQ list.

pub mod accordion;
pub mod carousel;
pub mod config;
pub mod contact;
pub mod content;
pub mod dom;
pub mod generate;
pub mod icons;
pub mod locale;
pub mod navbar;
pub mod output;
pub mod reveal;
pub mod runtime;
pub mod session;
pub mod theme;
pub mod tilt;

#[cfg(test)]
pub(crate) mod test_helpers;
