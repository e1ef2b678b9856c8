//! Headless page session.
//!
//! A [`Session`] is the page at runtime without a browser: it owns every
//! interactive component, the listeners they subscribe to, and the document
//! they write effects to. Input arrives as typed [`Event`]s, so a scripted
//! run (the `preview` command, or a test) walks the same transitions a
//! visitor's clicks would.
//!
//! ## Lifecycle
//!
//! ```text
//! new()       restore locale, apply theme, attach listeners
//! dispatch()  one event -> one Transition record
//! Wait        pump the submission channel, advance the tilt spring
//! drop        unlock scroll, cancel pending submission, detach listeners
//! ```
//!
//! Submission results are only consumed on `Wait`, never between other
//! events, so the order of transitions in a script is deterministic even
//! though the submitter runs on its own thread.

use crate::accordion::{Accordion, AccordionError};
use crate::carousel::{Carousel, CarouselError};
use crate::config::{ColorConfig, SiteConfig};
use crate::contact::{
    ContactForm, Field, PendingSubmission, SimulatedSubmitter, Status, SubmissionResult,
    SubmitOutcome, Submitter,
};
use crate::content::SiteContent;
use crate::dom::Document;
use crate::locale::{Locale, LocaleContext, PreferenceStore, StoreError};
use crate::navbar::NavbarState;
use crate::reveal::{Intersection, RevealSet};
use crate::runtime::{ListenerGuard, ListenerKind, ListenerRegistry};
use crate::theme::{ThemeState, apply_theme};
use crate::tilt::{Tilt, TiltInput, TiltTransform};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use thiserror::Error;

/// Page sections with entry animations, in page order.
pub const SECTIONS: [&str; 5] = ["services", "work", "pricing", "faq", "contact"];

/// Reveal target id for a section's heading block.
pub fn heading_target(section: &str) -> String {
    format!("{section}-heading")
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("preference store error: {0}")]
    Store(#[from] StoreError),
    #[error("carousel: {0}")]
    Carousel(#[from] CarouselError),
    #[error("accordion: {0}")]
    Accordion(#[from] AccordionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("event script error: {0}")]
    Script(#[from] toml::de::Error),
}

/// Capabilities of the environment the page runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionEnv {
    /// `prefers-reduced-motion: reduce`.
    pub reduced_motion: bool,
    /// `pointer: coarse` (touch devices).
    pub coarse_pointer: bool,
}

impl SessionEnv {
    /// Which input drives the hero tilt, if any.
    pub fn tilt_input(&self) -> Option<TiltInput> {
        if self.reduced_motion {
            None
        } else if self.coarse_pointer {
            Some(TiltInput::Device)
        } else {
            Some(TiltInput::Pointer)
        }
    }
}

/// Something that happened on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SetLocale {
        locale: Locale,
    },
    ToggleLocale,
    ToggleTheme,
    Scroll {
        y: f64,
    },
    ToggleMenu,
    /// A menu link was followed.
    CloseMenu,
    Intersect {
        target: String,
        top: f64,
        bottom: f64,
        viewport_height: f64,
    },
    Paginate {
        step: i32,
    },
    JumpTo {
        index: usize,
    },
    ToggleFaq {
        index: usize,
    },
    EditField {
        field: Field,
        value: String,
    },
    Submit,
    SendAnother,
    Retry,
    PointerMove {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    PointerLeave,
    Orientation {
        #[serde(default)]
        beta: Option<f64>,
        #[serde(default)]
        gamma: Option<f64>,
    },
    Motion {
        #[serde(default)]
        accel_x: Option<f64>,
    },
    Wait {
        ms: u64,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SetLocale { locale } => write!(f, "set_locale {locale}"),
            Event::ToggleLocale => f.write_str("toggle_locale"),
            Event::ToggleTheme => f.write_str("toggle_theme"),
            Event::Scroll { y } => write!(f, "scroll y={y}"),
            Event::ToggleMenu => f.write_str("toggle_menu"),
            Event::CloseMenu => f.write_str("close_menu"),
            Event::Intersect { target, top, .. } => write!(f, "intersect {target} top={top}"),
            Event::Paginate { step } => write!(f, "paginate {step:+}"),
            Event::JumpTo { index } => write!(f, "jump_to {index}"),
            Event::ToggleFaq { index } => write!(f, "toggle_faq {index}"),
            Event::EditField { field, .. } => write!(f, "edit_field {field}"),
            Event::Submit => f.write_str("submit"),
            Event::SendAnother => f.write_str("send_another"),
            Event::Retry => f.write_str("retry"),
            Event::PointerMove { x, y, .. } => write!(f, "pointer_move ({x}, {y})"),
            Event::PointerLeave => f.write_str("pointer_leave"),
            Event::Orientation { beta, gamma } => {
                write!(f, "orientation beta={beta:?} gamma={gamma:?}")
            }
            Event::Motion { accel_x } => write!(f, "motion ax={accel_x:?}"),
            Event::Wait { ms } => write!(f, "wait {ms}ms"),
        }
    }
}

/// An event script: `[[events]]` tables in TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventScript {
    #[serde(default)]
    pub events: Vec<Event>,
}

pub fn parse_script(text: &str) -> Result<Vec<Event>, SessionError> {
    let script: EventScript = toml::from_str(text)?;
    Ok(script.events)
}

pub fn load_script(path: &Path) -> Result<Vec<Event>, SessionError> {
    parse_script(&fs::read_to_string(path)?)
}

/// What an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed(String),
    Unchanged,
    /// Refused by a component; state untouched.
    Rejected(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Changed(what) => f.write_str(what),
            Outcome::Unchanged => f.write_str("no change"),
            Outcome::Rejected(why) => write!(f, "rejected: {why}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub event: Event,
    pub outcome: Outcome,
}

/// Form fields and status as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub status: Status,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormView {
    fn of(form: &ContactForm) -> Self {
        Self {
            status: form.status(),
            name: form.field(Field::Name).to_string(),
            email: form.field(Field::Email).to_string(),
            message: form.field(Field::Message).to_string(),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }
}

/// Everything the renderer needs to draw the page in a given state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub locale: Locale,
    pub dark: bool,
    pub scrolled: bool,
    pub menu_open: bool,
    pub revealed: BTreeSet<String>,
    pub active_project: usize,
    pub direction: i8,
    pub open_faq: Option<usize>,
    pub form: FormView,
    pub tilt: TiltTransform,
}

impl ViewState {
    /// The page as first served, before any interaction.
    pub fn initial(locale: Locale, content: &SiteContent) -> Self {
        Self {
            locale,
            dark: ThemeState::default().is_dark(),
            scrolled: false,
            menu_open: false,
            revealed: BTreeSet::new(),
            active_project: 0,
            direction: 0,
            open_faq: Accordion::new(content.faq.en.len()).open_index(),
            form: FormView::of(&ContactForm::new()),
            tilt: TiltTransform::neutral(),
        }
    }

    pub fn is_revealed(&self, target: &str) -> bool {
        self.revealed.contains(target)
    }
}

pub struct Session<S: PreferenceStore, D: Document> {
    env: SessionEnv,
    colors: ColorConfig,
    doc: D,
    locale: LocaleContext<S>,
    theme: ThemeState,
    navbar: NavbarState,
    reveals: RevealSet,
    carousel: Carousel,
    faq: Accordion,
    form: ContactForm,
    tilt: Tilt,
    submitter: Box<dyn Submitter>,
    reply_tx: Sender<SubmissionResult>,
    replies: Receiver<SubmissionResult>,
    pending: Option<PendingSubmission>,
    registry: ListenerRegistry,
    listeners: Vec<ListenerGuard>,
    observers: BTreeMap<String, ListenerGuard>,
    log: Vec<Transition>,
}

impl<S: PreferenceStore, D: Document> Session<S, D> {
    /// Start a session with the simulated submitter from `config.contact`.
    pub fn new(
        config: &SiteConfig,
        content: &SiteContent,
        store: S,
        doc: D,
        env: SessionEnv,
    ) -> Result<Self, SessionError> {
        let submitter = SimulatedSubmitter::new(Duration::from_millis(config.contact.submit_delay_ms));
        Self::with_submitter(config, content, store, doc, env, Box::new(submitter))
    }

    pub fn with_submitter(
        config: &SiteConfig,
        content: &SiteContent,
        store: S,
        mut doc: D,
        env: SessionEnv,
        submitter: Box<dyn Submitter>,
    ) -> Result<Self, SessionError> {
        let carousel = Carousel::new(content.projects.len())?;
        let locale = LocaleContext::init(store, &config.locale.storage_key, &mut doc)?;
        let theme = ThemeState::default();
        apply_theme(theme, &config.colors, &mut doc);

        let registry = ListenerRegistry::new();
        let mut listeners = vec![registry.attach(ListenerKind::Scroll)];
        let tilt_kinds = match env.tilt_input() {
            Some(TiltInput::Pointer) => vec![ListenerKind::PointerMove, ListenerKind::PointerLeave],
            Some(TiltInput::Device) => {
                vec![ListenerKind::DeviceOrientation, ListenerKind::DeviceMotion]
            }
            None => Vec::new(),
        };
        listeners.extend(tilt_kinds.into_iter().map(|kind| registry.attach(kind)));

        let mut reveals = RevealSet::new();
        let mut observers = BTreeMap::new();
        for section in SECTIONS {
            for (target, margin) in [
                (section.to_string(), config.reveal.section_margin),
                (heading_target(section), config.reveal.heading_margin),
            ] {
                reveals.watch(&target, margin);
                let guard = registry.attach(ListenerKind::Intersection(target.clone()));
                observers.insert(target, guard);
            }
        }

        let (reply_tx, replies) = mpsc::channel();
        tracing::debug!(
            locale = %locale.locale(),
            listeners = registry.active_count(),
            ?env,
            "session started"
        );

        Ok(Self {
            env,
            colors: config.colors.clone(),
            doc,
            locale,
            theme,
            navbar: NavbarState::default(),
            reveals,
            carousel,
            faq: Accordion::new(content.faq.en.len()),
            form: ContactForm::new(),
            tilt: Tilt::default(),
            submitter,
            reply_tx,
            replies,
            pending: None,
            registry,
            listeners,
            observers,
            log: Vec::new(),
        })
    }

    /// Apply one event and record the transition.
    pub fn dispatch(&mut self, event: Event) -> Result<Outcome, SessionError> {
        let outcome = self.apply(&event)?;
        tracing::debug!(%event, %outcome, "dispatch");
        self.log.push(Transition {
            event,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    /// Dispatch events in order, stopping at the first error.
    pub fn run<I>(&mut self, events: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.dispatch(event)?;
        }
        Ok(())
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.log
    }

    pub fn locale(&self) -> Locale {
        self.locale.locale()
    }

    pub fn store(&self) -> &S {
        self.locale.store()
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    /// A handle on the listener registry; it outlives the session.
    pub fn registry(&self) -> ListenerRegistry {
        self.registry.clone()
    }

    pub fn is_submission_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn snapshot(&self) -> ViewState {
        ViewState {
            locale: self.locale.locale(),
            dark: self.theme.is_dark(),
            scrolled: self.navbar.scrolled(),
            menu_open: self.navbar.menu_open(),
            revealed: self.reveals.revealed_targets().map(str::to_string).collect(),
            active_project: self.carousel.active(),
            direction: self.carousel.direction(),
            open_faq: self.faq.open_index(),
            form: FormView::of(&self.form),
            tilt: if self.env.tilt_input().is_some() {
                self.tilt.transform()
            } else {
                TiltTransform::neutral()
            },
        }
    }

    fn apply(&mut self, event: &Event) -> Result<Outcome, SessionError> {
        let outcome = match event {
            Event::SetLocale { locale } => {
                let before = self.locale.locale();
                self.locale.set_locale(*locale, &mut self.doc)?;
                if before == *locale {
                    Outcome::Unchanged
                } else {
                    Outcome::Changed(format!("locale {before} -> {locale}"))
                }
            }
            Event::ToggleLocale => {
                let before = self.locale.locale();
                let after = self.locale.toggle_locale(&mut self.doc)?;
                Outcome::Changed(format!("locale {before} -> {after}"))
            }
            Event::ToggleTheme => {
                self.theme.toggle();
                apply_theme(self.theme, &self.colors, &mut self.doc);
                Outcome::Changed(format!("theme {}", self.theme.name()))
            }
            Event::Scroll { y } => {
                if self.navbar.on_scroll(*y) {
                    Outcome::Changed(format!("navbar scrolled={}", self.navbar.scrolled()))
                } else {
                    Outcome::Unchanged
                }
            }
            Event::ToggleMenu => {
                self.navbar.toggle_menu(&mut self.doc);
                let state = if self.navbar.menu_open() { "open" } else { "closed" };
                Outcome::Changed(format!("menu {state}"))
            }
            Event::CloseMenu => {
                if self.navbar.menu_open() {
                    self.navbar.set_menu_open(false, &mut self.doc);
                    Outcome::Changed("menu closed".to_string())
                } else {
                    Outcome::Unchanged
                }
            }
            Event::Intersect {
                target,
                top,
                bottom,
                viewport_height,
            } => self.intersect(
                target,
                &Intersection {
                    top: *top,
                    bottom: *bottom,
                    viewport_height: *viewport_height,
                },
            ),
            Event::Paginate { step } => {
                let before = self.carousel.active();
                self.carousel.paginate(*step);
                self.project_moved(before)
            }
            Event::JumpTo { index } => {
                let before = self.carousel.active();
                self.carousel.jump_to(*index)?;
                self.project_moved(before)
            }
            Event::ToggleFaq { index } => {
                self.faq.toggle(*index)?;
                match self.faq.open_index() {
                    Some(open) => Outcome::Changed(format!("faq {open} open")),
                    None => Outcome::Changed("faq closed".to_string()),
                }
            }
            Event::EditField { field, value } => match self.form.edit(*field, value) {
                Ok(()) => Outcome::Changed(format!("{field} edited")),
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Event::Submit => match self.form.submit() {
                Ok(SubmitOutcome::Started(message)) => {
                    self.pending = Some(self.submitter.submit(message, self.reply_tx.clone()));
                    Outcome::Changed(format!("form {}", self.form.status()))
                }
                Ok(SubmitOutcome::AlreadySending) => Outcome::Unchanged,
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Event::SendAnother => match self.form.send_another() {
                Ok(()) => Outcome::Changed("form reset".to_string()),
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Event::Retry => match self.form.retry() {
                Ok(()) => Outcome::Changed(format!("form {}", self.form.status())),
                Err(e) => Outcome::Rejected(e.to_string()),
            },
            Event::PointerMove { x, y, width, height } => {
                if !self.registry.is_attached(&ListenerKind::PointerMove) {
                    return Ok(Outcome::Unchanged);
                }
                self.tilt.pointer(*x, *y, *width, *height);
                self.tilt_target()
            }
            Event::PointerLeave => {
                if !self.registry.is_attached(&ListenerKind::PointerLeave) {
                    return Ok(Outcome::Unchanged);
                }
                self.tilt.reset();
                self.tilt_target()
            }
            Event::Orientation { beta, gamma } => {
                if !self.registry.is_attached(&ListenerKind::DeviceOrientation) {
                    return Ok(Outcome::Unchanged);
                }
                self.tilt.orientation(*beta, *gamma);
                self.tilt_target()
            }
            Event::Motion { accel_x } => {
                if !self.registry.is_attached(&ListenerKind::DeviceMotion) {
                    return Ok(Outcome::Unchanged);
                }
                self.tilt.motion(*accel_x);
                self.tilt_target()
            }
            Event::Wait { ms } => self.wait(*ms),
        };
        Ok(outcome)
    }

    fn intersect(&mut self, target: &str, entry: &Intersection) -> Outcome {
        // Observers disconnect once their target has revealed
        if !self.observers.contains_key(target) {
            return Outcome::Unchanged;
        }
        if self.reveals.observe(target, entry) {
            self.observers.remove(target);
            Outcome::Changed(format!("revealed {target}"))
        } else {
            Outcome::Unchanged
        }
    }

    fn project_moved(&self, before: usize) -> Outcome {
        let after = self.carousel.active();
        if after == before {
            Outcome::Unchanged
        } else {
            Outcome::Changed(format!(
                "project {before} -> {after} (enter from {})",
                self.carousel.transition().enter_from.as_str()
            ))
        }
    }

    fn tilt_target(&self) -> Outcome {
        let (x, y) = self.tilt.target();
        Outcome::Changed(format!("tilt target ({x:.2}, {y:.2})"))
    }

    fn wait(&mut self, ms: u64) -> Outcome {
        let mut changes = Vec::new();
        let reply = match self.pending {
            Some(_) => self.replies.recv_timeout(Duration::from_millis(ms)).ok(),
            None => None,
        };
        if let Some(result) = reply {
            self.pending = None;
            if self.form.settle(result) {
                tracing::debug!(status = %self.form.status(), "submission settled");
                changes.push(format!("form {}", self.form.status()));
            }
        }
        if self.env.tilt_input().is_some() {
            self.tilt.advance(ms as f64 / 1000.0);
        }
        if changes.is_empty() {
            Outcome::Unchanged
        } else {
            Outcome::Changed(changes.join(", "))
        }
    }
}

impl<S: PreferenceStore, D: Document> Drop for Session<S, D> {
    fn drop(&mut self) {
        self.navbar.release(&mut self.doc);
        self.pending.take();
        self.observers.clear();
        self.listeners.clear();
        tracing::debug!(
            remaining = self.registry.active_count(),
            "session torn down"
        );
    }
}
