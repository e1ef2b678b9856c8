//! Contact form state machine and the submission boundary.
//!
//! ```text
//!            submit (valid)          settle(Ok)
//!   Idle ───────────────────▶ Sending ──────────▶ Sent
//!    ▲                          │                  │
//!    │          retry           │ settle(Err)      │ send_another
//!    ├────────────────────── Error ◀───────────────┘ (clears fields)
//!    └──────────────────────────────────────────────┘
//! ```
//!
//! Fields can only change while the form is `Idle`. A second submit while
//! `Sending` is a no-op, so a double click never produces two messages.
//!
//! The stock [`SimulatedSubmitter`] makes no network call: it waits a fixed
//! delay on a background thread and reports success over a channel. The
//! [`PendingSubmission`] it returns owns that thread; dropping it cancels the
//! wait and the thread exits without reporting.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("name is required")]
    EmptyName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("message is required")]
    EmptyMessage,
    #[error("form cannot be edited while {0}")]
    NotEditable(Status),
    #[error("action not available while {0}")]
    InvalidState(Status),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("submission failed: {0}")]
    Failed(String),
}

pub type SubmissionResult = Result<(), SubmissionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Sending,
    Sent,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Idle => "idle",
            Status::Sending => "sending",
            Status::Sent => "sent",
            Status::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    /// The form control's `name` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload handed to a [`Submitter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Result of a submit attempt that passed state checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Moved to `Sending`; deliver this message.
    Started(ContactMessage),
    /// Already sending; nothing happened.
    AlreadySending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    email: String,
    message: String,
    status: Status,
    last_error: Option<SubmissionError>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            message: String::new(),
            status: Status::Idle,
            last_error: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn last_error(&self) -> Option<&SubmissionError> {
        self.last_error.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.status == Status::Idle
    }

    pub fn edit(&mut self, field: Field, value: &str) -> Result<(), FormError> {
        if self.status != Status::Idle {
            return Err(FormError::NotEditable(self.status));
        }
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Check the required-field rules without changing state.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::EmptyName);
        }
        if !is_valid_email(&self.email) {
            return Err(FormError::InvalidEmail(self.email.clone()));
        }
        if self.message.trim().is_empty() {
            return Err(FormError::EmptyMessage);
        }
        Ok(())
    }

    pub fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        match self.status {
            Status::Sending => Ok(SubmitOutcome::AlreadySending),
            Status::Idle => {
                self.validate()?;
                self.status = Status::Sending;
                self.last_error = None;
                Ok(SubmitOutcome::Started(ContactMessage {
                    name: self.name.clone(),
                    email: self.email.clone(),
                    message: self.message.clone(),
                }))
            }
            other => Err(FormError::InvalidState(other)),
        }
    }

    /// Apply the submitter's verdict. Ignored unless `Sending`; returns
    /// whether the state changed.
    pub fn settle(&mut self, result: SubmissionResult) -> bool {
        if self.status != Status::Sending {
            return false;
        }
        match result {
            Ok(()) => self.status = Status::Sent,
            Err(e) => {
                self.status = Status::Error;
                self.last_error = Some(e);
            }
        }
        true
    }

    /// From `Sent`: back to an empty `Idle` form.
    pub fn send_another(&mut self) -> Result<(), FormError> {
        if self.status != Status::Sent {
            return Err(FormError::InvalidState(self.status));
        }
        *self = Self::new();
        Ok(())
    }

    /// From `Error`: back to `Idle` with the fields intact.
    pub fn retry(&mut self) -> Result<(), FormError> {
        if self.status != Status::Error {
            return Err(FormError::InvalidState(self.status));
        }
        self.status = Status::Idle;
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email.trim())
}

// ============================================================================
// Submission boundary
// ============================================================================

/// Delivers a contact message and reports the outcome on `reply`.
///
/// Implementations report at most once. The returned handle must stop any
/// outstanding work when dropped.
pub trait Submitter {
    fn submit(&self, message: ContactMessage, reply: Sender<SubmissionResult>) -> PendingSubmission;
}

/// Owner of an in-flight submission.
#[derive(Debug, Default)]
pub struct PendingSubmission {
    cancel: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PendingSubmission {
    /// A submission with no background work (already reported).
    pub fn settled() -> Self {
        Self::default()
    }

    /// Run `work` on a thread. `work` receives a cancel receiver that
    /// disconnects when this handle is dropped.
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce(mpsc::Receiver<()>) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = mpsc::channel();
        let worker = thread::spawn(move || work(cancel_rx));
        Self {
            cancel: Some(cancel_tx),
            worker: Some(worker),
        }
    }
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        // Closing the cancel channel wakes the worker immediately.
        self.cancel.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Stand-in for a real mail/API integration: succeeds after `delay`.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(&self, message: ContactMessage, reply: Sender<SubmissionResult>) -> PendingSubmission {
        let delay = self.delay;
        tracing::debug!(email = %message.email, ?delay, "simulating contact submission");
        PendingSubmission::spawn(move |cancel| {
            match cancel.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => {
                    let _ = reply.send(Ok(()));
                }
                // Handle dropped: the owner was torn down
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        let mut form = ContactForm::new();
        form.edit(Field::Name, "Jane").unwrap();
        form.edit(Field::Email, "jane@example.com").unwrap();
        form.edit(Field::Message, "Hi").unwrap();
        form
    }

    #[test]
    fn starts_idle_and_empty() {
        let form = ContactForm::new();
        assert_eq!(form.status(), Status::Idle);
        assert_eq!(form.field(Field::Name), "");
        assert!(form.can_submit());
    }

    #[test]
    fn valid_submit_moves_to_sending_with_message() {
        let mut form = filled();
        let outcome = form.submit().unwrap();
        assert_eq!(form.status(), Status::Sending);
        assert_eq!(
            outcome,
            SubmitOutcome::Started(ContactMessage {
                name: "Jane".into(),
                email: "jane@example.com".into(),
                message: "Hi".into(),
            })
        );
        assert!(!form.can_submit());
    }

    #[test]
    fn happy_path_keeps_fields_until_reset() {
        let mut form = filled();
        form.submit().unwrap();
        assert!(form.settle(Ok(())));
        assert_eq!(form.status(), Status::Sent);
        assert_eq!(form.field(Field::Name), "Jane");
        assert_eq!(form.field(Field::Email), "jane@example.com");
        assert_eq!(form.field(Field::Message), "Hi");

        form.send_another().unwrap();
        assert_eq!(form.status(), Status::Idle);
        assert_eq!(form.field(Field::Name), "");
        assert_eq!(form.field(Field::Email), "");
        assert_eq!(form.field(Field::Message), "");
    }

    #[test]
    fn second_submit_while_sending_is_noop() {
        let mut form = filled();
        form.submit().unwrap();
        assert_eq!(form.submit().unwrap(), SubmitOutcome::AlreadySending);
        assert_eq!(form.status(), Status::Sending);
    }

    #[test]
    fn settle_only_applies_once() {
        let mut form = filled();
        form.submit().unwrap();
        assert!(form.settle(Ok(())));
        assert!(!form.settle(Ok(())));
        assert!(!form.settle(Err(SubmissionError::Failed("late".into()))));
        assert_eq!(form.status(), Status::Sent);
    }

    #[test]
    fn settle_while_idle_is_ignored() {
        let mut form = ContactForm::new();
        assert!(!form.settle(Ok(())));
        assert_eq!(form.status(), Status::Idle);
    }

    #[test]
    fn fields_locked_outside_idle() {
        let mut form = filled();
        form.submit().unwrap();
        assert_eq!(
            form.edit(Field::Name, "John"),
            Err(FormError::NotEditable(Status::Sending))
        );
        assert_eq!(form.field(Field::Name), "Jane");
    }

    #[test]
    fn empty_name_blocks_submit() {
        let mut form = filled();
        form.edit(Field::Name, "   ").unwrap();
        assert_eq!(form.submit(), Err(FormError::EmptyName));
        assert_eq!(form.status(), Status::Idle);
    }

    #[test]
    fn malformed_email_blocks_submit() {
        let mut form = filled();
        form.edit(Field::Email, "jane.example.com").unwrap();
        assert!(matches!(form.submit(), Err(FormError::InvalidEmail(_))));
        assert_eq!(form.status(), Status::Idle);
    }

    #[test]
    fn empty_message_blocks_submit() {
        let mut form = filled();
        form.edit(Field::Message, "").unwrap();
        assert_eq!(form.submit(), Err(FormError::EmptyMessage));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.co.id"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("ja ne@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn failure_then_retry_keeps_fields() {
        let mut form = filled();
        form.submit().unwrap();
        form.settle(Err(SubmissionError::Failed("smtp down".into())));
        assert_eq!(form.status(), Status::Error);
        assert_eq!(
            form.last_error(),
            Some(&SubmissionError::Failed("smtp down".into()))
        );

        form.retry().unwrap();
        assert_eq!(form.status(), Status::Idle);
        assert_eq!(form.field(Field::Message), "Hi");

        form.submit().unwrap();
        assert!(form.last_error().is_none());
    }

    #[test]
    fn send_another_only_from_sent() {
        let mut form = filled();
        assert_eq!(
            form.send_another(),
            Err(FormError::InvalidState(Status::Idle))
        );
        form.submit().unwrap();
        assert_eq!(
            form.send_another(),
            Err(FormError::InvalidState(Status::Sending))
        );
    }

    #[test]
    fn submit_from_sent_is_rejected() {
        let mut form = filled();
        form.submit().unwrap();
        form.settle(Ok(()));
        assert_eq!(form.submit(), Err(FormError::InvalidState(Status::Sent)));
    }

    #[test]
    fn simulated_submitter_reports_after_delay() {
        let (tx, rx) = mpsc::channel();
        let submitter = SimulatedSubmitter::new(Duration::from_millis(20));
        let _pending = submitter.submit(filled_message(), tx);

        assert!(rx.try_recv().is_err());
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn dropping_pending_cancels_report() {
        let (tx, rx) = mpsc::channel();
        let submitter = SimulatedSubmitter::new(Duration::from_secs(30));
        let pending = submitter.submit(filled_message(), tx);
        drop(pending);

        // The worker exited and dropped its sender without reporting
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    fn filled_message() -> ContactMessage {
        ContactMessage {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            message: "Hi".into(),
        }
    }
}
