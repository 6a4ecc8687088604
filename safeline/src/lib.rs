//! Safeline: a personal-safety SOS core.
//!
//! The library has two stateful components and the ports between them and
//! the outside world:
//!
//! - [`db::ContactStore`]: durable CRUD over the emergency contacts
//!   relation (SQLite).
//! - [`sos::SosController`]: the hold-to-confirm activation state machine
//!   that fans an emergency SMS out to every stored contact.
//! - [`contacts::ContactsScreen`]: the contacts screen mediator.
//! - [`dispatch::SmsDispatcher`] / [`feedback::Feedback`]: collaborator
//!   ports for SMS delivery and haptic feedback.
//!
//! [`runtime::SafelineRuntime`] wires these together for embedders; the
//! `safeline` CLI is one such embedder.

pub mod contacts;
pub mod db;
pub mod dispatch;
pub mod feedback;
pub mod runtime;
pub mod sos;

pub use contacts::{ContactRow, ContactsScreen, DeletePrompt};
pub use db::{Contact, ContactStore};
pub use dispatch::{LogSmsDispatcher, SmsDispatcher};
pub use feedback::{Feedback, FeedbackHandle, LogFeedback};
pub use runtime::{SafelineOptions, SafelineRuntime};
pub use sos::{SosController, SosPhase, SosTimings};

pub use safeline_shared::{SafelineError, SafelineResult};
