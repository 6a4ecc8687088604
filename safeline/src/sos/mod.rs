//! Emergency activation controller.
//!
//! A hold-to-confirm state machine: pressing the SOS control starts a
//! countdown; holding through it activates the alert and fans an emergency
//! SMS out to every stored contact; releasing early or the safety deadline
//! cancels it.
//!
//! ```text
//! Idle ──press──▶ Counting(3) ─tick─▶ Counting(2) ─tick─▶ Counting(1)
//!   ▲                │  │                                     │
//!   │   release/deadline │                                   tick
//!   └────────────────┴───┘                                    ▼
//!   ◀───────────────dismiss─────────────────────────── Activated
//! ```
//!
//! One spawned task per press owns both the periodic tick and the
//! auto-cancel deadline; a session sequence number plus a `CancellationToken`
//! guarantee that exactly one of {completion, deadline, release} drives the
//! terminal transition.

mod message;

pub use message::{ALERT_BANNER, LOCATION_PLACEHOLDER, alert_body};

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::db::ContactStore;
use crate::dispatch::SmsDispatcher;
use crate::feedback::FeedbackHandle;

/// Phase of the current SOS session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosPhase {
    Idle,
    /// Counting down; the payload is the number shown to the user (>= 1).
    Counting(u8),
    Activated,
}

/// Countdown timing knobs.
///
/// Defaults match the product behavior (3 ticks of 1s, bounded at 3s);
/// tests shrink them. `tick` must be non-zero and `start_count` at least 1.
#[derive(Debug, Clone)]
pub struct SosTimings {
    /// Countdown start value; the alert fires after this many ticks.
    pub start_count: u8,
    /// Interval between countdown ticks.
    pub tick: Duration,
    /// Safety deadline after which a still-running countdown cancels itself,
    /// even if the release event was never observed.
    pub auto_cancel: Duration,
}

impl Default for SosTimings {
    fn default() -> Self {
        Self {
            start_count: 3,
            tick: Duration::from_secs(1),
            auto_cancel: Duration::from_secs(3),
        }
    }
}

/// Hold-to-confirm SOS controller. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct SosController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<SessionState>,
    phase_tx: watch::Sender<SosPhase>,
    store: ContactStore,
    dispatcher: Arc<dyn SmsDispatcher>,
    feedback: FeedbackHandle,
    timings: SosTimings,
    country_code: String,
}

struct SessionState {
    phase: SosPhase,
    /// Identity of the live press session; terminal transitions must match it.
    seq: u64,
    cancel: Option<CancellationToken>,
}

impl SosController {
    pub fn new(
        store: ContactStore,
        dispatcher: Arc<dyn SmsDispatcher>,
        feedback: FeedbackHandle,
        timings: SosTimings,
        country_code: impl Into<String>,
    ) -> Self {
        let (phase_tx, _) = watch::channel(SosPhase::Idle);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState {
                    phase: SosPhase::Idle,
                    seq: 0,
                    cancel: None,
                }),
                phase_tx,
                store,
                dispatcher,
                feedback,
                timings,
                country_code: country_code.into(),
            }),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SosPhase {
        self.inner.state.lock().phase
    }

    /// Subscribe to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<SosPhase> {
        self.inner.phase_tx.subscribe()
    }

    /// User pressed and held the SOS control.
    ///
    /// Only accepted from `Idle`; while counting or activated the press is a
    /// no-op. Must be called within a tokio runtime: the countdown runs on a
    /// spawned task.
    pub fn press(&self) {
        let start_count = self.inner.timings.start_count;
        let (seq, token) = {
            let mut state = self.inner.state.lock();
            if state.phase != SosPhase::Idle {
                tracing::debug!(phase = ?state.phase, "SOS press ignored outside Idle");
                return;
            }
            state.seq += 1;
            let token = CancellationToken::new();
            state.cancel = Some(token.clone());
            state.phase = SosPhase::Counting(start_count);
            let _ = self.inner.phase_tx.send(state.phase);
            (state.seq, token)
        };

        self.inner.feedback.notify();
        tracing::info!(seq, "SOS countdown started");
        tokio::spawn(Inner::run_countdown(Arc::clone(&self.inner), seq, token));
    }

    /// User released the SOS control.
    ///
    /// Cancels the countdown when one is running; meaningless otherwise
    /// (releasing after activation does not revoke the alert).
    pub fn release(&self) {
        {
            let mut state = self.inner.state.lock();
            match state.phase {
                SosPhase::Counting(n) if n > 0 => {
                    state.phase = SosPhase::Idle;
                    if let Some(token) = state.cancel.take() {
                        token.cancel();
                    }
                    let _ = self.inner.phase_tx.send(SosPhase::Idle);
                }
                _ => return,
            }
        }

        self.inner.feedback.error();
        tracing::info!("SOS countdown cancelled by release");
    }

    /// User dismissed the post-activation notice ("Cancel Alert").
    ///
    /// Only resets the UI phase; sent messages are not recalled.
    pub fn dismiss(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.phase != SosPhase::Activated {
                tracing::debug!(phase = ?state.phase, "Dismiss ignored outside Activated");
                return;
            }
            state.phase = SosPhase::Idle;
            let _ = self.inner.phase_tx.send(SosPhase::Idle);
        }

        self.inner.feedback.notify();
        tracing::info!("SOS alert dismissed");
    }
}

impl Inner {
    /// Countdown task: one per press.
    ///
    /// Owns both timers of the session. The `biased` branch order is a
    /// correctness invariant: cancellation outranks the tick, and the final
    /// tick outranks the deadline, so a countdown that completes exactly at
    /// the deadline activates rather than cancelling.
    async fn run_countdown(inner: Arc<Inner>, seq: u64, token: CancellationToken) {
        let start = Instant::now();
        let mut interval = time::interval_at(start + inner.timings.tick, inner.timings.tick);
        let deadline = time::sleep_until(start + inner.timings.auto_cancel);
        tokio::pin!(deadline);

        let mut remaining = inner.timings.start_count;
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    // Release (or a newer session) won; nothing left to do.
                    return;
                }
                _ = interval.tick() => {
                    remaining = remaining.saturating_sub(1);
                    if remaining == 0 {
                        if inner.begin_activation(seq) {
                            inner.activate().await;
                        }
                        return;
                    }
                    if !inner.publish_counting(seq, remaining) {
                        return;
                    }
                }
                _ = &mut deadline => {
                    inner.auto_cancel(seq);
                    return;
                }
            }
        }
    }

    /// Record a tick. Returns false when the session is no longer ours.
    fn publish_counting(&self, seq: u64, remaining: u8) -> bool {
        let mut state = self.state.lock();
        if state.seq != seq || !matches!(state.phase, SosPhase::Counting(_)) {
            return false;
        }
        state.phase = SosPhase::Counting(remaining);
        let _ = self.phase_tx.send(state.phase);
        true
    }

    /// Claim the terminal transition to `Activated`.
    ///
    /// Returns false if release or auto-cancel won the race first.
    fn begin_activation(&self, seq: u64) -> bool {
        let mut state = self.state.lock();
        if state.seq != seq || !matches!(state.phase, SosPhase::Counting(_)) {
            return false;
        }
        state.phase = SosPhase::Activated;
        state.cancel = None;
        let _ = self.phase_tx.send(SosPhase::Activated);
        true
    }

    /// Safety deadline fired while still counting.
    fn auto_cancel(&self, seq: u64) {
        {
            let mut state = self.state.lock();
            if state.seq != seq || !matches!(state.phase, SosPhase::Counting(_)) {
                return;
            }
            state.phase = SosPhase::Idle;
            state.cancel = None;
            let _ = self.phase_tx.send(SosPhase::Idle);
        }

        self.feedback.error();
        tracing::warn!(seq, "SOS countdown auto-cancelled at deadline");
    }

    /// Activation sequence; runs exactly once per completed countdown.
    async fn activate(&self) {
        self.feedback.sos();
        self.send_emergency_alert().await;
        tracing::info!("SOS activated, emergency alert issued");
    }

    /// Fan the emergency SMS out to every stored contact.
    ///
    /// Fire-and-forget per contact: individual failures are logged and do
    /// not abort the rest of the fan-out. Delivery is never awaited; the
    /// activation notice does not wait for it.
    async fn send_emergency_alert(&self) {
        if !self.store.is_connected() {
            tracing::error!("Contact store unavailable, emergency alert not sent");
            return;
        }

        let contacts = self.store.list();
        if contacts.is_empty() {
            tracing::warn!("No emergency contacts stored, nothing to dispatch");
            return;
        }

        let sent_at = Local::now();
        for contact in contacts {
            let number = format!("{}{}", self.country_code, contact.mobile);
            let body = message::alert_body(&contact.name, sent_at);
            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                match dispatcher.send(&number, &body).await {
                    Ok(()) => tracing::info!(number = %number, "Emergency SMS dispatched"),
                    Err(e) => {
                        tracing::error!(number = %number, error = %e, "Emergency SMS dispatch failed");
                    }
                }
            });
        }
    }
}
