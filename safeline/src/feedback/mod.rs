//! Feedback port: semantic haptic/UX events emitted by the controllers.
//!
//! The port maps to device vibration in a mobile frontend; the library ships
//! a tracing-backed implementation for headless use. Failures from the port
//! are caught and logged by [`FeedbackHandle`], never propagated.

pub mod patterns;

use std::sync::Arc;

use safeline_shared::errors::SafelineResult;

/// Feedback backend.
///
/// Implementors only need [`Feedback::generic`] and [`Feedback::stop`]; the
/// semantic events default to the canonical pattern tables.
pub trait Feedback: Send + Sync {
    /// Play an arbitrary wait/buzz millisecond pattern.
    fn generic(&self, pattern: &[u64]) -> SafelineResult<()>;

    /// Cancel any in-flight pattern.
    fn stop(&self) -> SafelineResult<()>;

    fn notify(&self) -> SafelineResult<()> {
        self.generic(patterns::NOTIFICATION)
    }

    fn error(&self) -> SafelineResult<()> {
        self.generic(patterns::ERROR)
    }

    fn success(&self) -> SafelineResult<()> {
        self.generic(patterns::SUCCESS)
    }

    fn sos(&self) -> SafelineResult<()> {
        self.generic(patterns::SOS)
    }
}

/// Shared feedback handle that swallows backend failures.
///
/// Every emit is log-and-continue; a port failure never reaches the
/// controllers.
#[derive(Clone)]
pub struct FeedbackHandle {
    inner: Arc<dyn Feedback>,
}

impl FeedbackHandle {
    pub fn new(inner: Arc<dyn Feedback>) -> Self {
        Self { inner }
    }

    pub fn notify(&self) {
        if let Err(e) = self.inner.notify() {
            tracing::warn!(error = %e, "Feedback backend failed on notify");
        }
    }

    pub fn error(&self) {
        if let Err(e) = self.inner.error() {
            tracing::warn!(error = %e, "Feedback backend failed on error");
        }
    }

    pub fn success(&self) {
        if let Err(e) = self.inner.success() {
            tracing::warn!(error = %e, "Feedback backend failed on success");
        }
    }

    pub fn sos(&self) {
        if let Err(e) = self.inner.sos() {
            tracing::warn!(error = %e, "Feedback backend failed on sos");
        }
    }

    pub fn stop(&self) {
        if let Err(e) = self.inner.stop() {
            tracing::warn!(error = %e, "Feedback backend failed on stop");
        }
    }
}

/// Feedback backend that logs each event.
#[derive(Debug, Clone, Default)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn generic(&self, pattern: &[u64]) -> SafelineResult<()> {
        tracing::debug!(?pattern, "feedback pattern");
        Ok(())
    }

    fn stop(&self) -> SafelineResult<()> {
        tracing::debug!("feedback stop");
        Ok(())
    }
}
