//! SMS dispatch port.
//!
//! The activation controller hands each alert to this port fire-and-forget:
//! per-message outcomes are logged, never retried and never surfaced. A real
//! frontend plugs in a carrier/OS-backed implementation; the library ships a
//! dry-run logger.

use async_trait::async_trait;

use safeline_shared::errors::SafelineResult;

/// Outbound SMS capability.
#[async_trait]
pub trait SmsDispatcher: Send + Sync {
    /// Send `body` to `number` (full number including country-code prefix).
    async fn send(&self, number: &str, body: &str) -> SafelineResult<()>;
}

/// Dispatcher that logs each message instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct LogSmsDispatcher;

#[async_trait]
impl SmsDispatcher for LogSmsDispatcher {
    async fn send(&self, number: &str, body: &str) -> SafelineResult<()> {
        tracing::info!(number, body_len = body.len(), "Dry-run SMS dispatch");
        Ok(())
    }
}
