//! End-to-end tests for the SOS activation state machine.
//!
//! Timings are shrunk so a full hold takes milliseconds; the phase ratios
//! (three ticks bounded by the auto-cancel deadline) match production.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use safeline::feedback::patterns;
use safeline::{
    Feedback, SafelineOptions, SafelineResult, SafelineRuntime, SmsDispatcher, SosController,
    SosPhase, SosTimings,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Records every dispatched (number, body) pair.
#[derive(Default)]
struct RecordingDispatcher {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsDispatcher for RecordingDispatcher {
    async fn send(&self, number: &str, body: &str) -> SafelineResult<()> {
        self.sent.lock().push((number.to_string(), body.to_string()));
        Ok(())
    }
}

impl RecordingDispatcher {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

/// Records the semantic feedback events in order.
#[derive(Default)]
struct RecordingFeedback {
    events: Mutex<Vec<&'static str>>,
}

impl Feedback for RecordingFeedback {
    fn generic(&self, pattern: &[u64]) -> SafelineResult<()> {
        let name = match pattern {
            p if p == patterns::NOTIFICATION => "notify",
            p if p == patterns::ERROR => "error",
            p if p == patterns::SUCCESS => "success",
            p if p == patterns::SOS => "sos",
            _ => "generic",
        };
        self.events.lock().push(name);
        Ok(())
    }

    fn stop(&self) -> SafelineResult<()> {
        self.events.lock().push("stop");
        Ok(())
    }
}

impl RecordingFeedback {
    fn events(&self) -> Vec<&'static str> {
        self.events.lock().clone()
    }
}

/// Test context with isolated runtime and automatic cleanup.
struct TestContext {
    runtime: SafelineRuntime,
    dispatcher: Arc<RecordingDispatcher>,
    feedback: Arc<RecordingFeedback>,
    _temp_dir: TempDir,
}

impl TestContext {
    fn new(timings: SosTimings) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let options = SafelineOptions {
            home_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let dispatcher = Arc::new(RecordingDispatcher::default());
        let feedback = Arc::new(RecordingFeedback::default());
        let runtime = SafelineRuntime::with_timings(
            options,
            feedback.clone(),
            dispatcher.clone(),
            timings,
        )
        .expect("Failed to create runtime");

        Self {
            runtime,
            dispatcher,
            feedback,
            _temp_dir: temp_dir,
        }
    }

    fn sos(&self) -> &SosController {
        self.runtime.sos()
    }
}

/// Fast timings: full hold completes in ~150ms, deadline well clear of it.
fn fast_timings() -> SosTimings {
    SosTimings {
        start_count: 3,
        tick: Duration::from_millis(50),
        auto_cancel: Duration::from_millis(500),
    }
}

/// Wait until the controller reaches `phase` or the timeout elapses.
async fn wait_for_phase(sos: &SosController, phase: SosPhase, timeout: Duration) {
    let mut rx = sos.subscribe();
    let reached = tokio::time::timeout(timeout, async {
        loop {
            if *rx.borrow_and_update() == phase {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    })
    .await;
    assert!(reached.is_ok(), "timed out waiting for {:?}", phase);
}

/// Wait until `count` messages were dispatched or the timeout elapses.
async fn wait_for_sends(dispatcher: &RecordingDispatcher, count: usize, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    while dispatcher.sent().len() < count {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {} dispatches, saw {}",
            count,
            dispatcher.sent().len()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ============================================================================
// ACTIVATION BEHAVIOR
// ============================================================================

/// Holding through the countdown activates exactly once and dispatches one
/// SMS per stored contact, prefixed with the country code.
#[tokio::test]
async fn test_full_hold_dispatches_to_every_contact() {
    let ctx = TestContext::new(fast_timings());
    ctx.runtime.store().add("Alice", "9000000001").unwrap();
    ctx.runtime.store().add("Bob", "9000000002").unwrap();

    ctx.sos().press();
    wait_for_phase(ctx.sos(), SosPhase::Activated, Duration::from_secs(2)).await;
    wait_for_sends(&ctx.dispatcher, 2, Duration::from_secs(2)).await;

    let sent = ctx.dispatcher.sent();
    assert_eq!(sent.len(), 2, "exactly one dispatch per contact");

    let mut numbers: Vec<&str> = sent.iter().map(|(n, _)| n.as_str()).collect();
    numbers.sort();
    assert_eq!(numbers, vec!["+919000000001", "+919000000002"]);

    for (_, body) in &sent {
        assert!(body.contains("EMERGENCY SOS ALERT"));
        assert!(body.contains("Time: "));
        assert!(body.contains("[GPS coordinates will be added]"));
    }

    // Each body names its own recipient
    let alice_body = &sent.iter().find(|(n, _)| n == "+919000000001").unwrap().1;
    assert!(alice_body.contains("emergency alert from Alice"));

    // Still activated until dismissed; no second fan-out shows up late
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(ctx.sos().phase(), SosPhase::Activated);
    assert_eq!(ctx.dispatcher.sent().len(), 2);
}

/// An empty store still activates; there is simply nothing to dispatch.
#[tokio::test]
async fn test_full_hold_with_empty_store() {
    let ctx = TestContext::new(fast_timings());

    ctx.sos().press();
    wait_for_phase(ctx.sos(), SosPhase::Activated, Duration::from_secs(2)).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(ctx.dispatcher.sent().is_empty());
    assert_eq!(ctx.sos().phase(), SosPhase::Activated);
}

/// The countdown is observable tick by tick through the watch channel.
#[tokio::test]
async fn test_countdown_phases_in_order() {
    let ctx = TestContext::new(fast_timings());
    let mut rx = ctx.sos().subscribe();

    ctx.sos().press();

    let mut seen = Vec::new();
    let collected = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let phase = *rx.borrow_and_update();
            // The receiver may still observe the pre-press Idle value
            if phase != SosPhase::Idle && seen.last() != Some(&phase) {
                seen.push(phase);
            }
            if phase == SosPhase::Activated {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    })
    .await;
    assert!(collected.is_ok(), "countdown never completed");

    assert_eq!(
        seen,
        vec![
            SosPhase::Counting(3),
            SosPhase::Counting(2),
            SosPhase::Counting(1),
            SosPhase::Activated,
        ]
    );
}

/// Activation emits the SOS feedback pattern after the press notification.
#[tokio::test]
async fn test_activation_feedback_sequence() {
    let ctx = TestContext::new(fast_timings());

    ctx.sos().press();
    wait_for_phase(ctx.sos(), SosPhase::Activated, Duration::from_secs(2)).await;

    let events = ctx.feedback.events();
    assert_eq!(events.first(), Some(&"notify"), "press feedback");
    assert!(events.contains(&"sos"), "activation feedback");
}

// ============================================================================
// CANCELLATION BEHAVIOR
// ============================================================================

/// Releasing during the countdown returns to Idle with zero dispatches.
#[tokio::test]
async fn test_release_cancels_countdown() {
    let ctx = TestContext::new(fast_timings());
    ctx.runtime.store().add("Alice", "9000000001").unwrap();

    ctx.sos().press();
    tokio::time::sleep(Duration::from_millis(70)).await; // one tick in
    ctx.sos().release();

    assert_eq!(ctx.sos().phase(), SosPhase::Idle);

    // Wait past where activation would have happened
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(ctx.sos().phase(), SosPhase::Idle);
    assert!(ctx.dispatcher.sent().is_empty());
    assert_eq!(ctx.feedback.events(), vec!["notify", "error"]);
}

/// With the release never observed and ticks running slow, the safety
/// deadline cancels the session.
#[tokio::test]
async fn test_auto_cancel_bounds_the_countdown() {
    let timings = SosTimings {
        start_count: 3,
        tick: Duration::from_millis(200),
        auto_cancel: Duration::from_millis(100),
    };
    let ctx = TestContext::new(timings);
    ctx.runtime.store().add("Alice", "9000000001").unwrap();

    ctx.sos().press();
    wait_for_phase(ctx.sos(), SosPhase::Idle, Duration::from_secs(2)).await;

    // Never activates afterwards either
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(ctx.sos().phase(), SosPhase::Idle);
    assert!(ctx.dispatcher.sent().is_empty());
    assert_eq!(ctx.feedback.events(), vec!["notify", "error"]);
}

/// When the final tick and the deadline land on the same instant, the
/// completed countdown wins: it activates, and it never also auto-cancels.
#[tokio::test]
async fn test_completion_beats_deadline_at_boundary() {
    let timings = SosTimings {
        start_count: 3,
        tick: Duration::from_millis(50),
        auto_cancel: Duration::from_millis(150),
    };
    let ctx = TestContext::new(timings);
    ctx.runtime.store().add("Alice", "9000000001").unwrap();

    ctx.sos().press();
    wait_for_phase(ctx.sos(), SosPhase::Activated, Duration::from_secs(2)).await;
    wait_for_sends(&ctx.dispatcher, 1, Duration::from_secs(2)).await;

    // No error feedback: the deadline's cancel path never ran
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(ctx.sos().phase(), SosPhase::Activated);
    assert!(!ctx.feedback.events().contains(&"error"));
    assert_eq!(ctx.dispatcher.sent().len(), 1);
}

// ============================================================================
// ACTIVATED-PHASE BEHAVIOR
// ============================================================================

/// Re-pressing while activated changes nothing until the notice is
/// dismissed; dismissing re-arms the control.
#[tokio::test]
async fn test_repress_while_activated_is_noop() {
    let ctx = TestContext::new(fast_timings());
    ctx.runtime.store().add("Alice", "9000000001").unwrap();

    ctx.sos().press();
    wait_for_phase(ctx.sos(), SosPhase::Activated, Duration::from_secs(2)).await;
    wait_for_sends(&ctx.dispatcher, 1, Duration::from_secs(2)).await;

    ctx.sos().press();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(ctx.sos().phase(), SosPhase::Activated);
    assert_eq!(ctx.dispatcher.sent().len(), 1, "no additional dispatches");

    ctx.sos().dismiss();
    assert_eq!(ctx.sos().phase(), SosPhase::Idle);

    // A fresh press starts a fresh session
    ctx.sos().press();
    wait_for_phase(ctx.sos(), SosPhase::Activated, Duration::from_secs(2)).await;
    wait_for_sends(&ctx.dispatcher, 2, Duration::from_secs(2)).await;
}

/// Dismiss outside Activated is a no-op; release outside Counting is too.
#[tokio::test]
async fn test_dismiss_and_release_outside_their_phases() {
    let ctx = TestContext::new(fast_timings());

    ctx.sos().dismiss();
    ctx.sos().release();
    assert_eq!(ctx.sos().phase(), SosPhase::Idle);
    assert!(ctx.feedback.events().is_empty());
}

/// Contacts present at activation time receive the alert; the store is read
/// at fire time, not at press time.
#[tokio::test]
async fn test_store_read_at_fire_time() {
    let ctx = TestContext::new(fast_timings());
    ctx.runtime.store().add("Alice", "9000000001").unwrap();

    ctx.sos().press();
    // Add a contact mid-countdown
    ctx.runtime.store().add("Bob", "9000000002").unwrap();

    wait_for_phase(ctx.sos(), SosPhase::Activated, Duration::from_secs(2)).await;
    wait_for_sends(&ctx.dispatcher, 2, Duration::from_secs(2)).await;
    assert_eq!(ctx.dispatcher.sent().len(), 2);
}

/// Individual dispatch failures do not abort the rest of the fan-out.
#[tokio::test]
async fn test_dispatch_failure_does_not_stop_fanout() {
    struct FlakyDispatcher {
        inner: RecordingDispatcher,
    }

    #[async_trait]
    impl SmsDispatcher for FlakyDispatcher {
        async fn send(&self, number: &str, body: &str) -> SafelineResult<()> {
            if number.ends_with('1') {
                return Err(safeline::SafelineError::Dispatch(
                    "carrier rejected".to_string(),
                ));
            }
            self.inner.send(number, body).await
        }
    }

    let temp_dir = TempDir::new().unwrap();
    let options = SafelineOptions {
        home_dir: temp_dir.path().to_path_buf(),
        ..Default::default()
    };
    let dispatcher = Arc::new(FlakyDispatcher {
        inner: RecordingDispatcher::default(),
    });
    let runtime = SafelineRuntime::with_timings(
        options,
        Arc::new(RecordingFeedback::default()),
        dispatcher.clone(),
        fast_timings(),
    )
    .unwrap();

    runtime.store().add("Alice", "9000000001").unwrap();
    runtime.store().add("Bob", "9000000002").unwrap();

    runtime.sos().press();
    wait_for_phase(runtime.sos(), SosPhase::Activated, Duration::from_secs(2)).await;
    wait_for_sends(&dispatcher.inner, 1, Duration::from_secs(2)).await;

    // Bob's message got through even though Alice's failed; the session
    // still shows activated.
    let sent = dispatcher.inner.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+919000000002");
    assert_eq!(runtime.sos().phase(), SosPhase::Activated);
}
