//! The submission lifecycle: one classification request at a time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use glyphpad_core::{SnapshotFormat, StrokeSurface};

use crate::transport::{Classification, Classifier};

/// Lifecycle state of the current submission.
///
/// Exactly one value exists per controller; submissions are never queued.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    /// No submission has run, or the last result was discarded.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last submission produced a classification.
    Succeeded(Classification),
    /// The last submission failed.
    ///
    /// Carries no cause: the user sees a generic failure indication and
    /// the cause goes to the log.
    Failed,
}

/// What a `submit` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submission ran and its terminal state was published.
    Completed,
    /// No request was dispatched (another submission was already pending,
    /// or a stroke was still active at the session level).
    Rejected,
    /// The request completed but the session was cleared while it was in
    /// flight, so the result was dropped.
    Discarded,
}

/// Drives one classification request at a time and publishes the outcome.
///
/// State is published on a watch channel so consumers can either poll
/// [`state`](Self::state) or [`subscribe`](Self::subscribe) for
/// transitions. All mutation happens on the single control thread; the
/// reentrancy guard in [`submit`](Self::submit) keeps at most one request
/// in flight.
pub struct SubmissionController {
    transport: Arc<dyn Classifier>,
    state: watch::Sender<SubmissionState>,
    /// Bumped by `reset`; in-flight submissions compare against it and
    /// discard their result if it moved (stale responses are dropped, not
    /// applied).
    generation: AtomicU64,
}

impl SubmissionController {
    /// Create an idle controller over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Classifier>) -> Self {
        Self {
            transport,
            state: watch::Sender::new(SubmissionState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    /// The current submission state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Whether a submission is currently in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(*self.state.borrow(), SubmissionState::Pending)
    }

    /// Submit the surface's current raster for classification.
    ///
    /// Rejected without dispatching anything if a submission is already
    /// pending. Otherwise takes a PNG snapshot, publishes `Pending`, awaits
    /// the transport, and publishes `Succeeded` or `Failed` - unless
    /// [`reset`](Self::reset) ran while the request was in flight, in which
    /// case the stale result is discarded and the state is left wherever
    /// `reset` put it.
    ///
    /// Every failure (encoding, transport, status, protocol) is local to
    /// this attempt: the surface is untouched and a later retry is allowed.
    pub async fn submit(&self, surface: &StrokeSurface) -> SubmitOutcome {
        if self.is_pending() {
            tracing::debug!("submit rejected: a submission is already pending");
            return SubmitOutcome::Rejected;
        }

        let generation = self.generation.load(Ordering::Acquire);
        let snapshot = match surface.snapshot(SnapshotFormat::Png) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!("snapshot encoding failed: {err}");
                self.state.send_replace(SubmissionState::Failed);
                return SubmitOutcome::Completed;
            }
        };

        self.state.send_replace(SubmissionState::Pending);
        let result = self.transport.classify(snapshot).await;

        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!("discarding stale result: controller was reset while pending");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(classification) => {
                tracing::debug!(
                    label = %classification.label,
                    confidence = classification.confidence,
                    "classification received"
                );
                self.state
                    .send_replace(SubmissionState::Succeeded(classification));
            }
            Err(err) => {
                tracing::warn!("submission failed: {err}");
                self.state.send_replace(SubmissionState::Failed);
            }
        }
        SubmitOutcome::Completed
    }

    /// Return to `Idle`, discarding any prior result.
    ///
    /// An in-flight request is not aborted, but its eventual result will be
    /// discarded rather than applied.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.state.send_replace(SubmissionState::Idle);
    }
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SubmitError, SubmitResult};
    use async_trait::async_trait;
    use glyphpad_core::Snapshot;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Mock transport returning scripted responses, optionally gated so a
    /// test can hold a request in flight.
    struct ScriptedClassifier {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        script: Mutex<VecDeque<SubmitResult<Classification>>>,
    }

    impl ScriptedClassifier {
        fn new(script: Vec<SubmitResult<Classification>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                script: Mutex::new(script.into()),
            }
        }

        fn gated(script: Vec<SubmitResult<Classification>>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(script)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Classifier for ScriptedClassifier {
        async fn classify(&self, _snapshot: Snapshot) -> SubmitResult<Classification> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.script
                .lock()
                .expect("script lock")
                .pop_front()
                .expect("script exhausted")
        }
    }

    fn alpha() -> Classification {
        Classification {
            label: "alpha".to_string(),
            confidence: 0.8734,
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let controller =
            SubmissionController::new(Arc::new(ScriptedClassifier::new(vec![])));
        assert_eq!(controller.state(), SubmissionState::Idle);
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_submit_publishes_result() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(alpha())]));
        let controller = SubmissionController::new(classifier.clone());
        let surface = StrokeSurface::new();

        let outcome = controller.submit(&surface).await;

        assert_eq!(outcome, SubmitOutcome::Completed);
        assert_eq!(controller.state(), SubmissionState::Succeeded(alpha()));
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_confidence_derivation() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(alpha())]));
        let controller = SubmissionController::new(classifier);
        controller.submit(&StrokeSurface::new()).await;

        let SubmissionState::Succeeded(result) = controller.state() else {
            panic!("expected Succeeded");
        };
        assert_eq!(result.label, "alpha");
        assert!((result.confidence - 0.8734).abs() < f32::EPSILON);
        assert!((result.confidence_percent() - 87.34).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_rejected() {
        let gate = Arc::new(Notify::new());
        let classifier = Arc::new(ScriptedClassifier::gated(vec![Ok(alpha())], gate.clone()));
        let controller = Arc::new(SubmissionController::new(classifier.clone()));

        let task = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.submit(&StrokeSurface::new()).await }
        });

        let mut rx = controller.subscribe();
        rx.wait_for(|s| *s == SubmissionState::Pending)
            .await
            .expect("pending");

        // Second submit while in flight: no-op, no second dispatch.
        let outcome = controller.submit(&StrokeSurface::new()).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(classifier.calls(), 1);
        assert!(controller.is_pending());

        gate.notify_one();
        assert_eq!(task.await.expect("join"), SubmitOutcome::Completed);
        assert_eq!(controller.state(), SubmissionState::Succeeded(alpha()));
    }

    #[tokio::test]
    async fn test_failure_then_retry_succeeds() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![
            Err(SubmitError::Status(500)),
            Ok(alpha()),
        ]));
        let controller = SubmissionController::new(classifier.clone());
        let surface = StrokeSurface::new();

        controller.submit(&surface).await;
        assert_eq!(controller.state(), SubmissionState::Failed);

        // No auto-retry happened; the retry is an explicit second call.
        assert_eq!(classifier.calls(), 1);

        controller.submit(&surface).await;
        assert_eq!(controller.state(), SubmissionState::Succeeded(alpha()));
        assert_eq!(classifier.calls(), 2);
    }

    #[tokio::test]
    async fn test_reset_discards_result() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(alpha())]));
        let controller = SubmissionController::new(classifier);
        controller.submit(&StrokeSurface::new()).await;
        assert!(matches!(controller.state(), SubmissionState::Succeeded(_)));

        controller.reset();
        assert_eq!(controller.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_reset_while_pending_discards_stale_response() {
        let gate = Arc::new(Notify::new());
        let classifier = Arc::new(ScriptedClassifier::gated(vec![Ok(alpha())], gate.clone()));
        let controller = Arc::new(SubmissionController::new(classifier));

        let task = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.submit(&StrokeSurface::new()).await }
        });

        let mut rx = controller.subscribe();
        rx.wait_for(|s| *s == SubmissionState::Pending)
            .await
            .expect("pending");

        controller.reset();
        assert_eq!(controller.state(), SubmissionState::Idle);

        // The in-flight response arrives after the reset and is dropped.
        gate.notify_one();
        assert_eq!(task.await.expect("join"), SubmitOutcome::Discarded);
        assert_eq!(controller.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let classifier = Arc::new(ScriptedClassifier::new(vec![Ok(alpha())]));
        let controller = SubmissionController::new(classifier);
        let mut rx = controller.subscribe();

        controller.submit(&StrokeSurface::new()).await;

        // The terminal state is visible to late observers.
        let final_state = rx
            .wait_for(|s| matches!(s, SubmissionState::Succeeded(_)))
            .await
            .expect("succeeded")
            .clone();
        assert_eq!(final_state, SubmissionState::Succeeded(alpha()));
    }
}
