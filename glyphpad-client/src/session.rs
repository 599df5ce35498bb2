//! One sketch session: a surface and its submission controller.

use std::sync::Arc;

use tokio::sync::watch;

use glyphpad_core::{PointerEvent, StrokeStyle, StrokeSurface};

use crate::controller::{SubmissionController, SubmissionState, SubmitOutcome};
use crate::transport::Classifier;

/// The owned state object for one drawing screen.
///
/// Created when the screen mounts and dropped when it unmounts, a session
/// owns exactly one [`StrokeSurface`] and one [`SubmissionController`] and
/// wires their cross-component behavior together:
///
/// - pointer events are applied to the surface strictly in arrival order;
/// - [`clear`](Self::clear) resets the raster AND discards the published
///   result in one step;
/// - [`submit`](Self::submit) refuses while a stroke is active, so a
///   snapshot is only ever taken at a stroke-quiescent point.
#[derive(Debug)]
pub struct SketchSession {
    surface: StrokeSurface,
    controller: SubmissionController,
}

impl SketchSession {
    /// Create a session with a blank default-style surface.
    #[must_use]
    pub fn new(transport: Arc<dyn Classifier>) -> Self {
        Self::with_style(StrokeStyle::default(), transport)
    }

    /// Create a session with a custom stroke style.
    #[must_use]
    pub fn with_style(style: StrokeStyle, transport: Arc<dyn Classifier>) -> Self {
        Self {
            surface: StrokeSurface::with_style(style),
            controller: SubmissionController::new(transport),
        }
    }

    /// Apply one pointer event to the surface.
    pub fn pointer_event(&mut self, event: PointerEvent) {
        self.surface.handle_event(event);
    }

    /// Whether a stroke is currently being drawn.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.surface.is_drawing()
    }

    /// Read-only view of the surface (e.g. for saving a snapshot).
    #[must_use]
    pub fn surface(&self) -> &StrokeSurface {
        &self.surface
    }

    /// The current submission state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.controller.state()
    }

    /// Subscribe to submission state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.controller.subscribe()
    }

    /// Submit the current drawing for classification.
    ///
    /// Rejected while a stroke is active: the snapshot contract requires a
    /// stroke-quiescent surface, which the UI enforces by disabling the
    /// submit action mid-stroke.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.surface.is_drawing() {
            tracing::debug!("submit rejected: a stroke is still active");
            return SubmitOutcome::Rejected;
        }
        self.controller.submit(&self.surface).await
    }

    /// Clear the canvas: reset the raster to the background fill and
    /// discard any published classification result.
    ///
    /// An in-flight submission is not aborted, but its eventual result is
    /// discarded (it no longer corresponds to the visible drawing).
    pub fn clear(&mut self) {
        self.surface.clear();
        self.controller.reset();
        tracing::debug!("session cleared");
    }
}
