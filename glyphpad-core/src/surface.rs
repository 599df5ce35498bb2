//! Stroke capture onto a persistent raster.

use serde::{Deserialize, Serialize};

use crate::error::SurfaceResult;
use crate::event::{PointerEvent, PointerPhase};
use crate::raster::{Color, Raster, SnapshotFormat, BLACK, WHITE};

/// Edge length of the square drawing surface, in logical units.
pub const SURFACE_SIZE: u32 = 400;

/// Rendering parameters applied to every stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Stroke width in logical units.
    pub width: f32,
    /// Ink color strokes are drawn with.
    pub ink: Color,
    /// Background fill the surface is initialized and cleared to.
    pub background: Color,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 10.0,
            ink: BLACK,
            background: WHITE,
        }
    }
}

/// An immutable encoded copy of the raster at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    format: SnapshotFormat,
    bytes: Vec<u8>,
}

impl Snapshot {
    /// The encoding this snapshot was produced in.
    #[must_use]
    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    /// The encoded image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the snapshot, yielding the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// The stroke-capture engine.
///
/// Owns the raster exclusively and converts pointer events into committed
/// pixels. Consumers never see the raster itself, only encoded
/// [`Snapshot`]s.
///
/// The surface is a two-state machine: no stroke active, or one stroke
/// active. Events that do not fit the current state (a second down, a move
/// or up with no stroke active) are absorbed as no-ops so that out-of-order
/// input can never corrupt render state.
#[derive(Debug, Clone)]
pub struct StrokeSurface {
    raster: Raster,
    style: StrokeStyle,
    /// Last committed point of the active stroke, if one is active.
    cursor: Option<(f32, f32)>,
}

impl StrokeSurface {
    /// Create a blank surface with the default style.
    ///
    /// Allocates the raster and fills it with the background color; the
    /// visible effect is a blank canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::with_style(StrokeStyle::default())
    }

    /// Create a blank surface with a custom stroke style.
    #[must_use]
    pub fn with_style(style: StrokeStyle) -> Self {
        Self {
            raster: Raster::new(SURFACE_SIZE, SURFACE_SIZE, style.background),
            style,
            cursor: None,
        }
    }

    /// The stroke style this surface renders with.
    #[must_use]
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Surface width in logical units.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Surface height in logical units.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Whether a stroke is currently active.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.cursor.is_some()
    }

    /// Start a stroke at the given point.
    ///
    /// Renders the round cap immediately, so a stroke that never moves
    /// still leaves a dot. No-op if a stroke is already active.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        if self.cursor.is_some() {
            tracing::debug!("begin_stroke ignored: stroke already active");
            return;
        }
        self.raster.stamp_disc(x, y, self.radius(), self.style.ink);
        self.cursor = Some((x, y));
    }

    /// Extend the active stroke to the given point.
    ///
    /// Commits the segment into the raster immediately (incremental
    /// rendering, not batched). No-op if no stroke is active, which covers
    /// pointer-move events received outside a down/up bracket.
    pub fn extend_stroke(&mut self, x: f32, y: f32) {
        let Some((last_x, last_y)) = self.cursor else {
            return;
        };
        self.raster
            .draw_segment(last_x, last_y, x, y, self.radius(), self.style.ink);
        self.cursor = Some((x, y));
    }

    /// Close the active stroke. Idempotent.
    pub fn end_stroke(&mut self) {
        self.cursor = None;
    }

    /// Reset the raster to the background fill, discarding all strokes.
    ///
    /// Any active stroke is abandoned as well. Clearing the published
    /// classification result is the session's responsibility, not the
    /// surface's.
    pub fn clear(&mut self) {
        self.raster.clear();
        self.cursor = None;
        tracing::debug!("surface cleared");
    }

    /// Produce an immutable encoded copy of the pixels committed so far.
    ///
    /// Reflects exactly the raster at call time; it does not wait for an
    /// active stroke to finish. Callers wanting a quiescent image should
    /// check [`is_drawing`](Self::is_drawing) first.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Encode`](crate::SurfaceError::Encode) if the
    /// raster cannot be serialized into `format`.
    pub fn snapshot(&self, format: SnapshotFormat) -> SurfaceResult<Snapshot> {
        let bytes = self.raster.encode(format)?;
        Ok(Snapshot { format, bytes })
    }

    /// Apply a typed pointer event to the stroke state machine.
    pub fn handle_event(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Down => self.begin_stroke(event.x, event.y),
            PointerPhase::Move => self.extend_stroke(event.x, event.y),
            PointerPhase::Up => self.end_stroke(),
        }
    }

    fn radius(&self) -> f32 {
        self.style.width / 2.0
    }
}

impl Default for StrokeSurface {
    fn default() -> Self {
        Self::new()
    }
}
