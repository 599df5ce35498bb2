//! # Glyphpad Core
//!
//! Stroke capture for a free-hand glyph sketch pad.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               glyphpad-core                  │
//! ├──────────────────────────────────────────────┤
//! │  StrokeSurface    │  Pointer events          │
//! │  - Raster (owned) │  - Down / Move / Up      │
//! │  - Stroke machine │  - Out-of-order absorbed │
//! │  - Snapshots      │                          │
//! ├──────────────────────────────────────────────┤
//! │  Alphabet (24 Greek letters, display only)   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The raster is owned exclusively by [`StrokeSurface`]; everything that
//! leaves this crate is an immutable encoded [`Snapshot`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alphabet;
pub mod error;
pub mod event;
mod raster;
pub mod surface;

pub use alphabet::{GlyphEntry, ALPHABET};
pub use error::{SurfaceError, SurfaceResult};
pub use event::{PointerEvent, PointerPhase};
pub use raster::{Color, SnapshotFormat, BLACK, WHITE};
pub use surface::{Snapshot, StrokeStyle, StrokeSurface, SURFACE_SIZE};

/// Glyphpad core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
