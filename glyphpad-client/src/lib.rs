//! # Glyphpad Client
//!
//! Submission lifecycle for the Glyphpad sketch pad.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              glyphpad-client                 │
//! ├──────────────────────────────────────────────┤
//! │  SketchSession                               │
//! │  - owns StrokeSurface + SubmissionController │
//! │  - clear() resets raster AND result          │
//! ├──────────────────────────────────────────────┤
//! │  SubmissionController │  Classifier trait    │
//! │  - at most one        │  - HttpClassifier    │
//! │    in-flight request  │    (multipart POST)  │
//! │  - watch-published    │  - test mocks        │
//! │    state              │                      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! One submission is in flight at most; its terminal transition is either
//! applied or, if the session was cleared meanwhile, discarded as stale.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod error;
pub mod session;
pub mod transport;

pub use controller::{SubmissionController, SubmissionState, SubmitOutcome};
pub use error::{SubmitError, SubmitResult};
pub use session::SketchSession;
pub use transport::{Classification, Classifier, ConfidenceBand, HttpClassifier};

/// Glyphpad client version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
