//! Error types for surface operations.

use thiserror::Error;

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors that can occur while operating the stroke surface.
///
/// Out-of-order pointer input is not an error: the surface absorbs it as a
/// no-op. The only fallible operation is snapshot encoding.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The raster could not be serialized into the requested encoding.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] image::ImageError),
}
