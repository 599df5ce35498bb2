//! Error types for the submission side.

use thiserror::Error;

/// Result type for submission operations.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Errors a single submission attempt can fail with.
///
/// All variants are local to one attempt: none of them corrupt the surface
/// or prevent a later retry. The controller collapses every variant into
/// the generic `Failed` state and logs the cause.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The classifier endpoint URL is malformed.
    #[error("invalid classifier endpoint: {0}")]
    InvalidUrl(String),

    /// The raster snapshot could not be encoded.
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] glyphpad_core::SurfaceError),

    /// HTTP layer failed (connection, timeout, request build).
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The classifier answered with a non-success status.
    #[error("classifier returned HTTP {0}")]
    Status(u16),

    /// The response body was missing required fields or had wrong types.
    ///
    /// Indistinguishable in effect from a transport failure: the client
    /// cannot tell a malformed server from a malformed network layer.
    #[error("malformed classifier response: {0}")]
    Protocol(String),
}
