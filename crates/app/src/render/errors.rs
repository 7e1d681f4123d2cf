//! Render Errors

use thiserror::Error;

/// Errors from the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The renderer returned a non-2xx response or unexpected body.
    #[error("unexpected response from renderer: {0}")]
    UnexpectedResponse(String),
}
