//! Error types for the quire library.

use std::io;
use thiserror::Error;

/// Result type alias for quire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during export.
///
/// Citation formatting and markup parsing never produce errors; they degrade
/// to deterministic fallbacks instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when writing an export.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON input (document source or options).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested output format is not one of pdf, docx, tex.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The document source violates its content invariant.
    #[error("Invalid document source: {0}")]
    InvalidSource(String),

    /// An output encoder failed.
    #[error("Rendering error: {0}")]
    Render(String),

    /// BibTeX input could not be parsed.
    #[error("Failed to parse BibTeX. Please check the format. ({0})")]
    BibTex(String),

    /// The DOI string is empty after removing resolver prefixes.
    #[error("Invalid DOI format")]
    InvalidDoi,

    /// The DOI resolver answered 404.
    #[error("DOI not found")]
    DoiNotFound,

    /// The DOI resolver answered with another non-success status.
    #[error("Failed to fetch DOI: {0} {1}")]
    DoiHttp(u16, String),

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Render(format!("PDF encoding: {}", err)),
        }
    }
}
