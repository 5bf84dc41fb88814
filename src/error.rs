//! Error types for the resume2site library.
//!
//! Two error types reflect two layers of failure:
//!
//! * [`SiteGenError`] — **Fatal** for the current generation: bad input,
//!   unreadable document, provider failure, unparseable completion. Returned
//!   as `Err(SiteGenError)` from every top-level `generate*` function. Every
//!   failure is terminal for the current action; nothing is retried.
//!
//! * [`ParseError`] — the tagged reason the model's completion could not be
//!   split into three segments. Carried inside [`SiteGenError::Parse`] so the
//!   caller can tell *which* marker pair was missing.
//!
//! [`SiteGenError::kind`] collapses the variants into the handful of
//! user-facing categories the front end reports on.

use crate::output::SegmentKind;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the resume2site library.
#[derive(Debug, Error)]
pub enum SiteGenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Resume file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The declared extension is not on the allow-list.
    #[error("Unsupported resume format '{name}': only .pdf and .docx are accepted")]
    UnsupportedFormat { name: String },

    /// The extension says one format but the bytes say another.
    #[error("'{name}' is not a valid {expected} file\nFirst bytes: {magic:?}")]
    FormatMismatch {
        name: String,
        expected: &'static str,
        magic: Vec<u8>,
    },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The document parser rejected the file (corrupt, encrypted, …).
    #[error("Error reading file '{name}': {detail}")]
    ExtractionFailed { name: String, detail: String },

    /// The document parsed but contains no text to build a site from.
    #[error("No text could be extracted from '{name}'\nScanned or image-only resumes are not supported.")]
    EmptyDocument { name: String },

    // ── Generation errors ─────────────────────────────────────────────────
    /// The API key environment variable is not set.
    #[error("API key missing: environment variable '{var}' is not set.\nAdd it to your environment or a .env file.")]
    ApiKeyMissing { var: String },

    /// The configured provider could not be constructed.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Any failure of the model call. Auth, quota and network failures all
    /// land here.
    #[error("An error occurred while generating the website: {message}")]
    GenerationFailed { message: String },

    // ── Parsing errors ────────────────────────────────────────────────────
    /// The completion lacks the required delimiter structure.
    #[error("AI parsing error: the model didn't format the code correctly ({0}). Please try again.")]
    Parse(#[from] ParseError),

    // ── Packaging / I/O errors ────────────────────────────────────────────
    /// Writing the in-memory ZIP archive failed.
    #[error("Failed to build website archive: {0}")]
    Archive(String),

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// User-facing category of a [`SiteGenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Extraction,
    Generation,
    Parsing,
    Packaging,
    Config,
    Internal,
}

impl SiteGenError {
    /// Category used by front ends to pick a message style.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SiteGenError::FileNotFound { .. }
            | SiteGenError::PermissionDenied { .. }
            | SiteGenError::UnsupportedFormat { .. }
            | SiteGenError::FormatMismatch { .. }
            | SiteGenError::DownloadFailed { .. }
            | SiteGenError::DownloadTimeout { .. } => ErrorKind::Input,
            SiteGenError::ExtractionFailed { .. } | SiteGenError::EmptyDocument { .. } => {
                ErrorKind::Extraction
            }
            SiteGenError::ApiKeyMissing { .. }
            | SiteGenError::ProviderNotConfigured { .. }
            | SiteGenError::InvalidConfig(_) => ErrorKind::Config,
            SiteGenError::GenerationFailed { .. } => ErrorKind::Generation,
            SiteGenError::Parse(_) => ErrorKind::Parsing,
            SiteGenError::Archive(_) | SiteGenError::OutputWriteFailed { .. } => {
                ErrorKind::Packaging
            }
            SiteGenError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Why a completion could not be split into three segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The opening marker of a segment never appears after the previous segment.
    #[error("missing opening {} marker", .0.marker())]
    MissingOpening(SegmentKind),

    /// The opening marker appears but is never closed.
    #[error("missing closing {} marker", .0.marker())]
    MissingClosing(SegmentKind),

    /// The markers are present but enclose only whitespace.
    #[error("empty {} segment", .0.label())]
    EmptySegment(SegmentKind),
}
