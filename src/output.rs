//! Result types produced by a generation run.
//!
//! A run ends in exactly one [`PackagedResult`]: the ZIP archive bytes, the
//! self-contained preview document, the three [`SiteSegments`] they were
//! built from, and the [`GenerationStats`] of the run. A result only exists
//! when all three segments were parsed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three files the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// `index.html`
    Markup,
    /// `style.css`
    Style,
    /// `script.js`
    Script,
}

impl SegmentKind {
    /// All segments in the order the model must emit them.
    pub const ALL: [SegmentKind; 3] = [
        SegmentKind::Markup,
        SegmentKind::Style,
        SegmentKind::Script,
    ];

    /// Literal delimiter marker bounding this segment in the completion.
    pub fn marker(self) -> &'static str {
        match self {
            SegmentKind::Markup => "--html--",
            SegmentKind::Style => "--css--",
            SegmentKind::Script => "--js--",
        }
    }

    /// File name of this segment inside the archive.
    pub fn file_name(self) -> &'static str {
        match self {
            SegmentKind::Markup => "index.html",
            SegmentKind::Style => "style.css",
            SegmentKind::Script => "script.js",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SegmentKind::Markup => "markup",
            SegmentKind::Style => "style",
            SegmentKind::Script => "script",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three trimmed, non-empty segments parsed from a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSegments {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl SiteSegments {
    /// Borrow the segment of the given kind.
    pub fn get(&self, kind: SegmentKind) -> &str {
        match kind {
            SegmentKind::Markup => &self.html,
            SegmentKind::Style => &self.css,
            SegmentKind::Script => &self.js,
        }
    }
}

/// Timing and size figures for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Characters of resume text sent to the model.
    pub extracted_chars: usize,
    /// Tokens in the prompt, as reported by the provider (0 if unknown).
    pub prompt_tokens: usize,
    /// Tokens in the completion, as reported by the provider (0 if unknown).
    pub completion_tokens: usize,
    /// Size of the raw completion in bytes.
    pub completion_bytes: usize,
    /// Size of the ZIP archive in bytes.
    pub archive_bytes: usize,
    pub extract_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub parse_duration_ms: u64,
    pub package_duration_ms: u64,
    /// Wall time from extraction start to packaged result.
    pub total_duration_ms: u64,
}

/// Archive and preview for one successful generation.
///
/// Held by [`crate::session::Session`] and replaced wholesale on each
/// successful regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagedResult {
    /// ZIP bytes with `index.html`, `style.css`, `script.js`.
    #[serde(skip)]
    pub archive: Vec<u8>,
    /// Single-document preview with style and script inlined.
    pub preview: String,
    pub segments: SiteSegments,
    pub stats: GenerationStats,
}
