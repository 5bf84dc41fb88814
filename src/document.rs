//! Uploaded resume documents and the format allow-list.
//!
//! The format is decided by the declared file extension alone, and only
//! `.pdf` and `.docx` are accepted. Extraction is never attempted on anything
//! else, so the extractor can assume its input format is one it understands.

use crate::error::SiteGenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Resume formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Every accepted format; the extension allow-list is derived from it.
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Pdf, DocumentFormat::Docx];

    /// Map a file name to a format using the extension allow-list
    /// (case-insensitive). Returns `None` for anything not on the list.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Leading bytes every well-formed file of this format starts with.
    ///
    /// DOCX is a ZIP container, so its signature is the local file header.
    pub fn magic(self) -> &'static [u8] {
        match self {
            DocumentFormat::Pdf => b"%PDF",
            DocumentFormat::Docx => b"PK\x03\x04",
        }
    }

    /// Lower-case extension accepted for this format.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
            DocumentFormat::Docx => f.write_str("DOCX"),
        }
    }
}

/// Raw resume bytes plus the declared format.
///
/// Consumed once by [`crate::pipeline::extract`].
#[derive(Clone)]
pub struct UploadedDocument {
    /// Original file name, used for messages and format detection.
    pub name: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedDocument")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

impl UploadedDocument {
    /// Build a document from in-memory bytes, applying the extension
    /// allow-list to `name`.
    ///
    /// The magic bytes are not checked here; see [`Self::verify_magic`].
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, SiteGenError> {
        let name = name.into();
        let format = DocumentFormat::from_name(&name)
            .ok_or_else(|| SiteGenError::UnsupportedFormat { name: name.clone() })?;
        Ok(Self {
            name,
            format,
            bytes,
        })
    }

    /// Check that the content starts with the signature of the declared format.
    ///
    /// Files shorter than the signature are let through; the extractor will
    /// reject them with a proper parse error.
    pub fn verify_magic(&self) -> Result<(), SiteGenError> {
        let magic = self.format.magic();
        if self.bytes.len() >= magic.len() && !self.bytes.starts_with(magic) {
            return Err(SiteGenError::FormatMismatch {
                name: self.name.clone(),
                expected: match self.format {
                    DocumentFormat::Pdf => "PDF",
                    DocumentFormat::Docx => "DOCX",
                },
                magic: self.bytes[..magic.len()].to_vec(),
            });
        }
        Ok(())
    }
}
