//! Text extraction: uploaded PDF / DOCX bytes → plain resume text.
//!
//! Both parsers are pure Rust (`pdf-extract`, `docx-rs`), so no system
//! libraries are needed. They are also CPU-bound, which is why
//! [`extract_text`] hops onto the blocking pool.
//!
//! ## Absent vs. empty
//!
//! [`extract`] returns `None` when the document could not be parsed and
//! `Some("")` when it parsed but holds no text. Callers rely on that
//! distinction: the first is an error worth reporting, the second just means
//! there is nothing to send to the model.

use crate::document::{DocumentFormat, UploadedDocument};
use crate::error::SiteGenError;
use tracing::{debug, error, info, warn};

/// Extract text, reporting any failure and returning `None` instead of an error.
///
/// The failure is logged at `ERROR` level with the same message the
/// pipeline would surface to the user.
pub async fn extract(doc: &UploadedDocument) -> Option<String> {
    match extract_text(doc).await {
        Ok(text) => Some(text),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

/// Extract text from an uploaded document on the blocking thread pool.
pub async fn extract_text(doc: &UploadedDocument) -> Result<String, SiteGenError> {
    let name = doc.name.clone();
    let format = doc.format;
    let bytes = doc.bytes.clone();

    tokio::task::spawn_blocking(move || extract_blocking(&name, format, &bytes))
        .await
        .map_err(|e| SiteGenError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Synchronous extraction, dispatching on the declared format.
pub fn extract_blocking(
    name: &str,
    format: DocumentFormat,
    bytes: &[u8],
) -> Result<String, SiteGenError> {
    info!("Extracting text from {} resume '{}'", format, name);
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
    }
    .map_err(|detail| {
        warn!("Extraction failed for '{}': {}", name, detail);
        SiteGenError::ExtractionFailed {
            name: name.to_string(),
            detail,
        }
    })?;
    debug!("Extracted {} chars from '{}'", text.chars().count(), name);
    Ok(text)
}

/// Concatenate per-page text in page order.
///
/// `pdf-extract` can panic on malformed fonts, so the call is wrapped in
/// `catch_unwind` and a panic is reported like any other parse error.
fn extract_pdf(bytes: &[u8]) -> Result<String, String> {
    let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return Err(format!("PDF extraction failed: {}", e)),
        Err(_panic) => {
            return Err("PDF extraction panicked - likely contains malformed fonts".to_string())
        }
    };

    debug!("PDF has {} pages", pages.len());
    // A page without text comes back as an empty string and contributes nothing.
    Ok(pages.concat())
}

/// Concatenate top-level body paragraphs, each followed by a newline.
///
/// `docx-rs` unwraps zip read errors internally, so a corrupt entry panics
/// instead of returning an error. The panic is caught like the PDF path's.
fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let doc = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        docx_rs::read_docx(bytes)
    })) {
        Ok(Ok(doc)) => doc,
        Ok(Err(e)) => return Err(format!("Failed to parse DOCX: {}", e)),
        Err(_panic) => {
            return Err("DOCX extraction panicked - the archive is likely corrupt".to_string())
        }
    };

    let mut text = String::new();
    let mut paragraphs = 0usize;
    for child in &doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(para) = child {
            push_paragraph_text(para, &mut text);
            text.push('\n');
            paragraphs += 1;
        }
    }

    debug!("DOCX has {} body paragraphs", paragraphs);
    Ok(text)
}

fn push_paragraph_text(para: &docx_rs::Paragraph, out: &mut String) {
    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run_text(run, out),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = inner {
                        push_run_text(run, out);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &docx_rs::Run, out: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(t) => out.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => out.push('\t'),
            docx_rs::RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
