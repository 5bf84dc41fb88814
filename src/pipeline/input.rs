//! Input resolution: turn a user-supplied path or URL into an uploaded document.
//!
//! Both routes end the same way: the declared name goes through the
//! `.pdf` / `.docx` allow-list and the bytes are checked against the format's
//! magic signature, so a renamed file fails here with a clear message rather
//! than deep inside a document parser.

use crate::document::UploadedDocument;
use crate::error::SiteGenError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to an in-memory document.
///
/// If the input is a URL, download it. If the input is a local file,
/// validate it exists and is readable.
pub async fn resolve_input(
    input: &str,
    timeout_secs: u64,
) -> Result<UploadedDocument, SiteGenError> {
    let doc = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    doc.verify_magic()?;
    Ok(doc)
}

/// Read a local file after the allow-list check.
async fn read_local(path_str: &str) -> Result<UploadedDocument, SiteGenError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(SiteGenError::FileNotFound { path });
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path_str.to_string());

    // Reject by extension before touching the content.
    let mut doc = UploadedDocument::from_bytes(name, Vec::new())?;

    doc.bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(SiteGenError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(SiteGenError::FileNotFound { path });
        }
    };

    debug!(
        "Resolved local {} resume: {} ({} bytes)",
        doc.format,
        path.display(),
        doc.bytes.len()
    );
    Ok(doc)
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<UploadedDocument, SiteGenError> {
    info!("Downloading resume from: {}", url);

    let filename = extract_filename(url).ok_or_else(|| SiteGenError::UnsupportedFormat {
        name: url.to_string(),
    })?;
    let mut doc = UploadedDocument::from_bytes(filename, Vec::new())?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SiteGenError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            SiteGenError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            SiteGenError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(SiteGenError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SiteGenError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    doc.bytes = bytes.to_vec();

    info!("Downloaded {} ({} bytes)", doc.name, doc.bytes.len());
    Ok(doc)
}

/// Last non-empty path segment of the URL, if it has an extension.
fn extract_filename(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if !last.is_empty() && last.contains('.') {
        Some(last.to_string())
    } else {
        None
    }
}
