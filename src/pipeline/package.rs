//! Packaging: three segments → ZIP archive + self-contained preview.
//!
//! The archive holds the segments exactly as parsed, one file each. The
//! preview is a single HTML document with the stylesheet and script inlined
//! so it can be shown without the two companion files.

use crate::error::SiteGenError;
use crate::output::{PackagedResult, SegmentKind, SiteSegments};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Archive plus preview for a set of segments.
///
/// Stats are left at their defaults apart from `archive_bytes`; the caller
/// fills in timing and token figures.
pub fn package(segments: SiteSegments) -> Result<PackagedResult, SiteGenError> {
    let archive = build_archive(&segments)?;
    let preview = build_preview(&segments);
    let mut result = PackagedResult {
        archive,
        preview,
        segments,
        stats: Default::default(),
    };
    result.stats.archive_bytes = result.archive.len();
    Ok(result)
}

/// Write `index.html`, `style.css`, `script.js` into an in-memory ZIP.
pub fn build_archive(segments: &SiteSegments) -> Result<Vec<u8>, SiteGenError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for kind in SegmentKind::ALL {
        zip.start_file(kind.file_name(), options)
            .map_err(|e| SiteGenError::Archive(format!("{}: {}", kind.file_name(), e)))?;
        zip.write_all(segments.get(kind).as_bytes())
            .map_err(|e| SiteGenError::Archive(format!("{}: {}", kind.file_name(), e)))?;
    }

    let bytes = zip
        .finish()
        .map_err(|e| SiteGenError::Archive(e.to_string()))?
        .into_inner();
    debug!("Built archive ({} bytes)", bytes.len());
    Ok(bytes)
}

static RE_HEAD_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</head\s*>").unwrap());
static RE_BODY_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</body\s*>").unwrap());

/// Inline the style and script segments into the markup.
///
/// When the markup has a `</head>` and a `</body>`, the `<style>` block goes
/// right before the first `</head>` and the `<script>` block right before the
/// last `</body>`. Otherwise the markup is wrapped in a minimal document
/// shell. The markup is never validated or rewritten beyond that.
pub fn build_preview(segments: &SiteSegments) -> String {
    let style = format!("<style>{}</style>", segments.css);
    let script = format!("<script>{}</script>", segments.js);
    let html = segments.html.as_str();

    let head = RE_HEAD_CLOSE.find(html);
    let body = RE_BODY_CLOSE.find_iter(html).last();

    match (head, body) {
        (Some(h), Some(b)) if h.start() < b.start() => {
            let mut out = String::with_capacity(html.len() + style.len() + script.len());
            out.push_str(&html[..h.start()]);
            out.push_str(&style);
            out.push_str(&html[h.start()..b.start()]);
            out.push_str(&script);
            out.push_str(&html[b.start()..]);
            out
        }
        _ => format!(
            "<html>\n<head>{style}</head>\n<body>\n{html}\n{script}\n</body>\n</html>\n"
        ),
    }
}
