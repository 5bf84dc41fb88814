//! Completion parsing: find the three marker-delimited segments.
//!
//! The model is told to answer with
//!
//! ```text
//! --html--  <markup>  --html--
//! --css--   <style>   --css--
//! --js--    <script>  --js--
//! ```
//!
//! and nothing guarantees it did. The scanner walks the completion once,
//! left to right, with a cursor:
//!
//! 1. find the segment's marker at or after the cursor (opening),
//! 2. find the same marker again after the opening (closing),
//! 3. take the trimmed text in between, move the cursor past the closing.
//!
//! Because the search for a segment starts after the previous segment's
//! closing marker, a `--css--` or `--js--` that appears *inside* the markup
//! body is never mistaken for a delimiter. A marker of the same kind inside
//! its own segment still ends that segment early; the protocol has no
//! escaping, so there is nothing better to do.
//!
//! Any missing marker or whitespace-only segment fails the whole parse.

use crate::error::ParseError;
use crate::output::{SegmentKind, SiteSegments};
use tracing::debug;

/// Split a raw completion into markup, style and script.
pub fn parse_segments(completion: &str) -> Result<SiteSegments, ParseError> {
    let mut cursor = 0usize;
    let mut found: [String; 3] = Default::default();

    for (slot, kind) in SegmentKind::ALL.into_iter().enumerate() {
        let (body, next) = scan_segment(completion, cursor, kind)?;
        found[slot] = body.to_string();
        cursor = next;
    }

    let [html, css, js] = found;
    debug!(
        "Parsed segments: html {} bytes, css {} bytes, js {} bytes",
        html.len(),
        css.len(),
        js.len()
    );
    Ok(SiteSegments { html, css, js })
}

/// Locate one segment starting at `from`.
///
/// Returns the trimmed body and the byte offset just past its closing marker.
fn scan_segment(
    text: &str,
    from: usize,
    kind: SegmentKind,
) -> Result<(&str, usize), ParseError> {
    let marker = kind.marker();

    let open = text[from..]
        .find(marker)
        .map(|i| from + i)
        .ok_or(ParseError::MissingOpening(kind))?;
    let body_start = open + marker.len();

    let close = text[body_start..]
        .find(marker)
        .map(|i| body_start + i)
        .ok_or(ParseError::MissingClosing(kind))?;

    let body = text[body_start..close].trim();
    if body.is_empty() {
        return Err(ParseError::EmptySegment(kind));
    }

    Ok((body, close + marker.len()))
}
