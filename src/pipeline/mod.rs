//! Pipeline stages for resume-to-website generation.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable and the network-facing stage can be swapped for a
//! test double without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ prompt ──▶ llm ──▶ parse ──▶ package
//! (path/URL)  (text)   (template)  (model)  (3 segs)  (zip + preview)
//! ```
//!
//! 1. [`input`]   — resolve a path or URL to an [`crate::UploadedDocument`]
//! 2. [`extract`] — PDF pages / DOCX paragraphs → plain text; runs in
//!    `spawn_blocking` because the parsers are CPU-bound
//! 3. [`crate::prompts`] — embed the text into the fixed template
//! 4. [`llm`]     — one completion call; the only stage with network I/O
//! 5. [`parse`]   — scan the completion for the three marker pairs
//! 6. [`package`] — ZIP archive and inlined preview document

pub mod extract;
pub mod input;
pub mod llm;
pub mod package;
pub mod parse;
