//! # resume2site
//!
//! Turn a resume (PDF or DOCX) into a personal portfolio website with a
//! Large Language Model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! resume.pdf / resume.docx
//!  │
//!  ├─ 1. Input    resolve local file or download from URL, check format
//!  ├─ 2. Extract  PDF pages / DOCX paragraphs → plain text
//!  ├─ 3. Prompt   embed the text in the fixed site-building instructions
//!  ├─ 4. LLM      one call to gemini-2.5-flash (or any edgequake-llm provider)
//!  ├─ 5. Parse    split the answer on --html-- / --css-- / --js-- markers
//!  └─ 6. Package  my_portfolio.zip (index.html, style.css, script.js)
//!                 + a single-file preview with style and script inlined
//! ```
//!
//! Every run is single-shot: any failure stops it with a [`SiteGenError`]
//! and nothing is retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume2site::{generate, GenerationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY from the environment.
//!     let config = GenerationConfig::default();
//!     let site = generate("resume.pdf", &config).await?;
//!     std::fs::write("my_portfolio.zip", &site.archive)?;
//!     std::fs::write("preview.html", &site.preview)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Keeping results between runs
//!
//! Interactive front ends hold a [`Session`] per user. It keeps the latest
//! successful result and is only overwritten by the next success.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume2site` binary (clap + anyhow + tracing-subscriber + indicatif + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder};
pub use document::{DocumentFormat, UploadedDocument};
pub use error::{ErrorKind, ParseError, SiteGenError};
pub use generate::{
    generate, generate_from_bytes, generate_from_document, generate_sync, generate_to_dir,
    inspect, write_atomic, ARCHIVE_FILE_NAME, PREVIEW_FILE_NAME,
};
pub use output::{GenerationStats, PackagedResult, SegmentKind, SiteSegments};
pub use pipeline::extract::extract;
pub use pipeline::llm::{Completion, CompletionBackend, LlmBackend};
pub use pipeline::package::{build_archive, build_preview};
pub use pipeline::parse::parse_segments;
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
pub use prompts::build_prompt;
pub use session::Session;
