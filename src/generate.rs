//! Generation entry points.
//!
//! Every entry point runs the same strictly linear pipeline once:
//!
//! ```text
//! document ─▶ extract ─▶ build_prompt ─▶ complete ─▶ parse ─▶ package
//! ```
//!
//! Each stage either hands its output to the next or stops the run with a
//! [`SiteGenError`]. Nothing is retried and no stage feeds back into an
//! earlier one. Extraction failures stop the run before any network call.

use crate::config::GenerationConfig;
use crate::document::UploadedDocument;
use crate::error::SiteGenError;
use crate::output::PackagedResult;
use crate::pipeline::llm::CompletionBackend;
use crate::pipeline::{extract, input, llm, package, parse};
use crate::progress::Stage;
use crate::prompts::build_prompt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// File name of the downloadable archive.
pub const ARCHIVE_FILE_NAME: &str = "my_portfolio.zip";

/// File name of the preview document written next to the archive.
pub const PREVIEW_FILE_NAME: &str = "preview.html";

/// Generate a website from a resume file path or URL.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - Input: file not found, unsupported extension, wrong magic bytes
/// - Config: API key variable missing, provider cannot be built
/// - Extraction: the document could not be parsed or holds no text
/// - Generation: the model call failed (one generic error)
/// - Parsing: the completion lacks the marker structure
pub async fn generate(
    input_str: impl AsRef<str>,
    config: &GenerationConfig,
) -> Result<PackagedResult, SiteGenError> {
    let input_str = input_str.as_ref();
    info!("Starting generation: {}", input_str);

    // The key check happens before any download or parsing work.
    let backend = llm::resolve_backend(config)?;
    let doc = input::resolve_input(input_str, config.download_timeout_secs).await?;
    run_pipeline(&backend, doc, config).await
}

/// Generate a website from an already-uploaded document.
pub async fn generate_from_document(
    doc: UploadedDocument,
    config: &GenerationConfig,
) -> Result<PackagedResult, SiteGenError> {
    let backend = llm::resolve_backend(config)?;
    doc.verify_magic()?;
    run_pipeline(&backend, doc, config).await
}

/// Generate a website from resume bytes held in memory.
///
/// `name` is the declared file name; its extension selects the format.
///
/// # Example
/// ```rust,no_run
/// use resume2site::{generate_from_bytes, GenerationConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("resume.pdf")?;
/// let site = generate_from_bytes("resume.pdf", bytes, &GenerationConfig::default()).await?;
/// std::fs::write("my_portfolio.zip", &site.archive)?;
/// # Ok(())
/// # }
/// ```
pub async fn generate_from_bytes(
    name: impl Into<String>,
    bytes: Vec<u8>,
    config: &GenerationConfig,
) -> Result<PackagedResult, SiteGenError> {
    let doc = UploadedDocument::from_bytes(name, bytes)?;
    generate_from_document(doc, config).await
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    input_str: impl AsRef<str>,
    config: &GenerationConfig,
) -> Result<PackagedResult, SiteGenError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SiteGenError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(input_str, config))
}

/// Generate and write `my_portfolio.zip` and `preview.html` into `out_dir`.
///
/// Both files are written atomically (temp file in the same directory, then
/// rename), so a failed run never leaves a half-written archive behind.
pub async fn generate_to_dir(
    input_str: impl AsRef<str>,
    out_dir: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<PackagedResult, SiteGenError> {
    let result = generate(input_str, config).await?;
    let out_dir = out_dir.as_ref();
    write_atomic(&out_dir.join(ARCHIVE_FILE_NAME), &result.archive).await?;
    write_atomic(&out_dir.join(PREVIEW_FILE_NAME), result.preview.as_bytes()).await?;
    Ok(result)
}

/// Extract the resume text without generating anything.
///
/// Does not require an LLM provider or API key.
pub async fn inspect(
    input_str: impl AsRef<str>,
    download_timeout_secs: u64,
) -> Result<String, SiteGenError> {
    let doc = input::resolve_input(input_str.as_ref(), download_timeout_secs).await?;
    extract::extract_text(&doc).await
}

/// Write `bytes` to `path` via a sibling temp file and rename.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SiteGenError> {
    let write_err = |source: std::io::Error| SiteGenError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent).await.map_err(write_err)?;

    let path_owned = path.to_path_buf();
    let bytes = bytes.to_vec();
    tokio::task::spawn_blocking(move || -> Result<(), std::io::Error> {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&bytes)?;
        tmp.persist(&path_owned).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| SiteGenError::Internal(format!("Write task panicked: {}", e)))?
    .map_err(write_err)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run extract → prompt → complete → parse → package for one document.
pub(crate) async fn run_pipeline(
    backend: &Arc<dyn CompletionBackend>,
    doc: UploadedDocument,
    config: &GenerationConfig,
) -> Result<PackagedResult, SiteGenError> {
    let total_start = Instant::now();

    // ── Step 1: Extract text ─────────────────────────────────────────────
    let extract_start = Instant::now();
    let text = observe(config, Stage::Extract, async {
        let text = extract::extract_text(&doc).await?;
        if text.trim().is_empty() {
            return Err(SiteGenError::EmptyDocument {
                name: doc.name.clone(),
            });
        }
        Ok(text)
    })
    .await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    drop(doc);

    // ── Step 2: Build prompt ─────────────────────────────────────────────
    let prompt = build_prompt(&text);

    // ── Step 3: Call the model ───────────────────────────────────────────
    let llm_start = Instant::now();
    let completion = observe(config, Stage::Generate, llm::generate(backend, &prompt)).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Step 4: Parse segments ───────────────────────────────────────────
    let parse_start = Instant::now();
    let segments = observe(config, Stage::Parse, async {
        parse::parse_segments(&completion.content).map_err(SiteGenError::from)
    })
    .await?;
    let parse_duration_ms = parse_start.elapsed().as_millis() as u64;

    // ── Step 5: Package ──────────────────────────────────────────────────
    let package_start = Instant::now();
    let mut result = observe(config, Stage::Package, async { package::package(segments) }).await?;
    let package_duration_ms = package_start.elapsed().as_millis() as u64;

    result.stats.extracted_chars = text.chars().count();
    result.stats.prompt_tokens = completion.prompt_tokens;
    result.stats.completion_tokens = completion.completion_tokens;
    result.stats.completion_bytes = completion.content.len();
    result.stats.extract_duration_ms = extract_duration_ms;
    result.stats.llm_duration_ms = llm_duration_ms;
    result.stats.parse_duration_ms = parse_duration_ms;
    result.stats.package_duration_ms = package_duration_ms;
    result.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Website generated: {} byte archive, {}ms total",
        result.stats.archive_bytes, result.stats.total_duration_ms
    );
    Ok(result)
}

/// Run one stage, reporting start/complete/error to the progress callback.
async fn observe<T, F>(config: &GenerationConfig, stage: Stage, fut: F) -> Result<T, SiteGenError>
where
    F: std::future::Future<Output = Result<T, SiteGenError>>,
{
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
    let start = Instant::now();
    let result = fut.await;
    match (&result, config.progress_callback.as_ref()) {
        (Ok(_), Some(cb)) => cb.on_stage_complete(stage, start.elapsed().as_millis() as u64),
        (Err(e), cb) => {
            warn!("Stage {:?} failed: {}", stage, e);
            if let Some(cb) = cb {
                cb.on_stage_error(stage, e.to_string());
            }
        }
        (Ok(_), None) => {}
    }
    result
}
