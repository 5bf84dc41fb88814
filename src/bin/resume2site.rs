//! CLI binary for resume2site.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GenerationConfig`, shows a busy spinner while the pipeline runs and
//! writes the archive and preview to disk.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resume2site::pipeline::llm::require_api_key;
use resume2site::{
    inspect, write_atomic, ErrorKind, GenerationConfig, GenerationProgressCallback,
    ProgressCallback, Session, SiteGenError, Stage, ARCHIVE_FILE_NAME,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Indeterminate spinner: one line per finished stage, the spinner message
/// names the stage in flight.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_message(format!("{stage}…"));
    }

    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        self.bar.println(format!(
            "  {} {:<52} {}",
            green("✓"),
            stage.to_string(),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
    }

    fn on_stage_error(&self, stage: Stage, _error: String) {
        self.bar.println(format!("  {} {}", red("✗"), stage));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate my_portfolio.zip in the current directory
  resume2site resume.pdf

  # Choose where the archive goes and also write a preview page
  resume2site resume.docx -o site/jane.zip --preview site/preview.html

  # Use a different model
  resume2site --model gemini-2.5-pro resume.pdf

  # Resume hosted online
  resume2site https://example.com/files/jane.pdf

  # Print the extracted resume text only (no API key needed)
  resume2site --inspect-only resume.pdf

  # Machine-readable run statistics
  resume2site --json resume.pdf > stats.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (required; a .env file is read too)
  RESUME2SITE_MODEL       Override model ID
  RESUME2SITE_PROVIDER    Override provider (gemini, openai, anthropic, ollama)
  RUST_LOG                Override log filter (e.g. resume2site=debug)
"#;

/// Turn a PDF or DOCX resume into a portfolio website using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "resume2site",
    version,
    about = "Turn a PDF or DOCX resume into a portfolio website using an LLM",
    long_about = "Extracts the text of a resume (PDF or Word .docx), asks a language model to \
write a responsive personal website from it, and packages the resulting index.html, style.css \
and script.js into a ZIP archive, optionally alongside a single-file preview.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local .pdf / .docx file path or HTTP/HTTPS URL.
    input: String,

    /// Where to write the ZIP archive.
    #[arg(short, long, env = "RESUME2SITE_OUTPUT", default_value = ARCHIVE_FILE_NAME)]
    output: PathBuf,

    /// Also write the self-contained preview page to this file.
    #[arg(long, env = "RESUME2SITE_PREVIEW")]
    preview: Option<PathBuf>,

    /// LLM model ID.
    #[arg(long, env = "RESUME2SITE_MODEL", default_value = resume2site::config::DEFAULT_MODEL)]
    model: String,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(long, env = "RESUME2SITE_PROVIDER", default_value = resume2site::config::DEFAULT_PROVIDER)]
    provider: String,

    /// Environment variable that holds the provider API key.
    #[arg(long, env = "RESUME2SITE_API_KEY_ENV", default_value = resume2site::config::DEFAULT_API_KEY_ENV)]
    api_key_env: String,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "RESUME2SITE_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max LLM output tokens (provider default when unset).
    #[arg(long, env = "RESUME2SITE_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// HTTP download timeout in seconds for URL inputs.
    #[arg(long, env = "RESUME2SITE_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print run statistics as JSON on stdout.
    #[arg(long, env = "RESUME2SITE_JSON")]
    json: bool,

    /// Print the extracted resume text and exit.
    #[arg(long)]
    inspect_only: bool,

    /// Disable the busy spinner.
    #[arg(long, env = "RESUME2SITE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RESUME2SITE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "RESUME2SITE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the key may come from the real environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // stage lines provide all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let text = inspect(&cli.input, cli.download_timeout)
            .await
            .context("Failed to read resume")?;
        print!("{text}");
        return Ok(());
    }

    // ── Fail fast without an API key ─────────────────────────────────────
    if let Err(e) = require_api_key(&cli.api_key_env) {
        report_failure(&e);
        std::process::exit(2);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let spinner = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = spinner
        .as_ref()
        .map(|cb| Arc::clone(cb) as Arc<dyn GenerationProgressCallback>);
    let config = build_config(&cli, progress_cb)?;

    // ── Run generation ───────────────────────────────────────────────────
    let mut session = Session::new();
    let outcome = session.generate(&cli.input, &config).await.map(|r| r.stats.clone());
    if let Some(ref s) = spinner {
        s.finish();
    }

    let stats = match outcome {
        Ok(stats) => stats,
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    };

    let Some(result) = session.result() else {
        anyhow::bail!("generation reported success but produced no result");
    };

    write_atomic(&cli.output, &result.archive)
        .await
        .context("Failed to write archive")?;
    if let Some(ref preview_path) = cli.preview {
        write_atomic(preview_path, result.preview.as_bytes())
            .await
            .context("Failed to write preview")?;
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?;
        println!("{json}");
    }

    if !cli.quiet {
        eprintln!(
            "{} Website generated  {}ms  →  {}",
            green("✔"),
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        if let Some(ref p) = cli.preview {
            eprintln!("   preview  →  {}", bold(&p.display().to_string()));
        }
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&stats.prompt_tokens.to_string()),
            dim(&stats.completion_tokens.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `GenerationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .model(&cli.model)
        .provider_name(&cli.provider)
        .api_key_env(&cli.api_key_env)
        .temperature(cli.temperature)
        .download_timeout_secs(cli.download_timeout);

    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Print the one user-facing message for a failed run.
fn report_failure(e: &SiteGenError) {
    let icon = match e.kind() {
        ErrorKind::Parsing => yellow("⚠"),
        _ => red("✘"),
    };
    eprintln!("{icon} {e}");
}
