//! Caller-owned holder for the latest generated website.
//!
//! A [`Session`] belongs to whoever drives the pipeline, typically one per
//! user. Nothing is global, so two sessions never observe each other's
//! results.
//!
//! The held result changes only when a generation succeeds, and then it is
//! replaced wholesale. A failed run returns its error and leaves the previous
//! archive and preview exactly as they were.

use crate::config::GenerationConfig;
use crate::document::UploadedDocument;
use crate::error::SiteGenError;
use crate::generate::run_pipeline;
use crate::output::PackagedResult;
use crate::pipeline::{input, llm};
use tracing::debug;

/// Holds at most one [`PackagedResult`].
#[derive(Debug, Default)]
pub struct Session {
    result: Option<PackagedResult>,
}

impl Session {
    /// An empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest successful result, if any.
    pub fn result(&self) -> Option<&PackagedResult> {
        self.result.as_ref()
    }

    /// Archive bytes of the latest result.
    pub fn archive(&self) -> Option<&[u8]> {
        self.result.as_ref().map(|r| r.archive.as_slice())
    }

    /// Preview document of the latest result.
    pub fn preview(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.preview.as_str())
    }

    /// Remove and return the held result.
    pub fn take(&mut self) -> Option<PackagedResult> {
        self.result.take()
    }

    pub fn clear(&mut self) {
        self.result = None;
    }

    /// Replace the held result. Returns the one it displaced.
    pub fn store(&mut self, result: PackagedResult) -> Option<PackagedResult> {
        let previous = self.result.take();
        self.keep(result);
        previous
    }

    /// Generate from a path or URL and keep the result on success.
    pub async fn generate(
        &mut self,
        input_str: &str,
        config: &GenerationConfig,
    ) -> Result<&PackagedResult, SiteGenError> {
        let backend = llm::resolve_backend(config)?;
        let doc = input::resolve_input(input_str, config.download_timeout_secs).await?;
        let result = run_pipeline(&backend, doc, config).await?;
        Ok(self.keep(result))
    }

    /// Generate from an uploaded document and keep the result on success.
    pub async fn generate_from_document(
        &mut self,
        doc: UploadedDocument,
        config: &GenerationConfig,
    ) -> Result<&PackagedResult, SiteGenError> {
        let backend = llm::resolve_backend(config)?;
        doc.verify_magic()?;
        let result = run_pipeline(&backend, doc, config).await?;
        Ok(self.keep(result))
    }

    fn keep(&mut self, result: PackagedResult) -> &PackagedResult {
        debug!("Session result replaced ({} byte archive)", result.archive.len());
        self.result.insert(result)
    }
}
