//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GenerationConfigBuilder::progress_callback`] to be told
//! when each stage starts and finishes. The CLI uses it to drive its busy
//! spinner; a web front end could forward the events to a socket instead.
//!
//! # Example
//!
//! ```rust
//! use resume2site::{GenerationConfig, GenerationProgressCallback, Stage};
//! use std::sync::{Arc, Mutex};
//!
//! struct Recorder(Mutex<Vec<Stage>>);
//!
//! impl GenerationProgressCallback for Recorder {
//!     fn on_stage_complete(&self, stage: Stage, _elapsed_ms: u64) {
//!         self.0.lock().unwrap().push(stage);
//!     }
//! }
//!
//! let config = GenerationConfig::builder()
//!     .progress_callback(Arc::new(Recorder(Mutex::new(Vec::new()))))
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Generate,
    Parse,
    Package,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Extract => "Reading resume",
            Stage::Generate => "AI is analyzing your resume and coding the website",
            Stage::Parse => "Parsing generated code",
            Stage::Package => "Packaging website",
        };
        f.write_str(s)
    }
}

/// Called by the pipeline as it moves through each [`Stage`].
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called just before a stage runs.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// Called when a stage fails. The pipeline stops after this call.
    fn on_stage_error(&self, stage: Stage, error: String) {
        let _ = (stage, error);
    }
}

/// Shared handle stored in [`crate::config::GenerationConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;

/// A no-op implementation, handy as a default.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}
