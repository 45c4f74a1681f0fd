//! JSON envelope types for CLI output.
//!
//! Every line printed in JSON mode is one envelope, so the output can be
//! consumed line by line by a frontend.

use crate::dispatch::Mode;
use crate::knowledge::SpeciesDescription;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Envelope format version.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<T> {
    /// API specification version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Image analysis starting.
    PipelineStarted,
    /// All images processed.
    PipelineCompleted,
    /// A result (one image, or a command's output).
    Result,
    /// Error occurred.
    Error,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Species classification of one image.
    Classification,
    /// Object detection on one image.
    Detection,
    /// Knowledge base entries.
    Species,
    /// Static informational page.
    Page,
    /// Configuration display.
    Config,
    /// Model artifact check.
    ModelCheck,
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Fatal error - the run cannot continue.
    Fatal,
    /// Warning - the run continues.
    Warning,
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Error code (`snake_case` identifier).
    pub code: String,
    /// Error severity.
    pub severity: ErrorSeverity,
    /// Human-readable error message.
    pub message: String,
    /// Image the error belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Suggested action to resolve the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Payload for `pipeline_started` event.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStartedPayload {
    /// Number of images to process.
    pub total_files: usize,
    /// Selected mode.
    pub mode: Mode,
}

/// Run completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// All images processed successfully.
    Success,
    /// Some images failed.
    PartialSuccess,
    /// No image was processed.
    Failed,
}

impl PipelineStatus {
    /// Derive the status from processed and failed counts.
    pub fn from_counts(processed: usize, failed: usize) -> Self {
        if failed == 0 {
            Self::Success
        } else if processed > 0 {
            Self::PartialSuccess
        } else {
            Self::Failed
        }
    }
}

/// Payload for `pipeline_completed` event.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineCompletedPayload {
    /// Overall status.
    pub status: PipelineStatus,
    /// Images successfully processed.
    pub files_processed: usize,
    /// Images that failed.
    pub files_failed: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Classification of one image.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Image path.
    pub file: PathBuf,
    /// Predicted species label.
    pub label: String,
    /// Confidence percentage (0-100).
    pub confidence: f32,
    /// Whether the confidence fell under the configured threshold.
    pub low_confidence: bool,
    /// Descriptive text for the predicted species.
    pub description: SpeciesDescription,
}

/// Detection on one image.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Image path.
    pub file: PathBuf,
    /// Number of boxes drawn.
    pub objects: usize,
    /// Where the annotated image was written.
    pub annotated_image: PathBuf,
}

/// Payload for the `species` command.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Requested entries.
    pub species: Vec<SpeciesDescription>,
}

/// Payload for the `about` pages.
#[derive(Debug, Clone, Serialize)]
pub struct PagePayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Page identifier.
    pub page: String,
    /// Page text as printed in human mode.
    pub body: String,
}

/// Payload for config show result.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// The configuration contents (as JSON value for flexibility).
    pub config: serde_json::Value,
}

/// One model artifact in a `models check` result.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    /// `classification` or `detection`.
    pub role: Mode,
    /// Configured path.
    pub path: PathBuf,
    /// Whether the file exists.
    pub exists: bool,
}

/// Payload for `models check`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelCheckPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Per-model status.
    pub models: Vec<ModelStatus>,
    /// Whether both models loaded.
    pub loaded: bool,
}
