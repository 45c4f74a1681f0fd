//! Result reporting for the two output modes.

use crate::dispatch::{ClassificationResult, DetectionResult, Mode};
use crate::error::Error;
use crate::output::OutputMode;
use crate::output::json_envelope::{
    ClassificationPayload, DetectionPayload, ErrorPayload, ErrorSeverity, EventType,
    JsonEnvelope, PipelineCompletedPayload, PipelineStartedPayload, PipelineStatus, ResultType,
};
use crate::output::report;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Receives the outcome of each image in a run.
pub trait Reporter {
    /// Report run start.
    fn started(&self, total_files: usize, mode: Mode);

    /// Report a classified image.
    fn classified(&self, file: &Path, result: &ClassificationResult);

    /// Report a detection run and where its annotated image went.
    fn detected(&self, file: &Path, result: &DetectionResult, annotated_image: &Path);

    /// Report an image that could not be processed.
    fn failed(&self, file: &Path, error: &Error);

    /// Report an error that ends the run.
    fn fatal(&self, error: &Error);

    /// Report run completion.
    fn completed(&self, summary: &RunSummary);
}

/// Summary of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    /// Images successfully processed.
    pub processed: usize,
    /// Images that failed.
    pub failed: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// The run ended on a fatal error.
    pub aborted: bool,
}

/// Create the reporter for an output mode, writing to stdout.
pub fn reporter_for(mode: OutputMode) -> Box<dyn Reporter> {
    match mode {
        OutputMode::Human => Box::new(HumanReporter::new(io::stdout())),
        OutputMode::Json => Box::new(JsonReporter::new(io::stdout())),
    }
}

/// Plain-text results on stdout; failures and progress go to the log.
pub struct HumanReporter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl HumanReporter {
    /// Create a reporter writing to `writer`.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_block(&self, text: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{text}");
            let _ = writer.flush();
        }
    }
}

impl Reporter for HumanReporter {
    fn started(&self, total_files: usize, mode: Mode) {
        info!("Processing {} image(s) in {} mode", total_files, mode);
    }

    fn classified(&self, file: &Path, result: &ClassificationResult) {
        self.write_block(&report::classification_text(file, result));
    }

    fn detected(&self, file: &Path, result: &DetectionResult, annotated_image: &Path) {
        self.write_block(&report::detection_text(file, result, annotated_image));
    }

    fn failed(&self, file: &Path, err: &Error) {
        error!("Failed to process {}: {}", file.display(), describe(err));
    }

    fn fatal(&self, err: &Error) {
        // main prints the message itself
        debug!("Run aborted: {}", err.code());
    }

    fn completed(&self, summary: &RunSummary) {
        #[allow(clippy::cast_precision_loss)]
        let seconds = summary.duration_ms as f64 / 1000.0;
        info!(
            "Complete: {} processed, {} errors in {:.2}s",
            summary.processed, summary.failed, seconds
        );
        if summary.failed > 0 {
            warn!("{} image(s) had errors", summary.failed);
        }
    }
}

/// One JSON envelope per line.
pub struct JsonReporter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonReporter {
    /// Create a reporter writing to `writer`.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn emit<T: serde::Serialize>(&self, event: EventType, payload: T) {
        let envelope = JsonEnvelope::new(event, payload);
        match serde_json::to_string(&envelope) {
            Ok(json) => {
                if let Ok(mut writer) = self.writer.lock() {
                    if let Err(e) = writeln!(writer, "{json}") {
                        warn!("Failed to write to stdout: {e}");
                    }
                    let _ = writer.flush();
                }
            }
            Err(e) => warn!("Failed to serialize {:?} event: {e}", event),
        }
    }
}

impl Reporter for JsonReporter {
    fn started(&self, total_files: usize, mode: Mode) {
        self.emit(
            EventType::PipelineStarted,
            PipelineStartedPayload { total_files, mode },
        );
    }

    fn classified(&self, file: &Path, result: &ClassificationResult) {
        self.emit(
            EventType::Result,
            ClassificationPayload {
                result_type: ResultType::Classification,
                file: file.to_path_buf(),
                label: result.label.clone(),
                confidence: result.confidence,
                low_confidence: result.low_confidence,
                description: result.description,
            },
        );
    }

    fn detected(&self, file: &Path, result: &DetectionResult, annotated_image: &Path) {
        self.emit(
            EventType::Result,
            DetectionPayload {
                result_type: ResultType::Detection,
                file: file.to_path_buf(),
                objects: result.objects,
                annotated_image: annotated_image.to_path_buf(),
            },
        );
    }

    fn failed(&self, file: &Path, err: &Error) {
        self.emit(
            EventType::Error,
            ErrorPayload {
                code: err.code().to_string(),
                severity: ErrorSeverity::Warning,
                message: describe(err),
                file: Some(file.to_path_buf()),
                suggestion: None,
            },
        );
    }

    fn fatal(&self, err: &Error) {
        self.emit(EventType::Error, fatal_payload(err));
    }

    fn completed(&self, summary: &RunSummary) {
        self.emit(
            EventType::PipelineCompleted,
            PipelineCompletedPayload {
                status: if summary.aborted {
                    PipelineStatus::Failed
                } else {
                    PipelineStatus::from_counts(summary.processed, summary.failed)
                },
                files_processed: summary.processed,
                files_failed: summary.failed,
                duration_ms: summary.duration_ms,
            },
        );
    }
}

/// Error event for a failure that ends the run.
pub fn fatal_payload(err: &Error) -> ErrorPayload {
    let suggestion = match err {
        Error::ModelFileNotFound { .. } | Error::ModelLoad { .. } => {
            Some("place the ONNX models at the paths under [models] and run `animalai models check`")
        }
        Error::FontLoad { .. } => Some("set detection.font to a TrueType font file"),
        _ => None,
    };

    ErrorPayload {
        code: err.code().to_string(),
        severity: ErrorSeverity::Fatal,
        message: describe(err),
        file: None,
        suggestion: suggestion.map(str::to_string),
    }
}

/// Error message followed by its source chain.
pub fn describe(err: &Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
