//! Configuration type definitions.

use crate::constants::{classification, detection, model_paths};
use crate::dispatch::Mode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model artifact locations.
    pub models: ModelsConfig,

    /// Classification settings.
    pub classification: ClassificationConfig,

    /// Detection settings.
    pub detection: DetectionConfig,

    /// Inference runtime settings.
    pub inference: InferenceConfig,

    /// Default analysis settings.
    pub defaults: DefaultsConfig,
}

/// Paths of the two model artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Path to the classification ONNX model.
    pub classification: PathBuf,

    /// Path to the detection ONNX model.
    pub detection: PathBuf,

    /// Optional class names for the detection model, one per line.
    pub detection_labels: Option<PathBuf>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            classification: PathBuf::from(model_paths::CLASSIFICATION),
            detection: PathBuf::from(model_paths::DETECTION),
            detection_labels: Some(PathBuf::from(model_paths::DETECTION_LABELS)),
        }
    }
}

/// Classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Side length of the square model input.
    pub input_size: u32,

    /// Confidence (0.0-1.0) under which a prediction is flagged as uncertain.
    pub low_confidence: f32,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            input_size: classification::INPUT_SIZE,
            low_confidence: classification::DEFAULT_LOW_CONFIDENCE,
        }
    }
}

/// Detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Side length of the square (letterboxed) model input.
    pub input_size: u32,

    /// Minimum class score for a box to be kept.
    pub confidence: f32,

    /// IoU threshold for non-maximum suppression.
    pub iou: f32,

    /// Maximum number of boxes per image.
    pub max_detections: usize,

    /// TrueType font used for box labels.
    pub font: Option<PathBuf>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            input_size: detection::INPUT_SIZE,
            confidence: detection::DEFAULT_CONFIDENCE,
            iou: detection::DEFAULT_IOU,
            max_detections: detection::DEFAULT_MAX_DETECTIONS,
            font: None,
        }
    }
}

/// Inference runtime settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Intra-op thread count for ONNX Runtime (0 lets the runtime decide).
    pub intra_threads: usize,
}

/// Default analysis settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Mode used when `--mode` is not given.
    pub mode: Mode,
}
