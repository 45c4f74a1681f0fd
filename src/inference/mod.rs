//! Model loading and inference for classification and detection.

mod classifier;
mod detector;
mod labels;
pub mod preprocess;
mod registry;
mod session;

pub use classifier::{ClassificationModel, OnnxClassifier};
pub use detector::{
    BoundingBox, DetectionFrame, DetectionModel, DetectorSettings, OnnxDetector,
    decode_predictions, non_maximum_suppression, postprocess,
};
pub use labels::LabelSet;
pub use registry::ModelRegistry;
pub use session::OnnxSession;
