//! Holds the two loaded models for the lifetime of a run.

use crate::config::Config;
use crate::error::Result;
use crate::inference::classifier::{ClassificationModel, OnnxClassifier};
use crate::inference::detector::{DetectionFrame, DetectionModel, DetectorSettings, OnnxDetector};
use crate::inference::labels::LabelSet;
use image::RgbImage;
use ndarray::Array4;
use tracing::{info, warn};

/// The classification and detection models, loaded once and shared by every request.
///
/// Both models must load for the registry to exist; there is no partial state.
pub struct ModelRegistry {
    classifier: Box<dyn ClassificationModel>,
    detector: Box<dyn DetectionModel>,
}

impl ModelRegistry {
    /// Load both models from the configured paths.
    ///
    /// A missing or unreadable model is fatal. A missing detection labels
    /// file is not: boxes are then named by class index.
    pub fn load(config: &Config) -> Result<Self> {
        let threads = config.inference.intra_threads;

        let classifier = OnnxClassifier::load(&config.models.classification, threads)?;

        let labels = match &config.models.detection_labels {
            Some(path) if path.exists() => {
                let labels = LabelSet::from_file(path)?;
                info!(
                    "Loaded {} detection labels from {}",
                    labels.len(),
                    path.display()
                );
                Some(labels)
            }
            Some(path) => {
                warn!(
                    "Detection labels file not found: {}. Boxes will be named by class index",
                    path.display()
                );
                None
            }
            None => None,
        };

        let detector = OnnxDetector::load(
            &config.models.detection,
            labels,
            DetectorSettings::from(&config.detection),
            threads,
        )?;

        Ok(Self::from_models(Box::new(classifier), Box::new(detector)))
    }

    /// Build a registry from already-loaded models.
    pub fn from_models(
        classifier: Box<dyn ClassificationModel>,
        detector: Box<dyn DetectionModel>,
    ) -> Self {
        Self {
            classifier,
            detector,
        }
    }

    /// Run the classifier on a preprocessed batch.
    pub fn classify(&self, batch: &Array4<f32>) -> Result<Vec<f32>> {
        self.classifier.classify(batch)
    }

    /// Run the detector on a full-resolution image.
    pub fn detect(&self, image: &RgbImage) -> Result<Vec<DetectionFrame>> {
        self.detector.detect(image)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::PathBuf;

    struct Fixed(Vec<f32>);

    impl ClassificationModel for Fixed {
        fn classify(&self, _batch: &Array4<f32>) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    struct Empty;

    impl DetectionModel for Empty {
        fn detect(&self, image: &RgbImage) -> Result<Vec<DetectionFrame>> {
            Ok(vec![DetectionFrame {
                source: image.clone(),
                boxes: Vec::new(),
            }])
        }
    }

    #[test]
    fn test_from_models_delegates() {
        let registry = ModelRegistry::from_models(Box::new(Fixed(vec![0.25; 4])), Box::new(Empty));
        let batch = Array4::<f32>::zeros((1, 2, 2, 3));
        assert_eq!(registry.classify(&batch).unwrap(), vec![0.25; 4]);

        let frames = registry.detect(&RgbImage::new(3, 3)).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].boxes.is_empty());
    }

    #[test]
    fn test_load_fails_on_missing_classifier() {
        let mut config = Config::default();
        config.models.classification = PathBuf::from("/nonexistent/klasifikasi.onnx");

        let result = ModelRegistry::load(&config);
        assert!(matches!(result, Err(Error::ModelFileNotFound { .. })));
    }

    #[test]
    fn test_load_fails_on_corrupt_classifier() {
        let dir = tempfile::TempDir::new().unwrap();
        let corrupt = dir.path().join("klasifikasi.onnx");
        std::fs::write(&corrupt, [0u8; 64]).unwrap();

        let mut config = Config::default();
        config.models.classification = corrupt;

        let result = ModelRegistry::load(&config);
        assert!(matches!(result, Err(Error::ModelLoad { .. })));
    }
}
