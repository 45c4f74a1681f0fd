//! Routes a decoded image to the selected model and shapes the result.

use crate::error::{Error, Result};
use crate::inference::{LabelSet, ModelRegistry, preprocess};
use crate::knowledge::{SpeciesDescription, SpeciesKnowledgeBase};
use crate::output::Annotator;
use clap::ValueEnum;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which model handles a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Species classification with descriptive text.
    #[default]
    Classification,
    /// Object detection with an annotated image.
    Detection,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classification => write!(f, "classification"),
            Self::Detection => write!(f, "detection"),
        }
    }
}

/// Outcome of the classification path.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Predicted species label.
    pub label: String,
    /// Maximum probability as a percentage (0-100).
    pub confidence: f32,
    /// Whether the confidence fell under the configured threshold.
    pub low_confidence: bool,
    /// Descriptive text for the predicted species.
    pub description: SpeciesDescription,
}

/// Outcome of the detection path.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// The input image with boxes and labels drawn on it.
    pub annotated: RgbImage,
    /// Number of boxes drawn.
    pub objects: usize,
}

/// Result of one dispatched request.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// Label, confidence and species text.
    Classification(ClassificationResult),
    /// Annotated image only.
    Detection(DetectionResult),
}

impl DispatchOutcome {
    /// Mode that produced this outcome.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Classification(_) => Mode::Classification,
            Self::Detection(_) => Mode::Detection,
        }
    }

    /// Species description, present only for classification.
    pub fn description(&self) -> Option<&SpeciesDescription> {
        match self {
            Self::Classification(result) => Some(&result.description),
            Self::Detection(_) => None,
        }
    }
}

/// Index of the largest value; ties go to the lowest index.
///
/// Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let (&first, rest) = values.split_first()?;
    let mut best = (0, first);
    for (i, &value) in rest.iter().enumerate() {
        if value > best.1 {
            best = (i + 1, value);
        }
    }
    Some(best)
}

/// Turn a probability vector into a label and a percentage confidence.
///
/// The vector width must equal the label-set size; this is checked before
/// the arg-max is taken.
pub fn interpret_probabilities(probabilities: &[f32], labels: &LabelSet) -> Result<(String, f32)> {
    labels.check_width(probabilities.len())?;

    if let Some(bad) = probabilities.iter().find(|p| !p.is_finite()) {
        return Err(Error::Inference {
            reason: format!("classifier produced a non-finite probability ({bad})"),
        });
    }

    let (index, probability) = argmax(probabilities).ok_or(Error::ShapeMismatch {
        expected: labels.len(),
        actual: 0,
    })?;

    // check_width guarantees the index is in range
    let label = labels.name(index).ok_or(Error::ShapeMismatch {
        expected: labels.len(),
        actual: probabilities.len(),
    })?;

    Ok((label.to_string(), probability * 100.0))
}

/// Runs requests against a shared model registry.
///
/// Holds no mutable state; the same image and mode always give the same outcome.
pub struct Dispatcher<'a> {
    registry: &'a ModelRegistry,
    knowledge: &'a SpeciesKnowledgeBase,
    annotator: &'a Annotator,
    labels: LabelSet,
    input_size: u32,
    low_confidence: f32,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher for the classifier's species labels.
    ///
    /// `low_confidence` is a fraction (0.0-1.0).
    pub fn new(
        registry: &'a ModelRegistry,
        knowledge: &'a SpeciesKnowledgeBase,
        annotator: &'a Annotator,
        input_size: u32,
        low_confidence: f32,
    ) -> Self {
        Self {
            registry,
            knowledge,
            annotator,
            labels: LabelSet::species(),
            input_size,
            low_confidence,
        }
    }

    /// Run one request.
    pub fn dispatch(&self, image: &RgbImage, mode: Mode) -> Result<DispatchOutcome> {
        match mode {
            Mode::Classification => self.classify(image).map(DispatchOutcome::Classification),
            Mode::Detection => self.detect(image).map(DispatchOutcome::Detection),
        }
    }

    fn classify(&self, image: &RgbImage) -> Result<ClassificationResult> {
        let batch = preprocess::classifier_input(image, self.input_size)?;
        let probabilities = self.registry.classify(&batch)?;
        debug!("Classifier probabilities: {:?}", probabilities);

        let (label, confidence) = interpret_probabilities(&probabilities, &self.labels)?;
        let description = *self.knowledge.lookup(&label)?;

        Ok(ClassificationResult {
            low_confidence: confidence < self.low_confidence * 100.0,
            label,
            confidence,
            description,
        })
    }

    fn detect(&self, image: &RgbImage) -> Result<DetectionResult> {
        let frames = self.registry.detect(image)?;
        let frame = frames.into_iter().next().ok_or_else(|| Error::Inference {
            reason: "detector returned no result".to_string(),
        })?;

        debug!("Detector found {} objects", frame.boxes.len());

        Ok(DetectionResult {
            annotated: self.annotator.annotate(&frame.source, &frame.boxes),
            objects: frame.boxes.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::inference::{BoundingBox, ClassificationModel, DetectionFrame, DetectionModel};
    use image::Rgb;
    use ndarray::Array4;

    struct FixedClassifier(Vec<f32>);

    impl ClassificationModel for FixedClassifier {
        fn classify(&self, batch: &Array4<f32>) -> Result<Vec<f32>> {
            assert_eq!(batch.shape(), &[1, 224, 224, 3]);
            Ok(self.0.clone())
        }
    }

    struct OneBox;

    impl DetectionModel for OneBox {
        fn detect(&self, image: &RgbImage) -> Result<Vec<DetectionFrame>> {
            Ok(vec![DetectionFrame {
                source: image.clone(),
                boxes: vec![BoundingBox {
                    x_min: 2.0,
                    y_min: 2.0,
                    x_max: 20.0,
                    y_max: 20.0,
                    class_id: 0,
                    label: "tiger".to_string(),
                    score: 0.9,
                }],
            }])
        }
    }

    fn registry(probabilities: Vec<f32>) -> ModelRegistry {
        ModelRegistry::from_models(Box::new(FixedClassifier(probabilities)), Box::new(OneBox))
    }

    fn image() -> RgbImage {
        RgbImage::from_pixel(32, 32, Rgb([200, 120, 40]))
    }

    #[test]
    fn test_argmax_ties_break_low() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some((0, 0.4)));
        assert_eq!(argmax(&[0.1, 0.3, 0.3, 0.3]), Some((1, 0.3)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_interpret_picks_tiger() {
        let (label, confidence) =
            interpret_probabilities(&[0.1, 0.1, 0.1, 0.7], &LabelSet::species()).unwrap();
        assert_eq!(label, "Tiger");
        assert_eq!(format!("{confidence:.2}"), "70.00");
    }

    #[test]
    fn test_interpret_rejects_wrong_width() {
        let labels = LabelSet::species();
        for probabilities in [vec![0.5, 0.5, 0.0], vec![0.2; 5], vec![]] {
            let err = interpret_probabilities(&probabilities, &labels).unwrap_err();
            assert!(matches!(err, Error::ShapeMismatch { expected: 4, .. }));
        }
    }

    #[test]
    fn test_interpret_rejects_nan() {
        let err =
            interpret_probabilities(&[0.1, f32::NAN, 0.1, 0.7], &LabelSet::species()).unwrap_err();
        assert!(matches!(err, Error::Inference { .. }));
    }

    #[test]
    fn test_classification_attaches_description() {
        let registry = registry(vec![0.05, 0.8, 0.1, 0.05]);
        let kb = SpeciesKnowledgeBase::builtin();
        let annotator = Annotator::without_font();
        let dispatcher = Dispatcher::new(&registry, &kb, &annotator, 224, 0.5);

        let outcome = dispatcher.dispatch(&image(), Mode::Classification).unwrap();
        assert_eq!(outcome.mode(), Mode::Classification);
        let DispatchOutcome::Classification(result) = &outcome else {
            panic!("expected classification outcome");
        };
        assert_eq!(result.label, "Leopard");
        assert!(!result.low_confidence);
        assert_eq!(outcome.description().unwrap().species.label(), "Leopard");
    }

    #[test]
    fn test_low_confidence_is_flagged_not_suppressed() {
        let registry = registry(vec![0.3, 0.25, 0.25, 0.2]);
        let kb = SpeciesKnowledgeBase::builtin();
        let annotator = Annotator::without_font();
        let dispatcher = Dispatcher::new(&registry, &kb, &annotator, 224, 0.5);

        let DispatchOutcome::Classification(result) =
            dispatcher.dispatch(&image(), Mode::Classification).unwrap()
        else {
            panic!("expected classification outcome");
        };
        assert_eq!(result.label, "Cheetah");
        assert!(result.low_confidence);
    }

    #[test]
    fn test_detection_has_no_description() {
        let registry = registry(vec![0.1, 0.1, 0.1, 0.7]);
        let kb = SpeciesKnowledgeBase::builtin();
        let annotator = Annotator::without_font();
        let dispatcher = Dispatcher::new(&registry, &kb, &annotator, 224, 0.5);

        let outcome = dispatcher.dispatch(&image(), Mode::Detection).unwrap();
        assert!(outcome.description().is_none());
        let DispatchOutcome::Detection(result) = outcome else {
            panic!("expected detection outcome");
        };
        assert_eq!(result.objects, 1);
        assert_eq!(result.annotated.dimensions(), (32, 32));
        assert_ne!(result.annotated, image());
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        let registry = registry(vec![0.2, 0.1, 0.6, 0.1]);
        let kb = SpeciesKnowledgeBase::builtin();
        let annotator = Annotator::without_font();
        let dispatcher = Dispatcher::new(&registry, &kb, &annotator, 224, 0.5);

        let DispatchOutcome::Classification(first) =
            dispatcher.dispatch(&image(), Mode::Classification).unwrap()
        else {
            panic!("expected classification outcome");
        };
        let DispatchOutcome::Classification(second) =
            dispatcher.dispatch(&image(), Mode::Classification).unwrap()
        else {
            panic!("expected classification outcome");
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_mode_parses_lowercase() {
        assert_eq!(Mode::from_str("detection", true).unwrap(), Mode::Detection);
        assert_eq!(Mode::default(), Mode::Classification);
        assert_eq!(Mode::Detection.to_string(), "detection");
    }
}
