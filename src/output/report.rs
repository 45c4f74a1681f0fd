//! Human-readable result text.

use crate::dispatch::{ClassificationResult, DetectionResult};
use std::fmt::Write;
use std::path::Path;

/// Result block for a classified image.
pub fn classification_text(file: &Path, result: &ClassificationResult) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", file.display());
    let _ = writeln!(
        text,
        "  Prediction: {} ({:.2}%)",
        result.label, result.confidence
    );
    if result.low_confidence {
        let _ = writeln!(
            text,
            "  Warning: low confidence; the image may not show a tiger, lion, leopard or cheetah"
        );
    }
    let _ = writeln!(text);
    for line in result.description.to_text().lines() {
        let _ = writeln!(text, "  {line}");
    }
    text
}

/// Result block for a detection run.
pub fn detection_text(file: &Path, result: &DetectionResult, annotated_image: &Path) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", file.display());
    let noun = if result.objects == 1 { "object" } else { "objects" };
    let _ = writeln!(text, "  Detected {} {noun}", result.objects);
    let _ = writeln!(text, "  Annotated image: {}", annotated_image.display());
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::knowledge::SpeciesKnowledgeBase;
    use image::RgbImage;

    fn result(confidence: f32, low_confidence: bool) -> ClassificationResult {
        ClassificationResult {
            label: "Tiger".to_string(),
            confidence,
            low_confidence,
            description: *SpeciesKnowledgeBase::builtin().lookup("Tiger").unwrap(),
        }
    }

    #[test]
    fn test_classification_text() {
        let text = classification_text(Path::new("img/harimau.jpg"), &result(70.0, false));
        assert!(text.starts_with("img/harimau.jpg\n"));
        assert!(text.contains("Prediction: Tiger (70.00%)"));
        assert!(text.contains("Harimau (Tiger)"));
        assert!(text.contains("Habitat:"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_low_confidence_warning() {
        let text = classification_text(Path::new("x.png"), &result(31.5, true));
        assert!(text.contains("Prediction: Tiger (31.50%)"));
        assert!(text.contains("Warning: low confidence"));
    }

    #[test]
    fn test_detection_text() {
        let result = DetectionResult {
            annotated: RgbImage::new(1, 1),
            objects: 1,
        };
        let text = detection_text(
            Path::new("singa.jpg"),
            &result,
            Path::new("out/singa.detection.png"),
        );
        assert!(text.contains("Detected 1 object\n"));
        assert!(text.contains("Annotated image: out/singa.detection.png"));
    }
}
