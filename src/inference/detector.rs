//! Object detection model (YOLO-style ONNX export).

use crate::config::DetectionConfig;
use crate::constants::detection::BOX_COORDS;
use crate::error::{Error, Result};
use crate::inference::labels::LabelSet;
use crate::inference::preprocess::{Letterbox, letterbox_input};
use crate::inference::session::OnnxSession;
use image::RgbImage;
use std::path::Path;
use tracing::{debug, info};

/// An axis-aligned box in source-image pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x_min: f32,
    /// Top edge.
    pub y_min: f32,
    /// Right edge.
    pub x_max: f32,
    /// Bottom edge.
    pub y_max: f32,
    /// Index into the detector's class list.
    pub class_id: usize,
    /// Display name of the class.
    pub label: String,
    /// Class score (0.0-1.0).
    pub score: f32,
}

impl BoundingBox {
    /// Box area; zero for degenerate boxes.
    pub fn area(&self) -> f32 {
        (self.x_max - self.x_min).max(0.0) * (self.y_max - self.y_min).max(0.0)
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &Self) -> f32 {
        let ix = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let iy = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);
        let intersection = ix * iy;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// The detector's output for one image: the image itself plus the boxes found on it.
#[derive(Debug, Clone)]
pub struct DetectionFrame {
    /// Image the boxes refer to.
    pub source: RgbImage,
    /// Boxes after suppression, highest score first.
    pub boxes: Vec<BoundingBox>,
}

/// A model that locates and labels objects in an image.
pub trait DetectionModel {
    /// Detect objects on a full-resolution image.
    ///
    /// Returns one frame per input image.
    fn detect(&self, image: &RgbImage) -> Result<Vec<DetectionFrame>>;
}

/// Post-processing thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorSettings {
    /// Side length of the square model input.
    pub input_size: u32,
    /// Minimum class score for a box to be kept.
    pub confidence: f32,
    /// IoU above which a lower-scored same-class box is suppressed.
    pub iou: f32,
    /// Maximum number of boxes kept.
    pub max_detections: usize,
}

impl From<&DetectionConfig> for DetectorSettings {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            input_size: config.input_size,
            confidence: config.confidence,
            iou: config.iou,
            max_detections: config.max_detections,
        }
    }
}

/// Detector backed by an ONNX export of the YOLO model.
pub struct OnnxDetector {
    session: OnnxSession,
    labels: Option<LabelSet>,
    settings: DetectorSettings,
}

impl OnnxDetector {
    /// Load the detector from disk.
    ///
    /// Without `labels`, classes are named `class <index>`.
    pub fn load(
        path: &Path,
        labels: Option<LabelSet>,
        settings: DetectorSettings,
        intra_threads: usize,
    ) -> Result<Self> {
        let session = OnnxSession::load(path, intra_threads)?;
        info!(
            "Loaded detection model: {} ({} classes named, input {}x{})",
            path.display(),
            labels.as_ref().map_or(0, LabelSet::len),
            settings.input_size,
            settings.input_size
        );
        Ok(Self {
            session,
            labels,
            settings,
        })
    }
}

impl DetectionModel for OnnxDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<DetectionFrame>> {
        let (tensor, letterbox) = letterbox_input(image, self.settings.input_size)?;
        let data = tensor.as_slice().ok_or_else(|| Error::Inference {
            reason: "detector input tensor is not contiguous".to_string(),
        })?;

        let (shape, output) = self.session.run(tensor.shape(), data)?;
        debug!("Detector output shape {:?}", shape);

        let boxes = postprocess(
            &shape,
            &output,
            &self.settings,
            &letterbox,
            self.labels.as_ref(),
        )?;

        Ok(vec![DetectionFrame {
            source: image.clone(),
            boxes,
        }])
    }
}

/// Turn raw detector output into the boxes to draw.
///
/// Decodes, suppresses overlaps, then keeps at most `max_detections` boxes,
/// highest score first.
pub fn postprocess(
    shape: &[usize],
    output: &[f32],
    settings: &DetectorSettings,
    letterbox: &Letterbox,
    labels: Option<&LabelSet>,
) -> Result<Vec<BoundingBox>> {
    let candidates = decode_predictions(shape, output, settings, letterbox, labels)?;
    let candidate_count = candidates.len();

    let mut boxes = non_maximum_suppression(candidates, settings.iou);
    boxes.truncate(settings.max_detections);
    debug!(
        "{} candidates above {:.2}, {} kept",
        candidate_count,
        settings.confidence,
        boxes.len()
    );

    Ok(boxes)
}

/// Decode a `[1, 4 + classes, anchors]` (or transposed `[1, anchors, 4 + classes]`)
/// output into source-space boxes above the confidence threshold.
///
/// Each anchor holds a center-format box (`cx, cy, w, h`) followed by per-class scores.
pub fn decode_predictions(
    shape: &[usize],
    output: &[f32],
    settings: &DetectorSettings,
    letterbox: &Letterbox,
    labels: Option<&LabelSet>,
) -> Result<Vec<BoundingBox>> {
    let &[_, dim_a, dim_b] = shape else {
        return Err(Error::Inference {
            reason: format!("expected a 3-dimensional detector output, got {shape:?}"),
        });
    };

    // Feature-major is the usual export; anchor-major only when the last axis
    // is wide enough to hold box coordinates plus scores and is the shorter one.
    let (features, anchors, transposed) = if dim_a > dim_b && dim_b > BOX_COORDS {
        (dim_b, dim_a, true)
    } else {
        (dim_a, dim_b, false)
    };

    if features <= BOX_COORDS || output.len() < features * anchors {
        return Err(Error::Inference {
            reason: format!("detector output {shape:?} has no class scores"),
        });
    }

    let at = |feature: usize, anchor: usize| {
        if transposed {
            output[anchor * features + feature]
        } else {
            output[feature * anchors + anchor]
        }
    };

    let mut boxes = Vec::new();
    for anchor in 0..anchors {
        let mut best_class = 0;
        let mut best_score = f32::NEG_INFINITY;
        for class_id in 0..features - BOX_COORDS {
            let score = at(BOX_COORDS + class_id, anchor);
            if score > best_score {
                best_score = score;
                best_class = class_id;
            }
        }

        if best_score < settings.confidence {
            continue;
        }

        let (cx, cy, w, h) = (at(0, anchor), at(1, anchor), at(2, anchor), at(3, anchor));
        let (x_min, y_min) = letterbox.to_source(cx - w / 2.0, cy - h / 2.0);
        let (x_max, y_max) = letterbox.to_source(cx + w / 2.0, cy + h / 2.0);

        let label = labels
            .and_then(|l| l.name(best_class))
            .map_or_else(|| format!("class {best_class}"), str::to_string);

        boxes.push(BoundingBox {
            x_min,
            y_min,
            x_max,
            y_max,
            class_id: best_class,
            label,
            score: best_score,
        });
    }

    Ok(boxes)
}

/// Class-aware non-maximum suppression.
///
/// Returns the surviving boxes sorted by descending score.
pub fn non_maximum_suppression(mut boxes: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    boxes.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut removed = vec![false; boxes.len()];
    for current in 0..boxes.len() {
        if removed[current] {
            continue;
        }
        for other in current + 1..boxes.len() {
            if removed[other] || boxes[current].class_id != boxes[other].class_id {
                continue;
            }
            if boxes[current].iou(&boxes[other]) > iou_threshold {
                removed[other] = true;
            }
        }
    }

    boxes
        .into_iter()
        .zip(removed)
        .filter_map(|(b, gone)| (!gone).then_some(b))
        .collect()
}
