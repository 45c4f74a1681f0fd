//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "animalai";

/// Default model artifact locations, relative to the working directory.
pub mod model_paths {
    /// Classification model (Keras export).
    pub const CLASSIFICATION: &str = "model/klasifikasi.onnx";
    /// Detection model (YOLO export).
    pub const DETECTION: &str = "model/deteksi.onnx";
    /// Class names for the detection model, one per line.
    pub const DETECTION_LABELS: &str = "model/deteksi.labels.txt";
}

/// Classification constants.
pub mod classification {
    /// Side length of the square classifier input.
    pub const INPUT_SIZE: u32 = 224;

    /// Number of color channels fed to the classifier.
    pub const CHANNELS: usize = 3;

    /// Default confidence (0.0-1.0) under which a prediction is flagged.
    pub const DEFAULT_LOW_CONFIDENCE: f32 = 0.5;
}

/// Detection constants.
pub mod detection {
    /// Default side length of the square detector input.
    pub const INPUT_SIZE: u32 = 640;

    /// Default minimum class score for a box to be kept.
    pub const DEFAULT_CONFIDENCE: f32 = 0.25;

    /// Default IoU threshold for non-maximum suppression.
    pub const DEFAULT_IOU: f32 = 0.7;

    /// Default cap on boxes per image.
    pub const DEFAULT_MAX_DETECTIONS: usize = 300;

    /// Letterbox padding value.
    pub const PAD_VALUE: u8 = 114;

    /// Number of box coordinates preceding the class scores in each anchor.
    pub const BOX_COORDS: usize = 4;
}

/// Annotation rendering constants.
pub mod draw {
    /// Label font size in pixels.
    pub const FONT_SIZE: f32 = 20.0;

    /// Label tab height in pixels.
    pub const LABEL_HEIGHT: u32 = 24;

    /// Rough per-character width used when no font is loaded.
    pub const FALLBACK_CHAR_WIDTH: f32 = 11.0;

    /// Vertical padding of label text inside its tab.
    pub const TEXT_PADDING: i32 = 2;

    /// Box outline thickness in pixels.
    pub const BOX_THICKNESS: i32 = 2;

    /// Font files probed when no font is configured.
    pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    /// Box colors, cycled by class index.
    pub const PALETTE: [[u8; 3]; 8] = [
        [231, 111, 81],
        [42, 157, 143],
        [233, 196, 106],
        [38, 70, 83],
        [244, 162, 97],
        [120, 94, 240],
        [220, 38, 127],
        [0, 114, 178],
    ];
}

/// Accepted image file extensions (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Suffix of the annotated image written by the detection path.
pub const DETECTION_OUTPUT_SUFFIX: &str = ".detection.png";

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
}
