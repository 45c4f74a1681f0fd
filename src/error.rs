//! Error types for animalai.

/// Result type alias for animalai operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for animalai.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Model file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: std::path::PathBuf,
    },

    /// Model file exists but could not be loaded.
    #[error("failed to load model '{path}': {reason}")]
    ModelLoad {
        /// Path to the model file.
        path: std::path::PathBuf,
        /// Description of the load failure.
        reason: String,
    },

    /// Failed to read labels file.
    #[error("failed to read labels file '{path}'")]
    LabelsRead {
        /// Path to the labels file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Label set is malformed (empty or duplicate names).
    #[error("invalid label set: {reason}")]
    InvalidLabelSet {
        /// Description of the problem.
        reason: String,
    },

    /// Input file is not a supported image type.
    #[error("unsupported image type for '{path}': {found} (expected JPEG or PNG)")]
    UnsupportedImageType {
        /// Path to the rejected file.
        path: std::path::PathBuf,
        /// What was found instead.
        found: String,
    },

    /// Failed to read image file.
    #[error("failed to read image file '{path}'")]
    ImageRead {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode image.
    #[error("failed to decode image '{path}'")]
    ImageDecode {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to write annotated image.
    #[error("failed to write image '{path}'")]
    ImageWrite {
        /// Path to the output image.
        path: std::path::PathBuf,
        /// Underlying encoder error.
        #[source]
        source: image::ImageError,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Model output does not have the expected number of entries.
    #[error("model output shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch {
        /// Expected number of values (the label-set size).
        expected: usize,
        /// Number of values the model produced.
        actual: usize,
    },

    /// Label has no entry in the species knowledge base.
    #[error("species '{label}' not found in knowledge base")]
    KeyNotFound {
        /// The label that was looked up.
        label: String,
    },

    /// Failed to load font for label rendering.
    #[error("failed to load font '{path}': {reason}")]
    FontLoad {
        /// Path to the font file.
        path: std::path::PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Every input image failed.
    #[error("no image could be processed ({failed} failed)")]
    NoImagesProcessed {
        /// Number of images that failed.
        failed: usize,
    },

    /// Failed to serialize JSON output.
    #[error("failed to write JSON output")]
    JsonWrite {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Stable `snake_case` identifier for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::ConfigDirNotFound
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::ConfigWrite { .. }
            | Self::ConfigSerialize { .. } => "config_error",
            Self::ModelFileNotFound { .. } => "model_not_found",
            Self::ModelLoad { .. } | Self::LabelsRead { .. } | Self::InvalidLabelSet { .. } => {
                "model_load_failed"
            }
            Self::UnsupportedImageType { .. } => "unsupported_image_type",
            Self::ImageRead { .. } | Self::ImageDecode { .. } => "image_decode_failed",
            Self::ImageWrite { .. } => "image_write_failed",
            Self::Inference { .. } => "inference_failed",
            Self::ShapeMismatch { .. } => "shape_mismatch",
            Self::KeyNotFound { .. } => "key_not_found",
            Self::FontLoad { .. } => "font_load_failed",
            Self::NoImagesProcessed { .. } => "no_images_processed",
            Self::JsonWrite { .. } => "json_write_failed",
        }
    }
}
