//! Configuration validation.

use crate::config::{Config, ModelsConfig};
use crate::constants::confidence;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_classification(config)?;
    validate_detection(config)?;
    Ok(())
}

fn validate_classification(config: &Config) -> Result<()> {
    let settings = &config.classification;

    if settings.input_size == 0 {
        return Err(Error::ConfigValidation {
            message: "classification.input_size must be at least 1".to_string(),
        });
    }

    check_unit_interval("classification.low_confidence", settings.low_confidence)
}

fn validate_detection(config: &Config) -> Result<()> {
    let settings = &config.detection;

    if settings.input_size == 0 {
        return Err(Error::ConfigValidation {
            message: "detection.input_size must be at least 1".to_string(),
        });
    }

    if settings.max_detections == 0 {
        return Err(Error::ConfigValidation {
            message: "detection.max_detections must be at least 1".to_string(),
        });
    }

    check_unit_interval("detection.confidence", settings.confidence)?;
    check_unit_interval("detection.iou", settings.iou)
}

fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    if !(confidence::MIN..=confidence::MAX).contains(&value) {
        return Err(Error::ConfigValidation {
            message: format!(
                "{name} must be between {} and {}, got {value}",
                confidence::MIN,
                confidence::MAX
            ),
        });
    }
    Ok(())
}

/// Check that both model artifacts exist on disk.
///
/// The detection labels file is optional and not checked here.
pub fn validate_model_files(models: &ModelsConfig) -> Result<()> {
    for path in [&models.classification, &models.detection] {
        if !path.exists() {
            return Err(Error::ModelFileNotFound { path: path.clone() });
        }
    }
    Ok(())
}
