//! Configuration loading and management.

mod file;
mod paths;
mod types;
mod validate;

pub use file::{load_config, load_config_file, save_config, save_config_to};
pub use paths::{config_dir, config_file_path, resolve_config_path};
pub use types::{
    ClassificationConfig, Config, DefaultsConfig, DetectionConfig, InferenceConfig, ModelsConfig,
};
pub use validate::{validate_config, validate_model_files};
