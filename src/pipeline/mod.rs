//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{
    ProcessOptions, ScreenedInput, annotated_path_for, collect_input_files, output_dir_for,
    run_batch, screen_inputs,
};
pub use processor::{ProcessedImage, process_image};
