//! Single image processing.

use crate::dispatch::{ClassificationResult, DetectionResult, DispatchOutcome, Dispatcher, Mode};
use crate::error::Result;
use crate::intake::read_image;
use crate::output::{progress, save_png};
use crate::pipeline::annotated_path_for;
use std::path::{Path, PathBuf};
use tracing::info;

/// What processing one image produced.
#[derive(Debug)]
pub enum ProcessedImage {
    /// Classification result.
    Classified(ClassificationResult),
    /// Detection result and the file the annotated image was written to.
    Detected {
        /// Detection result.
        result: DetectionResult,
        /// Written annotated image.
        annotated_path: PathBuf,
    },
}

/// Decode one image, dispatch it and, for detection, write the annotated image.
pub fn process_image(
    input_path: &Path,
    output_dir: &Path,
    dispatcher: &Dispatcher<'_>,
    mode: Mode,
    progress_enabled: bool,
) -> Result<ProcessedImage> {
    info!("Processing: {}", input_path.display());

    let pixels = read_image(input_path)?;

    let file_name = input_path
        .file_name()
        .map_or_else(|| input_path.to_string_lossy(), |n| n.to_string_lossy());
    let verb = match mode {
        Mode::Classification => "Classifying",
        Mode::Detection => "Detecting",
    };
    let spinner = progress::create_spinner(&format!("{verb} {file_name}"), progress_enabled);
    let outcome = dispatcher.dispatch(&pixels, mode);
    progress::finish_spinner(spinner);

    match outcome? {
        DispatchOutcome::Classification(result) => Ok(ProcessedImage::Classified(result)),
        DispatchOutcome::Detection(result) => {
            std::fs::create_dir_all(output_dir)?;
            let annotated_path = annotated_path_for(input_path, output_dir);
            save_png(&result.annotated, &annotated_path)?;
            info!("Wrote annotated image: {}", annotated_path.display());
            Ok(ProcessedImage::Detected {
                result,
                annotated_path,
            })
        }
    }
}
