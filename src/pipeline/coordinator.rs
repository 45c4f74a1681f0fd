//! Pipeline coordination: input collection, screening and the per-image loop.

use crate::constants::DETECTION_OUTPUT_SUFFIX;
use crate::dispatch::{Dispatcher, Mode};
use crate::error::{Error, Result};
use crate::inference::ModelRegistry;
use crate::intake::{ImageKind, check_image_path, has_image_extension};
use crate::knowledge::SpeciesKnowledgeBase;
use crate::output::{Annotator, Reporter, RunSummary};
use crate::pipeline::{ProcessedImage, process_image};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Options for a run over several images.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Which model handles every image.
    pub mode: Mode,
    /// Output directory (None = same as input).
    pub output_dir: Option<PathBuf>,
    /// Label font for detection (None = probe system fonts).
    pub font: Option<PathBuf>,
    /// Classifier input side length.
    pub input_size: u32,
    /// Fraction under which a classification is flagged.
    pub low_confidence: f32,
    /// Stop at the first failed image.
    pub fail_fast: bool,
    /// Show a spinner while a model runs.
    pub progress_enabled: bool,
}

/// An input file and the outcome of its type check.
#[derive(Debug)]
pub struct ScreenedInput {
    /// File as collected.
    pub path: PathBuf,
    /// Detected encoding, or why the file was rejected.
    pub verdict: Result<ImageKind>,
}

impl ScreenedInput {
    /// Whether the file passed the type check.
    pub fn is_accepted(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Determine the output directory for a file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Path of the annotated image written for a detection run.
pub fn annotated_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    // to_string_lossy() keeps non-UTF-8 names usable
    let stem = input.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("output"),
        |s| s.to_string_lossy(),
    );
    output_dir.join(format!("{stem}{DETECTION_OUTPUT_SUFFIX}"))
}

/// Expand the command-line paths into the list of files to process.
///
/// Files named explicitly are kept as given so an unsupported type can be
/// reported. Directories contribute their JPEG and PNG files, recursively,
/// in name order. Previously written annotated images are skipped.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            collect_image_files_recursive(path, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn collect_image_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_image_files_recursive(&path, files)?;
        } else if has_image_extension(&path) && !is_annotated_output(&path) {
            files.push(path);
        } else {
            debug!("Skipping non-image file: {}", path.display());
        }
    }

    Ok(())
}

fn is_annotated_output(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(DETECTION_OUTPUT_SUFFIX))
}

/// Type-check every input, keeping the input order.
///
/// Only file signatures are read, so this runs before any model is loaded.
pub fn screen_inputs(files: Vec<PathBuf>) -> Vec<ScreenedInput> {
    files
        .into_iter()
        .map(|path| {
            let verdict = check_image_path(&path);
            if let Ok(kind) = &verdict {
                debug!("Accepted {} ({})", path.display(), kind);
            }
            ScreenedInput { path, verdict }
        })
        .collect()
}

/// Process files one after another and report each outcome.
///
/// Models are loaded through `load_models` only when at least one file passes
/// screening, so unsupported files never reach them. With `fail_fast` the
/// run stops at the first failure in input order. A model load failure is
/// reported as fatal and ends the run.
pub fn run_batch(
    files: Vec<PathBuf>,
    options: &ProcessOptions,
    reporter: &dyn Reporter,
    load_models: impl FnOnce() -> Result<ModelRegistry>,
) -> Result<RunSummary> {
    let start = Instant::now();
    let total = files.len();

    let mut inputs = screen_inputs(files);
    if options.fail_fast
        && let Some(first_rejected) = inputs.iter().position(|i| !i.is_accepted())
    {
        inputs.truncate(first_rejected + 1);
    }

    reporter.started(total, options.mode);
    let mut summary = RunSummary::default();

    if !inputs.iter().any(ScreenedInput::is_accepted) {
        let mut last_error = None;
        for input in inputs {
            if let Err(e) = input.verdict {
                reporter.failed(&input.path, &e);
                summary.failed += 1;
                last_error = Some(e);
            }
        }
        finish(reporter, &mut summary, start);
        return Err(match last_error {
            Some(e) if options.fail_fast => e,
            _ => Error::NoImagesProcessed {
                failed: summary.failed,
            },
        });
    }

    let loaded = load_models().and_then(|registry| {
        let annotator = match options.mode {
            Mode::Detection => Annotator::load(options.font.as_deref())?,
            Mode::Classification => Annotator::without_font(),
        };
        Ok((registry, annotator))
    });
    let (registry, annotator) = match loaded {
        Ok(models) => models,
        Err(e) => {
            reporter.fatal(&e);
            summary.aborted = true;
            finish(reporter, &mut summary, start);
            return Err(e);
        }
    };

    let knowledge = SpeciesKnowledgeBase::builtin();
    let dispatcher = Dispatcher::new(
        &registry,
        &knowledge,
        &annotator,
        options.input_size,
        options.low_confidence,
    );

    info!(
        "Found {} image(s) to process",
        inputs.iter().filter(|i| i.is_accepted()).count()
    );

    for ScreenedInput { path, verdict } in inputs {
        let outcome = verdict.and_then(|_| {
            let output_dir = output_dir_for(&path, options.output_dir.as_deref());
            process_image(
                &path,
                &output_dir,
                &dispatcher,
                options.mode,
                options.progress_enabled,
            )
        });

        match outcome {
            Ok(ProcessedImage::Classified(result)) => {
                summary.processed += 1;
                reporter.classified(&path, &result);
            }
            Ok(ProcessedImage::Detected {
                result,
                annotated_path,
            }) => {
                summary.processed += 1;
                reporter.detected(&path, &result, &annotated_path);
            }
            Err(e) => {
                reporter.failed(&path, &e);
                summary.failed += 1;
                if options.fail_fast {
                    finish(reporter, &mut summary, start);
                    return Err(e);
                }
            }
        }
    }

    finish(reporter, &mut summary, start);

    if summary.processed == 0 {
        return Err(Error::NoImagesProcessed {
            failed: summary.failed,
        });
    }

    Ok(summary)
}

#[allow(clippy::cast_possible_truncation)]
fn finish(reporter: &dyn Reporter, summary: &mut RunSummary, start: Instant) {
    summary.duration_ms = start.elapsed().as_millis() as u64;
    reporter.completed(summary);
}
