//! Result rendering: annotated images, text reports and JSON envelopes.

mod draw;
pub mod json_envelope;
pub mod progress;
mod report;
mod reporter;

pub use draw::{Annotator, save_png};
pub use report::{classification_text, detection_text};
pub use reporter::{
    HumanReporter, JsonReporter, Reporter, RunSummary, describe, fatal_payload, reporter_for,
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Plain text.
    #[default]
    Human,
    /// One JSON envelope per line.
    Json,
}
