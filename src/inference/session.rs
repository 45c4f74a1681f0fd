//! Thin wrapper around an ONNX Runtime session.

use crate::error::{Error, Result};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// A loaded ONNX model with a single tensor input and a single tensor output.
///
/// Running a session needs exclusive access, so it sits behind a mutex.
pub struct OnnxSession {
    session: Mutex<Session>,
    path: PathBuf,
}

impl OnnxSession {
    /// Load a model from disk.
    ///
    /// `intra_threads == 0` leaves the thread count to the runtime.
    pub fn load(path: &Path, intra_threads: usize) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let load_error = |reason: String| Error::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };

        let mut builder = Session::builder()
            .map_err(|e| load_error(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(e.to_string()))?;

        if intra_threads > 0 {
            builder = builder
                .with_intra_threads(intra_threads)
                .map_err(|e| load_error(e.to_string()))?;
        }

        let session = builder
            .commit_from_file(path)
            .map_err(|e| load_error(e.to_string()))?;

        debug!("Loaded ONNX session from {}", path.display());

        Ok(Self {
            session: Mutex::new(session),
            path: path.to_path_buf(),
        })
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the model on one `f32` tensor and return the first output's shape and data.
    pub fn run(&self, shape: &[usize], data: &[f32]) -> Result<(Vec<usize>, Vec<f32>)> {
        let dims = shape
            .iter()
            .map(|&d| i64::try_from(d))
            .collect::<std::result::Result<Vec<i64>, _>>()
            .map_err(|e| Error::Inference {
                reason: format!("input dimension out of range: {e}"),
            })?;

        let input = TensorRef::from_array_view((dims, data)).map_err(|e| Error::Inference {
            reason: format!("failed to create input tensor: {e}"),
        })?;

        let mut session = self.session.lock().map_err(|_| Error::Inference {
            reason: "session lock poisoned".to_string(),
        })?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| Error::Inference {
                reason: e.to_string(),
            })?;

        if outputs.len() == 0 {
            return Err(Error::Inference {
                reason: format!("model '{}' produced no outputs", self.path.display()),
            });
        }

        let (out_shape, out_data) =
            outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| Error::Inference {
                    reason: format!("failed to extract output tensor: {e}"),
                })?;

        let out_shape = out_shape
            .iter()
            .map(|&d| usize::try_from(d))
            .collect::<std::result::Result<Vec<usize>, _>>()
            .map_err(|_| Error::Inference {
                reason: format!("output has a dynamic or negative dimension: {out_shape:?}"),
            })?;

        Ok((out_shape, out_data.to_vec()))
    }
}
