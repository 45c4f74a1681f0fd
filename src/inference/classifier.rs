//! Species classification model.

use crate::error::{Error, Result};
use crate::inference::session::OnnxSession;
use ndarray::Array4;
use std::path::Path;
use tracing::{debug, info};

/// A model mapping a preprocessed image batch to a probability vector.
pub trait ClassificationModel {
    /// Run the model on a batch of one and return its probability vector.
    ///
    /// The vector is returned as produced; its width is not checked here.
    fn classify(&self, batch: &Array4<f32>) -> Result<Vec<f32>>;
}

/// Classifier backed by an ONNX export of the Keras species model.
pub struct OnnxClassifier {
    session: OnnxSession,
}

impl OnnxClassifier {
    /// Load the classifier from disk.
    pub fn load(path: &Path, intra_threads: usize) -> Result<Self> {
        let session = OnnxSession::load(path, intra_threads)?;
        info!("Loaded classification model: {}", path.display());
        Ok(Self { session })
    }
}

impl ClassificationModel for OnnxClassifier {
    fn classify(&self, batch: &Array4<f32>) -> Result<Vec<f32>> {
        let data = batch.as_slice().ok_or_else(|| Error::Inference {
            reason: "classifier input tensor is not contiguous".to_string(),
        })?;

        let (shape, output) = self.session.run(batch.shape(), data)?;
        debug!(
            "Classifier output shape {:?} from {}",
            shape,
            self.session.path().display()
        );

        Ok(first_row(&shape, output))
    }
}

/// Keep only the first batch entry of a `[batch, classes]` output.
fn first_row(shape: &[usize], mut output: Vec<f32>) -> Vec<f32> {
    match shape.first() {
        Some(&batch) if batch > 1 && shape.len() > 1 => {
            let width = output.len() / batch;
            output.truncate(width);
            output
        }
        _ => output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row_single_batch_passthrough() {
        let out = first_row(&[1, 4], vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(out, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_first_row_truncates_larger_batch() {
        let out = first_row(&[2, 2], vec![0.9, 0.1, 0.3, 0.7]);
        assert_eq!(out, vec![0.9, 0.1]);
    }

    #[test]
    fn test_first_row_keeps_odd_width() {
        let out = first_row(&[1, 5], vec![0.2; 5]);
        assert_eq!(out.len(), 5);
    }
}
