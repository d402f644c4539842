use thiserror::Error;

use crate::classification::domain::classification::ClassificationResult;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Frame does not match the model input. Persistent misconfiguration,
    /// not transient noise.
    #[error(
        "frame shape {actual:?} does not match model input {expected:?} (height, width, channels)"
    )]
    ShapeMismatch {
        expected: (u32, u32, u8),
        actual: (u32, u32, u8),
    },
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Domain interface for single-image classification.
pub trait Classifier {
    fn classify(&mut self, frame: &Frame, top_k: usize)
        -> Result<ClassificationResult, ClassifyError>;
}
