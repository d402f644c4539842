use ndarray::Array4;

use crate::classification::domain::classification::ClassificationResult;
use crate::classification::domain::classifier::{ClassifyError, Classifier};
use crate::classification::domain::inference_engine::{
    InferenceEngine, InputElement, InputSpec, InputTensor, TensorLayout,
};
use crate::shared::frame::Frame;

/// Float inputs are scaled to [-1, 1] (MobileNet convention).
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

/// Binds frames into an [`InferenceEngine`] and ranks what comes out.
pub struct ModelRunner {
    engine: Box<dyn InferenceEngine>,
    input_spec: InputSpec,
}

impl ModelRunner {
    pub fn new(engine: Box<dyn InferenceEngine>) -> Self {
        let input_spec = engine.input_spec();
        Self { engine, input_spec }
    }

    pub fn input_spec(&self) -> InputSpec {
        self.input_spec
    }
}

impl Classifier for ModelRunner {
    fn classify(
        &mut self,
        frame: &Frame,
        top_k: usize,
    ) -> Result<ClassificationResult, ClassifyError> {
        let input = bind_input(frame, &self.input_spec)?;
        let output = self
            .engine
            .invoke(input)
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;
        let scores = output.into_scores();
        Ok(ClassificationResult::rank(&scores, top_k))
    }
}

/// Copy frame pixels into a tensor shaped and typed for the model input.
fn bind_input(frame: &Frame, spec: &InputSpec) -> Result<InputTensor, ClassifyError> {
    if frame.dims() != spec.dims() {
        return Err(ClassifyError::ShapeMismatch {
            expected: spec.dims(),
            actual: frame.dims(),
        });
    }

    let pixels = frame.as_ndarray();
    let tensor = match spec.element {
        InputElement::U8 => InputTensor::U8(layout(spec, |y, x, c| pixels[[y, x, c]])),
        InputElement::F32 => InputTensor::F32(layout(spec, |y, x, c| {
            (pixels[[y, x, c]] as f32 - NORM_MEAN) / NORM_STD
        })),
    };
    Ok(tensor)
}

fn layout<T, F>(spec: &InputSpec, pixel: F) -> Array4<T>
where
    T: Clone + Default,
    F: Fn(usize, usize, usize) -> T,
{
    Array4::from_shape_fn(spec.shape(), |(_, a, b, c)| match spec.layout {
        TensorLayout::Nhwc => pixel(a, b, c),
        TensorLayout::Nchw => pixel(b, c, a),
    })
}
