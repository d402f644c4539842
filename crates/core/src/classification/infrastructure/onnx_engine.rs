/// Image-classification engine backed by ONNX Runtime via `ort`.
///
/// Reads the input layout and element type from the model, and decides once
/// at load time whether the first output is float scores or quantized bytes.
use std::path::{Path, PathBuf};

use ort::tensor::TensorElementType;
use thiserror::Error;

use crate::classification::domain::inference_engine::{
    InferenceEngine, InputElement, InputSpec, InputTensor, OutputTensor, TensorLayout,
};
use crate::classification::domain::quantization::QuantizationParams;

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("model file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to load model {path}: {reason}")]
    Session { path: PathBuf, reason: String },
    #[error("unsupported model input: {0}")]
    UnsupportedInput(String),
    #[error("unsupported model output: {0}")]
    UnsupportedOutput(String),
    #[error("model output is quantized (u8) but no scale/zero-point was supplied")]
    MissingQuantization,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum OutputKind {
    Float,
    Quantized(QuantizationParams),
}

pub struct OnnxEngine {
    session: ort::session::Session,
    input_spec: InputSpec,
    output: OutputKind,
}

impl OnnxEngine {
    /// Load a model and allocate its session.
    ///
    /// `quantization` is required when the model's first output is `u8`;
    /// ONNX keeps those parameters in graph initializers, not on the output.
    pub fn load(
        model_path: &Path,
        quantization: Option<QuantizationParams>,
        intra_threads: usize,
    ) -> Result<Self, ModelLoadError> {
        if !model_path.is_file() {
            return Err(ModelLoadError::NotFound(model_path.to_path_buf()));
        }

        let session =
            build_session(model_path, intra_threads).map_err(|e| ModelLoadError::Session {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let input_spec = {
            let input = session
                .inputs()
                .first()
                .ok_or_else(|| ModelLoadError::UnsupportedInput("model has no inputs".into()))?;
            match input.dtype() {
                ort::value::ValueType::Tensor { ty, shape, .. } => {
                    let element = match ty {
                        TensorElementType::Uint8 => InputElement::U8,
                        TensorElementType::Float32 => InputElement::F32,
                        other => {
                            return Err(ModelLoadError::UnsupportedInput(format!(
                                "element type {other:?}"
                            )))
                        }
                    };
                    input_spec_from_shape(element, shape)?
                }
                other => return Err(ModelLoadError::UnsupportedInput(format!("{other:?}"))),
            }
        };

        let output = {
            let output = session
                .outputs()
                .first()
                .ok_or_else(|| ModelLoadError::UnsupportedOutput("model has no outputs".into()))?;
            match output.dtype() {
                ort::value::ValueType::Tensor { ty, .. } => match ty {
                    TensorElementType::Float32 => OutputKind::Float,
                    TensorElementType::Uint8 => OutputKind::Quantized(
                        quantization.ok_or(ModelLoadError::MissingQuantization)?,
                    ),
                    other => {
                        return Err(ModelLoadError::UnsupportedOutput(format!(
                            "element type {other:?}"
                        )))
                    }
                },
                other => return Err(ModelLoadError::UnsupportedOutput(format!("{other:?}"))),
            }
        };

        log::info!(
            "Loaded model {} (input {:?} {}x{}x{} {:?}, output {:?})",
            model_path.display(),
            input_spec.layout,
            input_spec.height,
            input_spec.width,
            input_spec.channels,
            input_spec.element,
            output
        );

        Ok(Self {
            session,
            input_spec,
            output,
        })
    }
}

impl InferenceEngine for OnnxEngine {
    fn input_spec(&self) -> InputSpec {
        self.input_spec
    }

    fn invoke(&mut self, input: InputTensor) -> Result<OutputTensor, Box<dyn std::error::Error>> {
        let kind = self.output;
        let outputs = match input {
            InputTensor::U8(array) => {
                let input_value = ort::value::Tensor::from_array(array)?;
                self.session.run(ort::inputs![input_value])?
            }
            InputTensor::F32(array) => {
                let input_value = ort::value::Tensor::from_array(array)?;
                self.session.run(ort::inputs![input_value])?
            }
        };
        if outputs.len() == 0 {
            return Err("model produced no outputs".into());
        }

        // Output is [1, num_classes]; flatten drops the batch axis.
        match kind {
            OutputKind::Float => {
                let scores = outputs[0].try_extract_array::<f32>()?;
                Ok(OutputTensor::Float(scores.iter().copied().collect()))
            }
            OutputKind::Quantized(quantization) => {
                let raw = outputs[0].try_extract_array::<u8>()?;
                Ok(OutputTensor::Quantized {
                    values: raw.iter().copied().collect(),
                    quantization,
                })
            }
        }
    }
}

fn build_session(
    model_path: &Path,
    intra_threads: usize,
) -> Result<ort::session::Session, Box<dyn std::error::Error>> {
    let session = ort::session::Session::builder()?
        .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
        .with_inter_threads(1)?
        .with_intra_threads(intra_threads.max(1))?
        .commit_from_file(model_path)?;
    Ok(session)
}

/// Work out layout and dimensions from a 4-D image input shape.
///
/// NHWC (TFLite-style) is assumed when the last axis looks like a channel
/// count, NCHW when the second axis does. The batch axis may be dynamic,
/// spatial axes may not.
fn input_spec_from_shape(
    element: InputElement,
    shape: &[i64],
) -> Result<InputSpec, ModelLoadError> {
    if shape.len() != 4 {
        return Err(ModelLoadError::UnsupportedInput(format!(
            "expected a 4-D image input, got shape {shape:?}"
        )));
    }
    if shape[0] > 1 {
        return Err(ModelLoadError::UnsupportedInput(format!(
            "batch size must be 1, got shape {shape:?}"
        )));
    }

    let is_channels = |d: i64| d == 1 || d == 3;
    let (layout, h, w, c) = if is_channels(shape[3]) {
        (TensorLayout::Nhwc, shape[1], shape[2], shape[3])
    } else if is_channels(shape[1]) {
        (TensorLayout::Nchw, shape[2], shape[3], shape[1])
    } else {
        return Err(ModelLoadError::UnsupportedInput(format!(
            "cannot find a 1 or 3 channel axis in shape {shape:?}"
        )));
    };
    if h <= 0 || w <= 0 {
        return Err(ModelLoadError::UnsupportedInput(format!(
            "dynamic spatial dimensions are not supported: {shape:?}"
        )));
    }

    Ok(InputSpec {
        layout,
        height: h as u32,
        width: w as u32,
        channels: c as u8,
        element,
    })
}
