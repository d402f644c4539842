use ndarray::Array4;

use super::quantization::QuantizationParams;

/// Memory layout of the model's 4-D image input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, height, width, channels]`
    Nhwc,
    /// `[1, channels, height, width]`
    Nchw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputElement {
    /// Raw 0-255 pixel bytes (quantized models).
    U8,
    /// Normalized floats.
    F32,
}

/// The single image input an engine declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSpec {
    pub layout: TensorLayout,
    pub height: u32,
    pub width: u32,
    pub channels: u8,
    pub element: InputElement,
}

impl InputSpec {
    pub fn dims(&self) -> (u32, u32, u8) {
        (self.height, self.width, self.channels)
    }

    pub fn shape(&self) -> (usize, usize, usize, usize) {
        let (h, w, c) = (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        );
        match self.layout {
            TensorLayout::Nhwc => (1, h, w, c),
            TensorLayout::Nchw => (1, c, h, w),
        }
    }
}

/// Input buffer bound to the engine for one forward pass.
#[derive(Clone, Debug, PartialEq)]
pub enum InputTensor {
    U8(Array4<u8>),
    F32(Array4<f32>),
}

/// The engine's first output, squeezed to one value per class.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputTensor {
    Float(Vec<f32>),
    Quantized {
        values: Vec<u8>,
        quantization: QuantizationParams,
    },
}

impl OutputTensor {
    /// Real-valued scores. Quantized outputs are always dequantized.
    pub fn into_scores(self) -> Vec<f32> {
        match self {
            OutputTensor::Float(values) => values,
            OutputTensor::Quantized {
                values,
                quantization,
            } => quantization.dequantize_all(&values),
        }
    }
}

/// Runs one forward pass of a loaded image-classification model.
///
/// The engine owns its runtime session and buffers; they are allocated
/// when the engine is constructed, not on first use.
pub trait InferenceEngine {
    fn input_spec(&self) -> InputSpec;

    fn invoke(&mut self, input: InputTensor) -> Result<OutputTensor, Box<dyn std::error::Error>>;
}
