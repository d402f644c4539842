/// Affine quantization parameters attached to a `u8` output tensor.
///
/// A raw byte maps back to its real value as `scale * (raw - zero_point)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantizationParams {
    pub scale: f32,
    pub zero_point: i32,
}

impl QuantizationParams {
    pub fn new(scale: f32, zero_point: i32) -> Self {
        Self { scale, zero_point }
    }

    pub fn dequantize(&self, raw: u8) -> f32 {
        self.scale * (raw as i32 - self.zero_point) as f32
    }

    pub fn dequantize_all(&self, raw: &[u8]) -> Vec<f32> {
        raw.iter().map(|&v| self.dequantize(v)).collect()
    }
}
