pub mod classification;
pub mod classifier;
pub mod inference_engine;
pub mod quantization;
