pub mod onnx_engine;
