pub mod model_resolver;
pub mod onnx_blazeface_detector;
pub mod onnx_model_probe;
pub mod onnx_session;
