//! Paddle/ONNX to MNN model conversion.
//!
//! Each model directory goes through a short sequence of idempotent stages
//! that drive two external converters (`paddle2onnx`, `mnnconvert`) and
//! extract the recognition dictionary from the Paddle inference config.
//! `Pipeline` handles one directory; `BatchProcessor` handles many.

mod batch;
pub mod detection;
pub mod dictionary;
mod mnnconvert;
mod paddle2onnx;
mod pipeline;
mod stage;
mod types;

pub use batch::{discover_models, BatchProcessor, BatchSummary};
pub use detection::{detect_format, resolve_format};
pub use dictionary::DictionaryExtraction;
pub use mnnconvert::OnnxToMnn;
pub use paddle2onnx::PaddleToOnnx;
pub use pipeline::Pipeline;
pub use stage::{invoke_tool, ConversionStage, StageContext};
pub use types::{
    ConversionResult, InputFormat, ModelDirectory, ModelFormat, StageKind, StageOutcome,
};
