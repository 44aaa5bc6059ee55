//! mnnconv core - conversion of OCR models to MNN.
//!
//! Drives `paddle2onnx` and `mnnconvert` over a directory of model folders,
//! skipping work whose output already exists.
//!
//! # Example
//!
//! ```rust,ignore
//! use mnnconv_core::{discover_models, BatchProcessor, ConvertOptions, Pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> mnnconv_core::Result<()> {
//!     let models = discover_models("./ocr".as_ref())?;
//!     let batch = BatchProcessor::new(Pipeline::local());
//!     let summary = batch.run(models, &ConvertOptions::default()).await;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod conversion;
pub mod error;
pub mod platform;
pub mod system;

pub use config::{ArtifactNames, ConvertOptions, ToolConfig, ToolPaths};
pub use conversion::{
    discover_models, BatchProcessor, BatchSummary, ConversionResult, ConversionStage,
    InputFormat, ModelDirectory, ModelFormat, Pipeline, StageKind, StageOutcome,
};
pub use error::{ConvertError, Result, StageFailure};
pub use platform::{LocalFs, ModelFs, ProcessRunner, ToolInvocation, ToolOutput, ToolRunner};
pub use system::{check_dependencies, check_tool, ToolCheckResult};
