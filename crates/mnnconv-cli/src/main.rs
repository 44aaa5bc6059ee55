//! mnnconv - convert OCR models to MNN.
//!
//! Supports Paddle inference models (Paddle -> ONNX -> MNN, plus dictionary
//! extraction) and plain ONNX models (ONNX -> MNN).
//!
//! ```text
//! # Auto-detect and convert all models in ./ocr (with FP16)
//! mnnconv
//!
//! # Convert only ONNX models from another directory, full precision
//! mnnconv --ocr-dir ./my_ocr_models --format onnx --no-fp16
//!
//! # Convert a single model directory
//! mnnconv --model ./ocr/ch_PP-OCRv4_rec
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use mnnconv_core::{
    check_dependencies, discover_models, BatchProcessor, ConvertError, ConvertOptions,
    InputFormat, ModelDirectory, Pipeline, ToolConfig, ToolPaths,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "mnnconv")]
#[command(about = "Convert OCR models to MNN format")]
struct Args {
    /// OCR models root directory
    #[arg(long, default_value = ToolConfig::DEFAULT_OCR_DIR)]
    ocr_dir: PathBuf,

    /// Single model directory to convert (overrides --ocr-dir)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Input model format
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// Disable FP16 precision (default: enabled)
    #[arg(long)]
    no_fp16: bool,

    /// Per-tool timeout in seconds (default: none)
    #[arg(long)]
    timeout: Option<u64>,

    /// paddle2onnx executable
    #[arg(long, default_value = ToolConfig::PADDLE2ONNX)]
    paddle2onnx: PathBuf,

    /// mnnconvert executable
    #[arg(long, default_value = ToolConfig::MNNCONVERT)]
    mnnconvert: PathBuf,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Auto,
    Paddle,
    Onnx,
}

impl From<FormatArg> for InputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => InputFormat::Auto,
            FormatArg::Paddle => InputFormat::Paddle,
            FormatArg::Onnx => InputFormat::Onnx,
        }
    }
}

impl Args {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            format: self.format.into(),
            fp16: !self.no_fp16,
            tool_timeout: self.timeout.map(Duration::from_secs),
            tools: ToolPaths {
                paddle2onnx: self.paddle2onnx.clone(),
                mnnconvert: self.mnnconvert.clone(),
            },
        }
    }
}

/// Model directories selected by the arguments.
///
/// Missing `--model` or `--ocr-dir` paths are fatal.
fn model_directories(args: &Args) -> mnnconv_core::Result<Vec<ModelDirectory>> {
    match &args.model {
        Some(model) => {
            if !model.exists() {
                return Err(ConvertError::ModelNotFound(model.clone()));
            }
            Ok(vec![ModelDirectory::from_path(model)])
        }
        None => discover_models(&args.ocr_dir),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let models = model_directories(&args)?;
    let options = args.options();

    info!("OCR Model to MNN Converter");
    info!("Input format: {}", options.format.as_str().to_uppercase());
    info!("FP16: {}", options.fp16);
    match &args.model {
        Some(model) => info!("Model: {}", absolute(model).display()),
        None => info!("OCR dir: {}", absolute(&args.ocr_dir).display()),
    }

    let pipeline = Pipeline::local();
    check_dependencies(pipeline.runner(), &options.tools).await?;

    if models.is_empty() {
        warn!("No model directories found in {}", args.ocr_dir.display());
        return Ok(());
    }

    let summary = BatchProcessor::new(pipeline).run(models, &options).await;

    // Intentional stdout: the summary is the program's output.
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("\n{}", "=".repeat(60));
        println!("{summary}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["mnnconv"]);
        assert_eq!(args.ocr_dir, PathBuf::from("./ocr"));
        let options = args.options();
        assert_eq!(options, ConvertOptions::default());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "mnnconv",
            "--format",
            "onnx",
            "--no-fp16",
            "--timeout",
            "30",
            "--mnnconvert",
            "/opt/mnn/bin/MNNConvert",
        ]);
        let options = args.options();
        assert_eq!(options.format, InputFormat::Onnx);
        assert!(!options.fp16);
        assert_eq!(options.tool_timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.tools.mnnconvert, PathBuf::from("/opt/mnn/bin/MNNConvert"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["mnnconv", "--format", "tflite"]).is_err());
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let args = Args::parse_from(["mnnconv", "--model", "/nonexistent/model"]);
        let err = model_directories(&args).unwrap_err();
        assert!(matches!(err, ConvertError::ModelNotFound(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_model_overrides_ocr_dir() {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("ch_PP-OCRv4_det");
        std::fs::create_dir(&model).unwrap();
        let args = Args::parse_from([
            "mnnconv",
            "--ocr-dir",
            "/nonexistent/ocr",
            "--model",
            model.to_str().unwrap(),
        ]);
        let models = model_directories(&args).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "ch_PP-OCRv4_det");
    }

    #[test]
    fn test_missing_ocr_dir_is_fatal() {
        let args = Args::parse_from(["mnnconv", "--ocr-dir", "/nonexistent/ocr"]);
        assert!(matches!(
            model_directories(&args),
            Err(ConvertError::RootNotFound(_))
        ));
    }
}
