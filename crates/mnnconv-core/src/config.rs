//! Centralized configuration for mnnconv.
//!
//! Artifact filenames are part of the on-disk contract with the OCR runtime
//! and must not change. Run options are passed explicitly to the pipeline.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::conversion::InputFormat;

/// Filenames inside a model directory.
pub struct ArtifactNames;

impl ArtifactNames {
    pub const PADDLE_MODEL: &'static str = "inference.json";
    pub const PADDLE_PARAMS: &'static str = "inference.pdiparams";
    pub const PADDLE_CONFIG: &'static str = "inference.yml";
    pub const ONNX_MODEL: &'static str = "model.onnx";
    pub const MNN_MODEL: &'static str = "model.mnn";
    pub const CHARACTER_DICT: &'static str = "ppocr_keys.txt";
    pub const ONNX_EXTENSION: &'static str = "onnx";
    pub const MNN_EXTENSION: &'static str = "mnn";
}

/// External converter configuration.
pub struct ToolConfig;

impl ToolConfig {
    pub const PADDLE2ONNX: &'static str = "paddle2onnx";
    pub const MNNCONVERT: &'static str = "mnnconvert";
    pub const MNN_BIZ_CODE: &'static str = "mnn";
    pub const VERSION_ARG: &'static str = "--version";
    pub const PADDLE2ONNX_HINT: &'static str = "Install: pip install paddle2onnx";
    pub const MNNCONVERT_HINT: &'static str = "Install from: https://github.com/alibaba/MNN";
    pub const DEFAULT_OCR_DIR: &'static str = "./ocr";
}

/// Program paths for the two external converters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    pub paddle2onnx: PathBuf,
    pub mnnconvert: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            paddle2onnx: PathBuf::from(ToolConfig::PADDLE2ONNX),
            mnnconvert: PathBuf::from(ToolConfig::MNNCONVERT),
        }
    }
}

/// Options for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Declared input format; `Auto` is resolved per model.
    pub format: InputFormat,
    /// Append `--fp16` to the MNN conversion.
    pub fp16: bool,
    /// Upper bound for a single tool invocation.
    #[serde(default)]
    pub tool_timeout: Option<Duration>,
    #[serde(default)]
    pub tools: ToolPaths,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: InputFormat::Auto,
            fp16: true,
            tool_timeout: None,
            tools: ToolPaths::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert_eq!(options.format, InputFormat::Auto);
        assert!(options.fp16);
        assert!(options.tool_timeout.is_none());
        assert_eq!(options.tools.mnnconvert, PathBuf::from("mnnconvert"));
    }

    #[test]
    fn test_options_field_names() {
        let json = serde_json::to_value(ConvertOptions::default()).unwrap();
        assert_eq!(json["format"], "auto");
        assert_eq!(json["fp16"], true);
        assert!(json["tool_timeout"].is_null());

        let parsed: ConvertOptions =
            serde_json::from_str(r#"{"format": "onnx", "fp16": false}"#).unwrap();
        assert_eq!(parsed.format, InputFormat::Onnx);
        assert_eq!(parsed.tools, ToolPaths::default());
    }
}
