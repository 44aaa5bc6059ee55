//! Types for model conversion runs.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StageFailure;

/// Input format requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Paddle,
    Onnx,
    /// Detect per model directory.
    #[default]
    Auto,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Paddle => "paddle",
            InputFormat::Onnx => "onnx",
            InputFormat::Auto => "auto",
        }
    }

    /// The concrete format, if this one is pinned.
    pub fn pinned(&self) -> Option<ModelFormat> {
        match self {
            InputFormat::Paddle => Some(ModelFormat::Paddle),
            InputFormat::Onnx => Some(ModelFormat::Onnx),
            InputFormat::Auto => None,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paddle" => Ok(InputFormat::Paddle),
            "onnx" => Ok(InputFormat::Onnx),
            "auto" => Ok(InputFormat::Auto),
            other => Err(format!("unknown input format: {other}")),
        }
    }
}

/// A resolved, concrete source format. Stages only ever see this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Paddle,
    Onnx,
}

impl ModelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Paddle => "paddle",
            ModelFormat::Onnx => "onnx",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a conversion stage. Ordered as the pipeline runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    PaddleToOnnx,
    OnnxToMnn,
    ExtractDict,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::PaddleToOnnx => "paddle_to_onnx",
            StageKind::OnnxToMnn => "onnx_to_mnn",
            StageKind::ExtractDict => "extract_dict",
        }
    }

    /// Short tag used in progress logs.
    pub fn label(&self) -> &'static str {
        match self {
            StageKind::PaddleToOnnx => "ONNX",
            StageKind::OnnxToMnn => "MNN",
            StageKind::ExtractDict => "Dict",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one stage against one model directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    /// An external tool or writer was actually run.
    pub attempted: bool,
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StageOutcome {
    /// Work was performed and succeeded.
    pub fn converted(detail: impl Into<String>) -> Self {
        Self {
            attempted: true,
            succeeded: true,
            detail: Some(detail.into()),
        }
    }

    /// Output artifact was already present; nothing was run.
    pub fn already_done(output: &str) -> Self {
        Self {
            attempted: false,
            succeeded: true,
            detail: Some(format!("already exists: {output}")),
        }
    }

    /// Work was performed and failed.
    pub fn failed(failure: StageFailure) -> Self {
        Self {
            attempted: true,
            succeeded: false,
            detail: Some(failure.to_string()),
        }
    }

    /// Nothing was run because a precondition did not hold.
    pub fn not_run(failure: StageFailure) -> Self {
        Self {
            attempted: false,
            succeeded: false,
            detail: Some(failure.to_string()),
        }
    }

    /// Result satisfied by a prior run rather than this one.
    pub fn is_idempotent_skip(&self) -> bool {
        self.succeeded && !self.attempted
    }
}

/// A model directory to convert.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelDirectory {
    pub name: String,
    pub path: PathBuf,
}

impl ModelDirectory {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Name the directory after its last path component.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self::new(name, path)
    }

    pub fn join(&self, file: &str) -> PathBuf {
        self.path.join(file)
    }
}

/// Per-model outcome record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<ModelFormat>,
    stages: BTreeMap<StageKind, StageOutcome>,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ConversionResult {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Result for a model whose format could not be determined.
    pub fn undetectable(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            error: Some("could not detect input format (no Paddle or ONNX files found)".into()),
            ..Default::default()
        }
    }

    pub fn set_format(&mut self, format: ModelFormat) {
        self.format = Some(format);
    }

    /// Record a stage outcome; `success` is kept in sync.
    pub fn record(&mut self, stage: StageKind, outcome: StageOutcome) {
        self.stages.insert(stage, outcome);
        self.success = self.stages.values().any(|o| o.succeeded);
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn format(&self) -> Option<ModelFormat> {
        self.format
    }

    pub fn stage(&self, stage: StageKind) -> Option<&StageOutcome> {
        self.stages.get(&stage)
    }

    pub fn stages(&self) -> &BTreeMap<StageKind, StageOutcome> {
        &self.stages
    }

    /// True iff any stage the pipeline ran succeeded.
    pub fn success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
