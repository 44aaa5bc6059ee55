//! Paddle inference model to ONNX export via `paddle2onnx`.

use async_trait::async_trait;

use super::stage::{invoke_tool, ConversionStage, StageContext};
use super::types::{ModelDirectory, StageKind, StageOutcome};
use crate::config::ArtifactNames;
use crate::platform::ToolInvocation;

/// Exports `inference.json` + `inference.pdiparams` to `model.onnx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleToOnnx;

impl PaddleToOnnx {
    /// Command line for the export, run inside the model directory.
    pub fn invocation(&self, dir: &ModelDirectory, ctx: &StageContext<'_>) -> ToolInvocation {
        ToolInvocation::new(&ctx.options.tools.paddle2onnx, &dir.path).args([
            "--model_dir",
            ".",
            "--model_filename",
            ArtifactNames::PADDLE_MODEL,
            "--params_filename",
            ArtifactNames::PADDLE_PARAMS,
            "--save_file",
            ArtifactNames::ONNX_MODEL,
        ])
    }
}

#[async_trait]
impl ConversionStage for PaddleToOnnx {
    fn kind(&self) -> StageKind {
        StageKind::PaddleToOnnx
    }

    fn inputs(&self) -> Vec<&str> {
        vec![ArtifactNames::PADDLE_MODEL, ArtifactNames::PADDLE_PARAMS]
    }

    fn output(&self) -> &str {
        ArtifactNames::ONNX_MODEL
    }

    async fn execute(&self, dir: &ModelDirectory, ctx: &StageContext<'_>) -> StageOutcome {
        match invoke_tool(ctx, &self.invocation(dir, ctx)).await {
            Ok(_) => StageOutcome::converted(ArtifactNames::ONNX_MODEL),
            Err(failure) => StageOutcome::failed(failure),
        }
    }
}
