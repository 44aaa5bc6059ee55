//! ONNX to MNN conversion via `mnnconvert`.

use std::path::Path;

use async_trait::async_trait;

use super::stage::{invoke_tool, ConversionStage, StageContext};
use super::types::{ModelDirectory, StageKind, StageOutcome};
use crate::config::{ArtifactNames, ToolConfig};
use crate::platform::ToolInvocation;

/// Converts one ONNX file in a model directory to MNN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnnxToMnn {
    input: String,
    output: String,
}

impl OnnxToMnn {
    /// `model.onnx` -> `model.mnn`, the second half of the Paddle path.
    pub fn exported() -> Self {
        Self {
            input: ArtifactNames::ONNX_MODEL.to_string(),
            output: ArtifactNames::MNN_MODEL.to_string(),
        }
    }

    /// `<stem>.onnx` -> `<stem>.mnn`, used in direct-ONNX mode.
    pub fn direct(onnx_file: &str) -> Self {
        let output = Path::new(onnx_file)
            .with_extension(ArtifactNames::MNN_EXTENSION)
            .to_string_lossy()
            .to_string();
        Self {
            input: onnx_file.to_string(),
            output,
        }
    }

    pub fn input_file(&self) -> &str {
        &self.input
    }

    pub fn output_file(&self) -> &str {
        &self.output
    }

    /// Command line for the conversion, run inside the model directory.
    pub fn invocation(&self, dir: &ModelDirectory, ctx: &StageContext<'_>) -> ToolInvocation {
        let inv = ToolInvocation::new(&ctx.options.tools.mnnconvert, &dir.path).args([
            "-f",
            "ONNX",
            "--modelFile",
            self.input.as_str(),
            "--MNNModel",
            self.output.as_str(),
            "--bizCode",
            ToolConfig::MNN_BIZ_CODE,
        ]);
        if ctx.options.fp16 {
            inv.arg("--fp16")
        } else {
            inv
        }
    }
}

#[async_trait]
impl ConversionStage for OnnxToMnn {
    fn kind(&self) -> StageKind {
        StageKind::OnnxToMnn
    }

    fn inputs(&self) -> Vec<&str> {
        vec![self.input.as_str()]
    }

    fn output(&self) -> &str {
        &self.output
    }

    async fn execute(&self, dir: &ModelDirectory, ctx: &StageContext<'_>) -> StageOutcome {
        match invoke_tool(ctx, &self.invocation(dir, ctx)).await {
            Ok(_) => StageOutcome::converted(format!(
                "{} (fp16={})",
                self.output, ctx.options.fp16
            )),
            Err(failure) => StageOutcome::failed(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvertOptions;
    use crate::platform::{LocalFs, ProcessRunner};

    #[test]
    fn test_direct_naming() {
        let stage = OnnxToMnn::direct("foo.onnx");
        assert_eq!(stage.input_file(), "foo.onnx");
        assert_eq!(stage.output_file(), "foo.mnn");

        let dotted = OnnxToMnn::direct("ch_PP-OCRv4.rec.onnx");
        assert_eq!(dotted.output_file(), "ch_PP-OCRv4.rec.mnn");
    }

    #[test]
    fn test_fp16_flag() {
        let dir = ModelDirectory::from_path("/models/det");
        let mut options = ConvertOptions::default();
        let stage = OnnxToMnn::exported();

        let ctx = StageContext {
            runner: &ProcessRunner,
            fs: &LocalFs,
            options: &options,
        };
        let inv = stage.invocation(&dir, &ctx);
        assert_eq!(
            inv.args,
            vec![
                "-f",
                "ONNX",
                "--modelFile",
                "model.onnx",
                "--MNNModel",
                "model.mnn",
                "--bizCode",
                "mnn",
                "--fp16",
            ]
        );

        options.fp16 = false;
        let ctx = StageContext {
            runner: &ProcessRunner,
            fs: &LocalFs,
            options: &options,
        };
        let inv = stage.invocation(&dir, &ctx);
        assert_eq!(inv.args.last().map(String::as_str), Some("mnn"));
    }
}
