//! Per-model conversion pipeline.
//!
//! Paddle sources run export, then MNN conversion only if the export
//! succeeded, then dictionary extraction regardless of the other two.
//! ONNX sources run a single direct MNN conversion. A model whose format
//! cannot be determined runs nothing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::detection::{find_onnx_files, resolve_format};
use super::dictionary::DictionaryExtraction;
use super::mnnconvert::OnnxToMnn;
use super::paddle2onnx::PaddleToOnnx;
use super::stage::{ConversionStage, StageContext};
use super::types::{ConversionResult, ModelDirectory, ModelFormat, StageKind, StageOutcome};
use crate::config::{ArtifactNames, ConvertOptions};
use crate::error::{ConvertError, Result, StageFailure};
use crate::platform::{LocalFs, ModelFs, ProcessRunner, ToolRunner};

/// Converts a single model directory.
#[derive(Clone)]
pub struct Pipeline {
    runner: Arc<dyn ToolRunner>,
    fs: Arc<dyn ModelFs>,
}

impl Pipeline {
    pub fn new(runner: Arc<dyn ToolRunner>, fs: Arc<dyn ModelFs>) -> Self {
        Self { runner, fs }
    }

    /// Pipeline backed by real subprocesses and the local disk.
    pub fn local() -> Self {
        Self::new(Arc::new(ProcessRunner), Arc::new(LocalFs))
    }

    pub fn runner(&self) -> &dyn ToolRunner {
        &*self.runner
    }

    /// Convert one model directory.
    ///
    /// Stage failures are recorded in the result. An `Err` is only returned
    /// when the directory itself cannot be inspected.
    pub async fn convert(
        &self,
        dir: &ModelDirectory,
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        info!("{}:", dir.name);

        let ctx = StageContext {
            runner: &*self.runner,
            fs: &*self.fs,
            options,
        };

        let resolved = resolve_format(options.format, ctx.fs, &dir.path)
            .map_err(|e| ConvertError::io_with_path(e, &dir.path))?;
        let format = match resolved {
            Some(format) => format,
            None => {
                warn!("  [ERROR] Could not detect input format (no Paddle or ONNX files found)");
                return Ok(ConversionResult::undetectable(&dir.name));
            }
        };
        if options.format.pinned().is_none() {
            info!("  [Detected] {} format", format.as_str().to_uppercase());
        }

        let mut result = ConversionResult::new(&dir.name);
        result.set_format(format);

        match format {
            ModelFormat::Paddle => self.convert_paddle(dir, &ctx, &mut result).await,
            ModelFormat::Onnx => self.convert_onnx(dir, &ctx, &mut result).await?,
        }

        Ok(result)
    }

    async fn convert_paddle(
        &self,
        dir: &ModelDirectory,
        ctx: &StageContext<'_>,
        result: &mut ConversionResult,
    ) {
        let export = run_stage(&PaddleToOnnx, dir, ctx).await;
        let exported = export.succeeded;
        result.record(StageKind::PaddleToOnnx, export);

        let mnn = if exported {
            run_stage(&OnnxToMnn::exported(), dir, ctx).await
        } else {
            StageOutcome::not_run(StageFailure::Skipped(format!(
                "{} did not succeed",
                StageKind::PaddleToOnnx
            )))
        };
        result.record(StageKind::OnnxToMnn, mnn);

        let dict = run_stage(&DictionaryExtraction, dir, ctx).await;
        result.record(StageKind::ExtractDict, dict);
    }

    async fn convert_onnx(
        &self,
        dir: &ModelDirectory,
        ctx: &StageContext<'_>,
        result: &mut ConversionResult,
    ) -> Result<()> {
        let onnx_files = find_onnx_files(ctx.fs, &dir.path)
            .map_err(|e| ConvertError::io_with_path(e, &dir.path))?;

        let outcome = match onnx_files.first() {
            Some(onnx_file) => {
                let stage = OnnxToMnn::direct(onnx_file);
                info!("  [Input] {}", stage.input_file());
                info!("  [Output] {}", stage.output_file());
                run_stage(&stage, dir, ctx).await
            }
            None => StageOutcome::not_run(StageFailure::MissingInput(format!(
                "*.{}",
                ArtifactNames::ONNX_EXTENSION
            ))),
        };
        result.record(StageKind::OnnxToMnn, outcome);
        Ok(())
    }
}

async fn run_stage(
    stage: &dyn ConversionStage,
    dir: &ModelDirectory,
    ctx: &StageContext<'_>,
) -> StageOutcome {
    let outcome = stage.run(dir, ctx).await;
    report(stage.kind(), &outcome);
    outcome
}

fn report(kind: StageKind, outcome: &StageOutcome) {
    let label = kind.label();
    let detail = outcome.detail.as_deref().unwrap_or_default();
    match (outcome.attempted, outcome.succeeded) {
        (_, true) => info!("  [{}] ✓ ({})", label, detail),
        (true, false) => warn!("  [{}] Failed: {}", label, detail),
        (false, false) => debug!("  [{}] {}", label, detail),
    }
}
