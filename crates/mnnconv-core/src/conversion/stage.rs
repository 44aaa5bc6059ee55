//! Shared stage contract and tool invocation helper.
//!
//! Every stage follows the same four steps: check inputs, check whether the
//! output already exists, do the work, interpret the result. The first two
//! are provided by `ConversionStage::run`; stages implement `execute`.

use async_trait::async_trait;
use tracing::debug;

use super::types::{ModelDirectory, StageKind, StageOutcome};
use crate::config::ConvertOptions;
use crate::error::StageFailure;
use crate::platform::{ModelFs, ToolInvocation, ToolOutput, ToolRunner};

/// Capabilities and options handed to each stage.
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub runner: &'a dyn ToolRunner,
    pub fs: &'a dyn ModelFs,
    pub options: &'a ConvertOptions,
}

/// One idempotent unit of conversion work.
#[async_trait]
pub trait ConversionStage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Files that must exist in the model directory before running.
    fn inputs(&self) -> Vec<&str>;

    /// File whose presence means the stage has nothing left to do.
    fn output(&self) -> &str;

    /// Perform the work. Only called once inputs exist and output does not.
    async fn execute(&self, dir: &ModelDirectory, ctx: &StageContext<'_>) -> StageOutcome;

    /// Run the stage with precondition and idempotence checks.
    ///
    /// Never returns an error: every failure is folded into the outcome.
    async fn run(&self, dir: &ModelDirectory, ctx: &StageContext<'_>) -> StageOutcome {
        if let Some(missing) = self
            .inputs()
            .into_iter()
            .find(|input| !ctx.fs.exists(&dir.join(input)))
        {
            return StageOutcome::not_run(StageFailure::MissingInput(missing.to_string()));
        }

        let output = self.output();
        if ctx.fs.exists(&dir.join(output)) {
            debug!("[{}] {} already exists, skipping", dir.name, output);
            return StageOutcome::already_done(output);
        }

        self.execute(dir, ctx).await
    }
}

/// Run an external tool and map every failure mode to a `StageFailure`.
///
/// Nonzero exits carry the last non-empty stderr line. Spawn errors and
/// timeouts are reported the same way, never propagated.
pub async fn invoke_tool(
    ctx: &StageContext<'_>,
    invocation: &ToolInvocation,
) -> Result<ToolOutput, StageFailure> {
    let tool = invocation.tool_name();
    debug!("Invoking: {}", invocation.command_line());

    let result = match ctx.options.tool_timeout {
        Some(timeout) => tokio::time::timeout(timeout, ctx.runner.run(invocation))
            .await
            .map_err(|_| StageFailure::Timeout {
                tool: tool.clone(),
                timeout,
            })?,
        None => ctx.runner.run(invocation).await,
    };

    let output = result.map_err(|e| StageFailure::Invocation {
        tool: tool.clone(),
        message: e.to_string(),
    })?;

    if !output.success() {
        return Err(StageFailure::ToolFailed {
            tool,
            message: output.error_summary(),
        });
    }
    Ok(output)
}
