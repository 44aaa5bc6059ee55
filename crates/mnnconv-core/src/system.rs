//! Presence checks for the external converters.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::config::{ToolConfig, ToolPaths};
use crate::error::{ConvertError, Result};
use crate::platform::{ToolInvocation, ToolRunner};

/// Result of probing one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCheckResult {
    pub tool: String,
    /// Whether `<tool> --version` ran and exited zero.
    pub available: bool,
    /// First line of the version output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// Probe a tool by running it with `--version`.
pub async fn check_tool(runner: &dyn ToolRunner, program: &Path) -> ToolCheckResult {
    let invocation = ToolInvocation::new(program, "").arg(ToolConfig::VERSION_ARG);
    let tool = invocation.tool_name();

    match runner.run(&invocation).await {
        Ok(output) if output.success() => ToolCheckResult {
            tool,
            available: true,
            info: output
                .stdout
                .lines()
                .chain(output.stderr.lines())
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string),
        },
        Ok(output) => {
            debug!("{} --version exited with {:?}", tool, output.exit_code);
            ToolCheckResult {
                tool,
                available: false,
                info: None,
            }
        }
        Err(e) => {
            debug!("{} not runnable: {}", tool, e);
            ToolCheckResult {
                tool,
                available: false,
                info: None,
            }
        }
    }
}

/// Verify both converters are installed.
///
/// Returns `ToolUnavailable` with an install hint for the first missing one.
pub async fn check_dependencies(runner: &dyn ToolRunner, tools: &ToolPaths) -> Result<()> {
    let required = [
        (&tools.paddle2onnx, ToolConfig::PADDLE2ONNX_HINT),
        (&tools.mnnconvert, ToolConfig::MNNCONVERT_HINT),
    ];

    for (program, hint) in required {
        let check = check_tool(runner, program).await;
        if !check.available {
            return Err(ConvertError::ToolUnavailable {
                tool: check.tool,
                hint: hint.to_string(),
            });
        }
        debug!(
            "{} available: {}",
            check.tool,
            check.info.as_deref().unwrap_or("unknown version")
        );
    }
    Ok(())
}
