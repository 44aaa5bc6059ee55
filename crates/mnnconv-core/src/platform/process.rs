//! External tool invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// A fully-specified external tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Program name or path.
    pub program: PathBuf,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub working_dir: PathBuf,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Display name of the program (file name without directories).
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Human-readable command line, for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished tool process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Most actionable line of the error stream.
    pub fn error_summary(&self) -> String {
        match last_non_empty_line(&self.stderr) {
            Some(line) => line.to_string(),
            None => format!(
                "exited with status: {}",
                self.exit_code.unwrap_or(-1)
            ),
        }
    }
}

/// Runs external tools to completion.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run the tool and capture both output streams.
    ///
    /// An `Err` means the process could not be started or waited on; a
    /// nonzero exit is reported through `ToolOutput`.
    async fn run(&self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput>;
}

/// `ToolRunner` backed by real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput> {
        debug!(
            "Running `{}` in {}",
            invocation.command_line(),
            invocation.working_dir.display()
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(resolve_working_dir(&invocation.working_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// An empty working directory means "inherit the current one".
fn resolve_working_dir(dir: &Path) -> &Path {
    if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    }
}

/// Last line of `text` that contains something other than whitespace.
pub fn last_non_empty_line(text: &str) -> Option<&str> {
    text.lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())
}
