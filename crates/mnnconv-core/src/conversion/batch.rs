//! Batch conversion over many model directories.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use futures::FutureExt;
use serde::Serialize;
use tracing::{error, info};
use walkdir::WalkDir;

use super::pipeline::Pipeline;
use super::types::{ConversionResult, ModelDirectory};
use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    /// Failed model names, in processing order.
    pub failed: Vec<String>,
}

impl BatchSummary {
    fn record(&mut self, model: &str, success: bool) {
        self.total += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed.push(model.to_string());
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Completed: {}/{} successful", self.succeeded, self.total)?;
        if !self.failed.is_empty() {
            write!(f, "\nFailed: {}", self.failed.len())?;
            for name in &self.failed {
                write!(f, "\n  - {name}")?;
            }
        }
        Ok(())
    }
}

/// Runs the pipeline over a set of model directories.
#[derive(Clone)]
pub struct BatchProcessor {
    pipeline: Pipeline,
}

impl BatchProcessor {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Convert every model, in name order, one at a time.
    ///
    /// A model whose conversion errors or panics is counted as failed; the
    /// batch always runs to completion.
    pub async fn run(&self, mut models: Vec<ModelDirectory>, options: &ConvertOptions) -> BatchSummary {
        models.sort();
        info!("Found {} models", models.len());

        let mut summary = BatchSummary::default();
        for model in &models {
            let success = match self.convert_isolated(model, options).await {
                Ok(result) => result.success(),
                Err(e) => {
                    error!("  Error: {}", e);
                    false
                }
            };
            summary.record(&model.name, success);
        }
        summary
    }

    async fn convert_isolated(
        &self,
        model: &ModelDirectory,
        options: &ConvertOptions,
    ) -> Result<ConversionResult> {
        AssertUnwindSafe(self.pipeline.convert(model, options))
            .catch_unwind()
            .await
            .map_err(|payload| ConvertError::Panicked(panic_message(payload.as_ref())))?
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Immediate subdirectories of `root`, as model directories sorted by name.
pub fn discover_models(root: &Path) -> Result<Vec<ModelDirectory>> {
    if !root.exists() {
        return Err(ConvertError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConvertError::NotADirectory(root.to_path_buf()));
    }

    let mut models = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ConvertError::io_with_path(e.into(), path)
        })?;
        if entry.file_type().is_dir() {
            models.push(ModelDirectory::from_path(entry.path()));
        }
    }
    Ok(models)
}
