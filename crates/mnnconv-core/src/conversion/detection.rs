//! Source format detection for model directories.

use std::path::Path;

use super::types::{InputFormat, ModelFormat};
use crate::config::ArtifactNames;
use crate::platform::ModelFs;

/// Classify a model directory by the artifacts it contains.
///
/// Paddle wins over ONNX when both are present: a Paddle directory that has
/// already been exported keeps its `model.onnx` next to the sources.
pub fn detect_format(fs: &dyn ModelFs, dir: &Path) -> std::io::Result<Option<ModelFormat>> {
    if has_paddle_model(fs, dir) {
        return Ok(Some(ModelFormat::Paddle));
    }
    if !find_onnx_files(fs, dir)?.is_empty() {
        return Ok(Some(ModelFormat::Onnx));
    }
    Ok(None)
}

/// Resolve a requested format to a concrete one for this directory.
///
/// Pinned formats are returned as-is without touching the filesystem.
pub fn resolve_format(
    requested: InputFormat,
    fs: &dyn ModelFs,
    dir: &Path,
) -> std::io::Result<Option<ModelFormat>> {
    match requested.pinned() {
        Some(format) => Ok(Some(format)),
        None => detect_format(fs, dir),
    }
}

/// Both the Paddle model definition and parameters are present.
pub fn has_paddle_model(fs: &dyn ModelFs, dir: &Path) -> bool {
    fs.exists(&dir.join(ArtifactNames::PADDLE_MODEL))
        && fs.exists(&dir.join(ArtifactNames::PADDLE_PARAMS))
}

/// `*.onnx` file names in `dir`, sorted.
pub fn find_onnx_files(fs: &dyn ModelFs, dir: &Path) -> std::io::Result<Vec<String>> {
    Ok(fs
        .list_files(dir)?
        .into_iter()
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                == Some(ArtifactNames::ONNX_EXTENSION)
        })
        .collect())
}
