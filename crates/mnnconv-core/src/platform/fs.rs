//! Filesystem access used by detection and the conversion stages.

use std::path::Path;

/// Minimal filesystem capability needed by the pipeline.
pub trait ModelFs: Send + Sync {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Names of the regular files directly inside `dir`, sorted. Symlinks
    /// count when their target is a regular file.
    fn list_files(&self, dir: &Path) -> std::io::Result<Vec<String>>;

    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()>;
}

/// `ModelFs` backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl ModelFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, dir: &Path) -> std::io::Result<Vec<String>> {
        let mut names: Vec<String> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .filter(|e| std::fs::metadata(e.path()).map(|m| m.is_file()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }
}
