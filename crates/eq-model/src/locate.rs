//! Resolution of model identifiers to model files.

use crate::{ModelError, ModelResult};
use std::path::{Path, PathBuf};

/// Environment variable holding extra model search directories.
pub const MODEL_PATH_ENV: &str = "EQ_MODEL_PATH";

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Ordered list of directories searched for model files.
#[derive(Debug, Clone, Default)]
pub struct ModelLocator {
    dirs: Vec<PathBuf>,
}

impl ModelLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search directories from `EQ_MODEL_PATH`, then the working directory.
    pub fn from_env() -> Self {
        let mut dirs: Vec<PathBuf> = std::env::var_os(MODEL_PATH_ENV)
            .map(|v| std::env::split_paths(&v).collect())
            .unwrap_or_default();
        dirs.push(PathBuf::from("."));
        Self { dirs }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve `id` to an existing file.
    ///
    /// An id that names a file is used as-is. Otherwise each directory is
    /// tried with the bare id, then `<id>.yaml`, `<id>.yml`, `<id>.json`.
    pub fn resolve(&self, id: &str) -> ModelResult<PathBuf> {
        let direct = Path::new(id);
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }

        for dir in &self.dirs {
            let bare = dir.join(id);
            if bare.is_file() {
                return Ok(bare);
            }
            for ext in EXTENSIONS {
                let candidate = dir.join(format!("{id}.{ext}"));
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }

        Err(ModelError::NotFound { id: id.to_string() })
    }
}
