//! eq-model: thermodynamic model file format, validation and lookup.

pub mod locate;
pub mod schema;
pub mod validate;

pub use locate::{MODEL_PATH_ENV, ModelLocator};
pub use schema::*;
pub use validate::{ValidationError, validate_model};

use std::path::{Path, PathBuf};

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model not found: {id}")]
    NotFound { id: String },

    #[error("Unsupported model file extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ModelResult<ModelFile> {
    let content = std::fs::read_to_string(path)?;
    let model: ModelFile = serde_yaml::from_str(&content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn save_yaml(path: &Path, model: &ModelFile) -> ModelResult<()> {
    validate_model(model)?;
    let content = serde_yaml::to_string(model)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ModelResult<ModelFile> {
    let content = std::fs::read_to_string(path)?;
    let model: ModelFile = serde_json::from_str(&content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn save_json(path: &Path, model: &ModelFile) -> ModelResult<()> {
    validate_model(model)?;
    let content = serde_json::to_string_pretty(model)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a model file, picking the parser from the extension.
pub fn load_path(path: &Path) -> ModelResult<ModelFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ModelError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
