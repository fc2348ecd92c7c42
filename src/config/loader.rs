use super::{validate_config, Config, ConfigError};
use crate::filesystem::FileSystem;
use crate::value::Value;
use std::path::Path;
use tracing::debug;

/// Read a JSON configuration document without validating it.
pub fn load_config_document<F: FileSystem + ?Sized>(
    path: &Path,
    fs: &F,
) -> Result<Value, ConfigError> {
    let content = fs.read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let json: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let document = Value::from_json(json).map_err(|source| ConfigError::Regex {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "Loaded configuration document");
    Ok(document)
}

pub fn load_config<F: FileSystem + ?Sized>(path: &Path, fs: &F) -> Result<Config, ConfigError> {
    validate_config(&load_config_document(path, fs)?)
}
