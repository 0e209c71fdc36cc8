//! Community table storage
//!
//! The owner table lives in a JSON or YAML file (chosen by extension). When
//! the file does not exist the built-in nine-owner table is used.

use std::path::Path;

use tracing::debug;

use super::file_io::{write_json_atomic, write_yaml_atomic};
use crate::error::{CuotasError, CuotasResult};
use crate::models::CommunityConfig;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()),
        Some(ref ext) if ext == "yaml" || ext == "yml"
    )
}

/// Load and validate the community table
///
/// A missing file yields the default table. A file that exists but does not
/// parse or does not validate is a `Configuration` error.
pub fn load_community(path: &Path) -> CuotasResult<CommunityConfig> {
    let config = if path.exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CuotasError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let parsed: Result<CommunityConfig, String> = if is_yaml(path) {
            serde_yaml::from_str(&contents).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&contents).map_err(|e| e.to_string())
        };

        let config = parsed.map_err(|e| {
            CuotasError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), owners = config.owners.len(), "loaded community table");
        config
    } else {
        debug!(path = %path.display(), "community table not found, using default");
        CommunityConfig::default()
    };

    config.validate()?;
    Ok(config)
}

/// Save the community table
pub fn save_community(path: &Path, config: &CommunityConfig) -> CuotasResult<()> {
    if is_yaml(path) {
        write_yaml_atomic(path, config)
    } else {
        write_json_atomic(path, config)
    }
}
