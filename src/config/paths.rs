//! Path management for cuotas-cli
//!
//! ## Path Resolution Order
//!
//! 1. `CUOTAS_CLI_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config`, `%APPDATA%`,
//!    `~/Library/Application Support`) joined with `cuotas-cli`

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::CuotasError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "CUOTAS_CLI_DATA_DIR";

const APP_DIR_NAME: &str = "cuotas-cli";

/// Manages all paths used by cuotas-cli
#[derive(Debug, Clone)]
pub struct CuotasPaths {
    base_dir: PathBuf,
}

impl CuotasPaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, CuotasError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (users and sessions)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the default path of the community owner table
    pub fn community_file(&self) -> PathBuf {
        self.base_dir.join("community.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to users.json
    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Get the path to session.json
    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), CuotasError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CuotasError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| CuotasError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if cuotas-cli has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, CuotasError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| CuotasError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join(APP_DIR_NAME))
}
