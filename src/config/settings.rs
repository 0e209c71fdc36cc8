//! User settings for cuotas-cli
//!
//! Manages the display currency, the authentication gate and an optional
//! override for the community table location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::CuotasPaths;
use crate::error::CuotasError;

/// Environment variable overriding `auth.enabled`
pub const ENABLE_AUTH_ENV: &str = "CUOTAS_ENABLE_AUTH";

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_HOURS: u32 = 24 * 366;

/// Authentication gate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Whether commands require a signed-in user
    #[serde(default)]
    pub enabled: bool,

    /// How long a session stays valid after sign-in
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

/// User settings for cuotas-cli
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol printed after amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Authentication gate
    #[serde(default)]
    pub auth: AuthSettings,

    /// Community table location, relative paths resolve against the base dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_file: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_session_ttl_hours() -> u32 {
    24
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            auth: AuthSettings::default(),
            community_file: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    ///
    /// `CUOTAS_ENABLE_AUTH` is applied on top of the stored value.
    pub fn load_or_create(paths: &CuotasPaths) -> Result<Self, CuotasError> {
        let settings_path = paths.settings_file();

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| CuotasError::Io(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str(&contents).map_err(|e| {
                CuotasError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            // Don't save yet - let caller decide when to persist
            Settings::default()
        };

        if let Ok(value) = std::env::var(ENABLE_AUTH_ENV) {
            settings.apply_auth_override(&value)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Check values that serde accepts but the application cannot use
    pub fn validate(&self) -> Result<(), CuotasError> {
        let ttl = self.auth.session_ttl_hours;
        if ttl == 0 || ttl > MAX_SESSION_TTL_HOURS {
            return Err(CuotasError::Config(format!(
                "auth.session_ttl_hours must be between 1 and {}, got {}",
                MAX_SESSION_TTL_HOURS, ttl
            )));
        }
        Ok(())
    }

    /// Apply an `enabled` override given as text
    pub fn apply_auth_override(&mut self, value: &str) -> Result<(), CuotasError> {
        self.auth.enabled = parse_flag(value).ok_or_else(|| {
            CuotasError::Config(format!(
                "{} must be true or false, got '{}'",
                ENABLE_AUTH_ENV, value
            ))
        })?;
        Ok(())
    }

    /// Where the community table is read from
    pub fn community_path(&self, paths: &CuotasPaths) -> PathBuf {
        match &self.community_file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => paths.base_dir().join(file),
            None => paths.community_file(),
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CuotasPaths) -> Result<(), CuotasError> {
        paths.ensure_directories()?;
        crate::storage::write_json_atomic(paths.settings_file(), self)
    }

    /// Session lifetime as a chrono duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.auth.session_ttl_hours))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
