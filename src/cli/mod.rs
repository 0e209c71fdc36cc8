//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod auth;
pub mod calculate;
pub mod community;

pub use audit::handle_audit_command;
pub use auth::{handle_auth_command, AuthCommands};
pub use calculate::{handle_calculate_command, CalculateArgs};
pub use community::{handle_classify_command, handle_owners_command};

use crate::audit::AuditLogger;
use crate::auth::{AuthGate, GateDecision, LocalAuthProvider};
use crate::config::{CuotasPaths, Settings};
use crate::error::CuotasResult;
use crate::models::CommunityConfig;
use crate::storage::load_community;

/// Paths and settings shared by every command
pub struct CliContext {
    pub paths: CuotasPaths,
    pub settings: Settings,
}

impl CliContext {
    /// Resolve paths and load settings from the environment
    pub fn load() -> CuotasResult<Self> {
        let paths = CuotasPaths::new()?;
        let settings = Settings::load_or_create(&paths)?;
        Ok(Self { paths, settings })
    }

    /// Load and validate the community table
    pub fn community(&self) -> CuotasResult<CommunityConfig> {
        load_community(&self.settings.community_path(&self.paths))
    }

    /// The authentication provider backing the gate
    pub fn auth_provider(&self) -> LocalAuthProvider {
        LocalAuthProvider::from_config(&self.paths, &self.settings)
    }

    /// Check the authentication gate for a protected command
    pub fn require_session(&self) -> CuotasResult<GateDecision> {
        let provider = self.auth_provider();
        AuthGate::new(self.settings.auth.enabled, &provider).check()
    }

    /// The audit logger
    pub fn audit(&self) -> AuditLogger {
        AuditLogger::new(self.paths.audit_log())
    }
}
