//! Configuration module for cuotas-cli
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Authentication gate settings

pub mod paths;
pub mod settings;

pub use paths::CuotasPaths;
pub use settings::{AuthSettings, Settings};
