//! cuotas-cli - community expense allocation
//!
//! Splits the annual expenses of a residential community among its owners.
//! Every expense line is classified into one of three pools by keyword, and
//! each pool has its own allocation rule:
//!
//! - General: every owner pays their share percentage.
//! - Garage ("garaje"): the garage-eligible owners split it in equal parts.
//! - Building ("edificio"): the residential owners pay their percentage
//!   renormalized over the residential owners only.
//!
//! # Architecture
//!
//! - `config`: configuration and path management
//! - `error`: custom error types
//! - `models`: amounts, expenses, pools, the owner table and results
//! - `storage`: JSON/YAML file storage
//! - `services`: CSV import and the allocation engine
//! - `export`: CSV and JSON exports
//! - `display`: terminal formatting
//! - `auth`: optional sign-in gate
//! - `audit`: audit logging system
//! - `cli`: command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use cuotas_cli::models::CommunityConfig;
//! use cuotas_cli::services::{AllocationEngine, ImportService};
//!
//! let items = ImportService::new().import_file(path)?.into_items()?;
//! let report = AllocationEngine::new(CommunityConfig::default())?.allocate(&items)?;
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{CuotasError, CuotasResult};
