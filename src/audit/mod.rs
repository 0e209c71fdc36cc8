//! Audit logging system for cuotas-cli
//!
//! Records sign-ins, sign-outs, user creation and every calculation in an
//! append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: a single audit log entry with timestamp, event, actor and
//!   optional structured details.
//! - `AuditLogger`: writes entries to the audit log file using a
//!   line-delimited JSON format (JSONL).
//!
//! # Example
//!
//! ```rust,ignore
//! use cuotas_cli::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::sign_in("admin@example.com"))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, AuditEvent};
pub use logger::AuditLogger;
