//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::Amount;

/// Events that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    /// A user signed in
    SignIn,
    /// A user signed out
    SignOut,
    /// An administrator created a user
    CreateUser,
    /// An expense file was allocated
    Calculate,
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditEvent::SignIn => write!(f, "SIGN-IN"),
            AuditEvent::SignOut => write!(f, "SIGN-OUT"),
            AuditEvent::CreateUser => write!(f, "CREATE-USER"),
            AuditEvent::Calculate => write!(f, "CALCULATE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the event occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// What happened
    pub event: AuditEvent,

    /// Email of the signed-in user, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// What the event applies to (a user email, an expense file)
    pub subject: String,

    /// Structured details (item counts, totals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditEntry {
    fn new(event: AuditEvent, actor: Option<String>, subject: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
            actor,
            subject: subject.into(),
            details: None,
        }
    }

    /// A user signed in
    pub fn sign_in(email: &str) -> Self {
        Self::new(AuditEvent::SignIn, Some(email.to_string()), email)
    }

    /// A user signed out
    pub fn sign_out(email: &str) -> Self {
        Self::new(AuditEvent::SignOut, Some(email.to_string()), email)
    }

    /// A user account was created with the setup secret
    pub fn create_user(email: &str) -> Self {
        Self::new(AuditEvent::CreateUser, None, email)
    }

    /// An expense file was allocated
    pub fn calculate(
        actor: Option<String>,
        file: impl Into<String>,
        items: usize,
        skipped: usize,
        total: Amount,
    ) -> Self {
        let mut entry = Self::new(AuditEvent::Calculate, actor, file);
        entry.details = Some(json!({
            "items": items,
            "skipped": skipped,
            "total": total.format_fixed(),
        }));
        entry
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.event,
            self.subject
        );

        if let Some(actor) = self.actor.as_deref().filter(|a| *a != self.subject) {
            output.push_str(&format!(" (by {})", actor));
        }

        if let Some(details) = &self.details {
            output.push_str(&format!("\n  {}", details));
        }

        output
    }
}
