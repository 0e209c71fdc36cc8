//! The authentication capability used by the command gate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::secure::SecureString;
use crate::error::{CuotasError, CuotasResult};
use crate::models::{SessionToken, UserId};

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Normalized (trimmed, lowercase) email
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// An active sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Open a session for `user` lasting `ttl`
    ///
    /// Fails with `Config` when the expiry falls outside the supported dates.
    pub fn open(user: &User, ttl: chrono::Duration) -> CuotasResult<Self> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            CuotasError::Config(format!("session lifetime of {} is out of range", ttl))
        })?;
        Ok(Self {
            token: SessionToken::new(),
            user_id: user.id,
            email: user.email.clone(),
            created_at: now,
            expires_at,
        })
    }

    /// True once `now` has reached the expiry time
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Authentication backend
///
/// Self-registration is not offered: users only come into existence through
/// `admin_create_user`, which is guarded by a shared setup secret.
pub trait AuthProvider {
    /// The current session, or `None` when signed out or expired
    fn current_session(&self) -> CuotasResult<Option<Session>>;

    /// Sign in, replacing any current session
    fn sign_in_with_password(&self, email: &str, password: &SecureString)
        -> CuotasResult<Session>;

    /// Sign out, returning the session that was ended
    fn sign_out(&self) -> CuotasResult<Option<Session>>;

    /// Create a user; `setup_token` must match the configured setup secret
    fn admin_create_user(
        &self,
        setup_token: Option<&SecureString>,
        email: &str,
        password: &SecureString,
    ) -> CuotasResult<User>;
}

/// Trim and lowercase an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
