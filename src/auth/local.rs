//! File-backed authentication provider
//!
//! Users live in `data/users.json`, the current session in
//! `data/session.json`. Both are written atomically.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::password::{hash_password, verify_password};
use super::provider::{normalize_email, AuthProvider, Session, User};
use super::secure::SecureString;
use crate::config::{CuotasPaths, Settings};
use crate::error::{CuotasError, CuotasResult};
use crate::models::UserId;
use crate::storage::{read_json, write_json_atomic};

/// Environment variable holding the shared setup secret
pub const SETUP_TOKEN_ENV: &str = "CUOTAS_SETUP_TOKEN";

/// Minimum password length in characters
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserData {
    users: Vec<User>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionData {
    session: Option<Session>,
}

/// Authentication provider storing users and the session on disk
pub struct LocalAuthProvider {
    users_file: PathBuf,
    session_file: PathBuf,
    setup_secret: Option<SecureString>,
    session_ttl: chrono::Duration,
}

impl LocalAuthProvider {
    /// Create a provider over explicit files
    pub fn new(users_file: PathBuf, session_file: PathBuf, session_ttl: chrono::Duration) -> Self {
        Self {
            users_file,
            session_file,
            setup_secret: None,
            session_ttl,
        }
    }

    /// Create a provider from the configured paths and settings
    ///
    /// The setup secret is read from `CUOTAS_SETUP_TOKEN`; an empty value
    /// counts as unset.
    pub fn from_config(paths: &CuotasPaths, settings: &Settings) -> Self {
        let secret = std::env::var(SETUP_TOKEN_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(SecureString::from);

        Self::new(paths.users_file(), paths.session_file(), settings.session_ttl())
            .with_setup_secret(secret)
    }

    /// Set the shared setup secret
    pub fn with_setup_secret(mut self, secret: Option<SecureString>) -> Self {
        self.setup_secret = secret;
        self
    }

    fn load_users(&self) -> CuotasResult<Vec<User>> {
        let data: UserData = read_json(&self.users_file)?;
        Ok(data.users)
    }

    fn save_session(&self, session: Option<Session>) -> CuotasResult<()> {
        write_json_atomic(&self.session_file, &SessionData { session })
    }

    fn check_setup_token(&self, provided: Option<&SecureString>) -> CuotasResult<()> {
        let expected = self.setup_secret.as_ref().ok_or_else(|| {
            CuotasError::Forbidden(format!("{} is not configured", SETUP_TOKEN_ENV))
        })?;

        match provided {
            Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => Ok(()),
            _ => Err(CuotasError::Forbidden("invalid setup token".into())),
        }
    }
}

impl AuthProvider for LocalAuthProvider {
    fn current_session(&self) -> CuotasResult<Option<Session>> {
        let data: SessionData = read_json(&self.session_file)?;

        match data.session {
            Some(session) if session.is_expired_at(Utc::now()) => {
                debug!(email = %session.email, "session expired");
                self.save_session(None)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecureString,
    ) -> CuotasResult<Session> {
        let email = normalize_email(email);
        let users = self.load_users()?;

        let user = users.iter().find(|u| u.email == email);
        let verified = match user {
            Some(user) => verify_password(password, &user.password_hash)?,
            None => false,
        };

        let user = match (user, verified) {
            (Some(user), true) => user,
            _ => {
                warn!(%email, "sign-in rejected");
                return Err(CuotasError::Auth("Invalid email or password".into()));
            }
        };

        let session = Session::open(user, self.session_ttl)?;
        self.save_session(Some(session.clone()))?;
        info!(%email, "signed in");

        Ok(session)
    }

    fn sign_out(&self) -> CuotasResult<Option<Session>> {
        let data: SessionData = read_json(&self.session_file)?;
        if let Some(session) = &data.session {
            self.save_session(None)?;
            info!(email = %session.email, "signed out");
        }
        Ok(data.session)
    }

    fn admin_create_user(
        &self,
        setup_token: Option<&SecureString>,
        email: &str,
        password: &SecureString,
    ) -> CuotasResult<User> {
        self.check_setup_token(setup_token)?;

        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(CuotasError::Validation("Missing email/password".into()));
        }
        if !email.contains('@') {
            return Err(CuotasError::Validation(format!("Invalid email: {}", email)));
        }
        if password.char_count() < MIN_PASSWORD_LEN {
            return Err(CuotasError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut users = self.load_users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(CuotasError::Duplicate {
                entity_type: "User",
                identifier: email,
            });
        }

        let user = User {
            id: UserId::new(),
            email,
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        write_json_atomic(&self.users_file, &UserData { users })?;
        info!(email = %user.email, "user created");

        Ok(user)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
