//! Command gate: decides whether a protected command may run

use super::provider::{AuthProvider, Session};
use crate::error::{CuotasError, CuotasResult};

/// Outcome of a successful gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Authentication is disabled; everything is allowed
    Open,
    /// A valid session exists
    Authenticated(Session),
}

impl GateDecision {
    /// Email of the signed-in user, for audit entries
    pub fn actor(&self) -> Option<String> {
        match self {
            GateDecision::Open => None,
            GateDecision::Authenticated(session) => Some(session.email.clone()),
        }
    }
}

/// Guards protected commands behind a session when enabled
pub struct AuthGate<'a, P: AuthProvider + ?Sized> {
    enabled: bool,
    provider: &'a P,
}

impl<'a, P: AuthProvider + ?Sized> AuthGate<'a, P> {
    pub fn new(enabled: bool, provider: &'a P) -> Self {
        Self { enabled, provider }
    }

    /// Allow the command, or fail with an `Auth` error when signed out
    ///
    /// The provider is not consulted while the gate is disabled.
    pub fn check(&self) -> CuotasResult<GateDecision> {
        if !self.enabled {
            return Ok(GateDecision::Open);
        }

        match self.provider.current_session()? {
            Some(session) => Ok(GateDecision::Authenticated(session)),
            None => Err(CuotasError::Auth(
                "Sign in required: run `cuotas auth login`".into(),
            )),
        }
    }
}
