//! Authentication for cuotas-cli
//!
//! An optional gate in front of the allocation commands. Users are created
//! only by an administrator holding the shared setup secret; there is no
//! self-registration.

pub mod gate;
pub mod local;
pub mod password;
pub mod provider;
pub mod secure;

pub use gate::{AuthGate, GateDecision};
pub use local::{LocalAuthProvider, MIN_PASSWORD_LEN, SETUP_TOKEN_ENV};
pub use password::{hash_password, verify_password, PasswordError};
pub use provider::{normalize_email, AuthProvider, Session, User};
pub use secure::SecureString;
