//! Secret strings that are wiped on drop

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string type that zeros its contents on drop
///
/// Use this for passwords and the setup secret.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    /// Create a new SecureString
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the string contents
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.inner.chars().count()
    }
}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_creation() {
        let s = SecureString::new("contraseña");
        assert_eq!(s.as_str(), "contraseña");
        assert_eq!(s.char_count(), 10);
        assert!(s.len() > s.char_count());
        assert!(!s.is_empty());
    }

    #[test]
    fn test_secure_string_redacted() {
        let s: SecureString = String::from("secret").into();
        assert!(!format!("{:?}", s).contains("secret"));
        assert_eq!(s.to_string(), "[REDACTED 6 bytes]");
    }

    #[test]
    fn test_zeroize_clears() {
        let mut s = SecureString::from("secret");
        s.zeroize();
        assert!(s.is_empty());
    }
}
