//! Admin key verification.

mod extractor;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use uuid::Uuid;

pub use extractor::{AdminAuth, AuthError};

/// Prefix of generated admin keys.
pub const ADMIN_KEY_PREFIX: &str = "stk_";

/// Generate a random admin key: the prefix followed by 64 hex characters.
pub fn generate_admin_key() -> String {
    format!(
        "{}{}{}",
        ADMIN_KEY_PREFIX,
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Shared admin key held as a `SecretString`.
///
/// `Debug` prints `[REDACTED]` and the value is zeroized on drop.
#[derive(Clone)]
pub struct AdminKey(Option<SecretString>);

impl AdminKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.filter(|k| !k.is_empty()).map(SecretString::from))
    }

    /// Whether an admin key is configured at all.
    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Compare `provided` with the configured key in constant time.
    ///
    /// Always false when no key is configured.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => secret
                .expose_secret()
                .as_bytes()
                .ct_eq(provided.as_bytes())
                .into(),
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "AdminKey([REDACTED])"),
            None => write!(f, "AdminKey(None)"),
        }
    }
}
