//! Credential verification.
//!
//! The authentication service treats the credential store as an external
//! oracle: any implementation that can answer "does this identity/secret
//! pair match" will do.

use std::collections::HashMap;

/// Oracle of valid credentials.
pub trait CredentialStore: Send + Sync + 'static {
    /// Whether `secret` is the valid secret for `identity`. Unknown
    /// identities simply verify as `false`.
    fn verify(&self, identity: &str, secret: &str) -> bool;
}

/// In-memory store of plaintext identity/secret pairs.
///
/// Plaintext comparison is a stand-in for a real credential backend; this
/// store exists so the lockout machinery has something to gate.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    secrets: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, identity: impl Into<String>, secret: impl Into<String>) -> Self {
        self.secrets.insert(identity.into(), secret.into());
        self
    }

    /// The identities this store holds credentials for. Useful for building
    /// an identity directory over the same account table.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.secrets.keys().map(String::as_str)
    }
}

impl CredentialStore for StaticCredentials {
    fn verify(&self, identity: &str, secret: &str) -> bool {
        self.secrets
            .get(identity)
            .is_some_and(|expected| expected == secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_exact_pairs_only() {
        let store = StaticCredentials::new().with_account("admin", "admin");

        assert!(store.verify("admin", "admin"));
        assert!(!store.verify("admin", "wrong"));
        assert!(!store.verify("admin", ""));
        assert!(!store.verify("guest", "admin"));
        assert!(!store.verify("", ""));
    }

    #[test]
    fn identities_cover_every_account() {
        let store = StaticCredentials::new()
            .with_account("admin", "admin")
            .with_account("operator", "hunter2");

        let mut identities: Vec<_> = store.identities().collect();
        identities.sort_unstable();
        assert_eq!(identities, ["admin", "operator"]);
    }
}
