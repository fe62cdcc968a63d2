//! Credential checks gated by the lockout tracker.

use std::sync::Arc;

use crate::{
    clock::Clock, credentials::CredentialStore, directory::IdentityDirectory,
    services::LockoutService,
};

/// Outcome of a single authentication attempt.
///
/// The contract result is the boolean from [`is_granted`](Self::is_granted);
/// the denial reason is carried for observability and for transport layers
/// that want to map the two denials differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Granted,
    InvalidCredentials,
    LockedOut,
}

impl AuthOutcome {
    pub fn is_granted(self) -> bool {
        matches!(self, AuthOutcome::Granted)
    }
}

/// Gates a credential check behind the lockout tracker.
pub struct AuthService<C: Clock, D: IdentityDirectory, S: CredentialStore> {
    lockout: Arc<LockoutService<C, D>>,
    credentials: Arc<S>,
}

impl<C: Clock, D: IdentityDirectory, S: CredentialStore> AuthService<C, D, S> {
    pub fn new(lockout: Arc<LockoutService<C, D>>, credentials: Arc<S>) -> Self {
        Self {
            lockout,
            credentials,
        }
    }

    pub fn lockout(&self) -> &LockoutService<C, D> {
        &self.lockout
    }

    /// Authenticate `identity` with `secret`.
    ///
    /// A locked-out identity is rejected before the credential store is
    /// consulted, and without registering a further failure: new attempts
    /// while locked neither consume attempts nor extend the window. Only a
    /// failed credential check against an unlocked identity mutates the
    /// tracker.
    pub fn authenticate(&self, identity: &str, secret: &str) -> AuthOutcome {
        if self.lockout.is_locked_out(identity) {
            tracing::debug!(identity, "attempt rejected while locked out");
            return AuthOutcome::LockedOut;
        }
        if self.credentials.verify(identity, secret) {
            tracing::debug!(identity, "authentication granted");
            return AuthOutcome::Granted;
        }
        self.lockout.register_failed_attempt(identity);
        AuthOutcome::InvalidCredentials
    }
}
