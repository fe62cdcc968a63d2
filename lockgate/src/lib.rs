//! # Lockgate
//!
//! Lockgate authenticates username/password pairs behind a transient
//! account-lockout gate: repeated failures against a known identity exhaust
//! its attempt budget, and further attempts are rejected until a fixed
//! window measured from the most recent failure has elapsed. Lockout state
//! lives in process memory, and the clock, identity directory, and
//! credential store are all injected explicitly, so the whole gate is
//! deterministic under test.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lockgate::{
//!     Lockgate, LockoutConfig, StaticCredentials, StaticDirectory, SystemClock,
//! };
//!
//! let clock = Arc::new(SystemClock);
//! let credentials = Arc::new(StaticCredentials::new().with_account("admin", "admin"));
//! let directory = Arc::new(StaticDirectory::new(credentials.identities()));
//!
//! let gate = Lockgate::new(clock, directory, credentials, LockoutConfig::default());
//!
//! assert!(gate.authenticate("admin", "admin").is_granted());
//! assert!(!gate.authenticate("admin", "nope").is_granted());
//! ```

use std::sync::Arc;

/// Re-export core types from lockgate_core
///
/// These types are commonly used when working with the Lockgate API.
pub use lockgate_core::{
    AdjustableClock, AuthOutcome, AuthService, Clock, CredentialStore, IdentityDirectory,
    LockoutConfig, LockoutService, LockoutStatus, StaticCredentials, StaticDirectory, SystemClock,
};

/// The wired authentication gate: a lockout tracker plus the credential
/// check that consults it.
///
/// One instance is owned by the serving process and shared behind an `Arc`
/// across request handlers. There is no ambient global state; dropping the
/// instance drops every tracked record.
pub struct Lockgate<C: Clock, D: IdentityDirectory, S: CredentialStore> {
    auth: Arc<AuthService<C, D, S>>,
    lockout: Arc<LockoutService<C, D>>,
}

impl<C: Clock, D: IdentityDirectory, S: CredentialStore> Lockgate<C, D, S> {
    pub fn new(clock: Arc<C>, directory: Arc<D>, credentials: Arc<S>, config: LockoutConfig) -> Self {
        let lockout = Arc::new(LockoutService::new(clock, directory, config));
        let auth = Arc::new(AuthService::new(lockout.clone(), credentials));
        tracing::debug!(
            max_attempts = lockout.config().max_attempts,
            "lockout gate initialized"
        );
        Self { auth, lockout }
    }

    /// Authenticate a submitted identity/secret pair. See
    /// [`AuthService::authenticate`] for the full contract.
    pub fn authenticate(&self, identity: &str, secret: &str) -> AuthOutcome {
        self.auth.authenticate(identity, secret)
    }

    /// Whether `identity` is currently locked out. Administrative and test
    /// visibility; the authenticate path performs this check itself.
    pub fn is_locked_out(&self, identity: &str) -> bool {
        self.lockout.is_locked_out(identity)
    }

    /// Full lockout report for `identity`.
    pub fn status(&self, identity: &str) -> LockoutStatus {
        self.lockout.status(identity)
    }
}
