//! # Lockgate Axum Integration
//!
//! This crate exposes the lockgate authentication gate over HTTP: a login
//! endpoint that reports granted/denied (with lockout surfaced as its own
//! status code), a per-identity lockout-status endpoint for administrative
//! visibility, a health check, and an optional set of clock-control routes
//! that let test harnesses drive the lockout window without waiting in real
//! time.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use axum::Router;
//! use lockgate::{
//!     AdjustableClock, Lockgate, LockoutConfig, StaticCredentials, StaticDirectory,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let clock = Arc::new(AdjustableClock::new());
//!     let credentials = Arc::new(StaticCredentials::new().with_account("admin", "admin"));
//!     let directory = Arc::new(StaticDirectory::new(credentials.identities()));
//!     let lockgate = Arc::new(Lockgate::new(
//!         clock.clone(),
//!         directory,
//!         credentials,
//!         LockoutConfig::default(),
//!     ));
//!
//!     let app = Router::new()
//!         .nest("/auth", lockgate_axum::routes(lockgate))
//!         .nest("/test", lockgate_axum::time_routes(clock));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

mod error;
mod routes;
mod types;

pub use error::{AuthError, Result};
pub use routes::{AuthState, create_router, create_time_router};
pub use types::{
    ClockResponse, HealthResponse, LoginRequest, LoginResponse, MessageResponse, PinClockRequest,
};

use std::sync::Arc;

use axum::Router;
use lockgate::Lockgate;
use lockgate_core::{AdjustableClock, Clock, CredentialStore, IdentityDirectory};

/// Create authentication routes for your Axum application.
///
/// The returned router can be nested into an application at any path
/// (e.g. "/auth"); it serves `POST /login`, `GET /lockout/{identity}`, and
/// `GET /health`.
pub fn routes<C, D, S>(lockgate: Arc<Lockgate<C, D, S>>) -> Router
where
    C: Clock,
    D: IdentityDirectory,
    S: CredentialStore,
{
    create_router(lockgate)
}

/// Create clock-control routes for testing mode.
///
/// Serves `GET`/`PUT`/`DELETE /time` against the given [`AdjustableClock`].
/// Mount these only when the server deliberately opts into deterministic
/// time (the lockout window becomes controllable by any client that can
/// reach them).
pub fn time_routes(clock: Arc<AdjustableClock>) -> Router {
    create_time_router(clock)
}
