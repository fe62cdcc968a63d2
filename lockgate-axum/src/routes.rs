use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::DateTime;
use lockgate::Lockgate;
use lockgate_core::{AdjustableClock, AuthOutcome, Clock, CredentialStore, IdentityDirectory};

use crate::{
    error::{AuthError, Result},
    types::*,
};

pub struct AuthState<C: Clock, D: IdentityDirectory, S: CredentialStore> {
    pub lockgate: Arc<Lockgate<C, D, S>>,
}

impl<C: Clock, D: IdentityDirectory, S: CredentialStore> Clone for AuthState<C, D, S> {
    fn clone(&self) -> Self {
        Self {
            lockgate: self.lockgate.clone(),
        }
    }
}

pub fn create_router<C, D, S>(lockgate: Arc<Lockgate<C, D, S>>) -> Router
where
    C: Clock,
    D: IdentityDirectory,
    S: CredentialStore,
{
    let state = AuthState { lockgate };

    Router::new()
        .route("/health", get(health_handler))
        .route("/login", post(login_handler::<C, D, S>))
        .route("/lockout/{identity}", get(lockout_status_handler::<C, D, S>))
        .with_state(state)
}

/// Clock-control routes for testing mode. Mounted separately from the
/// authentication routes so production servers never expose them.
pub fn create_time_router(clock: Arc<AdjustableClock>) -> Router {
    Router::new()
        .route(
            "/time",
            get(current_time_handler)
                .put(pin_time_handler)
                .delete(clear_time_handler),
        )
        .with_state(clock)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn login_handler<C, D, S>(
    State(state): State<AuthState<C, D, S>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse>
where
    C: Clock,
    D: IdentityDirectory,
    S: CredentialStore,
{
    match state.lockgate.authenticate(&payload.username, &payload.password) {
        AuthOutcome::Granted => Ok(Json(LoginResponse {
            granted: true,
            username: payload.username,
        })),
        AuthOutcome::InvalidCredentials => Err(AuthError::InvalidCredentials),
        AuthOutcome::LockedOut => Err(AuthError::AccountLocked),
    }
}

async fn lockout_status_handler<C, D, S>(
    State(state): State<AuthState<C, D, S>>,
    Path(identity): Path<String>,
) -> impl IntoResponse
where
    C: Clock,
    D: IdentityDirectory,
    S: CredentialStore,
{
    Json(state.lockgate.status(&identity))
}

async fn current_time_handler(State(clock): State<Arc<AdjustableClock>>) -> impl IntoResponse {
    Json(ClockResponse {
        epoch_millis: clock.now().timestamp_millis(),
        pinned: clock.is_pinned(),
    })
}

async fn pin_time_handler(
    State(clock): State<Arc<AdjustableClock>>,
    Json(payload): Json<PinClockRequest>,
) -> Result<impl IntoResponse> {
    let instant = DateTime::from_timestamp_millis(payload.epoch_millis)
        .ok_or_else(|| AuthError::BadRequest("epoch_millis out of range".to_string()))?;

    clock.pin(instant);
    tracing::info!(%instant, "clock pinned");
    Ok(Json(MessageResponse {
        message: format!("clock pinned to {instant}"),
    }))
}

async fn clear_time_handler(State(clock): State<Arc<AdjustableClock>>) -> impl IntoResponse {
    clock.clear();
    tracing::info!("clock restored to system time");
    Json(MessageResponse {
        message: "clock restored to system time".to_string(),
    })
}
