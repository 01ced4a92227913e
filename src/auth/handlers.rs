use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{LoginRequest, PublicUser, RegisterRequest, Session};
use crate::auth::extractors::CurrentUser;
use crate::auth::services;
use crate::error::Error;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            post(login).get(current_session).delete(logout),
        )
        .route("/me", get(me))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Session>), Error> {
    let session = services::register(
        state.store.as_ref(),
        &payload.name,
        &payload.email,
        &payload.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Session>, Error> {
    let session =
        services::login(state.store.as_ref(), &payload.email, &payload.password).await?;
    Ok(Json(session))
}

#[instrument(skip(state))]
async fn logout(State(state): State<AppState>) -> Result<StatusCode, Error> {
    services::logout(state.store.as_ref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn current_session(State(state): State<AppState>) -> Result<Json<Session>, Error> {
    services::current_session(state.store.as_ref())
        .await?
        .map(Json)
        .ok_or(Error::NotFound("Session"))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user)
}
