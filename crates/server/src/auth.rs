//! Login, logout and the current session.

use api_types::auth::{Login, LoginResponse, SessionView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::Session;

use crate::{
    ServerError,
    mapping::session_view,
    server::{AuthToken, ServerState},
};

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<LoginResponse>, ServerError> {
    let session = state
        .engine
        .authenticate(&payload.username, &payload.password)
        .await?;
    let view = session_view(&session);
    tracing::info!(username = %session.username, "user logged in");
    let token = state.sessions.insert(session).await;

    Ok(Json(LoginResponse {
        token,
        session: view,
    }))
}

pub async fn logout(
    Extension(AuthToken(token)): Extension<AuthToken>,
    State(state): State<ServerState>,
) -> StatusCode {
    state.sessions.remove(&token).await;
    StatusCode::NO_CONTENT
}

pub async fn me(Extension(session): Extension<Session>) -> Json<SessionView> {
    Json(session_view(&session))
}
