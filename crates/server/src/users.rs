//! User administration endpoints.

use api_types::user::{PasswordSet, UserNew, UserPatch, UserView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewUser, Session, UserUpdate};
use uuid::Uuid;

use crate::{
    ServerError,
    mapping::{role_from_api, status_from_api, user_view},
    server::ServerState,
};

pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<UserView>>, ServerError> {
    let users = state
        .engine
        .list_users(&session)
        .await?
        .into_iter()
        .map(user_view)
        .collect();
    Ok(Json(users))
}

pub async fn create(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .create_user(
            &session,
            NewUser {
                name: payload.name,
                username: payload.username,
                email: payload.email,
                role: role_from_api(payload.role),
                password: payload.password,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user_view(user))))
}

pub async fn get(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(&session, user_id).await?;
    Ok(Json(user_view(user)))
}

pub async fn update(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UserPatch>,
) -> Result<Json<UserView>, ServerError> {
    if payload.name.is_none()
        && payload.email.is_none()
        && payload.role.is_none()
        && payload.status.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one of name, email, role or status".to_string(),
        ));
    }

    // Cached sessions carry the role; a role change or deactivation revokes them.
    let revoke = payload.role.is_some()
        || payload
            .status
            .is_some_and(|status| !status_from_api(status).is_active());
    let user = state
        .engine
        .update_user(
            &session,
            user_id,
            UserUpdate {
                name: payload.name,
                email: payload.email,
                role: payload.role.map(role_from_api),
                status: payload.status.map(status_from_api),
            },
        )
        .await?;
    if revoke {
        state.sessions.remove_user(user_id).await;
    }
    Ok(Json(user_view(user)))
}

pub async fn set_password(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<PasswordSet>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .set_password(&session, user_id, &payload.password)
        .await?;
    state.sessions.remove_user(user_id).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(&session, user_id).await?;
    state.sessions.remove_user(user_id).await;
    Ok(StatusCode::NO_CONTENT)
}
