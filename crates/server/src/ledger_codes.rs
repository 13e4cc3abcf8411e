//! Ledger code endpoints.

use api_types::ledger_code::{LedgerCodePatch, LedgerCodeQuery, LedgerCodeUpsert, LedgerCodeView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{LedgerCodeInput, Session};
use uuid::Uuid;

use crate::{
    ServerError,
    mapping::{category_from_api, ledger_code_view},
    server::ServerState,
};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<LedgerCodeQuery>,
) -> Result<Json<Vec<LedgerCodeView>>, ServerError> {
    let codes = state
        .engine
        .list_ledger_codes(query.category.map(category_from_api), query.include_inactive)
        .await?
        .into_iter()
        .map(ledger_code_view)
        .collect();
    Ok(Json(codes))
}

pub async fn create(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<LedgerCodeUpsert>,
) -> Result<(StatusCode, Json<LedgerCodeView>), ServerError> {
    let code = state
        .engine
        .create_ledger_code(
            &session,
            LedgerCodeInput {
                code: payload.code,
                category: category_from_api(payload.category),
                sub_category: payload.sub_category,
                employee_id: payload.employee_id,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ledger_code_view(code))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(ledger_code_id): Path<Uuid>,
) -> Result<Json<LedgerCodeView>, ServerError> {
    let code = state.engine.ledger_code(ledger_code_id).await?;
    Ok(Json(ledger_code_view(code)))
}

pub async fn update(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(ledger_code_id): Path<Uuid>,
    Json(payload): Json<LedgerCodePatch>,
) -> Result<Json<LedgerCodeView>, ServerError> {
    let engine = &state.engine;

    // A bare `is_active` toggle skips the full validation path.
    if let (None, None, None, None, Some(is_active)) = (
        &payload.code,
        payload.category,
        &payload.sub_category,
        payload.employee_id,
        payload.is_active,
    ) {
        let code = engine
            .set_ledger_code_active(&session, ledger_code_id, is_active)
            .await?;
        return Ok(Json(ledger_code_view(code)));
    }

    let current = engine.ledger_code(ledger_code_id).await?;
    let code = engine
        .update_ledger_code(
            &session,
            ledger_code_id,
            LedgerCodeInput {
                code: payload.code.unwrap_or(current.code),
                category: payload
                    .category
                    .map(category_from_api)
                    .unwrap_or(current.category),
                sub_category: payload.sub_category.or(current.sub_category),
                employee_id: payload.employee_id.or(current.employee_id),
                is_active: payload.is_active.unwrap_or(current.is_active),
            },
        )
        .await?;
    Ok(Json(ledger_code_view(code)))
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(ledger_code_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_ledger_code(&session, ledger_code_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
