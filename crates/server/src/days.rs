//! Daily entry screen: open a date, save its buffer, lock status.

use api_types::day::{DayView, LockStatus, PreviousBalance, SaveDay, SaveResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use engine::{Session, is_locked};

use crate::{
    ServerError,
    mapping::{day_view, draft_row},
    server::ServerState,
};

pub async fn open(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DayView>, ServerError> {
    let day = state
        .engine
        .open_day(&session, date, state.today())
        .await?;
    Ok(Json(day_view(day)))
}

pub async fn previous_balance(
    State(state): State<ServerState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<PreviousBalance>, ServerError> {
    let balance = state.engine.resolve_previous_balance(date).await?;
    Ok(Json(PreviousBalance {
        date,
        previous_balance_minor: balance.minor(),
    }))
}

pub async fn save(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(date): Path<NaiveDate>,
    Json(payload): Json<SaveDay>,
) -> Result<Json<SaveResponse>, ServerError> {
    let rows = payload.rows.into_iter().map(draft_row).collect();
    let outcome = state
        .engine
        .save_all(&session, date, state.today(), rows)
        .await?;

    Ok(Json(SaveResponse {
        saved_count: outcome.saved_count,
        failed_count: outcome.failed_count,
        previous_balance_minor: outcome.previous_balance.minor(),
        total_recovery_minor: outcome.totals.total_recovery.minor(),
        total_expense_minor: outcome.totals.total_expense.minor(),
        today_net_minor: outcome.totals.today_net.minor(),
        closing_balance_minor: outcome.closing_balance.minor(),
        day: day_view(outcome.day),
    }))
}

pub async fn lock(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(date): Path<NaiveDate>,
) -> Json<LockStatus> {
    let today = state.today();
    Json(LockStatus {
        date,
        today,
        locked: is_locked(session.role, date, today),
    })
}
