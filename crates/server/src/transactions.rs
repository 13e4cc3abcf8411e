//! Transactions API endpoints

use api_types::transaction::{TransactionPage, TransactionSearch, TransactionView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Session, TransactionListFilter};
use uuid::Uuid;

use crate::{ServerError, mapping::transaction_view, server::ServerState};

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 500;

pub async fn search(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionSearch>,
) -> Result<Json<TransactionPage>, ServerError> {
    let limit = payload.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit > MAX_PAGE_SIZE {
        return Err(ServerError::Generic(format!(
            "limit must be <= {MAX_PAGE_SIZE}"
        )));
    }

    let filter = TransactionListFilter {
        from: payload.from,
        to: payload.to,
        ledger_code_id: payload.ledger_code_id,
        employee_id: payload.employee_id,
        search: payload.search,
        include_balance_entries: payload.include_balance_entries,
    };
    let (transactions, next_cursor) = state
        .engine
        .list_transactions_page(&session, &filter, limit, payload.cursor.as_deref())
        .await?;

    Ok(Json(TransactionPage {
        transactions: transactions.into_iter().map(transaction_view).collect(),
        next_cursor,
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(transaction_id).await?;
    Ok(Json(transaction_view(tx)))
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(&session, transaction_id, state.today())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
