//! Global cash figure, with a long-poll watch.

use api_types::cash::{CashInHand, CashWatchQuery, CashWatchResponse};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::{Amount, Session};

use crate::{ServerError, server::ServerState};

pub async fn get(State(state): State<ServerState>) -> Json<CashInHand> {
    Json(CashInHand {
        amount_minor: state.engine.cash_in_hand().minor(),
    })
}

pub async fn set(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<CashInHand>,
) -> Result<Json<CashInHand>, ServerError> {
    let amount = state
        .engine
        .set_cash_in_hand(&session, Amount::new(payload.amount_minor))
        .await?;
    Ok(Json(CashInHand {
        amount_minor: amount.minor(),
    }))
}

/// Returns at once when the published value differs from `since` (or
/// `since` is absent); otherwise waits for the next update, up to the
/// configured timeout.
pub async fn watch(
    State(state): State<ServerState>,
    Query(query): Query<CashWatchQuery>,
) -> Json<CashWatchResponse> {
    let mut watch = state.engine.watch_cash_in_hand();
    let current = watch.current();

    let response = match query.since {
        Some(since) if since == current.minor() => {
            match tokio::time::timeout(state.watch_timeout, watch.changed()).await {
                Ok(Some(amount)) => CashWatchResponse {
                    amount_minor: amount.minor(),
                    changed: true,
                },
                Ok(None) | Err(_) => CashWatchResponse {
                    amount_minor: current.minor(),
                    changed: false,
                },
            }
        }
        Some(_) => CashWatchResponse {
            amount_minor: current.minor(),
            changed: true,
        },
        None => CashWatchResponse {
            amount_minor: current.minor(),
            changed: false,
        },
    };

    watch.unsubscribe();
    Json(response)
}
