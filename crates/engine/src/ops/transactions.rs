use base64::Engine as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{
    Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
    sea_query::LikeExpr,
};

use crate::{
    EngineError, ResultEngine, Session, Transaction, is_locked, transactions,
    util::{format_date, parse_date},
};

use super::{Engine, with_tx};

/// Filters for searching transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`).
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub ledger_code_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    /// If true, includes balance entries (default: false).
    pub include_balance_entries: bool,
}

const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching `search` literally anywhere in the column.
fn contains_pattern(search: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidInput(
            "invalid range: from must be < to".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::TransactionDate.gte(format_date(from)));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::TransactionDate.lt(format_date(to)));
        }
        if let Some(ledger_code_id) = filter.ledger_code_id {
            self = self.filter(transactions::Column::LedgerCodeId.eq(ledger_code_id.to_string()));
        }
        if let Some(employee_id) = filter.employee_id {
            self = self.filter(transactions::Column::EmployeeId.eq(employee_id.to_string()));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            self = self.filter(transactions::Column::Description.like(contains_pattern(search)));
        }
        if !filter.include_balance_entries {
            self = self.filter(transactions::Column::IsBalanceEntry.eq(false));
        }
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionsCursor {
    transaction_date: String,
    sort_order: i32,
    transaction_id: String,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        let cursor = serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        parse_date(&cursor.transaction_date)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(cursor)
    }
}

impl Engine {
    /// Searches transactions with cursor-based pagination.
    ///
    /// Pagination is oldest → newer by `(transaction_date, order, id)`.
    pub async fn list_transactions_page(
        &self,
        session: &Session,
        filter: &TransactionListFilter,
        limit: u64,
        cursor: Option<&str>,
    ) -> ResultEngine<(Vec<Transaction>, Option<String>)> {
        validate_list_filter(filter)?;
        if limit == 0 {
            return Err(EngineError::InvalidInput("limit must be > 0".to_string()));
        }

        let limit_plus_one = limit.saturating_add(1);
        let mut query = transactions::Entity::find()
            .order_by_asc(transactions::Column::TransactionDate)
            .order_by_asc(transactions::Column::SortOrder)
            .order_by_asc(transactions::Column::Id)
            .limit(limit_plus_one);

        if let Some(cursor) = cursor {
            let cursor = TransactionsCursor::decode(cursor)?;
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::TransactionDate.gt(cursor.transaction_date.clone()))
                    .add(
                        Condition::all()
                            .add(transactions::Column::TransactionDate.eq(cursor.transaction_date.clone()))
                            .add(transactions::Column::SortOrder.gt(cursor.sort_order)),
                    )
                    .add(
                        Condition::all()
                            .add(transactions::Column::TransactionDate.eq(cursor.transaction_date))
                            .add(transactions::Column::SortOrder.eq(cursor.sort_order))
                            .add(transactions::Column::Id.gt(cursor.transaction_id)),
                    ),
            );
        }
        query = query.apply_tx_filters(filter);

        let models = query.all(&self.database).await?;
        tracing::debug!(rows = models.len(), user = %session.username, "transactions search");
        let has_more = models.len() > limit as usize;

        let mut out: Vec<Transaction> = Vec::with_capacity(models.len().min(limit as usize));
        for model in models.into_iter().take(limit as usize) {
            out.push(Transaction::try_from(model)?);
        }

        let next_cursor = if has_more {
            out.last()
                .map(|tx| TransactionsCursor {
                    transaction_date: format_date(tx.transaction_date),
                    sort_order: tx.order,
                    transaction_id: tx.id.to_string(),
                })
                .map(|c| c.encode())
                .transpose()?
        } else {
            None
        };

        Ok((out, next_cursor))
    }

    /// Returns a single regular transaction row.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        Transaction::try_from(model)
    }

    /// Deletes a regular transaction row.
    ///
    /// Balances are not recomputed here; the next save of the date does it.
    pub async fn delete_transaction(
        &self,
        session: &Session,
        transaction_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
            if model.is_balance_entry {
                return Err(EngineError::Forbidden(
                    "balance entries cannot be deleted".to_string(),
                ));
            }
            let date = parse_date(&model.transaction_date)?;
            if is_locked(session.role, date, today) {
                return Err(EngineError::Forbidden(format!(
                    "{date} is locked for role {}",
                    session.role.as_str()
                )));
            }

            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(%transaction_id, %date, user = %session.username, "transaction deleted");
            Ok(())
        })
    }
}
