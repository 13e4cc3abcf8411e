//! Daily balance chain: resolving the opening balance of a date, opening a
//! day and committing a day's buffer with carry-forward to the next date.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Statement,
};
use uuid::Uuid;

use crate::{
    Amount, BalanceRecord, DraftRow, EngineError, ResultEngine, SaveTotals, Session, Transaction,
    close_day, is_locked, prepare_rows, save_totals,
    transactions::{self, BALANCE_ENTRY_DESCRIPTION},
    util::{format_date, next_day, previous_day},
};

use super::Engine;

/// A date as shown on the entry screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayLedger {
    pub date: NaiveDate,
    pub previous_balance: Amount,
    /// Closing balance stored by the last save of this date.
    pub total_balance: Amount,
    /// Regular rows ordered by `(order, created_at, id)`.
    pub rows: Vec<Transaction>,
    /// Whether the session may not edit this date.
    pub locked: bool,
}

/// Result of [`Engine::save_all`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveOutcome {
    pub saved_count: usize,
    pub failed_count: usize,
    pub previous_balance: Amount,
    pub totals: SaveTotals,
    pub closing_balance: Amount,
    /// The date reloaded from the store after the save.
    pub day: DayLedger,
}

impl Engine {
    async fn balance_record_model(
        &self,
        date: NaiveDate,
    ) -> ResultEngine<Option<transactions::Model>> {
        transactions::Entity::find()
            .filter(transactions::Column::TransactionDate.eq(format_date(date)))
            .filter(transactions::Column::IsBalanceEntry.eq(true))
            .one(&self.database)
            .await
            .map_err(Into::into)
    }

    /// Returns the balance record stored for `date`, if any.
    pub async fn balance_record(&self, date: NaiveDate) -> ResultEngine<Option<BalanceRecord>> {
        self.balance_record_model(date)
            .await?
            .map(BalanceRecord::try_from)
            .transpose()
    }

    pub(super) async fn regular_rows_for_date(
        &self,
        date: NaiveDate,
    ) -> ResultEngine<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::TransactionDate.eq(format_date(date)))
            .filter(transactions::Column::IsBalanceEntry.eq(false))
            .order_by_asc(transactions::Column::SortOrder)
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Resolves the opening ("previous") balance of `date`.
    ///
    /// In priority order:
    /// 1. the balance record of `date`;
    /// 2. the closing balance of `date - 1`, from its balance record plus its
    ///    regular rows;
    /// 3. the cumulative net of every regular row before `date`.
    ///
    /// The nearest explicit record always wins, even when it disagrees with
    /// the cumulative recomputation.
    pub async fn resolve_previous_balance(&self, date: NaiveDate) -> ResultEngine<Amount> {
        if let Some(record) = self.balance_record(date).await? {
            return Ok(record.previous_balance);
        }

        let prior = previous_day(date)?;
        if let Some(record) = self.balance_record(prior).await? {
            let rows = self.regular_rows_for_date(prior).await?;
            return close_day(record.previous_balance, &rows);
        }

        self.cumulative_balance_before(date).await
    }

    async fn cumulative_balance_before(&self, date: NaiveDate) -> ResultEngine<Amount> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(cash_in + bank_in - expenditure_out - expenditure_cash), 0) AS sum \
             FROM transactions \
             WHERE is_balance_entry = ? AND transaction_date < ?",
            vec![false.into(), format_date(date).into()],
        );
        let sum: i64 = match self.database.query_one(stmt).await? {
            Some(row) => row.try_get("", "sum")?,
            None => 0,
        };
        Ok(Amount::new(sum))
    }

    /// Opens `date` for the entry screen.
    ///
    /// The first time a date is opened its balance record is synthesized from
    /// prior history.
    pub async fn open_day(
        &self,
        session: &Session,
        date: NaiveDate,
        today: NaiveDate,
    ) -> ResultEngine<DayLedger> {
        let record = match self.balance_record(date).await? {
            Some(record) => record,
            None => {
                let previous = self.resolve_previous_balance(date).await?;
                tracing::debug!(%date, %previous, "creating balance record");
                self.insert_balance_record(date, previous, previous).await?
            }
        };
        self.load_day(session, date, today, record).await
    }

    async fn load_day(
        &self,
        session: &Session,
        date: NaiveDate,
        today: NaiveDate,
        record: BalanceRecord,
    ) -> ResultEngine<DayLedger> {
        let rows = self.regular_rows_for_date(date).await?;
        Ok(DayLedger {
            date,
            previous_balance: record.previous_balance,
            total_balance: record.total_balance,
            rows,
            locked: is_locked(session.role, date, today),
        })
    }

    /// Commits the entry buffer of `date`.
    ///
    /// Rows are written one by one; a failing row is counted and logged but
    /// does not stop the others, and nothing is rolled back. The balance
    /// records of `date` and `date + 1` are written afterwards regardless of
    /// row failures.
    pub async fn save_all(
        &self,
        session: &Session,
        date: NaiveDate,
        today: NaiveDate,
        rows: Vec<DraftRow>,
    ) -> ResultEngine<SaveOutcome> {
        if is_locked(session.role, date, today) {
            return Err(EngineError::Forbidden(format!(
                "{date} is locked for role {}",
                session.role.as_str()
            )));
        }

        let rows = prepare_rows(rows)?;
        let previous_balance = self.resolve_previous_balance(date).await?;
        // Totals are settled before any write so an overflow leaves the day untouched.
        let totals = save_totals(&rows)?;
        let closing_balance = previous_balance.add(totals.today_net)?;

        let mut saved_count = 0;
        let mut failed_count = 0;
        for (index, row) in rows.iter().enumerate() {
            match self.upsert_row(session, date, index, row).await {
                Ok(()) => saved_count += 1,
                Err(err) => {
                    failed_count += 1;
                    tracing::warn!(%date, index, "failed to save transaction row: {err}");
                }
            }
        }


        let record = self
            .upsert_balance_record(date, previous_balance, Some(closing_balance))
            .await?;
        self.upsert_balance_record(next_day(date)?, closing_balance, None)
            .await?;

        tracing::info!(
            %date,
            saved_count,
            failed_count,
            %closing_balance,
            user = %session.username,
            "transactions saved"
        );

        let day = self.load_day(session, date, today, record).await?;
        Ok(SaveOutcome {
            saved_count,
            failed_count,
            previous_balance,
            totals,
            closing_balance,
            day,
        })
    }

    async fn upsert_row(
        &self,
        session: &Session,
        date: NaiveDate,
        index: usize,
        row: &DraftRow,
    ) -> ResultEngine<()> {
        let ledger_code_id = row
            .ledger_code_id
            .ok_or_else(|| EngineError::InvalidInput("ledger code is required".to_string()))?;
        self.require_ledger_code(&self.database, ledger_code_id)
            .await?;
        self.require_optional_employee(&self.database, row.employee_id)
            .await?;

        let now = Utc::now();
        let description = row.description.trim().to_string();

        if let Some(id) = row.id {
            let model = transactions::Entity::find_by_id(id.to_string())
                .one(&self.database)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
            if model.is_balance_entry || model.transaction_date != format_date(date) {
                return Err(EngineError::InvalidInput(format!(
                    "transaction {id} does not belong to {date}"
                )));
            }

            let mut active: transactions::ActiveModel = model.into();
            active.ledger_code_id = ActiveValue::Set(Some(ledger_code_id.to_string()));
            active.employee_id = ActiveValue::Set(row.employee_id.map(|id| id.to_string()));
            active.cash_in = ActiveValue::Set(row.cash_in.minor());
            active.bank_in = ActiveValue::Set(row.bank_in.minor());
            active.expenditure_out = ActiveValue::Set(row.expenditure_out.minor());
            active.expenditure_cash = ActiveValue::Set(row.expenditure_cash.minor());
            active.description = ActiveValue::Set(description);
            if let Some(order) = row.order {
                active.sort_order = ActiveValue::Set(order);
            }
            active.updated_at = ActiveValue::Set(now);
            active.update(&self.database).await?;
            return Ok(());
        }

        let order = row
            .order
            .unwrap_or_else(|| i32::try_from(index).unwrap_or(i32::MAX));
        let active = transactions::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            transaction_date: ActiveValue::Set(format_date(date)),
            ledger_code_id: ActiveValue::Set(Some(ledger_code_id.to_string())),
            employee_id: ActiveValue::Set(row.employee_id.map(|id| id.to_string())),
            cash_in: ActiveValue::Set(row.cash_in.minor()),
            bank_in: ActiveValue::Set(row.bank_in.minor()),
            expenditure_out: ActiveValue::Set(row.expenditure_out.minor()),
            expenditure_cash: ActiveValue::Set(row.expenditure_cash.minor()),
            description: ActiveValue::Set(description),
            sort_order: ActiveValue::Set(order),
            is_balance_entry: ActiveValue::Set(false),
            previous_balance: ActiveValue::Set(None),
            total_balance: ActiveValue::Set(None),
            created_by: ActiveValue::Set(Some(session.username.clone())),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        active.insert(&self.database).await?;
        Ok(())
    }

    async fn insert_balance_record(
        &self,
        date: NaiveDate,
        previous_balance: Amount,
        total_balance: Amount,
    ) -> ResultEngine<BalanceRecord> {
        let now = Utc::now();
        let active = transactions::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            transaction_date: ActiveValue::Set(format_date(date)),
            ledger_code_id: ActiveValue::Set(None),
            employee_id: ActiveValue::Set(None),
            cash_in: ActiveValue::Set(0),
            bank_in: ActiveValue::Set(0),
            expenditure_out: ActiveValue::Set(0),
            expenditure_cash: ActiveValue::Set(0),
            description: ActiveValue::Set(BALANCE_ENTRY_DESCRIPTION.to_string()),
            sort_order: ActiveValue::Set(0),
            is_balance_entry: ActiveValue::Set(true),
            previous_balance: ActiveValue::Set(Some(previous_balance.minor())),
            total_balance: ActiveValue::Set(Some(total_balance.minor())),
            created_by: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        let model = active.insert(&self.database).await?;
        BalanceRecord::try_from(model)
    }

    /// Writes the balance record of `date`, locating it first.
    ///
    /// `total_balance = None` keeps the stored closing balance of an existing
    /// record and defaults it to `previous_balance` on insert.
    async fn upsert_balance_record(
        &self,
        date: NaiveDate,
        previous_balance: Amount,
        total_balance: Option<Amount>,
    ) -> ResultEngine<BalanceRecord> {
        let Some(model) = self.balance_record_model(date).await? else {
            return self
                .insert_balance_record(
                    date,
                    previous_balance,
                    total_balance.unwrap_or(previous_balance),
                )
                .await;
        };

        let mut active: transactions::ActiveModel = model.into();
        active.previous_balance = ActiveValue::Set(Some(previous_balance.minor()));
        if let Some(total) = total_balance {
            active.total_balance = ActiveValue::Set(Some(total.minor()));
        }
        active.updated_at = ActiveValue::Set(Utc::now());
        let model = active.update(&self.database).await?;
        BalanceRecord::try_from(model)
    }
}
