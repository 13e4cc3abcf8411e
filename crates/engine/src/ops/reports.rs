use std::collections::{BTreeMap, HashMap};

use chrono::{Months, NaiveDate};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    Amount, EngineError, LedgerCategory, LedgerCode, ResultEngine, Session, Transaction,
    ledger_codes, transactions,
    util::format_date,
};

use super::Engine;

/// Sums of one ledger code over a month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerCodeTotal {
    pub ledger_code_id: uuid::Uuid,
    pub code: String,
    pub category: LedgerCategory,
    pub cash_in: Amount,
    pub bank_in: Amount,
    pub expenditure_out: Amount,
    pub expenditure_cash: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub row_count: usize,
    pub recovery: Amount,
    pub expense: Amount,
    /// From the stored balance record, if the date has one.
    pub previous_balance: Option<Amount>,
    pub total_balance: Option<Amount>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub opening_balance: Amount,
    pub total_cash_in: Amount,
    pub total_bank_in: Amount,
    pub total_expenditure_out: Amount,
    pub total_expenditure_cash: Amount,
    pub net: Amount,
    pub closing_balance: Amount,
    pub by_ledger_code: Vec<LedgerCodeTotal>,
    pub days: Vec<DaySummary>,
}

fn month_bounds(year: i32, month: u32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid month: {year}-{month}")))?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid month: {year}-{month}")))?;
    Ok((start, end))
}

impl Engine {
    /// Builds the report of a calendar month.
    pub async fn monthly_report(
        &self,
        session: &Session,
        year: i32,
        month: u32,
    ) -> ResultEngine<MonthlyReport> {
        let (start, end) = month_bounds(year, month)?;
        let opening_balance = self.resolve_previous_balance(start).await?;

        let models = transactions::Entity::find()
            .filter(transactions::Column::TransactionDate.gte(format_date(start)))
            .filter(transactions::Column::TransactionDate.lt(format_date(end)))
            .order_by_asc(transactions::Column::TransactionDate)
            .order_by_asc(transactions::Column::SortOrder)
            .all(&self.database)
            .await?;

        let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
        let mut rows: Vec<Transaction> = Vec::new();
        for model in models {
            let tx = Transaction::try_from(model)?;
            let day = days.entry(tx.transaction_date).or_insert_with(|| DaySummary {
                date: tx.transaction_date,
                row_count: 0,
                recovery: Amount::ZERO,
                expense: Amount::ZERO,
                previous_balance: None,
                total_balance: None,
            });
            if tx.is_balance_entry {
                day.previous_balance = tx.previous_balance;
                day.total_balance = tx.total_balance;
            } else {
                day.row_count += 1;
                day.recovery = day.recovery.add(tx.recovery()?)?;
                day.expense = day.expense.add(tx.expense()?)?;
                rows.push(tx);
            }
        }

        let codes: HashMap<uuid::Uuid, LedgerCode> = ledger_codes::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| LedgerCode::try_from(model).map(|code| (code.id, code)))
            .collect::<ResultEngine<_>>()?;

        let mut by_code: HashMap<uuid::Uuid, LedgerCodeTotal> = HashMap::new();
        for tx in &rows {
            let Some(code) = tx.ledger_code_id.and_then(|id| codes.get(&id)) else {
                continue;
            };
            let total = by_code.entry(code.id).or_insert_with(|| LedgerCodeTotal {
                ledger_code_id: code.id,
                code: code.code.clone(),
                category: code.category,
                cash_in: Amount::ZERO,
                bank_in: Amount::ZERO,
                expenditure_out: Amount::ZERO,
                expenditure_cash: Amount::ZERO,
            });
            total.cash_in = total.cash_in.add(tx.cash_in)?;
            total.bank_in = total.bank_in.add(tx.bank_in)?;
            total.expenditure_out = total.expenditure_out.add(tx.expenditure_out)?;
            total.expenditure_cash = total.expenditure_cash.add(tx.expenditure_cash)?;
        }
        let mut by_ledger_code: Vec<LedgerCodeTotal> = by_code.into_values().collect();
        by_ledger_code.sort_by(|a, b| a.code.to_lowercase().cmp(&b.code.to_lowercase()));

        let total_cash_in = Amount::sum(rows.iter().map(|tx| tx.cash_in))?;
        let total_bank_in = Amount::sum(rows.iter().map(|tx| tx.bank_in))?;
        let total_expenditure_out = Amount::sum(rows.iter().map(|tx| tx.expenditure_out))?;
        let total_expenditure_cash = Amount::sum(rows.iter().map(|tx| tx.expenditure_cash))?;
        let net = total_cash_in
            .add(total_bank_in)?
            .sub(total_expenditure_out.add(total_expenditure_cash)?)?;
        let closing_balance = opening_balance.add(net)?;

        tracing::debug!(
            year,
            month,
            rows = rows.len(),
            user = %session.username,
            "monthly report built"
        );

        Ok(MonthlyReport {
            year,
            month,
            opening_balance,
            total_cash_in,
            total_bank_in,
            total_expenditure_out,
            total_expenditure_cash,
            net,
            closing_balance,
            by_ledger_code,
            days: days.into_values().collect(),
        })
    }
}
