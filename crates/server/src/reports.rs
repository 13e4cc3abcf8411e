use api_types::report::{DaySummary, LedgerCodeTotal, MonthlyReport};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{Amount, Session};

use crate::{ServerError, mapping::category_to_api, server::ServerState};

pub async fn monthly(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthlyReport>, ServerError> {
    let report = state.engine.monthly_report(&session, year, month).await?;

    Ok(Json(MonthlyReport {
        year: report.year,
        month: report.month,
        opening_balance_minor: report.opening_balance.minor(),
        total_cash_in_minor: report.total_cash_in.minor(),
        total_bank_in_minor: report.total_bank_in.minor(),
        total_expenditure_out_minor: report.total_expenditure_out.minor(),
        total_expenditure_cash_minor: report.total_expenditure_cash.minor(),
        net_minor: report.net.minor(),
        closing_balance_minor: report.closing_balance.minor(),
        by_ledger_code: report
            .by_ledger_code
            .into_iter()
            .map(|total| LedgerCodeTotal {
                ledger_code_id: total.ledger_code_id,
                code: total.code,
                category: category_to_api(total.category),
                cash_in_minor: total.cash_in.minor(),
                bank_in_minor: total.bank_in.minor(),
                expenditure_out_minor: total.expenditure_out.minor(),
                expenditure_cash_minor: total.expenditure_cash.minor(),
            })
            .collect(),
        days: report
            .days
            .into_iter()
            .map(|day| DaySummary {
                date: day.date,
                row_count: day.row_count,
                recovery_minor: day.recovery.minor(),
                expense_minor: day.expense.minor(),
                previous_balance_minor: day.previous_balance.map(Amount::minor),
                total_balance_minor: day.total_balance.map(Amount::minor),
            })
            .collect(),
    }))
}
