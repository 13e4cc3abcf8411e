//! Pure bookkeeping arithmetic behind the daily balance chain.
//!
//! Nothing here touches the database; the `ops::balances` module feeds
//! stored rows in and persists the results.

use std::collections::HashSet;

use crate::{Amount, DraftRow, EngineError, ResultEngine, Transaction};

/// Totals produced when a day's buffer is committed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveTotals {
    pub total_recovery: Amount,
    pub total_expense: Amount,
    pub today_net: Amount,
}

/// Closing balance of a day from its opening balance and its regular rows:
/// `opening + Σ(cash_in + bank_in) − Σ(expenditure_out + expenditure_cash)`.
pub fn close_day<'a, I>(opening: Amount, rows: I) -> ResultEngine<Amount>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut recovery = Amount::ZERO;
    let mut expense = Amount::ZERO;
    for row in rows.into_iter().filter(|row| !row.is_balance_entry) {
        recovery = recovery.add(row.recovery()?)?;
        expense = expense.add(row.expense()?)?;
    }
    opening.add(recovery.sub(expense)?)
}

/// Totals of a committed buffer.
///
/// `total_recovery` includes `expenditure_out` as well as `cash_in` and
/// `bank_in`, so `expenditure_out` nets to zero in `today_net`. Kept as is
/// until the accounting owner confirms the intended formula.
pub fn save_totals(rows: &[DraftRow]) -> ResultEngine<SaveTotals> {
    let total_recovery = Amount::sum(
        rows.iter()
            .flat_map(|row| [row.cash_in, row.bank_in, row.expenditure_out]),
    )?;
    let total_expense = Amount::sum(
        rows.iter()
            .flat_map(|row| [row.expenditure_out, row.expenditure_cash]),
    )?;
    Ok(SaveTotals {
        total_recovery,
        total_expense,
        today_net: total_recovery.sub(total_expense)?,
    })
}

/// A row is committed only with a ledger code, a description and at least
/// one positive amount.
pub fn is_committable(row: &DraftRow) -> bool {
    row.ledger_code_id.is_some()
        && !row.description.trim().is_empty()
        && row.amounts().iter().any(|amount| amount.is_positive())
}

/// Validates the buffer, drops rows that are not committable and removes
/// field-identical duplicates (first occurrence wins).
pub fn prepare_rows(rows: Vec<DraftRow>) -> ResultEngine<Vec<DraftRow>> {
    if rows
        .iter()
        .any(|row| row.amounts().iter().any(|amount| amount.is_negative()))
    {
        return Err(EngineError::InvalidAmount(
            "amounts must be >= 0".to_string(),
        ));
    }

    let mut seen: HashSet<DraftRow> = HashSet::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if !is_committable(&row) {
            continue;
        }
        if seen.insert(row.clone()) {
            out.push(row);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn stored(cash_in: i64, bank_in: i64, out: i64, cash: i64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ledger_code_id: Some(Uuid::new_v4()),
            employee_id: None,
            cash_in: Amount::new(cash_in),
            bank_in: Amount::new(bank_in),
            expenditure_out: Amount::new(out),
            expenditure_cash: Amount::new(cash),
            description: "row".to_string(),
            order: 0,
            is_balance_entry: false,
            previous_balance: None,
            total_balance: None,
            created_by: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn save_totals_matches_worked_example() {
        let code = Uuid::new_v4();
        let rows = vec![DraftRow::new(code, "milk sale").cash_in(500).expenditure_cash(200)];
        let totals = save_totals(&rows).unwrap();
        assert_eq!(totals.total_recovery, Amount::new(500));
        assert_eq!(totals.total_expense, Amount::new(200));
        assert_eq!(totals.today_net, Amount::new(300));
        assert_eq!(
            Amount::new(1000).add(totals.today_net).unwrap(),
            Amount::new(1300)
        );
    }

    #[test]
    fn expenditure_out_counts_on_both_sides() {
        let rows = vec![DraftRow::new(Uuid::new_v4(), "diesel").expenditure_out(100)];
        let totals = save_totals(&rows).unwrap();
        assert_eq!(totals.total_recovery, Amount::new(100));
        assert_eq!(totals.total_expense, Amount::new(100));
        assert_eq!(totals.today_net, Amount::ZERO);
    }

    #[test]
    fn close_day_uses_plain_recovery_minus_expense() {
        let rows = [stored(500, 0, 0, 200), stored(0, 50, 100, 0)];
        assert_eq!(
            close_day(Amount::new(1000), &rows).unwrap(),
            Amount::new(1250)
        );
    }

    #[test]
    fn totals_past_i64_are_rejected() {
        let code = Uuid::new_v4();
        let rows = vec![DraftRow::new(code, "big").cash_in(i64::MAX).bank_in(1)];
        assert!(matches!(
            save_totals(&rows),
            Err(EngineError::InvalidAmount(_))
        ));

        let stored_rows = [stored(i64::MAX, 0, 0, 0)];
        assert!(close_day(Amount::new(1), &stored_rows).is_err());
    }

    #[test]
    fn prepare_rows_drops_incomplete_rows() {
        let code = Uuid::new_v4();
        let rows = vec![
            DraftRow::new(code, "ok").cash_in(10),
            DraftRow::new(code, "   ").cash_in(10),
            DraftRow::new(code, "no amount"),
            DraftRow {
                ledger_code_id: None,
                description: "no code".to_string(),
                cash_in: Amount::new(10),
                ..Default::default()
            },
        ];
        let kept = prepare_rows(rows).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].description, "ok");
    }

    #[test]
    fn prepare_rows_deduplicates_identical_rows() {
        let code = Uuid::new_v4();
        let row = DraftRow::new(code, "tractor hire").bank_in(700);
        let other = DraftRow::new(code, "tractor hire").bank_in(701);
        let kept = prepare_rows(vec![row.clone(), other.clone(), row.clone()]).unwrap();
        assert_eq!(kept, vec![row, other]);
    }

    #[test]
    fn prepare_rows_rejects_negative_amounts() {
        let rows = vec![DraftRow::new(Uuid::new_v4(), "refund").cash_in(-5)];
        assert!(matches!(
            prepare_rows(rows),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
