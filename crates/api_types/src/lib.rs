//! JSON bodies exchanged with the HTTP API.
//!
//! Amounts travel as integer minor units (`*_minor`), dates as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user account.
///
/// - `admin`: full access, may edit any date and manage users.
/// - `write`: may edit the current date only.
/// - `read`: view-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Write,
    Read,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        /// Bearer token for the `Authorization` header.
        pub token: String,
        pub session: SessionView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionView {
        pub user_id: Uuid,
        pub username: String,
        pub name: String,
        pub role: Role,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub name: String,
        pub username: String,
        pub email: String,
        pub role: Role,
        pub password: String,
    }

    /// Partial update; omitted fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserPatch {
        pub name: Option<String>,
        pub email: Option<String>,
        pub role: Option<Role>,
        pub status: Option<Status>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordSet {
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub username: String,
        pub email: String,
        pub role: Role,
        pub status: Status,
    }
}

pub mod ledger_code {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LedgerCategory {
        Income,
        Expense,
        Location,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerCodeUpsert {
        pub code: String,
        pub category: LedgerCategory,
        pub sub_category: Option<String>,
        pub employee_id: Option<Uuid>,
        #[serde(default = "default_true")]
        pub is_active: bool,
    }

    /// Partial update; omitted fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerCodePatch {
        pub code: Option<String>,
        pub category: Option<LedgerCategory>,
        pub sub_category: Option<String>,
        pub employee_id: Option<Uuid>,
        pub is_active: Option<bool>,
    }

    /// Query string of `GET /ledger-codes`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerCodeQuery {
        pub category: Option<LedgerCategory>,
        #[serde(default)]
        pub include_inactive: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerCodeView {
        pub id: Uuid,
        pub code: String,
        pub category: LedgerCategory,
        pub sub_category: Option<String>,
        pub employee_id: Option<Uuid>,
        pub is_active: bool,
    }

    fn default_true() -> bool {
        true
    }
}

pub mod employee {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmployeeUpsert {
        pub name: String,
        pub designation: String,
        pub salary_minor: i64,
        #[serde(default)]
        pub status: Status,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EmployeePatch {
        pub name: Option<String>,
        pub designation: Option<String>,
        pub salary_minor: Option<i64>,
        pub status: Option<Status>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EmployeeQuery {
        #[serde(default)]
        pub include_inactive: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EmployeeView {
        pub id: Uuid,
        pub name: String,
        pub designation: String,
        pub salary_minor: i64,
        pub status: Status,
    }
}

pub mod day {
    use super::*;
    use crate::transaction::TransactionView;

    /// One row of the entry buffer.
    ///
    /// Rows with `id` update an existing row of the same date.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DraftRow {
        pub id: Option<Uuid>,
        pub ledger_code_id: Option<Uuid>,
        pub employee_id: Option<Uuid>,
        #[serde(default)]
        pub cash_in_minor: i64,
        #[serde(default)]
        pub bank_in_minor: i64,
        #[serde(default)]
        pub expenditure_out_minor: i64,
        #[serde(default)]
        pub expenditure_cash_minor: i64,
        #[serde(default)]
        pub description: String,
        pub order: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaveDay {
        pub rows: Vec<DraftRow>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DayView {
        pub date: NaiveDate,
        pub previous_balance_minor: i64,
        pub total_balance_minor: i64,
        pub rows: Vec<TransactionView>,
        pub locked: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaveResponse {
        pub saved_count: usize,
        pub failed_count: usize,
        pub previous_balance_minor: i64,
        pub total_recovery_minor: i64,
        pub total_expense_minor: i64,
        pub today_net_minor: i64,
        pub closing_balance_minor: i64,
        pub day: DayView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PreviousBalance {
        pub date: NaiveDate,
        pub previous_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LockStatus {
        pub date: NaiveDate,
        pub today: NaiveDate,
        pub locked: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub transaction_date: NaiveDate,
        pub ledger_code_id: Option<Uuid>,
        pub employee_id: Option<Uuid>,
        pub cash_in_minor: i64,
        pub bank_in_minor: i64,
        pub expenditure_out_minor: i64,
        pub expenditure_cash_minor: i64,
        pub description: String,
        pub order: i32,
        pub is_balance_entry: bool,
        pub previous_balance_minor: Option<i64>,
        pub total_balance_minor: Option<i64>,
        pub created_by: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionSearch {
        /// Inclusive.
        pub from: Option<NaiveDate>,
        /// Exclusive.
        pub to: Option<NaiveDate>,
        pub ledger_code_id: Option<Uuid>,
        pub employee_id: Option<Uuid>,
        pub search: Option<String>,
        #[serde(default)]
        pub include_balance_entries: bool,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Oldest → newer pagination.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionPage {
        pub transactions: Vec<TransactionView>,
        pub next_cursor: Option<String>,
    }
}

pub mod report {
    use super::*;
    use crate::ledger_code::LedgerCategory;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerCodeTotal {
        pub ledger_code_id: Uuid,
        pub code: String,
        pub category: LedgerCategory,
        pub cash_in_minor: i64,
        pub bank_in_minor: i64,
        pub expenditure_out_minor: i64,
        pub expenditure_cash_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DaySummary {
        pub date: NaiveDate,
        pub row_count: usize,
        pub recovery_minor: i64,
        pub expense_minor: i64,
        pub previous_balance_minor: Option<i64>,
        pub total_balance_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyReport {
        pub year: i32,
        pub month: u32,
        pub opening_balance_minor: i64,
        pub total_cash_in_minor: i64,
        pub total_bank_in_minor: i64,
        pub total_expenditure_out_minor: i64,
        pub total_expenditure_cash_minor: i64,
        pub net_minor: i64,
        pub closing_balance_minor: i64,
        pub by_ledger_code: Vec<LedgerCodeTotal>,
        pub days: Vec<DaySummary>,
    }
}

pub mod assets {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BikeUpsert {
        pub registration_number: String,
        pub model: String,
        pub employee_id: Option<Uuid>,
        pub purchased_on: Option<NaiveDate>,
        #[serde(default)]
        pub status: Status,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BikeView {
        pub id: Uuid,
        pub registration_number: String,
        pub model: String,
        pub employee_id: Option<Uuid>,
        pub purchased_on: Option<NaiveDate>,
        pub status: Status,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleUpsert {
        pub name: String,
        pub vehicle_type: String,
        pub registration_number: Option<String>,
        pub purchased_on: Option<NaiveDate>,
        #[serde(default)]
        pub status: Status,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleView {
        pub id: Uuid,
        pub name: String,
        pub vehicle_type: String,
        pub registration_number: Option<String>,
        pub purchased_on: Option<NaiveDate>,
        pub status: Status,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InstallationUpsert {
        pub customer_name: String,
        pub location: String,
        pub installed_on: NaiveDate,
        pub amount_minor: i64,
        #[serde(default)]
        pub status: Status,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InstallationView {
        pub id: Uuid,
        pub customer_name: String,
        pub location: String,
        pub installed_on: NaiveDate,
        pub amount_minor: i64,
        pub status: Status,
        pub notes: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AgristoreKind {
        Purchase,
        Sale,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AgristoreUpsert {
        pub transaction_date: NaiveDate,
        pub item: String,
        pub kind: AgristoreKind,
        pub quantity: i64,
        pub rate_minor: i64,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AgristoreView {
        pub id: Uuid,
        pub transaction_date: NaiveDate,
        pub item: String,
        pub kind: AgristoreKind,
        pub quantity: i64,
        pub rate_minor: i64,
        /// `quantity * rate_minor`.
        pub amount_minor: i64,
        pub notes: Option<String>,
    }
}

pub mod cash {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashInHand {
        pub amount_minor: i64,
    }

    /// Query string of `GET /cash/watch`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CashWatchQuery {
        /// Last value the client saw; the call returns as soon as the
        /// published value differs.
        pub since: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashWatchResponse {
        pub amount_minor: i64,
        /// `false` when the wait timed out without a new value.
        pub changed: bool,
    }
}
