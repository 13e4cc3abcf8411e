//! Command structs for engine operations.
//!
//! These types group parameters for write operations (rows to save, users,
//! ledger codes, employees, assets), keeping call sites readable and avoiding
//! long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Amount, LedgerCategory, Role, Status};

/// One row of the day's entry buffer, as submitted by the entry screen.
///
/// Rows with an `id` are already persisted and get updated in place; rows
/// without one are inserted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DraftRow {
    pub id: Option<Uuid>,
    pub ledger_code_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub cash_in: Amount,
    pub bank_in: Amount,
    pub expenditure_out: Amount,
    pub expenditure_cash: Amount,
    pub description: String,
    pub order: Option<i32>,
}

impl DraftRow {
    #[must_use]
    pub fn new(ledger_code_id: Uuid, description: impl Into<String>) -> Self {
        Self {
            ledger_code_id: Some(ledger_code_id),
            description: description.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn employee_id(mut self, employee_id: Uuid) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    #[must_use]
    pub fn cash_in(mut self, minor: i64) -> Self {
        self.cash_in = Amount::new(minor);
        self
    }

    #[must_use]
    pub fn bank_in(mut self, minor: i64) -> Self {
        self.bank_in = Amount::new(minor);
        self
    }

    #[must_use]
    pub fn expenditure_out(mut self, minor: i64) -> Self {
        self.expenditure_out = Amount::new(minor);
        self
    }

    #[must_use]
    pub fn expenditure_cash(mut self, minor: i64) -> Self {
        self.expenditure_cash = Amount::new(minor);
        self
    }

    #[must_use]
    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub(crate) fn amounts(&self) -> [Amount; 4] {
        [
            self.cash_in,
            self.bank_in,
            self.expenditure_out,
            self.expenditure_cash,
        ]
    }
}

/// Create a user (admin only).
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

/// Partial update of a user. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub status: Option<Status>,
}

#[derive(Clone, Debug)]
pub struct LedgerCodeInput {
    pub code: String,
    pub category: LedgerCategory,
    pub sub_category: Option<String>,
    pub employee_id: Option<Uuid>,
    pub is_active: bool,
}

#[derive(Clone, Debug)]
pub struct EmployeeInput {
    pub name: String,
    pub designation: String,
    pub salary: Amount,
    pub status: Status,
}

#[derive(Clone, Debug)]
pub struct BikeInput {
    pub registration_number: String,
    pub model: String,
    pub employee_id: Option<Uuid>,
    pub purchased_on: Option<NaiveDate>,
    pub status: Status,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct VehicleInput {
    pub name: String,
    pub vehicle_type: String,
    pub registration_number: Option<String>,
    pub purchased_on: Option<NaiveDate>,
    pub status: Status,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct InstallationInput {
    pub customer_name: String,
    pub location: String,
    pub installed_on: NaiveDate,
    pub amount: Amount,
    pub status: Status,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AgristoreInput {
    pub transaction_date: NaiveDate,
    pub item: String,
    pub kind: crate::AgristoreKind,
    pub quantity: i64,
    pub rate: Amount,
    pub notes: Option<String>,
}
