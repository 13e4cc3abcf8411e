//! Conversions between engine values and API bodies.

use api_types::{
    Role as ApiRole, Status as ApiStatus,
    assets::{AgristoreKind as ApiAgristoreKind, AgristoreView, BikeView, InstallationView, VehicleView},
    auth::SessionView,
    day::{DayView, DraftRow as ApiDraftRow},
    employee::EmployeeView,
    ledger_code::{LedgerCategory as ApiCategory, LedgerCodeView},
    transaction::TransactionView,
    user::UserView,
};
use engine::{Amount, DraftRow};

pub fn role_from_api(role: ApiRole) -> engine::Role {
    match role {
        ApiRole::Admin => engine::Role::Admin,
        ApiRole::Write => engine::Role::Write,
        ApiRole::Read => engine::Role::Read,
    }
}

pub fn role_to_api(role: engine::Role) -> ApiRole {
    match role {
        engine::Role::Admin => ApiRole::Admin,
        engine::Role::Write => ApiRole::Write,
        engine::Role::Read => ApiRole::Read,
    }
}

pub fn status_from_api(status: ApiStatus) -> engine::Status {
    match status {
        ApiStatus::Active => engine::Status::Active,
        ApiStatus::Inactive => engine::Status::Inactive,
    }
}

pub fn status_to_api(status: engine::Status) -> ApiStatus {
    match status {
        engine::Status::Active => ApiStatus::Active,
        engine::Status::Inactive => ApiStatus::Inactive,
    }
}

pub fn category_from_api(category: ApiCategory) -> engine::LedgerCategory {
    match category {
        ApiCategory::Income => engine::LedgerCategory::Income,
        ApiCategory::Expense => engine::LedgerCategory::Expense,
        ApiCategory::Location => engine::LedgerCategory::Location,
    }
}

pub fn category_to_api(category: engine::LedgerCategory) -> ApiCategory {
    match category {
        engine::LedgerCategory::Income => ApiCategory::Income,
        engine::LedgerCategory::Expense => ApiCategory::Expense,
        engine::LedgerCategory::Location => ApiCategory::Location,
    }
}

pub fn agristore_kind_from_api(kind: ApiAgristoreKind) -> engine::AgristoreKind {
    match kind {
        ApiAgristoreKind::Purchase => engine::AgristoreKind::Purchase,
        ApiAgristoreKind::Sale => engine::AgristoreKind::Sale,
    }
}

fn agristore_kind_to_api(kind: engine::AgristoreKind) -> ApiAgristoreKind {
    match kind {
        engine::AgristoreKind::Purchase => ApiAgristoreKind::Purchase,
        engine::AgristoreKind::Sale => ApiAgristoreKind::Sale,
    }
}

pub fn session_view(session: &engine::Session) -> SessionView {
    SessionView {
        user_id: session.user_id,
        username: session.username.clone(),
        name: session.name.clone(),
        role: role_to_api(session.role),
    }
}

pub fn user_view(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        username: user.username,
        email: user.email,
        role: role_to_api(user.role),
        status: status_to_api(user.status),
    }
}

pub fn ledger_code_view(code: engine::LedgerCode) -> LedgerCodeView {
    LedgerCodeView {
        id: code.id,
        code: code.code,
        category: category_to_api(code.category),
        sub_category: code.sub_category,
        employee_id: code.employee_id,
        is_active: code.is_active,
    }
}

pub fn employee_view(employee: engine::Employee) -> EmployeeView {
    EmployeeView {
        id: employee.id,
        name: employee.name,
        designation: employee.designation,
        salary_minor: employee.salary.minor(),
        status: status_to_api(employee.status),
    }
}

pub fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        transaction_date: tx.transaction_date,
        ledger_code_id: tx.ledger_code_id,
        employee_id: tx.employee_id,
        cash_in_minor: tx.cash_in.minor(),
        bank_in_minor: tx.bank_in.minor(),
        expenditure_out_minor: tx.expenditure_out.minor(),
        expenditure_cash_minor: tx.expenditure_cash.minor(),
        description: tx.description,
        order: tx.order,
        is_balance_entry: tx.is_balance_entry,
        previous_balance_minor: tx.previous_balance.map(Amount::minor),
        total_balance_minor: tx.total_balance.map(Amount::minor),
        created_by: tx.created_by,
    }
}

pub fn day_view(day: engine::DayLedger) -> DayView {
    DayView {
        date: day.date,
        previous_balance_minor: day.previous_balance.minor(),
        total_balance_minor: day.total_balance.minor(),
        rows: day.rows.into_iter().map(transaction_view).collect(),
        locked: day.locked,
    }
}

pub fn draft_row(row: ApiDraftRow) -> DraftRow {
    DraftRow {
        id: row.id,
        ledger_code_id: row.ledger_code_id,
        employee_id: row.employee_id,
        cash_in: Amount::new(row.cash_in_minor),
        bank_in: Amount::new(row.bank_in_minor),
        expenditure_out: Amount::new(row.expenditure_out_minor),
        expenditure_cash: Amount::new(row.expenditure_cash_minor),
        description: row.description,
        order: row.order,
    }
}

pub fn bike_view(bike: engine::Bike) -> BikeView {
    BikeView {
        id: bike.id,
        registration_number: bike.registration_number,
        model: bike.model,
        employee_id: bike.employee_id,
        purchased_on: bike.purchased_on,
        status: status_to_api(bike.status),
        notes: bike.notes,
    }
}

pub fn vehicle_view(vehicle: engine::Vehicle) -> VehicleView {
    VehicleView {
        id: vehicle.id,
        name: vehicle.name,
        vehicle_type: vehicle.vehicle_type,
        registration_number: vehicle.registration_number,
        purchased_on: vehicle.purchased_on,
        status: status_to_api(vehicle.status),
        notes: vehicle.notes,
    }
}

pub fn installation_view(installation: engine::Installation) -> InstallationView {
    InstallationView {
        id: installation.id,
        customer_name: installation.customer_name,
        location: installation.location,
        installed_on: installation.installed_on,
        amount_minor: installation.amount.minor(),
        status: status_to_api(installation.status),
        notes: installation.notes,
    }
}

pub fn agristore_view(entry: engine::AgristoreEntry) -> AgristoreView {
    AgristoreView {
        id: entry.id,
        transaction_date: entry.transaction_date,
        item: entry.item,
        kind: agristore_kind_to_api(entry.kind),
        quantity: entry.quantity,
        rate_minor: entry.rate.minor(),
        amount_minor: entry.amount.minor(),
        notes: entry.notes,
    }
}
