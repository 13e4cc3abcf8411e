pub use agristore::{AgristoreEntry, AgristoreKind};
pub use bikes::Bike;
pub use cash_watch::CashWatch;
pub use commands::{
    AgristoreInput, BikeInput, DraftRow, EmployeeInput, InstallationInput, LedgerCodeInput,
    NewUser, UserUpdate, VehicleInput,
};
pub use employees::Employee;
pub use error::EngineError;
pub use installations::Installation;
pub use ledger::{SaveTotals, close_day, prepare_rows, save_totals};
pub use ledger_codes::{LedgerCategory, LedgerCode};
pub use lock::is_locked;
pub use money::Amount;
pub use ops::{
    DayLedger, DaySummary, Engine, EngineBuilder, LedgerCodeTotal, MonthlyReport, SaveOutcome,
    TransactionListFilter,
};
pub use session::Session;
pub use transactions::{BalanceRecord, Transaction};
pub use users::{Role, Status, User};
pub use vehicles::Vehicle;

mod agristore;
mod bikes;
mod cash_register;
mod cash_watch;
mod commands;
mod employees;
mod error;
mod installations;
mod ledger;
mod ledger_codes;
mod lock;
mod money;
mod ops;
mod session;
mod transactions;
mod users;
mod util;
mod vehicles;

type ResultEngine<T> = Result<T, EngineError>;
