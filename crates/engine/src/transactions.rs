//! Daily transaction rows.
//!
//! The `transactions` table holds two kinds of records:
//!
//! - regular rows (cash in / bank in / expenditures tagged with a ledger
//!   code);
//! - at most one **balance entry** per date (`is_balance_entry = true`) that
//!   carries the opening (`previous_balance`) and closing (`total_balance`)
//!   balance of that date.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{
    Amount, EngineError, ResultEngine,
    util::{parse_date, parse_optional_uuid, parse_uuid},
};

/// Description stored on synthetic balance entries.
pub(crate) const BALANCE_ENTRY_DESCRIPTION: &str = "Balance";

/// A regular (non-balance) transaction row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub transaction_date: NaiveDate,
    pub ledger_code_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub cash_in: Amount,
    pub bank_in: Amount,
    pub expenditure_out: Amount,
    pub expenditure_cash: Amount,
    pub description: String,
    pub order: i32,
    pub is_balance_entry: bool,
    pub previous_balance: Option<Amount>,
    pub total_balance: Option<Amount>,
    pub created_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// `cash_in + bank_in`
    pub fn recovery(&self) -> ResultEngine<Amount> {
        self.cash_in.add(self.bank_in)
    }

    /// `expenditure_out + expenditure_cash`
    pub fn expense(&self) -> ResultEngine<Amount> {
        self.expenditure_out.add(self.expenditure_cash)
    }
}

/// Opening/closing balance known for a date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub previous_balance: Amount,
    pub total_balance: Amount,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub transaction_date: String,
    pub ledger_code_id: Option<String>,
    pub employee_id: Option<String>,
    pub cash_in: i64,
    pub bank_in: i64,
    pub expenditure_out: i64,
    pub expenditure_cash: i64,
    pub description: String,
    pub sort_order: i32,
    pub is_balance_entry: bool,
    pub previous_balance: Option<i64>,
    pub total_balance: Option<i64>,
    pub created_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledger_codes::Entity",
        from = "Column::LedgerCodeId",
        to = "super::ledger_codes::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    LedgerCode,
}

impl Related<super::ledger_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            transaction_date: parse_date(&model.transaction_date)?,
            ledger_code_id: parse_optional_uuid(model.ledger_code_id.as_deref(), "ledger code")?,
            employee_id: parse_optional_uuid(model.employee_id.as_deref(), "employee")?,
            cash_in: Amount::new(model.cash_in),
            bank_in: Amount::new(model.bank_in),
            expenditure_out: Amount::new(model.expenditure_out),
            expenditure_cash: Amount::new(model.expenditure_cash),
            description: model.description,
            order: model.sort_order,
            is_balance_entry: model.is_balance_entry,
            previous_balance: model.previous_balance.map(Amount::new),
            total_balance: model.total_balance.map(Amount::new),
            created_by: model.created_by,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<Model> for BalanceRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        if !model.is_balance_entry {
            return Err(EngineError::InvalidInput(
                "not a balance entry".to_string(),
            ));
        }
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            date: parse_date(&model.transaction_date)?,
            previous_balance: Amount::new(model.previous_balance.unwrap_or_default()),
            total_balance: Amount::new(model.total_balance.unwrap_or_default()),
        })
    }
}
