//! Ledger codes: user-defined categories used to tag daily transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_optional_uuid, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCategory {
    Income,
    Expense,
    Location,
}

impl LedgerCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Location => "location",
        }
    }
}

impl TryFrom<&str> for LedgerCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "location" => Ok(Self::Location),
            other => Err(EngineError::InvalidInput(format!(
                "invalid ledger category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerCode {
    pub id: Uuid,
    pub code: String,
    pub category: LedgerCategory,
    pub sub_category: Option<String>,
    pub employee_id: Option<Uuid>,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub code_norm: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub employee_id: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for LedgerCode {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "ledger code")?,
            code: model.code,
            category: LedgerCategory::try_from(model.category.as_str())?,
            sub_category: model.sub_category,
            employee_id: parse_optional_uuid(model.employee_id.as_deref(), "employee")?,
            is_active: model.is_active,
        })
    }
}
