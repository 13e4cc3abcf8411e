//! Agri-store purchases and sales.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Amount, EngineError,
    util::{parse_date, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgristoreKind {
    Purchase,
    Sale,
}

impl AgristoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        }
    }
}

impl TryFrom<&str> for AgristoreKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            other => Err(EngineError::InvalidInput(format!(
                "invalid agristore kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgristoreEntry {
    pub id: Uuid,
    pub transaction_date: NaiveDate,
    pub item: String,
    pub kind: AgristoreKind,
    pub quantity: i64,
    pub rate: Amount,
    /// `quantity * rate`, computed on write.
    pub amount: Amount,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "agristore_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub transaction_date: String,
    pub item: String,
    pub kind: String,
    pub quantity: i64,
    pub rate_minor: i64,
    pub amount_minor: i64,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for AgristoreEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "agristore entry")?,
            transaction_date: parse_date(&model.transaction_date)?,
            item: model.item,
            kind: AgristoreKind::try_from(model.kind.as_str())?,
            quantity: model.quantity,
            rate: Amount::new(model.rate_minor),
            amount: Amount::new(model.amount_minor),
            notes: model.notes,
        })
    }
}
