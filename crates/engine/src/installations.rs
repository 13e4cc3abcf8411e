//! New installations carried out for customers.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{
    Amount, EngineError, Status,
    util::{parse_date, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Installation {
    pub id: Uuid,
    pub customer_name: String,
    pub location: String,
    pub installed_on: NaiveDate,
    pub amount: Amount,
    pub status: Status,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "new_installations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_name: String,
    pub location: String,
    pub installed_on: String,
    pub amount_minor: i64,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Installation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "installation")?,
            customer_name: model.customer_name,
            location: model.location,
            installed_on: parse_date(&model.installed_on)?,
            amount: Amount::new(model.amount_minor),
            status: Status::try_from(model.status.as_str())?,
            notes: model.notes,
        })
    }
}
