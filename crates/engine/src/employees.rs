//! Employees (optional owners of ledger codes, bikes and transaction rows).

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Amount, EngineError, Status, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub salary: Amount,
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub designation: String,
    pub salary_minor: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Employee {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "employee")?,
            name: model.name,
            designation: model.designation,
            salary: Amount::new(model.salary_minor),
            status: Status::try_from(model.status.as_str())?,
        })
    }
}
