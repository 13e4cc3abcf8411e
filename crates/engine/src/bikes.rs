//! Bikes assigned to field staff.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{
    EngineError, Status,
    util::{parse_date, parse_optional_uuid, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bike {
    pub id: Uuid,
    pub registration_number: String,
    pub model: String,
    pub employee_id: Option<Uuid>,
    pub purchased_on: Option<NaiveDate>,
    pub status: Status,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bikes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub registration_number: String,
    pub model: String,
    pub employee_id: Option<String>,
    pub purchased_on: Option<String>,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Bike {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "bike")?,
            registration_number: model.registration_number,
            model: model.model,
            employee_id: parse_optional_uuid(model.employee_id.as_deref(), "employee")?,
            purchased_on: model.purchased_on.as_deref().map(parse_date).transpose()?,
            status: Status::try_from(model.status.as_str())?,
            notes: model.notes,
        })
    }
}
