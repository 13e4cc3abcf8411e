//! Agriculture vehicles (tractors, harvesters, sprayers...).

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{
    EngineError, Status,
    util::{parse_date, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub vehicle_type: String,
    pub registration_number: Option<String>,
    pub purchased_on: Option<NaiveDate>,
    pub status: Status,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "agriculture_vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub vehicle_type: String,
    pub registration_number: Option<String>,
    pub purchased_on: Option<String>,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Vehicle {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "vehicle")?,
            name: model.name,
            vehicle_type: model.vehicle_type,
            registration_number: model.registration_number,
            purchased_on: model.purchased_on.as_deref().map(parse_date).transpose()?,
            status: Status::try_from(model.status.as_str())?,
            notes: model.notes,
        })
    }
}
