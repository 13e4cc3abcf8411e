//! Plain CRUD for the asset registers: bikes, agriculture vehicles, new
//! installations and agri-store entries.

use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::{
    AgristoreEntry, AgristoreInput, Bike, BikeInput, EngineError, Installation,
    InstallationInput, ResultEngine, Session, Vehicle, VehicleInput, agristore, bikes,
    installations, vehicles,
    util::{ensure_non_negative, format_date, normalize_optional_text, normalize_required_text},
};

use super::Engine;

/// Generates list, get and delete for an asset register.
macro_rules! impl_asset_reads {
    (
        $list_fn:ident, $get_fn:ident, $delete_fn:ident,
        $module:ident, $domain:ty, $order_col:ident, $label:literal
    ) => {
        pub async fn $list_fn(&self) -> ResultEngine<Vec<$domain>> {
            $module::Entity::find()
                .order_by_asc($module::Column::$order_col)
                .all(&self.database)
                .await?
                .into_iter()
                .map(<$domain>::try_from)
                .collect()
        }

        pub async fn $get_fn(&self, id: Uuid) -> ResultEngine<$domain> {
            let model = $module::Entity::find_by_id(id.to_string())
                .one(&self.database)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(concat!($label, " not exists").to_string()))?;
            <$domain>::try_from(model)
        }

        pub async fn $delete_fn(&self, session: &Session, id: Uuid) -> ResultEngine<()> {
            session.require_write()?;
            let res = $module::Entity::delete_by_id(id.to_string())
                .exec(&self.database)
                .await?;
            if res.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(
                    concat!($label, " not exists").to_string(),
                ));
            }
            tracing::info!(%id, user = %session.username, concat!($label, " deleted"));
            Ok(())
        }
    };
}

fn agristore_amount(input: &AgristoreInput) -> ResultEngine<i64> {
    if input.quantity <= 0 {
        return Err(EngineError::InvalidInput(
            "quantity must be > 0".to_string(),
        ));
    }
    ensure_non_negative(input.rate, "rate")?;
    input
        .rate
        .checked_mul(input.quantity)
        .map(|amount| amount.minor())
        .ok_or_else(|| EngineError::InvalidAmount("amount overflow".to_string()))
}

impl Engine {
    impl_asset_reads!(list_bikes, bike, delete_bike, bikes, Bike, RegistrationNumber, "bike");
    impl_asset_reads!(
        list_vehicles,
        vehicle,
        delete_vehicle,
        vehicles,
        Vehicle,
        Name,
        "vehicle"
    );
    impl_asset_reads!(
        list_installations,
        installation,
        delete_installation,
        installations,
        Installation,
        InstalledOn,
        "installation"
    );
    impl_asset_reads!(
        list_agristore,
        agristore_entry,
        delete_agristore_entry,
        agristore,
        AgristoreEntry,
        TransactionDate,
        "agristore entry"
    );

    /// Creates a bike when `id` is `None`, otherwise replaces it.
    pub async fn save_bike(
        &self,
        session: &Session,
        id: Option<Uuid>,
        input: BikeInput,
    ) -> ResultEngine<Bike> {
        session.require_write()?;
        let registration_number =
            normalize_required_text(&input.registration_number, "registration number")?;
        let model_name = normalize_required_text(&input.model, "model")?;
        self.require_optional_employee(&self.database, input.employee_id)
            .await?;

        let mut active = match id {
            Some(id) => {
                let model = bikes::Entity::find_by_id(id.to_string())
                    .one(&self.database)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("bike not exists".to_string()))?;
                bikes::ActiveModel::from(model)
            }
            None => bikes::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                ..Default::default()
            },
        };
        active.registration_number = ActiveValue::Set(registration_number);
        active.model = ActiveValue::Set(model_name);
        active.employee_id = ActiveValue::Set(input.employee_id.map(|id| id.to_string()));
        active.purchased_on = ActiveValue::Set(input.purchased_on.map(format_date));
        active.status = ActiveValue::Set(input.status.as_str().to_string());
        active.notes = ActiveValue::Set(normalize_optional_text(input.notes.as_deref()));

        let model = match id {
            Some(_) => active.update(&self.database).await?,
            None => active.insert(&self.database).await?,
        };
        Bike::try_from(model)
    }

    pub async fn save_vehicle(
        &self,
        session: &Session,
        id: Option<Uuid>,
        input: VehicleInput,
    ) -> ResultEngine<Vehicle> {
        session.require_write()?;
        let name = normalize_required_text(&input.name, "name")?;
        let vehicle_type = normalize_required_text(&input.vehicle_type, "vehicle type")?;

        let mut active = match id {
            Some(id) => {
                let model = vehicles::Entity::find_by_id(id.to_string())
                    .one(&self.database)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("vehicle not exists".to_string()))?;
                vehicles::ActiveModel::from(model)
            }
            None => vehicles::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                ..Default::default()
            },
        };
        active.name = ActiveValue::Set(name);
        active.vehicle_type = ActiveValue::Set(vehicle_type);
        active.registration_number = ActiveValue::Set(normalize_optional_text(
            input.registration_number.as_deref(),
        ));
        active.purchased_on = ActiveValue::Set(input.purchased_on.map(format_date));
        active.status = ActiveValue::Set(input.status.as_str().to_string());
        active.notes = ActiveValue::Set(normalize_optional_text(input.notes.as_deref()));

        let model = match id {
            Some(_) => active.update(&self.database).await?,
            None => active.insert(&self.database).await?,
        };
        Vehicle::try_from(model)
    }

    pub async fn save_installation(
        &self,
        session: &Session,
        id: Option<Uuid>,
        input: InstallationInput,
    ) -> ResultEngine<Installation> {
        session.require_write()?;
        let customer_name = normalize_required_text(&input.customer_name, "customer name")?;
        let location = normalize_required_text(&input.location, "location")?;
        ensure_non_negative(input.amount, "amount")?;

        let mut active = match id {
            Some(id) => {
                let model = installations::Entity::find_by_id(id.to_string())
                    .one(&self.database)
                    .await?
                    .ok_or_else(|| {
                        EngineError::KeyNotFound("installation not exists".to_string())
                    })?;
                installations::ActiveModel::from(model)
            }
            None => installations::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                ..Default::default()
            },
        };
        active.customer_name = ActiveValue::Set(customer_name);
        active.location = ActiveValue::Set(location);
        active.installed_on = ActiveValue::Set(format_date(input.installed_on));
        active.amount_minor = ActiveValue::Set(input.amount.minor());
        active.status = ActiveValue::Set(input.status.as_str().to_string());
        active.notes = ActiveValue::Set(normalize_optional_text(input.notes.as_deref()));

        let model = match id {
            Some(_) => active.update(&self.database).await?,
            None => active.insert(&self.database).await?,
        };
        Installation::try_from(model)
    }

    /// Records an agri-store purchase or sale. `amount` is always
    /// `quantity * rate`.
    pub async fn save_agristore_entry(
        &self,
        session: &Session,
        id: Option<Uuid>,
        input: AgristoreInput,
    ) -> ResultEngine<AgristoreEntry> {
        session.require_write()?;
        let item = normalize_required_text(&input.item, "item")?;
        let amount_minor = agristore_amount(&input)?;

        let mut active = match id {
            Some(id) => {
                let model = agristore::Entity::find_by_id(id.to_string())
                    .one(&self.database)
                    .await?
                    .ok_or_else(|| {
                        EngineError::KeyNotFound("agristore entry not exists".to_string())
                    })?;
                agristore::ActiveModel::from(model)
            }
            None => agristore::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                ..Default::default()
            },
        };
        active.transaction_date = ActiveValue::Set(format_date(input.transaction_date));
        active.item = ActiveValue::Set(item);
        active.kind = ActiveValue::Set(input.kind.as_str().to_string());
        active.quantity = ActiveValue::Set(input.quantity);
        active.rate_minor = ActiveValue::Set(input.rate.minor());
        active.amount_minor = ActiveValue::Set(amount_minor);
        active.notes = ActiveValue::Set(normalize_optional_text(input.notes.as_deref()));

        let model = match id {
            Some(_) => active.update(&self.database).await?,
            None => active.insert(&self.database).await?,
        };
        AgristoreEntry::try_from(model)
    }
}
