//! Asset register endpoints (bikes, vehicles, installations, agri-store).

use api_types::assets::{
    AgristoreUpsert, AgristoreView, BikeUpsert, BikeView, InstallationUpsert, InstallationView,
    VehicleUpsert, VehicleView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{AgristoreInput, Amount, BikeInput, InstallationInput, Session, VehicleInput};
use uuid::Uuid;

use crate::{
    ServerError,
    mapping::{
        agristore_kind_from_api, agristore_view, bike_view, installation_view, status_from_api,
        vehicle_view,
    },
    server::ServerState,
};

fn bike_input(payload: BikeUpsert) -> BikeInput {
    BikeInput {
        registration_number: payload.registration_number,
        model: payload.model,
        employee_id: payload.employee_id,
        purchased_on: payload.purchased_on,
        status: status_from_api(payload.status),
        notes: payload.notes,
    }
}

fn vehicle_input(payload: VehicleUpsert) -> VehicleInput {
    VehicleInput {
        name: payload.name,
        vehicle_type: payload.vehicle_type,
        registration_number: payload.registration_number,
        purchased_on: payload.purchased_on,
        status: status_from_api(payload.status),
        notes: payload.notes,
    }
}

fn installation_input(payload: InstallationUpsert) -> InstallationInput {
    InstallationInput {
        customer_name: payload.customer_name,
        location: payload.location,
        installed_on: payload.installed_on,
        amount: Amount::new(payload.amount_minor),
        status: status_from_api(payload.status),
        notes: payload.notes,
    }
}

fn agristore_input(payload: AgristoreUpsert) -> AgristoreInput {
    AgristoreInput {
        transaction_date: payload.transaction_date,
        item: payload.item,
        kind: agristore_kind_from_api(payload.kind),
        quantity: payload.quantity,
        rate: Amount::new(payload.rate_minor),
        notes: payload.notes,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bikes
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_bikes(
    State(state): State<ServerState>,
) -> Result<Json<Vec<BikeView>>, ServerError> {
    let bikes = state.engine.list_bikes().await?;
    Ok(Json(bikes.into_iter().map(bike_view).collect()))
}

pub async fn get_bike(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BikeView>, ServerError> {
    Ok(Json(bike_view(state.engine.bike(id).await?)))
}

pub async fn create_bike(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<BikeUpsert>,
) -> Result<(StatusCode, Json<BikeView>), ServerError> {
    let bike = state
        .engine
        .save_bike(&session, None, bike_input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(bike_view(bike))))
}

pub async fn update_bike(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BikeUpsert>,
) -> Result<Json<BikeView>, ServerError> {
    let bike = state
        .engine
        .save_bike(&session, Some(id), bike_input(payload))
        .await?;
    Ok(Json(bike_view(bike)))
}

pub async fn delete_bike(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_bike(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Agriculture vehicles
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_vehicles(
    State(state): State<ServerState>,
) -> Result<Json<Vec<VehicleView>>, ServerError> {
    let vehicles = state.engine.list_vehicles().await?;
    Ok(Json(vehicles.into_iter().map(vehicle_view).collect()))
}

pub async fn get_vehicle(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleView>, ServerError> {
    Ok(Json(vehicle_view(state.engine.vehicle(id).await?)))
}

pub async fn create_vehicle(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<VehicleUpsert>,
) -> Result<(StatusCode, Json<VehicleView>), ServerError> {
    let vehicle = state
        .engine
        .save_vehicle(&session, None, vehicle_input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(vehicle_view(vehicle))))
}

pub async fn update_vehicle(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VehicleUpsert>,
) -> Result<Json<VehicleView>, ServerError> {
    let vehicle = state
        .engine
        .save_vehicle(&session, Some(id), vehicle_input(payload))
        .await?;
    Ok(Json(vehicle_view(vehicle)))
}

pub async fn delete_vehicle(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_vehicle(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// New installations
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_installations(
    State(state): State<ServerState>,
) -> Result<Json<Vec<InstallationView>>, ServerError> {
    let installations = state.engine.list_installations().await?;
    Ok(Json(
        installations.into_iter().map(installation_view).collect(),
    ))
}

pub async fn get_installation(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InstallationView>, ServerError> {
    Ok(Json(installation_view(state.engine.installation(id).await?)))
}

pub async fn create_installation(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<InstallationUpsert>,
) -> Result<(StatusCode, Json<InstallationView>), ServerError> {
    let installation = state
        .engine
        .save_installation(&session, None, installation_input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(installation_view(installation))))
}

pub async fn update_installation(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InstallationUpsert>,
) -> Result<Json<InstallationView>, ServerError> {
    let installation = state
        .engine
        .save_installation(&session, Some(id), installation_input(payload))
        .await?;
    Ok(Json(installation_view(installation)))
}

pub async fn delete_installation(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_installation(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Agri-store
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_agristore(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AgristoreView>>, ServerError> {
    let entries = state.engine.list_agristore().await?;
    Ok(Json(entries.into_iter().map(agristore_view).collect()))
}

pub async fn get_agristore(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AgristoreView>, ServerError> {
    Ok(Json(agristore_view(state.engine.agristore_entry(id).await?)))
}

pub async fn create_agristore(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<AgristoreUpsert>,
) -> Result<(StatusCode, Json<AgristoreView>), ServerError> {
    let entry = state
        .engine
        .save_agristore_entry(&session, None, agristore_input(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(agristore_view(entry))))
}

pub async fn update_agristore(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AgristoreUpsert>,
) -> Result<Json<AgristoreView>, ServerError> {
    let entry = state
        .engine
        .save_agristore_entry(&session, Some(id), agristore_input(payload))
        .await?;
    Ok(Json(agristore_view(entry)))
}

pub async fn delete_agristore(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_agristore_entry(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
