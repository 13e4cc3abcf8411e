//! Employee endpoints.

use api_types::employee::{EmployeePatch, EmployeeQuery, EmployeeUpsert, EmployeeView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Amount, EmployeeInput, Session};
use uuid::Uuid;

use crate::{
    ServerError,
    mapping::{employee_view, status_from_api},
    server::ServerState,
};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<EmployeeQuery>,
) -> Result<Json<Vec<EmployeeView>>, ServerError> {
    let employees = state
        .engine
        .list_employees(query.include_inactive)
        .await?
        .into_iter()
        .map(employee_view)
        .collect();
    Ok(Json(employees))
}

pub async fn create(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeUpsert>,
) -> Result<(StatusCode, Json<EmployeeView>), ServerError> {
    let employee = state
        .engine
        .create_employee(
            &session,
            EmployeeInput {
                name: payload.name,
                designation: payload.designation,
                salary: Amount::new(payload.salary_minor),
                status: status_from_api(payload.status),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(employee_view(employee))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<EmployeeView>, ServerError> {
    let employee = state.engine.employee(employee_id).await?;
    Ok(Json(employee_view(employee)))
}

pub async fn update(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(employee_id): Path<Uuid>,
    Json(payload): Json<EmployeePatch>,
) -> Result<Json<EmployeeView>, ServerError> {
    let current = state.engine.employee(employee_id).await?;
    let employee = state
        .engine
        .update_employee(
            &session,
            employee_id,
            EmployeeInput {
                name: payload.name.unwrap_or(current.name),
                designation: payload.designation.unwrap_or(current.designation),
                salary: payload
                    .salary_minor
                    .map(Amount::new)
                    .unwrap_or(current.salary),
                status: payload
                    .status
                    .map(status_from_api)
                    .unwrap_or(current.status),
            },
        )
        .await?;
    Ok(Json(employee_view(employee)))
}

pub async fn delete(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Path(employee_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_employee(&session, employee_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
