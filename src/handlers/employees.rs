// src/handlers/employees.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, AnyRole, Authorize},
    models::{
        employee::{Employee, EmployeeDetails, EmployeeStatus},
        message::MessageResponse,
        workflow::Workflow,
    },
    services::employee_service::EmployeeChanges,
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 1, message = "Position is required"))]
    #[schema(example = "Software Engineer")]
    pub position: String,
    pub account_id: Option<Uuid>,
    pub department_id: Uuid,
    #[serde(default)]
    pub status: EmployeeStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 1, message = "Position cannot be empty"))]
    pub position: Option<String>,
    pub account_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    pub department_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransferResponse {
    #[schema(example = "Employee transferred")]
    pub message: String,
    pub workflow: Workflow,
}

#[utoipa::path(
    get,
    path = "/accounts/employees",
    tag = "Employees",
    responses(
        (status = 200, description = "Funcionários com departamento e email", body = [EmployeeDetails])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    _guard: Authorize<AnyRole>,
) -> Result<Json<Vec<EmployeeDetails>>, AppError> {
    let employees = app_state.employee_service.list().await?;
    Ok(Json(employees))
}

#[utoipa::path(
    get,
    path = "/accounts/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário", body = EmployeeDetails),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    _guard: Authorize<AnyRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeDetails>, AppError> {
    let employee = app_state.employee_service.get(id).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    post,
    path = "/accounts/employees",
    tag = "Employees",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = Employee),
        (status = 404, description = "Departamento ou conta não encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state
        .employee_service
        .create(&payload.position, payload.account_id, payload.department_id, payload.status)
        .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    put,
    path = "/accounts/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body = UpdateEmployeePayload,
    responses(
        (status = 200, description = "Funcionário atualizado", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<Json<Employee>, AppError> {
    payload.validate()?;

    let changes = EmployeeChanges {
        position: payload.position,
        account_id: payload.account_id,
        department_id: payload.department_id,
        status: payload.status,
    };
    let employee = app_state.employee_service.update(id, changes).await?;

    Ok(Json(employee))
}

#[utoipa::path(
    delete,
    path = "/accounts/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário, pedidos e workflows removidos", body = MessageResponse),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.employee_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Employee deleted")))
}

#[utoipa::path(
    post,
    path = "/accounts/employees/{id}/transfer",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body = TransferPayload,
    responses(
        (status = 200, description = "Funcionário transferido; workflow registrado", body = TransferResponse),
        (status = 404, description = "Funcionário ou departamento não encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn transfer_employee(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransferPayload>,
) -> Result<Json<TransferResponse>, AppError> {
    let workflow = app_state
        .employee_service
        .transfer(id, payload.department_id)
        .await?;

    Ok(Json(TransferResponse {
        message: "Employee transferred".to_string(),
        workflow,
    }))
}
