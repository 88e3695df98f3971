// src/handlers/departments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, AnyRole, Authorize},
    models::{
        department::{Department, DepartmentSummary},
        message::MessageResponse,
    },
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Engineering")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentPayload {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/accounts/departments",
    tag = "Departments",
    responses(
        (status = 200, description = "Departamentos com a contagem de funcionários", body = [DepartmentSummary])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_departments(
    State(app_state): State<AppState>,
    _guard: Authorize<AnyRole>,
) -> Result<Json<Vec<DepartmentSummary>>, AppError> {
    let departments = app_state.department_service.list().await?;
    Ok(Json(departments))
}

#[utoipa::path(
    get,
    path = "/accounts/departments/{id}",
    tag = "Departments",
    params(("id" = Uuid, Path, description = "ID do departamento")),
    responses(
        (status = 200, description = "Departamento", body = DepartmentSummary),
        (status = 404, description = "Departamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_department(
    State(app_state): State<AppState>,
    _guard: Authorize<AnyRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<DepartmentSummary>, AppError> {
    let department = app_state.department_service.get(id).await?;
    Ok(Json(department))
}

#[utoipa::path(
    post,
    path = "/accounts/departments",
    tag = "Departments",
    request_body = CreateDepartmentPayload,
    responses(
        (status = 201, description = "Departamento criado", body = Department),
        (status = 403, description = "Apenas Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_department(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Json(payload): Json<CreateDepartmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let department = app_state
        .department_service
        .create(&payload.name, payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    put,
    path = "/accounts/departments/{id}",
    tag = "Departments",
    params(("id" = Uuid, Path, description = "ID do departamento")),
    request_body = UpdateDepartmentPayload,
    responses(
        (status = 200, description = "Departamento atualizado", body = Department),
        (status = 404, description = "Departamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_department(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepartmentPayload>,
) -> Result<Json<Department>, AppError> {
    payload.validate()?;

    let department = app_state
        .department_service
        .update(id, payload.name, payload.description)
        .await?;

    Ok(Json(department))
}

#[utoipa::path(
    delete,
    path = "/accounts/departments/{id}",
    tag = "Departments",
    params(("id" = Uuid, Path, description = "ID do departamento")),
    responses(
        (status = 200, description = "Departamento e funcionários removidos", body = MessageResponse),
        (status = 404, description = "Departamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_department(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.department_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Department deleted")))
}
