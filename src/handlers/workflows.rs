// src/handlers/workflows.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AdminOnly, AnyRole, Authorize},
    models::workflow::Workflow,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowPayload {
    pub employee_id: Uuid,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    #[schema(example = "Onboarding")]
    pub kind: String,
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

#[utoipa::path(
    post,
    path = "/accounts/workflows",
    tag = "Workflows",
    request_body = CreateWorkflowPayload,
    responses(
        (status = 201, description = "Workflow registrado", body = Workflow),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_workflow(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Json(payload): Json<CreateWorkflowPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let workflow = app_state
        .workflow_service
        .record(payload.employee_id, &payload.kind, payload.details)
        .await?;

    Ok((StatusCode::CREATED, Json(workflow)))
}

#[utoipa::path(
    get,
    path = "/accounts/workflows/employee/{employee_id}",
    tag = "Workflows",
    params(("employee_id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Histórico do funcionário, do mais antigo ao mais novo", body = [Workflow]),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_employee_workflows(
    State(app_state): State<AppState>,
    _guard: Authorize<AnyRole>,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Vec<Workflow>>, AppError> {
    let workflows = app_state.workflow_service.list_by_employee(employee_id).await?;
    Ok(Json(workflows))
}
