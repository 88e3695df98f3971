// src/models/workflow.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

pub const WORKFLOW_TRANSFER: &str = "Transfer";

// Registro de auditoria do ciclo de vida do funcionário. Só cresce.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    #[schema(example = "Transfer")]
    pub kind: String,
    #[schema(value_type = Option<Object>, example = json!({"newDepartmentId": "550e8400-e29b-41d4-a716-446655440000"}))]
    pub details: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Payload gravado em `details` quando um funcionário muda de departamento.
pub fn transfer_details(new_department_id: Uuid) -> Value {
    json!({ "newDepartmentId": new_department_id })
}
