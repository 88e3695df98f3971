// src/models/employee.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// Mapeia o CREATE TYPE employee_status do banco
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_status")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
    Terminated,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[schema(example = "Software Engineer")]
    pub position: String,
    // Ligação opcional 1:1 com uma conta de login
    pub account_id: Option<Uuid>,
    pub department_id: Uuid,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Leitura com os dados das entidades relacionadas (JOIN)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetails {
    pub id: Uuid,
    pub position: String,
    pub account_id: Option<Uuid>,
    pub department_id: Uuid,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(example = "Engineering")]
    pub department_name: String,
    #[schema(example = "jane@example.com")]
    pub account_email: Option<String>,
    // Derivado: a data de criação do registro
    #[schema(value_type = String, format = Date, example = "2024-05-20")]
    pub hire_date: NaiveDate,
}
