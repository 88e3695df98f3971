// src/services/workflow_service.rs

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EmployeeRepository, WorkflowRepository},
    models::workflow::Workflow,
};

#[derive(Clone)]
pub struct WorkflowService {
    repo: WorkflowRepository,
    employee_repo: EmployeeRepository,
    pool: PgPool,
}

impl WorkflowService {
    pub fn new(repo: WorkflowRepository, employee_repo: EmployeeRepository, pool: PgPool) -> Self {
        Self { repo, employee_repo, pool }
    }

    pub async fn record(&self, employee_id: Uuid, kind: &str, details: Option<Value>) -> Result<Workflow, AppError> {
        self.ensure_employee(employee_id).await?;

        let workflow = self
            .repo
            .append(&self.pool, employee_id, kind, details.as_ref())
            .await?;

        tracing::info!(employee_id = %employee_id, kind = %kind, "Workflow registrado");
        Ok(workflow)
    }

    pub async fn list_by_employee(&self, employee_id: Uuid) -> Result<Vec<Workflow>, AppError> {
        self.ensure_employee(employee_id).await?;
        self.repo.list_by_employee(employee_id).await
    }

    async fn ensure_employee(&self, id: Uuid) -> Result<(), AppError> {
        self.employee_repo
            .find_by_id(&self.pool, id)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound("Employee"))
    }
}
