// src/db/workflow_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::workflow::Workflow};

// Workflows só são inseridos e lidos. Remoção apenas pela cascata do funcionário.
#[derive(Clone)]
pub struct WorkflowRepository {
    pool: PgPool,
}

impl WorkflowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append<'e, E>(
        &self,
        executor: E,
        employee_id: Uuid,
        kind: &str,
        details: Option<&Value>,
    ) -> Result<Workflow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let workflow = sqlx::query_as::<_, Workflow>(
            r#"
            INSERT INTO workflows (employee_id, type, details)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(kind)
        .bind(details)
        .fetch_one(executor)
        .await?;
        Ok(workflow)
    }

    pub async fn list_by_employee(&self, employee_id: Uuid) -> Result<Vec<Workflow>, AppError> {
        let workflows = sqlx::query_as::<_, Workflow>(
            "SELECT * FROM workflows WHERE employee_id = $1 ORDER BY created_at ASC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(workflows)
    }
}
