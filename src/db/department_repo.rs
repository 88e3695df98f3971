// src/db/department_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::department::{Department, DepartmentSummary},
};

// A contagem vem do LEFT JOIN, então departamentos vazios aparecem com 0
const SUMMARY_SELECT: &str = r#"
    SELECT
        d.id, d.name, d.description, d.created_at, d.updated_at,
        COUNT(e.id) AS employee_count
    FROM departments d
    LEFT JOIN employees e ON e.department_id = d.id
"#;

#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_with_counts(&self) -> Result<Vec<DepartmentSummary>, AppError> {
        let sql = format!("{SUMMARY_SELECT} GROUP BY d.id ORDER BY d.name ASC");
        let departments = sqlx::query_as::<_, DepartmentSummary>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(departments)
    }

    pub async fn find_summary(&self, id: Uuid) -> Result<Option<DepartmentSummary>, AppError> {
        let sql = format!("{SUMMARY_SELECT} WHERE d.id = $1 GROUP BY d.id");
        let department = sqlx::query_as::<_, DepartmentSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(department)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Department>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let department = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(department)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM departments WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(department)
    }

    pub async fn save(&self, department: &Department) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments SET
                name = $2,
                description = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(department.id)
        .bind(&department.name)
        .bind(&department.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Department"))
    }
}
