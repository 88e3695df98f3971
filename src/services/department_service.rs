// src/services/department_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{cascade, DepartmentRepository},
    models::department::{Department, DepartmentSummary},
};

#[derive(Clone)]
pub struct DepartmentService {
    repo: DepartmentRepository,
    pool: PgPool,
}

impl DepartmentService {
    pub fn new(repo: DepartmentRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<DepartmentSummary>, AppError> {
        self.repo.list_with_counts().await
    }

    pub async fn get(&self, id: Uuid) -> Result<DepartmentSummary, AppError> {
        self.repo
            .find_summary(id)
            .await?
            .ok_or(AppError::NotFound("Department"))
    }

    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Department, AppError> {
        let department = self.repo.create(name, description).await?;
        tracing::info!(department_id = %department.id, name = %department.name, "Departamento criado");
        Ok(department)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Department, AppError> {
        let mut department = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Department"))?;

        if let Some(name) = name {
            department.name = name;
        }
        if description.is_some() {
            department.description = description;
        }

        self.repo.save(&department).await
    }

    /// Remove o departamento e, em cascata, os funcionários dele.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if !cascade::delete_department(&mut *tx, id).await? {
            return Err(AppError::NotFound("Department"));
        }

        tx.commit().await?;
        tracing::info!(department_id = %id, "🗑️ Departamento removido");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::request::NewRequestItem, test_support};

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn summary_counts_employees(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let department = test_support::department(&state, "Support").await;
        test_support::employee(&state, department.id, None).await;
        test_support::employee(&state, department.id, None).await;

        let summary = state.department_service.get(department.id).await.unwrap();
        assert_eq!(summary.employee_count, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn delete_cascades_only_into_its_own_employees(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let doomed = test_support::department(&state, "Doomed").await;
        let kept = test_support::department(&state, "Kept").await;
        let leaving = test_support::employee(&state, doomed.id, None).await;
        let staying = test_support::employee(&state, kept.id, None).await;

        let item = NewRequestItem { name: "Chair".into(), quantity: 2 };
        state.request_service.create(leaving.id, "Equipment", None, &[item.clone()]).await.unwrap();
        state.request_service.create(staying.id, "Equipment", None, &[item]).await.unwrap();

        state.department_service.delete(doomed.id).await.unwrap();

        assert_eq!(test_support::count(&pool, "departments").await, 1);
        assert_eq!(test_support::count(&pool, "employees").await, 1);
        assert_eq!(test_support::count(&pool, "requests").await, 1);
        assert_eq!(test_support::count(&pool, "request_items").await, 1);
        assert!(matches!(state.department_service.get(doomed.id).await, Err(AppError::NotFound("Department"))));
    }
}
