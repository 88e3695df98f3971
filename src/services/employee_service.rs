// src/services/employee_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{cascade, AccountRepository, DepartmentRepository, EmployeeRepository, WorkflowRepository},
    models::{
        employee::{Employee, EmployeeDetails, EmployeeStatus},
        workflow::{transfer_details, Workflow, WORKFLOW_TRANSFER},
    },
};

/// Campos alteráveis de um funcionário. `None` mantém o valor atual.
#[derive(Debug, Default)]
pub struct EmployeeChanges {
    pub position: Option<String>,
    pub account_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
    department_repo: DepartmentRepository,
    account_repo: AccountRepository,
    workflow_repo: WorkflowRepository,
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(
        repo: EmployeeRepository,
        department_repo: DepartmentRepository,
        account_repo: AccountRepository,
        workflow_repo: WorkflowRepository,
        pool: PgPool,
    ) -> Self {
        Self { repo, department_repo, account_repo, workflow_repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<EmployeeDetails>, AppError> {
        self.repo.list_details().await
    }

    pub async fn get(&self, id: Uuid) -> Result<EmployeeDetails, AppError> {
        self.repo.find_details(id).await?.ok_or(AppError::NotFound("Employee"))
    }

    pub async fn create(
        &self,
        position: &str,
        account_id: Option<Uuid>,
        department_id: Uuid,
        status: EmployeeStatus,
    ) -> Result<Employee, AppError> {
        self.ensure_department(department_id).await?;
        if let Some(account_id) = account_id {
            self.ensure_account(account_id).await?;
        }

        let employee = self
            .repo
            .create(&self.pool, position, account_id, department_id, status)
            .await?;

        tracing::info!(employee_id = %employee.id, "Funcionário criado");
        Ok(employee)
    }

    pub async fn update(&self, id: Uuid, changes: EmployeeChanges) -> Result<Employee, AppError> {
        let mut employee = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Employee"))?;

        if let Some(department_id) = changes.department_id {
            if department_id != employee.department_id {
                self.ensure_department(department_id).await?;
            }
            employee.department_id = department_id;
        }
        if let Some(account_id) = changes.account_id {
            if employee.account_id != Some(account_id) {
                self.ensure_account(account_id).await?;
            }
            employee.account_id = Some(account_id);
        }
        if let Some(position) = changes.position {
            employee.position = position;
        }
        if let Some(status) = changes.status {
            employee.status = status;
        }

        self.repo.save(&self.pool, &employee).await
    }

    /// Remove o funcionário com seus pedidos, itens e workflows.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if !cascade::delete_employee(&mut *tx, id).await? {
            return Err(AppError::NotFound("Employee"));
        }

        tx.commit().await?;
        tracing::info!(employee_id = %id, "🗑️ Funcionário removido");
        Ok(())
    }

    /// Move o funcionário de departamento e registra um workflow "Transfer".
    /// As duas escritas entram juntas ou nenhuma entra.
    pub async fn transfer(&self, id: Uuid, department_id: Uuid) -> Result<Workflow, AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        let mut employee = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Employee"))?;

        if !self.department_repo.exists(&mut *tx, department_id).await? {
            return Err(AppError::NotFound("Department"));
        }

        employee.department_id = department_id;
        self.repo.save(&mut *tx, &employee).await?;

        let details = transfer_details(department_id);
        let workflow = self
            .workflow_repo
            .append(&mut *tx, employee.id, WORKFLOW_TRANSFER, Some(&details))
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(employee_id = %id, department_id = %department_id, "🔀 Funcionário transferido");
        Ok(workflow)
    }

    async fn ensure_department(&self, id: Uuid) -> Result<(), AppError> {
        if self.department_repo.exists(&self.pool, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Department"))
        }
    }

    async fn ensure_account(&self, id: Uuid) -> Result<(), AppError> {
        match self.account_repo.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Account")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::request::NewRequestItem, test_support};

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn transfer_moves_the_employee_and_records_a_workflow(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let from = test_support::department(&state, "Sales").await;
        let to = test_support::department(&state, "Engineering").await;
        let employee = test_support::employee(&state, from.id, None).await;

        let workflow = state.employee_service.transfer(employee.id, to.id).await.unwrap();

        assert_eq!(workflow.kind, WORKFLOW_TRANSFER);
        assert_eq!(workflow.details, Some(transfer_details(to.id)));
        let moved = state.employee_service.get(employee.id).await.unwrap();
        assert_eq!(moved.department_id, to.id);
        assert_eq!(moved.department_name, "Engineering");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn transfer_to_a_missing_department_changes_nothing(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let department = test_support::department(&state, "Sales").await;
        let employee = test_support::employee(&state, department.id, None).await;

        let result = state.employee_service.transfer(employee.id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound("Department"))));
        assert_eq!(test_support::count(&pool, "workflows").await, 0);
        let unchanged = state.employee_service.get(employee.id).await.unwrap();
        assert_eq!(unchanged.department_id, department.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn create_checks_the_related_records(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let department = test_support::department(&state, "Sales").await;

        let no_department = state
            .employee_service
            .create("Analyst", None, Uuid::new_v4(), EmployeeStatus::Active)
            .await;
        assert!(matches!(no_department, Err(AppError::NotFound("Department"))));

        let no_account = state
            .employee_service
            .create("Analyst", Some(Uuid::new_v4()), department.id, EmployeeStatus::Active)
            .await;
        assert!(matches!(no_account, Err(AppError::NotFound("Account"))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn delete_takes_requests_items_and_workflows_along(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let sales = test_support::department(&state, "Sales").await;
        let engineering = test_support::department(&state, "Engineering").await;
        let leaving = test_support::employee(&state, sales.id, None).await;
        let staying = test_support::employee(&state, sales.id, None).await;

        let items = [NewRequestItem { name: "Laptop".into(), quantity: 1 }];
        for employee in [&leaving, &staying] {
            state.request_service.create(employee.id, "Equipment", None, &items).await.unwrap();
            state.employee_service.transfer(employee.id, engineering.id).await.unwrap();
        }

        state.employee_service.delete(leaving.id).await.unwrap();

        assert_eq!(test_support::count(&pool, "employees").await, 1);
        assert_eq!(test_support::count(&pool, "requests").await, 1);
        assert_eq!(test_support::count(&pool, "request_items").await, 1);
        assert_eq!(test_support::count(&pool, "workflows").await, 1);
        assert_eq!(test_support::count(&pool, "departments").await, 2);
        assert!(matches!(state.employee_service.get(leaving.id).await, Err(AppError::NotFound("Employee"))));
        assert!(matches!(state.employee_service.delete(leaving.id).await, Err(AppError::NotFound("Employee"))));
    }
}
