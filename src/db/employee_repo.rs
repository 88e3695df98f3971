// src/db/employee_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::employee::{Employee, EmployeeDetails, EmployeeStatus},
};

const DETAILS_SELECT: &str = r#"
    SELECT
        e.id, e.position, e.account_id, e.department_id, e.status,
        e.created_at, e.updated_at,
        d.name AS department_name,
        a.email AS account_email,
        (e.created_at AT TIME ZONE 'UTC')::date AS hire_date
    FROM employees e
    INNER JOIN departments d ON d.id = e.department_id
    LEFT JOIN accounts a ON a.id = e.account_id
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_details(&self) -> Result<Vec<EmployeeDetails>, AppError> {
        let sql = format!("{DETAILS_SELECT} ORDER BY e.created_at ASC");
        let employees = sqlx::query_as::<_, EmployeeDetails>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    pub async fn find_details(&self, id: Uuid) -> Result<Option<EmployeeDetails>, AppError> {
        let sql = format!("{DETAILS_SELECT} WHERE e.id = $1");
        let employee = sqlx::query_as::<_, EmployeeDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(employee)
    }

    /// O registro de funcionário ligado a uma conta de login, se houver.
    pub async fn find_by_account_id(&self, account_id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        position: &str,
        account_id: Option<Uuid>,
        department_id: Uuid,
        status: EmployeeStatus,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (position, account_id, department_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(position)
        .bind(account_id)
        .bind(department_id)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(map_account_link_violation)
    }

    pub async fn save<'e, E>(&self, executor: E, employee: &Employee) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                position = $2,
                account_id = $3,
                department_id = $4,
                status = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(employee.id)
        .bind(&employee.position)
        .bind(employee.account_id)
        .bind(employee.department_id)
        .bind(employee.status)
        .fetch_optional(executor)
        .await
        .map_err(map_account_link_violation)?
        .ok_or(AppError::NotFound("Employee"))
    }
}

// Uma conta só pode estar ligada a um funcionário
fn map_account_link_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("employees_account_id_key") {
            return AppError::BadRequest("Account is already linked to an employee".to_string());
        }
    }
    e.into()
}
