// src/db/request_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::request::{NewRequestItem, Request, RequestItem, RequestStatus},
};

#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Request>, AppError> {
        let requests = sqlx::query_as::<_, Request>("SELECT * FROM requests ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    pub async fn list_by_employee(&self, employee_id: Uuid) -> Result<Vec<Request>, AppError> {
        let requests = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests WHERE employee_id = $1 ORDER BY created_at DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Request>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(request)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        kind: &str,
        description: Option<&str>,
        status: RequestStatus,
        employee_id: Uuid,
    ) -> Result<Request, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (type, description, status, employee_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(kind)
        .bind(description)
        .bind(status)
        .bind(employee_id)
        .fetch_one(executor)
        .await?;
        Ok(request)
    }

    pub async fn save<'e, E>(&self, executor: E, request: &Request) -> Result<Request, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Request>(
            r#"
            UPDATE requests SET
                type = $2,
                description = $3,
                status = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(request.id)
        .bind(&request.kind)
        .bind(&request.description)
        .bind(request.status)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Request"))
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    /// Insere todos os itens de uma vez (UNNEST dos arrays de nome e quantidade).
    pub async fn bulk_create_items<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        items: &[NewRequestItem],
    ) -> Result<Vec<RequestItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
        let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();

        let created = sqlx::query_as::<_, RequestItem>(
            r#"
            INSERT INTO request_items (name, quantity, request_id)
            SELECT item.name, item.quantity, $3
            FROM UNNEST($1::text[], $2::int4[]) AS item(name, quantity)
            RETURNING *
            "#,
        )
        .bind(names)
        .bind(quantities)
        .bind(request_id)
        .fetch_all(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_check_violation() {
                    return AppError::BadRequest("Item quantity must be positive".to_string());
                }
            }
            e.into()
        })?;

        Ok(created)
    }

    pub async fn delete_items<'e, E>(&self, executor: E, request_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM request_items WHERE request_id = $1")
            .bind(request_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn items_for_requests(&self, request_ids: &[Uuid]) -> Result<Vec<RequestItem>, AppError> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = sqlx::query_as::<_, RequestItem>(
            "SELECT * FROM request_items WHERE request_id = ANY($1) ORDER BY name ASC",
        )
        .bind(request_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
