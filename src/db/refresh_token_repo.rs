// src/db/refresh_token_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::refresh_token::{NewRefreshToken, RefreshToken},
};

#[derive(Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, new: &NewRefreshToken) -> Result<RefreshToken, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let token = sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (account_id, token, expires, created_by_ip)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(new.account_id)
        .bind(&new.token)
        .bind(new.expires)
        .bind(&new.created_by_ip)
        .fetch_one(executor)
        .await?;
        Ok(token)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let token = sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(token)
    }

    /// Revoga o token SE ele ainda estiver ativo, numa única instrução.
    ///
    /// O `WHERE revoked IS NULL AND expires >= NOW()` funciona como compare-and-set:
    /// duas requisições concorrentes com o mesmo token não conseguem revogá-lo
    /// as duas, a segunda recebe `None`.
    pub async fn revoke_if_active<'e, E>(
        &self,
        executor: E,
        token: &str,
        revoked_by_ip: &str,
        replaced_by_token: Option<&str>,
    ) -> Result<Option<RefreshToken>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let revoked = sqlx::query_as::<_, RefreshToken>(
            r#"
            UPDATE refresh_tokens SET
                revoked = NOW(),
                revoked_by_ip = $2,
                replaced_by_token = $3
            WHERE token = $1
              AND revoked IS NULL
              AND expires >= NOW()
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(revoked_by_ip)
        .bind(replaced_by_token)
        .fetch_optional(executor)
        .await?;
        Ok(revoked)
    }

    // Só as strings: é o que o middleware precisa para `owns_token`
    pub async fn tokens_for_account(&self, account_id: Uuid) -> Result<Vec<String>, AppError> {
        let tokens: Vec<String> =
            sqlx::query_scalar("SELECT token FROM refresh_tokens WHERE account_id = $1")
                .bind(account_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(tokens)
    }
}
