// src/db/account_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::account::{Account, NewAccount},
};

// O repositório de contas, responsável por todas as interações com a tabela 'accounts'
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_by_verification_token(&self, token: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE verification_token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    // Só devolve a conta se o token de reset ainda não expirou em `now`
    pub async fn find_by_valid_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE reset_token = $1 AND reset_token_expires > $2",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn list_all(&self) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(accounts)
    }

    /// Existe outra conta (diferente de `except_id`) com este e-mail?
    pub async fn email_taken_by_other(&self, email: &str, except_id: Uuid) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    // Cria uma conta. E-mail duplicado vira um erro de domínio.
    pub async fn create<'e, E>(&self, executor: E, new: &NewAccount) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (
                title, first_name, last_name, email, password_hash,
                role, verified, verification_token
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role)
        .bind(new.verified)
        .bind(&new.verification_token)
        .fetch_one(executor)
        .await
        .map_err(|e| map_email_violation(e, &new.email))
    }

    // Grava de volta todos os campos mutáveis da conta (estilo "save")
    pub async fn save<'e, E>(&self, executor: E, account: &Account) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts SET
                title = $2,
                first_name = $3,
                last_name = $4,
                email = $5,
                password_hash = $6,
                role = $7,
                verified = $8,
                verification_token = $9,
                reset_token = $10,
                reset_token_expires = $11,
                password_reset = $12,
                updated_at = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(&account.title)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role)
        .bind(account.verified)
        .bind(&account.verification_token)
        .bind(&account.reset_token)
        .bind(account.reset_token_expires)
        .bind(account.password_reset)
        .bind(account.updated_at)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_email_violation(e, &account.email))?
        .ok_or(AppError::NotFound("Account"))
    }
}

// Converte erro de violação de chave única em um erro mais amigável
fn map_email_violation(e: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("accounts_email_key") {
            return AppError::EmailTaken(email.to_string());
        }
    }
    e.into()
}
