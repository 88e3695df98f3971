// src/services/account_service.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{cascade, AccountRepository},
    middleware::auth::AuthenticatedAccount,
    models::{
        account::{
            Account, AccountDetails, CreateAccountPayload, NewAccount, RegisterPayload, Role,
            UpdateAccountPayload,
        },
        refresh_token::RefreshToken,
    },
    services::{
        email::{Email, Mailer},
        email_templates,
        token_service::{random_token_string, TokenService},
    },
};

pub const RESET_TOKEN_TTL_HOURS: i64 = 24;

/// Resultado de login ou de refresh: o que vai no corpo e o que vai no cookie.
#[derive(Debug)]
pub struct AuthSession {
    pub account: AccountDetails,
    pub jwt_token: String,
    pub refresh_token: RefreshToken,
}

#[derive(Clone)]
pub struct AccountService {
    account_repo: AccountRepository,
    token_service: TokenService,
    mailer: Arc<dyn Mailer>,
    // Base dos links nos e-mails. Vem da configuração, nunca da requisição.
    frontend_url: Option<String>,
    pool: PgPool,
}

impl AccountService {
    pub fn new(
        account_repo: AccountRepository,
        token_service: TokenService,
        mailer: Arc<dyn Mailer>,
        frontend_url: Option<String>,
        pool: PgPool,
    ) -> Self {
        Self { account_repo, token_service, mailer, frontend_url, pool }
    }

    // =========================================================================
    //  SESSÃO
    // =========================================================================

    pub async fn authenticate(&self, email: &str, password: &str, ip: &str) -> Result<AuthSession, AppError> {
        let account = self
            .account_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Conta não verificada responde igual a senha errada
        if !account.is_verified() || !verify_password(password, &account.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let jwt_token = self.token_service.issue_access_token(&account)?;
        let refresh = self.token_service.issue_refresh_token(&account, ip);
        let refresh_token = self.token_service.save_refresh_token(&refresh).await?;

        tracing::info!(account_id = %account.id, ip = %ip, "🔑 Login realizado");

        Ok(AuthSession {
            account: AccountDetails::from(&account),
            jwt_token,
            refresh_token,
        })
    }

    pub async fn refresh_token(&self, token: &str, ip: &str) -> Result<AuthSession, AppError> {
        let (refresh_token, account) = self.token_service.rotate_refresh_token(token, ip).await?;
        let jwt_token = self.token_service.issue_access_token(&account)?;

        Ok(AuthSession {
            account: AccountDetails::from(&account),
            jwt_token,
            refresh_token,
        })
    }

    pub async fn revoke_token(
        &self,
        caller: &AuthenticatedAccount,
        token: Option<&str>,
        ip: &str,
    ) -> Result<(), AppError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::BadRequest("Token is required".to_string()))?;

        // Só o dono do token ou um Admin pode revogá-lo
        if !caller.owns_token(token) && !caller.is_admin() {
            return Err(AppError::Forbidden);
        }

        self.token_service.revoke_refresh_token(token, ip).await?;
        tracing::info!(account_id = %caller.id(), "Refresh token revogado");
        Ok(())
    }

    // =========================================================================
    //  CADASTRO E VERIFICAÇÃO
    // =========================================================================

    /// Mesmo resultado para e-mail novo ou repetido: quem chama não descobre
    /// quais e-mails já têm conta.
    pub async fn register(&self, payload: RegisterPayload) -> Result<(), AppError> {
        if self.account_repo.find_by_email(&payload.email).await?.is_some() {
            self.send_quietly(email_templates::already_registered_email(&payload.email, self.frontend_url.as_deref()))
                .await;
            return Ok(());
        }

        let password_hash = hash_password(&payload.password).await?;
        let verification_token = random_token_string();

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // A primeira conta do sistema vira Admin
        let role = if self.account_repo.count(&mut *tx).await? == 0 {
            Role::Admin
        } else {
            Role::User
        };

        let new_account = NewAccount {
            title: payload.title,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password_hash,
            role,
            verified: None,
            verification_token: Some(verification_token.clone()),
        };

        let account = match self.account_repo.create(&mut *tx, &new_account).await {
            Ok(account) => account,
            // Outro cadastro com o mesmo e-mail ganhou a corrida
            Err(AppError::EmailTaken(email)) => {
                self.send_quietly(email_templates::already_registered_email(&email, self.frontend_url.as_deref()))
                    .await;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(account_id = %account.id, role = ?account.role, "Conta registrada");

        self.send_quietly(email_templates::verification_email(
            &account.email,
            &verification_token,
            self.frontend_url.as_deref(),
        ))
        .await;

        Ok(())
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        let mut account = self
            .account_repo
            .find_by_verification_token(token)
            .await?
            .ok_or(AppError::VerificationFailed)?;

        let now = Utc::now();
        account.verified = Some(now);
        account.verification_token = None;
        account.updated_at = now;

        self.account_repo.save(&self.pool, &account).await?;
        Ok(())
    }

    // =========================================================================
    //  RECUPERAÇÃO DE SENHA
    // =========================================================================

    /// Sempre responde sucesso, exista a conta ou não.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(mut account) = self.account_repo.find_by_email(email).await? else {
            return Ok(());
        };

        let token = random_token_string();
        account.reset_token = Some(token.clone());
        account.reset_token_expires = Some(Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS));
        self.account_repo.save(&self.pool, &account).await?;

        self.send_quietly(email_templates::password_reset_email(
            &account.email,
            &token,
            self.frontend_url.as_deref(),
        ))
            .await;
        Ok(())
    }

    pub async fn validate_reset_token(&self, token: &str) -> Result<Account, AppError> {
        self.account_repo
            .find_by_valid_reset_token(token, Utc::now())
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), AppError> {
        let mut account = self.validate_reset_token(token).await?;

        let now = Utc::now();
        account.password_hash = hash_password(password).await?;
        account.password_reset = Some(now);
        account.reset_token = None;
        account.reset_token_expires = None;
        account.updated_at = now;

        self.account_repo.save(&self.pool, &account).await?;
        tracing::info!(account_id = %account.id, "Senha redefinida");
        Ok(())
    }

    // =========================================================================
    //  CRUD
    // =========================================================================

    pub async fn find(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        self.account_repo.find_by_id(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<AccountDetails>, AppError> {
        let accounts = self.account_repo.list_all().await?;
        Ok(accounts.iter().map(AccountDetails::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<AccountDetails, AppError> {
        let account = self.find(id).await?.ok_or(AppError::NotFound("Account"))?;
        Ok(AccountDetails::from(&account))
    }

    /// Criação pelo Admin: papel explícito e conta já verificada.
    pub async fn create(&self, payload: CreateAccountPayload) -> Result<AccountDetails, AppError> {
        if self.account_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyRegistered(payload.email));
        }

        let new_account = NewAccount {
            password_hash: hash_password(&payload.password).await?,
            title: payload.title,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            role: payload.role,
            verified: Some(Utc::now()),
            verification_token: None,
        };

        let account = self
            .account_repo
            .create(&self.pool, &new_account)
            .await
            .map_err(|e| match e {
                AppError::EmailTaken(email) => AppError::EmailAlreadyRegistered(email),
                other => other,
            })?;

        Ok(AccountDetails::from(&account))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateAccountPayload) -> Result<AccountDetails, AppError> {
        let mut account = self.find(id).await?.ok_or(AppError::NotFound("Account"))?;

        if let Some(email) = payload.email {
            if email != account.email && self.account_repo.email_taken_by_other(&email, id).await? {
                return Err(AppError::EmailTaken(email));
            }
            account.email = email;
        }

        if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
            account.password_hash = hash_password(&password).await?;
        }

        if let Some(title) = payload.title {
            account.title = title;
        }
        if let Some(first_name) = payload.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = payload.last_name {
            account.last_name = last_name;
        }
        if let Some(role) = payload.role {
            account.role = role;
        }
        account.updated_at = Utc::now();

        let saved = self.account_repo.save(&self.pool, &account).await?;
        Ok(AccountDetails::from(&saved))
    }

    /// Remove a conta, os refresh tokens e o funcionário ligado a ela.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if !cascade::delete_account(&mut *tx, id).await? {
            return Err(AppError::NotFound("Account"));
        }

        tx.commit().await?;
        tracing::info!(account_id = %id, "🗑️ Conta removida");
        Ok(())
    }

    // Falha de envio não muda a resposta
    async fn send_quietly(&self, email: Email) {
        let to = email.to.clone();
        if let Err(e) = self.mailer.send(email).await {
            tracing::warn!(to = %to, "Falha ao enviar e-mail: {:#}", e);
        }
    }
}

// =============================================================================
//  HASH DE SENHA (bcrypt fora do runtime async)
// =============================================================================

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let hash_clone = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}
