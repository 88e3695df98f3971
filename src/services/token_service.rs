// src/services/token_service.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AccountRepository, RefreshTokenRepository},
    models::{
        account::{Account, Claims},
        refresh_token::{NewRefreshToken, RefreshToken},
    },
};

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// 40 bytes do CSPRNG em hex (80 caracteres, 320 bits).
/// Usado para refresh tokens e para os tokens de verificação e de reset.
pub fn random_token_string() -> String {
    let mut bytes = [0u8; 40];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// Assina e valida os JWTs de acesso. Não toca no banco.
#[derive(Clone)]
pub struct AccessTokens {
    jwt_secret: String,
}

impl AccessTokens {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn issue(&self, account_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES);

        let claims = Claims {
            sub: account_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::Unauthenticated)?;

        Ok(token_data.claims)
    }
}

#[derive(Clone)]
pub struct TokenService {
    access: AccessTokens,
    refresh_repo: RefreshTokenRepository,
    account_repo: AccountRepository,
    pool: PgPool,
}

impl TokenService {
    pub fn new(
        refresh_repo: RefreshTokenRepository,
        account_repo: AccountRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            access: AccessTokens::new(jwt_secret),
            refresh_repo,
            account_repo,
            pool,
        }
    }

    pub fn issue_access_token(&self, account: &Account) -> Result<String, AppError> {
        self.access.issue(account.id)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.access.verify(token)
    }

    /// Gera um refresh token novo. Nada é salvo aqui.
    pub fn issue_refresh_token(&self, account: &Account, origin_ip: &str) -> NewRefreshToken {
        NewRefreshToken {
            account_id: account.id,
            token: random_token_string(),
            expires: Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            created_by_ip: origin_ip.to_string(),
        }
    }

    pub async fn save_refresh_token(&self, new: &NewRefreshToken) -> Result<RefreshToken, AppError> {
        self.refresh_repo.create(&self.pool, new).await
    }

    /// Troca um refresh token ativo por um novo.
    ///
    /// O antigo fica revogado apontando para o sucessor (`replaced_by_token`).
    /// Revogação e inserção rodam na mesma transação; se o token já não estiver
    /// ativo nenhum sucessor é criado.
    pub async fn rotate_refresh_token(
        &self,
        token: &str,
        origin_ip: &str,
    ) -> Result<(RefreshToken, Account), AppError> {
        // 1. Busca o token e exige que esteja ativo
        let current = self
            .refresh_repo
            .find_by_token(token)
            .await?
            .filter(|t| t.is_active())
            .ok_or(AppError::InvalidToken)?;

        let account = self
            .account_repo
            .find_by_id(current.account_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let replacement = self.issue_refresh_token(&account, origin_ip);

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 2. Revoga condicionalmente. Se outra requisição chegou antes, perdemos.
        let revoked = self
            .refresh_repo
            .revoke_if_active(&mut *tx, token, origin_ip, Some(&replacement.token))
            .await?;

        if revoked.is_none() {
            // O drop do tx faz o rollback
            return Err(AppError::InvalidToken);
        }

        // 3. Salva o sucessor
        let saved = self.refresh_repo.create(&mut *tx, &replacement).await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::debug!(account_id = %account.id, "refresh token rotated");
        Ok((saved, account))
    }

    pub async fn revoke_refresh_token(&self, token: &str, origin_ip: &str) -> Result<(), AppError> {
        self.refresh_repo
            .revoke_if_active(&self.pool, token, origin_ip, None)
            .await?
            .ok_or(AppError::InvalidToken)?;
        Ok(())
    }

    pub async fn owned_tokens(&self, account_id: Uuid) -> Result<Vec<String>, AppError> {
        self.refresh_repo.tokens_for_account(account_id).await
    }
}
