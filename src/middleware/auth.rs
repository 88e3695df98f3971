// src/middleware/auth.rs

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::account::{Account, Role},
};

// =============================================================================
//  CONTEXTO DA CONTA AUTENTICADA
// =============================================================================

/// O que o `auth_guard` deixa nos extensions da requisição.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account: Account,
    // Refresh tokens da conta no momento da requisição
    owned_tokens: Arc<HashSet<String>>,
}

impl AuthenticatedAccount {
    pub fn new(account: Account, owned_tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            account,
            owned_tokens: Arc::new(owned_tokens.into_iter().collect()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.account.id
    }

    pub fn role(&self) -> Role {
        self.account.role
    }

    pub fn is_admin(&self) -> bool {
        self.account.is_admin()
    }

    /// O refresh token pertence a esta conta?
    pub fn owns_token(&self, token: &str) -> bool {
        self.owned_tokens.contains(token)
    }

    /// Cada conta acessa a si mesma; o Admin acessa qualquer uma.
    pub fn can_access_account(&self, id: Uuid) -> bool {
        self.account.id == id || self.is_admin()
    }
}

// =============================================================================
//  MIDDLEWARE
// =============================================================================

/// Autenticação das rotas protegidas.
///
/// 1. Bearer token ausente ou inválido → 401, o handler nem roda.
/// 2. Conta do token não existe mais → 404.
/// 3. Carrega os refresh tokens da conta para o teste de posse.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthenticated)?;

    let claims = app_state.token_service.verify_access_token(bearer.token())?;

    let account = app_state
        .account_service
        .find(claims.sub)
        .await?
        .ok_or(AppError::AccountNotFound)?;

    let owned_tokens = app_state.token_service.owned_tokens(account.id).await?;

    request
        .extensions_mut()
        .insert(AuthenticatedAccount::new(account, owned_tokens));

    Ok(next.run(request).await)
}

// Extrator para obter a conta autenticada diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::tests::sample_account;

    #[test]
    fn owns_only_its_own_tokens() {
        let caller = AuthenticatedAccount::new(sample_account(Role::User), vec!["mine".to_string()]);

        assert!(caller.owns_token("mine"));
        assert!(!caller.owns_token("someone-elses"));
    }

    #[test]
    fn regular_account_accesses_only_itself() {
        let caller = AuthenticatedAccount::new(sample_account(Role::User), Vec::new());

        assert!(caller.can_access_account(caller.id()));
        assert!(!caller.can_access_account(Uuid::new_v4()));
    }

    #[test]
    fn admin_accesses_any_account() {
        let caller = AuthenticatedAccount::new(sample_account(Role::Admin), Vec::new());

        assert!(caller.is_admin());
        assert!(caller.can_access_account(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn extractor_rejects_requests_that_skipped_the_guard() {
        let (mut parts, _) = axum::http::Request::builder().body(()).unwrap().into_parts();
        let result = AuthenticatedAccount::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }
}
