// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedAccount,
    models::account::Role,
};

/// 1. O trait que define quais papéis uma rota aceita
pub trait RoleSet: Send + Sync + 'static {
    /// Lista vazia = qualquer conta autenticada.
    fn allowed() -> &'static [Role];
}

pub fn permits(allowed: &[Role], role: Role) -> bool {
    allowed.is_empty() || allowed.contains(&role)
}

/// 2. O extrator (guardião). Roda antes do corpo do handler, então um
/// pedido proibido nunca chega a alterar nada.
pub struct Authorize<R>(pub AuthenticatedAccount, pub PhantomData<R>);

// 3. Implementação do FromRequestParts
impl<R, S> FromRequestParts<S> for Authorize<R>
where
    R: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A. Conta deixada pelo auth_guard
        let caller = AuthenticatedAccount::from_request_parts(parts, state).await?;

        // B. Papel dentro da lista?
        if !permits(R::allowed(), caller.role()) {
            tracing::debug!(account_id = %caller.id(), role = ?caller.role(), "Acesso negado");
            return Err(AppError::Forbidden);
        }

        Ok(Authorize(caller, PhantomData))
    }
}

// ---
// CONJUNTOS DE PAPÉIS (TIPOS)
// ---

pub struct AnyRole;
impl RoleSet for AnyRole {
    fn allowed() -> &'static [Role] { &[] }
}

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    fn allowed() -> &'static [Role] { &[Role::Admin] }
}
