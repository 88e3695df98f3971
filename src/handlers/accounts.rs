// src/handlers/accounts.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedAccount,
        client::ClientIp,
        rbac::{AdminOnly, Authorize},
    },
    models::{
        account::{
            AccountDetails, AuthResponse, AuthenticatePayload, CreateAccountPayload,
            ForgotPasswordPayload, RegisterPayload, ResetPasswordPayload, RevokeTokenPayload,
            TokenPayload, UpdateAccountPayload,
        },
        message::MessageResponse,
        refresh_token::RefreshToken,
    },
    services::{account_service::AuthSession, token_service::REFRESH_TOKEN_TTL_DAYS},
};

pub const REFRESH_COOKIE: &str = "refreshToken";

// Cookie http-only com o refresh token, mesma validade do token
fn refresh_cookie(token: &RefreshToken) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token.token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(REFRESH_TOKEN_TTL_DAYS))
        .build()
}

fn session_response(jar: CookieJar, session: AuthSession) -> (CookieJar, Json<AuthResponse>) {
    let jar = jar.add(refresh_cookie(&session.refresh_token));
    let body = AuthResponse {
        account: session.account,
        jwt_token: session.jwt_token,
    };
    (jar, Json(body))
}

// =============================================================================
//  SESSÃO (públicas, exceto revoke)
// =============================================================================

#[utoipa::path(
    post,
    path = "/accounts/authenticate",
    tag = "Accounts",
    request_body = AuthenticatePayload,
    responses(
        (status = 200, description = "Login realizado; refresh token no cookie `refreshToken`", body = AuthResponse),
        (status = 400, description = "Email ou senha incorretos")
    )
)]
pub async fn authenticate(
    State(app_state): State<AppState>,
    ClientIp(ip): ClientIp,
    jar: CookieJar,
    Json(payload): Json<AuthenticatePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = app_state
        .account_service
        .authenticate(&payload.email, &payload.password, &ip)
        .await?;

    Ok(session_response(jar, session))
}

#[utoipa::path(
    post,
    path = "/accounts/refresh-token",
    tag = "Accounts",
    responses(
        (status = 200, description = "Token rotacionado; novo cookie `refreshToken`", body = AuthResponse),
        (status = 400, description = "Refresh token ausente, revogado ou expirado")
    )
)]
pub async fn refresh_token(
    State(app_state): State<AppState>,
    ClientIp(ip): ClientIp,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AppError::InvalidToken)?;

    let session = app_state.account_service.refresh_token(&token, &ip).await?;

    Ok(session_response(jar, session))
}

#[utoipa::path(
    post,
    path = "/accounts/revoke-token",
    tag = "Accounts",
    request_body(content = RevokeTokenPayload, description = "Sem `token`, usa o cookie `refreshToken`"),
    responses(
        (status = 200, description = "Token revogado", body = MessageResponse),
        (status = 403, description = "O token não pertence a quem chama")
    ),
    security(("api_jwt" = []))
)]
pub async fn revoke_token(
    State(app_state): State<AppState>,
    caller: AuthenticatedAccount,
    ClientIp(ip): ClientIp,
    jar: CookieJar,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    // Corpo é opcional aqui
    let payload: RevokeTokenPayload = if body.is_empty() {
        RevokeTokenPayload::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?
    };

    let token = payload
        .token
        .or_else(|| jar.get(REFRESH_COOKIE).map(|cookie| cookie.value().to_string()));

    app_state
        .account_service
        .revoke_token(&caller, token.as_deref(), &ip)
        .await?;

    Ok(Json(MessageResponse::new("Token revoked")))
}

// =============================================================================
//  CADASTRO, VERIFICAÇÃO E SENHA (públicas)
// =============================================================================

#[utoipa::path(
    post,
    path = "/accounts/register",
    tag = "Accounts",
    request_body = RegisterPayload,
    responses(
        (status = 200, description = "Mesma resposta para email novo ou já cadastrado", body = MessageResponse)
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    app_state.account_service.register(payload).await?;

    Ok(Json(MessageResponse::new(
        "Registration successful, please check your email for verification instructions",
    )))
}

#[utoipa::path(
    post,
    path = "/accounts/verify-email",
    tag = "Accounts",
    request_body = TokenPayload,
    responses(
        (status = 200, description = "Email verificado", body = MessageResponse),
        (status = 400, description = "Token de verificação desconhecido")
    )
)]
pub async fn verify_email(
    State(app_state): State<AppState>,
    Json(payload): Json<TokenPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    app_state.account_service.verify_email(&payload.token).await?;

    Ok(Json(MessageResponse::new("Verification successful, you can now login")))
}

#[utoipa::path(
    post,
    path = "/accounts/forgot-password",
    tag = "Accounts",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Sempre sucesso, exista a conta ou não", body = MessageResponse)
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    app_state.account_service.forgot_password(&payload.email).await?;

    Ok(Json(MessageResponse::new(
        "Please check your email for password reset instructions",
    )))
}

#[utoipa::path(
    post,
    path = "/accounts/validate-reset-token",
    tag = "Accounts",
    request_body = TokenPayload,
    responses(
        (status = 200, description = "Token válido", body = MessageResponse),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn validate_reset_token(
    State(app_state): State<AppState>,
    Json(payload): Json<TokenPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    app_state.account_service.validate_reset_token(&payload.token).await?;

    Ok(Json(MessageResponse::new("Token is valid")))
}

#[utoipa::path(
    post,
    path = "/accounts/reset-password",
    tag = "Accounts",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = MessageResponse),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    app_state
        .account_service
        .reset_password(&payload.token, &payload.password)
        .await?;

    Ok(Json(MessageResponse::new("Password reset successful, you can now login")))
}

// =============================================================================
//  CRUD (protegidas)
// =============================================================================

#[utoipa::path(
    get,
    path = "/accounts",
    tag = "Accounts",
    responses(
        (status = 200, description = "Todas as contas", body = [AccountDetails]),
        (status = 403, description = "Apenas Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
) -> Result<Json<Vec<AccountDetails>>, AppError> {
    let accounts = app_state.account_service.get_all().await?;
    Ok(Json(accounts))
}

#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Detalhes da conta", body = AccountDetails),
        (status = 403, description = "Nem dono nem Admin"),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_by_id(
    State(app_state): State<AppState>,
    caller: AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountDetails>, AppError> {
    if !caller.can_access_account(id) {
        return Err(AppError::Forbidden);
    }

    let account = app_state.account_service.get_by_id(id).await?;
    Ok(Json(account))
}

#[utoipa::path(
    post,
    path = "/accounts",
    tag = "Accounts",
    request_body = CreateAccountPayload,
    responses(
        (status = 201, description = "Conta criada já verificada", body = AccountDetails),
        (status = 400, description = "Email já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Json(payload): Json<CreateAccountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let account = app_state.account_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    put,
    path = "/accounts/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "ID da conta")),
    request_body = UpdateAccountPayload,
    responses(
        (status = 200, description = "Conta atualizada", body = AccountDetails),
        (status = 400, description = "Email já em uso"),
        (status = 403, description = "Nem dono nem Admin, ou troca de papel sem ser Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    caller: AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountPayload>,
) -> Result<Json<AccountDetails>, AppError> {
    if !caller.can_access_account(id) {
        return Err(AppError::Forbidden);
    }
    // Só Admin muda papel
    if payload.role.is_some_and(|role| role != caller.role()) && !caller.is_admin() {
        return Err(AppError::Forbidden);
    }

    payload.validate_all()?;

    let account = app_state.account_service.update(id, payload).await?;
    Ok(Json(account))
}

#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta e dependentes removidos", body = MessageResponse),
        (status = 403, description = "Nem dono nem Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    caller: AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !caller.can_access_account(id) {
        return Err(AppError::Forbidden);
    }

    app_state.account_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}
