// src/handlers/requests.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedAccount,
        rbac::{AdminOnly, Authorize},
    },
    models::{
        message::MessageResponse,
        request::{NewRequestItem, RequestDetails, RequestStatus},
    },
    services::request_service::{resolve_requester, RequestChanges},
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestItemPayload {
    #[validate(length(min = 1, message = "Item name is required"))]
    #[schema(example = "Laptop")]
    pub name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 1)]
    pub quantity: i32,
}

impl From<RequestItemPayload> for NewRequestItem {
    fn from(item: RequestItemPayload) -> Self {
        NewRequestItem { name: item.name, quantity: item.quantity }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayload {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type is required"))]
    #[schema(example = "Equipment")]
    pub kind: String,
    pub description: Option<String>,
    // Só o Admin pode abrir pedido para outro funcionário
    pub employee_id: Option<Uuid>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<RequestItemPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestPayload {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type cannot be empty"))]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub status: Option<RequestStatus>,
    // Quando presente, substitui todos os itens
    #[validate(nested)]
    pub items: Option<Vec<RequestItemPayload>>,
}

#[utoipa::path(
    post,
    path = "/accounts/requests",
    tag = "Requests",
    request_body = CreateRequestPayload,
    responses(
        (status = 201, description = "Pedido criado com os itens", body = RequestDetails),
        (status = 400, description = "Admin sem funcionário indicado"),
        (status = 404, description = "Conta sem registro de funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    caller: AuthenticatedAccount,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let own_employee_id = app_state.request_service.caller_employee_id(&caller).await?;
    let employee_id = resolve_requester(caller.is_admin(), own_employee_id, payload.employee_id)?;

    let items: Vec<NewRequestItem> = payload.items.into_iter().map(Into::into).collect();
    let request = app_state
        .request_service
        .create(employee_id, &payload.kind, payload.description.as_deref(), &items)
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/accounts/requests",
    tag = "Requests",
    responses(
        (status = 200, description = "Todos os pedidos", body = [RequestDetails]),
        (status = 403, description = "Apenas Admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
) -> Result<Json<Vec<RequestDetails>>, AppError> {
    let requests = app_state.request_service.list_all().await?;
    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/accounts/requests/{id}",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com itens", body = RequestDetails),
        (status = 403, description = "Pedido de outro funcionário"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    caller: AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestDetails>, AppError> {
    let request = app_state.request_service.get(id).await?;

    app_state
        .request_service
        .ensure_can_view(&caller, request.request.employee_id)
        .await?;

    Ok(Json(request))
}

#[utoipa::path(
    get,
    path = "/accounts/requests/employee/{employee_id}",
    tag = "Requests",
    params(("employee_id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Pedidos do funcionário", body = [RequestDetails]),
        (status = 403, description = "Funcionário diferente de quem chama")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_requests_by_employee(
    State(app_state): State<AppState>,
    caller: AuthenticatedAccount,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Vec<RequestDetails>>, AppError> {
    app_state
        .request_service
        .ensure_can_view(&caller, employee_id)
        .await?;

    let requests = app_state.request_service.list_by_employee(employee_id).await?;
    Ok(Json(requests))
}

#[utoipa::path(
    put,
    path = "/accounts/requests/{id}",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdateRequestPayload,
    responses(
        (status = 200, description = "Pedido atualizado", body = RequestDetails),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_request(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequestPayload>,
) -> Result<Json<RequestDetails>, AppError> {
    payload.validate()?;

    let changes = RequestChanges {
        kind: payload.kind,
        description: payload.description,
        status: payload.status,
        items: payload
            .items
            .map(|items| items.into_iter().map(Into::into).collect()),
    };
    let request = app_state.request_service.update(id, changes).await?;

    Ok(Json(request))
}

#[utoipa::path(
    delete,
    path = "/accounts/requests/{id}",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido e itens removidos", body = MessageResponse),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_request(
    State(app_state): State<AppState>,
    _guard: Authorize<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.request_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Request deleted")))
}
