// src/services/request_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{cascade, EmployeeRepository, RequestRepository},
    middleware::auth::AuthenticatedAccount,
    models::request::{NewRequestItem, Request, RequestDetails, RequestStatus},
};

/// Campos alteráveis de um pedido. `items: Some(..)` substitui a lista inteira.
#[derive(Debug, Default)]
pub struct RequestChanges {
    pub kind: Option<String>,
    pub description: Option<String>,
    pub status: Option<RequestStatus>,
    pub items: Option<Vec<NewRequestItem>>,
}

/// Para quem o pedido é aberto.
///
/// Quem não é Admin sempre abre para o próprio registro de funcionário. O Admin
/// pode indicar outro; se não indicar, vale o dele.
pub fn resolve_requester(
    is_admin: bool,
    own_employee_id: Option<Uuid>,
    requested: Option<Uuid>,
) -> Result<Uuid, AppError> {
    if is_admin {
        return requested
            .or(own_employee_id)
            .ok_or_else(|| AppError::BadRequest("Employee ID is required".to_string()));
    }
    own_employee_id.ok_or(AppError::NotFound("Employee"))
}

#[derive(Clone)]
pub struct RequestService {
    repo: RequestRepository,
    employee_repo: EmployeeRepository,
    pool: PgPool,
}

impl RequestService {
    pub fn new(repo: RequestRepository, employee_repo: EmployeeRepository, pool: PgPool) -> Self {
        Self { repo, employee_repo, pool }
    }

    /// O id do funcionário ligado à conta de quem chama, se houver.
    pub async fn caller_employee_id(&self, caller: &AuthenticatedAccount) -> Result<Option<Uuid>, AppError> {
        let employee = self.employee_repo.find_by_account_id(caller.id()).await?;
        Ok(employee.map(|e| e.id))
    }

    /// Admin vê tudo; os demais só os pedidos do próprio funcionário.
    pub async fn ensure_can_view(&self, caller: &AuthenticatedAccount, employee_id: Uuid) -> Result<(), AppError> {
        if caller.is_admin() || self.caller_employee_id(caller).await? == Some(employee_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub async fn list_all(&self) -> Result<Vec<RequestDetails>, AppError> {
        let requests = self.repo.list_all().await?;
        self.with_items(requests).await
    }

    pub async fn list_by_employee(&self, employee_id: Uuid) -> Result<Vec<RequestDetails>, AppError> {
        let requests = self.repo.list_by_employee(employee_id).await?;
        self.with_items(requests).await
    }

    pub async fn get(&self, id: Uuid) -> Result<RequestDetails, AppError> {
        let request = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Request"))?;

        self.with_items(vec![request])
            .await?
            .pop()
            .ok_or(AppError::NotFound("Request"))
    }

    /// Cria o pedido (sempre `Pending`) e os itens numa transação.
    pub async fn create(
        &self,
        employee_id: Uuid,
        kind: &str,
        description: Option<&str>,
        items: &[NewRequestItem],
    ) -> Result<RequestDetails, AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        if self.employee_repo.find_by_id(&mut *tx, employee_id).await?.is_none() {
            return Err(AppError::NotFound("Employee"));
        }

        let request = self
            .repo
            .create(&mut *tx, kind, description, RequestStatus::Pending, employee_id)
            .await?;
        let items = self.repo.bulk_create_items(&mut *tx, request.id, items).await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!(request_id = %request.id, employee_id = %employee_id, items = items.len(), "Pedido criado");
        Ok(RequestDetails { request, items })
    }

    pub async fn update(&self, id: Uuid, changes: RequestChanges) -> Result<RequestDetails, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut request = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Request"))?;

        if let Some(kind) = changes.kind {
            request.kind = kind;
        }
        if changes.description.is_some() {
            request.description = changes.description;
        }
        if let Some(status) = changes.status {
            request.status = status;
        }
        let request = self.repo.save(&mut *tx, &request).await?;

        if let Some(items) = changes.items {
            self.repo.delete_items(&mut *tx, id).await?;
            self.repo.bulk_create_items(&mut *tx, id, &items).await?;
        }

        tx.commit().await?;

        tracing::info!(request_id = %id, status = ?request.status, "Pedido atualizado");
        self.get(request.id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if !cascade::delete_request(&mut *tx, id).await? {
            return Err(AppError::NotFound("Request"));
        }

        tx.commit().await?;
        tracing::info!(request_id = %id, "🗑️ Pedido removido");
        Ok(())
    }

    async fn with_items(&self, requests: Vec<Request>) -> Result<Vec<RequestDetails>, AppError> {
        let ids: Vec<Uuid> = requests.iter().map(|r| r.id).collect();
        let items = self.repo.items_for_requests(&ids).await?;
        Ok(RequestDetails::group(requests, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_account_always_uses_its_own_employee() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert_eq!(resolve_requester(false, Some(own), Some(other)).unwrap(), own);
        assert_eq!(resolve_requester(false, Some(own), None).unwrap(), own);
    }

    #[test]
    fn regular_account_without_employee_record_fails() {
        let result = resolve_requester(false, None, Some(Uuid::new_v4()));
        assert!(matches!(result, Err(AppError::NotFound("Employee"))));
    }

    #[test]
    fn admin_may_choose_the_employee_or_fall_back_to_own() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert_eq!(resolve_requester(true, Some(own), Some(other)).unwrap(), other);
        assert_eq!(resolve_requester(true, Some(own), None).unwrap(), own);
    }

    #[test]
    fn admin_without_any_employee_is_a_bad_request() {
        let result = resolve_requester(true, None, None);
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Employee ID is required"));
    }

    use crate::{models::account::Role, test_support};

    fn items(names: &[&str]) -> Vec<NewRequestItem> {
        names
            .iter()
            .map(|name| NewRequestItem { name: name.to_string(), quantity: 1 })
            .collect()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn create_starts_pending_and_update_replaces_items(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let department = test_support::department(&state, "IT").await;
        let employee = test_support::employee(&state, department.id, None).await;

        let created = state
            .request_service
            .create(employee.id, "Equipment", Some("New hire kit"), &items(&["Laptop", "Mouse"]))
            .await
            .unwrap();
        assert_eq!(created.request.status, RequestStatus::Pending);
        assert_eq!(created.items.len(), 2);

        let changes = RequestChanges {
            status: Some(RequestStatus::Approved),
            items: Some(items(&["Monitor"])),
            ..Default::default()
        };
        let updated = state.request_service.update(created.request.id, changes).await.unwrap();

        assert_eq!(updated.request.status, RequestStatus::Approved);
        assert_eq!(updated.request.description.as_deref(), Some("New hire kit"));
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].name, "Monitor");
        assert_eq!(test_support::count(&pool, "request_items").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn regular_accounts_only_see_their_own_requests(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let department = test_support::department(&state, "IT").await;
        let jane = test_support::verified_account(&state, "jane@example.com", Role::User).await;
        let admin = test_support::verified_account(&state, "admin@example.com", Role::Admin).await;
        let own = test_support::employee(&state, department.id, Some(jane.id)).await;
        let other = test_support::employee(&state, department.id, None).await;

        let jane_ctx = AuthenticatedAccount::new(jane, Vec::new());
        let admin_ctx = AuthenticatedAccount::new(admin, Vec::new());

        assert_eq!(state.request_service.caller_employee_id(&jane_ctx).await.unwrap(), Some(own.id));
        assert!(state.request_service.ensure_can_view(&jane_ctx, own.id).await.is_ok());
        assert!(matches!(
            state.request_service.ensure_can_view(&jane_ctx, other.id).await,
            Err(AppError::Forbidden)
        ));
        assert!(state.request_service.ensure_can_view(&admin_ctx, other.id).await.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn delete_removes_the_items_too(pool: PgPool) {
        let (state, _) = test_support::state(pool.clone());
        let department = test_support::department(&state, "IT").await;
        let employee = test_support::employee(&state, department.id, None).await;
        let created = state
            .request_service
            .create(employee.id, "Equipment", None, &items(&["Laptop"]))
            .await
            .unwrap();

        state.request_service.delete(created.request.id).await.unwrap();

        assert_eq!(test_support::count(&pool, "request_items").await, 0);
        assert!(matches!(
            state.request_service.get(created.request.id).await,
            Err(AppError::NotFound("Request"))
        ));
    }
}
