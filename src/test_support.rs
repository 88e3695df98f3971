// src/test_support.rs

// Apoio aos testes com banco: estado montado sobre o pool do #[sqlx::test]
// e um mailer que só guarda o que foi enviado.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::AppState,
    db::AccountRepository,
    models::{
        account::{Account, CreateAccountPayload, RegisterPayload, Role},
        department::Department,
        employee::{Employee, EmployeeStatus},
    },
    services::email::{Email, Mailer},
};

pub const PASSWORD: &str = "secret123";
pub const JWT_SECRET: &str = "test-secret";
pub const FRONTEND_URL: &str = "http://localhost:4200";

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent().into_iter().map(|e| e.subject).collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub fn state(pool: PgPool) -> (AppState, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::from_parts(
        pool,
        JWT_SECRET.into(),
        Some(FRONTEND_URL.into()),
        mailer.clone(),
    );
    (state, mailer)
}

pub fn register_payload(email: &str) -> RegisterPayload {
    RegisterPayload {
        title: "Ms".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: email.into(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
    }
}

pub async fn find_account(pool: &PgPool, email: &str) -> Account {
    AccountRepository::new(pool.clone())
        .find_by_email(email)
        .await
        .unwrap()
        .expect("account should exist")
}

/// Conta já verificada, criada pelo caminho do Admin.
pub async fn verified_account(state: &AppState, email: &str, role: Role) -> Account {
    let payload = CreateAccountPayload {
        title: "Mr".into(),
        first_name: "John".into(),
        last_name: "Roe".into(),
        email: email.into(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
        role,
    };
    state.account_service.create(payload).await.unwrap();
    find_account(&state.db_pool, email).await
}

pub async fn department(state: &AppState, name: &str) -> Department {
    state.department_service.create(name, None).await.unwrap()
}

pub async fn employee(state: &AppState, department_id: Uuid, account_id: Option<Uuid>) -> Employee {
    state
        .employee_service
        .create("Analyst", account_id, department_id, EmployeeStatus::Active)
        .await
        .unwrap()
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
