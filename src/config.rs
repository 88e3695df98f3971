// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AccountRepository, DepartmentRepository, EmployeeRepository, RefreshTokenRepository,
        RequestRepository, WorkflowRepository,
    },
    services::{
        account_service::AccountService,
        department_service::DepartmentService,
        email::{mailer_from_config, EmailConfig, Mailer},
        employee_service::EmployeeService,
        request_service::RequestService,
        token_service::TokenService,
        workflow_service::WorkflowService,
    },
};

// =============================================================================
//  CONFIGURAÇÃO (variáveis de ambiente)
// =============================================================================

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub frontend_url: Option<String>,
    pub email: EmailConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // O .env é opcional: em produção as variáveis vêm do ambiente
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let smtp_port = match optional("SMTP_PORT") {
            Some(port) => port.parse().context("SMTP_PORT deve ser um número")?,
            None => 587,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr: optional("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:4000".to_string()),
            frontend_url: optional("FRONTEND_URL"),
            email: EmailConfig {
                from: optional("EMAIL_FROM").unwrap_or_else(|| "info@example.com".to_string()),
                smtp_host: optional("SMTP_HOST"),
                smtp_port,
                smtp_user: optional("SMTP_USER"),
                smtp_pass: optional("SMTP_PASS"),
            },
        })
    }
}

// Variável ausente ou vazia = None
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

// =============================================================================
//  ESTADO DA APLICAÇÃO
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub token_service: TokenService,
    pub account_service: AccountService,
    pub department_service: DepartmentService,
    pub employee_service: EmployeeService,
    pub request_service: RequestService,
    pub workflow_service: WorkflowService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let mailer = mailer_from_config(&config.email)?;
        Ok(Self::from_parts(
            db_pool,
            config.jwt_secret.clone(),
            config.frontend_url.clone(),
            mailer,
        ))
    }

    /// Monta o gráfico de dependências a partir do pool e do mailer.
    pub fn from_parts(
        db_pool: PgPool,
        jwt_secret: String,
        frontend_url: Option<String>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        // --- Repositórios ---
        let account_repo = AccountRepository::new(db_pool.clone());
        let refresh_repo = RefreshTokenRepository::new(db_pool.clone());
        let department_repo = DepartmentRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let request_repo = RequestRepository::new(db_pool.clone());
        let workflow_repo = WorkflowRepository::new(db_pool.clone());

        // --- Serviços ---
        let token_service = TokenService::new(
            refresh_repo,
            account_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let account_service = AccountService::new(
            account_repo.clone(),
            token_service.clone(),
            mailer,
            frontend_url,
            db_pool.clone(),
        );
        let department_service = DepartmentService::new(department_repo.clone(), db_pool.clone());
        let employee_service = EmployeeService::new(
            employee_repo.clone(),
            department_repo,
            account_repo,
            workflow_repo.clone(),
            db_pool.clone(),
        );
        let request_service = RequestService::new(request_repo, employee_repo.clone(), db_pool.clone());
        let workflow_service = WorkflowService::new(workflow_repo, employee_repo, db_pool.clone());

        Self {
            db_pool,
            token_service,
            account_service,
            department_service,
            employee_service,
            request_service,
            workflow_service,
        }
    }
}
