// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Accounts (sessão) ---
        handlers::accounts::authenticate,
        handlers::accounts::refresh_token,
        handlers::accounts::revoke_token,

        // --- Accounts (cadastro e senha) ---
        handlers::accounts::register,
        handlers::accounts::verify_email,
        handlers::accounts::forgot_password,
        handlers::accounts::validate_reset_token,
        handlers::accounts::reset_password,

        // --- Accounts (CRUD) ---
        handlers::accounts::get_all,
        handlers::accounts::get_by_id,
        handlers::accounts::create,
        handlers::accounts::update,
        handlers::accounts::delete,

        // --- Departments ---
        handlers::departments::list_departments,
        handlers::departments::get_department,
        handlers::departments::create_department,
        handlers::departments::update_department,
        handlers::departments::delete_department,

        // --- Employees ---
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::create_employee,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,
        handlers::employees::transfer_employee,

        // --- Requests ---
        handlers::requests::create_request,
        handlers::requests::list_requests,
        handlers::requests::get_request,
        handlers::requests::list_requests_by_employee,
        handlers::requests::update_request,
        handlers::requests::delete_request,

        // --- Workflows ---
        handlers::workflows::create_workflow,
        handlers::workflows::list_employee_workflows,
    ),
    components(
        schemas(
            // --- Accounts ---
            models::account::Role,
            models::account::AccountDetails,
            models::account::AuthResponse,
            models::account::AuthenticatePayload,
            models::account::RegisterPayload,
            models::account::CreateAccountPayload,
            models::account::UpdateAccountPayload,
            models::account::TokenPayload,
            models::account::RevokeTokenPayload,
            models::account::ForgotPasswordPayload,
            models::account::ResetPasswordPayload,
            models::message::MessageResponse,

            // --- Departments ---
            models::department::Department,
            models::department::DepartmentSummary,
            handlers::departments::CreateDepartmentPayload,
            handlers::departments::UpdateDepartmentPayload,

            // --- Employees ---
            models::employee::EmployeeStatus,
            models::employee::Employee,
            models::employee::EmployeeDetails,
            handlers::employees::CreateEmployeePayload,
            handlers::employees::UpdateEmployeePayload,
            handlers::employees::TransferPayload,
            handlers::employees::TransferResponse,

            // --- Requests ---
            models::request::RequestStatus,
            models::request::Request,
            models::request::RequestItem,
            models::request::RequestDetails,
            handlers::requests::RequestItemPayload,
            handlers::requests::CreateRequestPayload,
            handlers::requests::UpdateRequestPayload,

            // --- Workflows ---
            models::workflow::Workflow,
            handlers::workflows::CreateWorkflowPayload,
        )
    ),
    tags(
        (name = "Accounts", description = "Autenticação, cadastro e gestão de contas"),
        (name = "Departments", description = "Departamentos"),
        (name = "Employees", description = "Funcionários e transferências"),
        (name = "Requests", description = "Pedidos dos funcionários e seus itens"),
        (name = "Workflows", description = "Histórico de eventos do funcionário")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
