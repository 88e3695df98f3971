pub mod account_repo;
pub use account_repo::AccountRepository;
pub mod refresh_token_repo;
pub use refresh_token_repo::RefreshTokenRepository;
pub mod department_repo;
pub use department_repo::DepartmentRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod request_repo;
pub use request_repo::RequestRepository;
pub mod workflow_repo;
pub use workflow_repo::WorkflowRepository;

pub mod cascade;
