// src/services.rs

pub mod account_service;
pub mod department_service;
pub mod email;
pub mod email_templates;
pub mod employee_service;
pub mod request_service;
pub mod token_service;
pub mod workflow_service;
