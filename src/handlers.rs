// src/handlers.rs

pub mod accounts;
pub mod departments;
pub mod employees;
pub mod requests;
pub mod workflows;
