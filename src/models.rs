pub mod account;
pub mod department;
pub mod employee;
pub mod message;
pub mod refresh_token;
pub mod request;
pub mod workflow;
