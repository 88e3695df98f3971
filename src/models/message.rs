// src/models/message.rs

use serde::Serialize;
use utoipa::ToSchema;

// Resposta padrão das rotas que só confirmam uma ação
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Department deleted")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
