// src/models/request.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use utoipa::ToSchema;

// Mapeia o CREATE TYPE request_status do banco
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    #[schema(example = "Equipment")]
    pub kind: String,
    #[schema(example = "New laptop for onboarding")]
    pub description: Option<String>,
    pub status: RequestStatus,
    pub employee_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestItem {
    pub id: Uuid,
    #[schema(example = "Laptop")]
    pub name: String,
    #[schema(example = 1)]
    pub quantity: i32,
    pub request_id: Uuid,
}

// Item ainda não salvo
#[derive(Debug, Clone)]
pub struct NewRequestItem {
    pub name: String,
    pub quantity: i32,
}

// Pedido + seus itens
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    #[serde(flatten)]
    pub request: Request,
    pub items: Vec<RequestItem>,
}

impl RequestDetails {
    /// Junta cada pedido com os itens que pertencem a ele.
    pub fn group(requests: Vec<Request>, items: Vec<RequestItem>) -> Vec<RequestDetails> {
        let index: HashMap<Uuid, usize> = requests
            .iter()
            .enumerate()
            .map(|(position, request)| (request.id, position))
            .collect();
        let mut details: Vec<RequestDetails> = requests
            .into_iter()
            .map(|request| RequestDetails { request, items: Vec::new() })
            .collect();

        for item in items {
            if let Some(&position) = index.get(&item.request_id) {
                details[position].items.push(item);
            }
        }
        details
    }
}
