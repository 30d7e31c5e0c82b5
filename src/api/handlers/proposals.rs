//! Proposal endpoints
//!
//! The proposal catalogue is a fixed placeholder set for now; only the
//! listing endpoint exists, and it echoes the requested page/limit in its
//! pagination envelope without slicing the data.

use crate::core::error::Result;
use axum::{extract::Query, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ProposalsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub title: String,
    pub client: String,
    pub total: f64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProposalsData {
    pub proposals: Vec<Proposal>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProposalsResponse {
    pub success: bool,
    pub message: String,
    pub data: ProposalsData,
}

fn sample_proposals() -> Vec<Proposal> {
    vec![
        Proposal {
            id: "1".to_string(),
            title: "Orçamento Website Corporativo".to_string(),
            client: "Empresa ABC Ltda".to_string(),
            total: 15000.00,
            status: "draft".to_string(),
            created_at: "2025-09-20T10:00:00Z".to_string(),
            updated_at: "2025-09-22T14:30:00Z".to_string(),
        },
        Proposal {
            id: "2".to_string(),
            title: "Sistema E-commerce".to_string(),
            client: "Loja XYZ".to_string(),
            total: 25000.00,
            status: "pending".to_string(),
            created_at: "2025-09-18T08:15:00Z".to_string(),
            updated_at: "2025-09-23T09:45:00Z".to_string(),
        },
    ]
}

/// Handler for GET /api/v1/proposals
pub async fn list_proposals(Query(query): Query<ProposalsQuery>) -> Result<impl IntoResponse> {
    let proposals = sample_proposals();
    let total = proposals.len();

    Ok(Json(ProposalsResponse {
        success: true,
        message: "Proposals retrieved successfully".to_string(),
        data: ProposalsData {
            proposals,
            total,
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(20),
        },
    }))
}
