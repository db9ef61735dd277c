use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::models::{AuditAction, CreateAuditLog, ResourceType};
use crate::services::{AuditService, BillingService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions))
        .route("/top-up", post(top_up))
        .route("/:id", delete(cancel_transaction))
}

#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub description: Option<String>,
    pub status: String,
    pub created_at: String,
}

async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<TransactionListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let billing_service = BillingService::new(state.db.clone());
    let (transactions, total) = billing_service.list_transactions(page, limit).await?;

    let transactions_response: Vec<TransactionResponse> = transactions.into_iter().map(|t| TransactionResponse {
        id: t.id.to_string(),
        user_id: t.user_id.to_string(),
        kind: t.kind,
        amount: t.amount,
        description: t.description,
        status: t.status,
        created_at: t.created_at.to_rfc3339(),
    }).collect();

    Ok(Json(TransactionListResponse {
        transactions: transactions_response,
        total,
        page,
        limit,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct TopUpRequest {
    pub user_id: Uuid,
    #[validate(range(min = 0.01))]
    pub amount: f64,
}

async fn top_up(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<TopUpRequest>,
) -> Result<Json<serde_json::Value>> {
    payload.validate()?;

    if !current_admin.role.can_manage_billing() {
        return Err(AppError::Forbidden);
    }

    let billing_service = BillingService::new(state.db.clone());
    let record = billing_service.top_up(payload.user_id, payload.amount).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::TopUpBalance,
        resource_type: ResourceType::Transaction,
        resource_id: Some(record.id.to_string()),
        details: Some(serde_json::json!({
            "user_id": payload.user_id.to_string(),
            "amount": payload.amount,
        })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Balance topped up by {}", payload.amount),
        "transaction_id": record.id.to_string(),
    })))
}

async fn cancel_transaction(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let transaction_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid transaction ID".to_string()))?;

    if !current_admin.role.can_manage_billing() {
        return Err(AppError::Forbidden);
    }

    let billing_service = BillingService::new(state.db.clone());
    billing_service.cancel_transaction(transaction_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::CancelTransaction,
        resource_type: ResourceType::Transaction,
        resource_id: Some(id.clone()),
        details: None,
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Transaction {} has been cancelled", id),
    })))
}
