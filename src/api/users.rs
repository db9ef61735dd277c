use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::models::{AuditAction, CreateAuditLog, ResourceType};
use crate::services::{AuditService, ListUsersParams, UserService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user))
        .route("/:id/status", post(toggle_status))
        .route("/:id/role", post(toggle_role))
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummaryResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct UserSummaryResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub status: String,
    pub balance: f64,
    pub created_at: String,
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let user_service = UserService::new(state.db.clone());
    let (users, total) = user_service.list_users(ListUsersParams {
        page,
        limit,
        status: query.status,
        search: query.search,
    }).await?;

    let users_response: Vec<UserSummaryResponse> = users.into_iter().map(|u| UserSummaryResponse {
        id: u.id.to_string(),
        username: u.username,
        email: u.email,
        full_name: u.full_name,
        role: u.role,
        status: u.status,
        balance: u.balance,
        created_at: u.created_at.to_rfc3339(),
    }).collect();

    Ok(Json(UserListResponse {
        users: users_response,
        total,
        page,
        limit,
    }))
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub status: String,
    pub balance: f64,
    pub is_premium: bool,
    pub premium_until: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

async fn get_user(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<UserDetailResponse>> {
    let user_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid user ID".to_string()))?;

    let user_service = UserService::new(state.db.clone());
    let user = user_service.get_user(user_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::ViewUser,
        resource_type: ResourceType::User,
        resource_id: Some(id.clone()),
        details: None,
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(UserDetailResponse {
        id: user.id.to_string(),
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        phone: user.phone,
        bio: user.bio,
        role: user.role,
        status: user.status,
        balance: user.balance,
        is_premium: user.is_premium,
        premium_until: user.premium_until.map(|t| t.to_rfc3339()),
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
    }))
}

async fn toggle_status(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let user_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid user ID".to_string()))?;

    if !current_admin.role.can_block_users() {
        return Err(AppError::Forbidden);
    }

    let user_service = UserService::new(state.db.clone());
    let new_status = user_service.toggle_status(user_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::ToggleUserStatus,
        resource_type: ResourceType::User,
        resource_id: Some(id.clone()),
        details: Some(serde_json::json!({ "new_status": new_status.as_str() })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("User {} is now {}", id, new_status.as_str()),
        "status": new_status.as_str(),
    })))
}

async fn toggle_role(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let user_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid user ID".to_string()))?;

    if !current_admin.role.can_manage_billing() {
        return Err(AppError::Forbidden);
    }

    let user_service = UserService::new(state.db.clone());
    let new_role = user_service.toggle_role(user_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::ToggleUserRole,
        resource_type: ResourceType::User,
        resource_id: Some(id.clone()),
        details: Some(serde_json::json!({ "new_role": new_role.as_str() })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("User {} role changed to {}", id, new_role.as_str()),
        "role": new_role.as_str(),
    })))
}
