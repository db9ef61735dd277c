use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{require_auth, Claims, CurrentAdmin};
use crate::models::{Admin, AuditAction, CreateAuditLog, ResourceType};
use crate::services::{AuditService, AuthService};
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(get_current_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .merge(protected)
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub admin: AdminInfo,
}

#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub avatar: Option<String>,
}

impl AdminInfo {
    fn from_admin(admin: &Admin) -> Self {
        Self {
            id: admin.id.to_string(),
            email: admin.email.clone(),
            name: admin.name.clone(),
            role: admin.role.clone(),
            avatar: admin.avatar.clone(),
        }
    }
}

async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    payload.validate()?;

    let auth_service = AuthService::new(state.db.clone(), state.config.clone());
    let (admin, access_token, refresh_token) = auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: admin.id,
        action: AuditAction::Login,
        resource_type: ResourceType::Session,
        resource_id: Some(admin.id.to_string()),
        details: None,
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    let admin_info = AdminInfo::from_admin(&admin);

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        admin: admin_info,
    }))
}

async fn logout(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let auth_service = AuthService::new(state.db.clone(), state.config.clone());
    auth_service.invalidate_token(token).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::Logout,
        resource_type: ResourceType::Session,
        resource_id: Some(current_admin.id.to_string()),
        details: None,
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({ "message": "Logged out successfully" })))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let claims = decode::<Claims>(
        &payload.refresh_token,
        &DecodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?
    .claims;

    // The account must still exist and be active to mint a new access token
    let admin: Admin = sqlx::query_as(
        "SELECT * FROM admin_users WHERE id = $1 AND status = 'active'"
    )
    .bind(uuid::Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?)
    .fetch_optional(&state.db.pg)
    .await?
    .ok_or(AppError::Unauthorized)?;

    let auth_service = AuthService::new(state.db.clone(), state.config.clone());
    let access_token = auth_service.generate_access_token(&admin)?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Get current authenticated admin info
async fn get_current_admin(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
) -> Result<Json<AdminInfo>> {
    let admin: Admin = sqlx::query_as(
        "SELECT * FROM admin_users WHERE id = $1"
    )
    .bind(current_admin.id)
    .fetch_optional(&state.db.pg)
    .await?
    .ok_or(AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(AdminInfo::from_admin(&admin)))
}
