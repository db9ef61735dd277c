use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::models::{AnnouncementType, AuditAction, CreateAuditLog, ResourceType};
use crate::services::{Announcement, AnnouncementService, AuditService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route("/:id/toggle", post(toggle_announcement))
}

async fn list_announcements(State(state): State<AppState>) -> Result<Json<Vec<Announcement>>> {
    let announcement_service = AnnouncementService::new(state.db.clone());
    let announcements = announcement_service.list_announcements().await?;

    Ok(Json(announcements))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default = "default_type", rename = "type")]
    pub kind: String,
}

fn default_type() -> String {
    "general".to_string()
}

async fn create_announcement(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    payload.validate()?;

    // Whitespace-only titles pass the length check but are still empty
    if payload.title.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Title and content are required".to_string()));
    }

    let kind = AnnouncementType::parse(&payload.kind)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown announcement type: {}", payload.kind)))?;

    let announcement_service = AnnouncementService::new(state.db.clone());
    let announcement = announcement_service
        .create_announcement(&payload.title, &payload.content, kind)
        .await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::CreateAnnouncement,
        resource_type: ResourceType::Announcement,
        resource_id: Some(announcement.id.to_string()),
        details: Some(serde_json::json!({ "title": announcement.title, "type": announcement.kind })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(announcement))
}

async fn toggle_announcement(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Announcement>> {
    let announcement_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid announcement ID".to_string()))?;

    let announcement_service = AnnouncementService::new(state.db.clone());
    let announcement = announcement_service.toggle_announcement(announcement_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::ToggleAnnouncement,
        resource_type: ResourceType::Announcement,
        resource_id: Some(id.clone()),
        details: Some(serde_json::json!({ "is_active": announcement.is_active })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(announcement))
}
