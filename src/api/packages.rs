use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::models::{AuditAction, CreateAuditLog, ResourceType};
use crate::services::{AuditService, Package, PackageInput, PackageService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_packages).post(create_package))
        .route("/:id", put(update_package).delete(delete_package))
}

async fn list_packages(State(state): State<AppState>) -> Result<Json<Vec<Package>>> {
    let package_service = PackageService::new(state.db.clone());
    let packages = package_service.list_packages().await?;

    Ok(Json(packages))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PackageRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.01))]
    pub price: f64,
    #[validate(range(min = 1))]
    pub duration_days: i32,
    #[serde(default)]
    pub features: Vec<String>,
    pub is_active: Option<bool>,
}

impl PackageRequest {
    fn into_input(self) -> PackageInput {
        PackageInput {
            name: self.name,
            description: self.description,
            price: self.price,
            duration_days: self.duration_days,
            features: self.features,
            is_active: self.is_active,
        }
    }
}

async fn create_package(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<PackageRequest>,
) -> Result<Json<Package>> {
    payload.validate()?;

    if !current_admin.role.can_manage_billing() {
        return Err(AppError::Forbidden);
    }

    let package_service = PackageService::new(state.db.clone());
    let package = package_service.create_package(payload.into_input()).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::CreatePackage,
        resource_type: ResourceType::Package,
        resource_id: Some(package.id.to_string()),
        details: Some(serde_json::json!({ "name": package.name, "price": package.price })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(package))
}

async fn update_package(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<PackageRequest>,
) -> Result<Json<Package>> {
    payload.validate()?;

    let package_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid package ID".to_string()))?;

    if !current_admin.role.can_manage_billing() {
        return Err(AppError::Forbidden);
    }

    let package_service = PackageService::new(state.db.clone());
    let package = package_service.update_package(package_id, payload.into_input()).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::UpdatePackage,
        resource_type: ResourceType::Package,
        resource_id: Some(id.clone()),
        details: Some(serde_json::json!({ "name": package.name, "price": package.price })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(package))
}

async fn delete_package(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let package_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid package ID".to_string()))?;

    if !current_admin.role.can_manage_billing() {
        return Err(AppError::Forbidden);
    }

    let package_service = PackageService::new(state.db.clone());
    package_service.delete_package(package_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::DeletePackage,
        resource_type: ResourceType::Package,
        resource_id: Some(id.clone()),
        details: None,
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Package {} has been deleted", id),
    })))
}
