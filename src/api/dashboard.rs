use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::{AuditService, OverviewStats, StatsService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/activity", get(get_recent_activity))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<OverviewStats>> {
    let stats_service = StatsService::new(state.db.clone());
    let stats = stats_service.get_overview().await?;

    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ActivityEntry {
    pub id: String,
    pub admin_id: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub created_at: String,
}

async fn get_recent_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityEntry>>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let audit_service = AuditService::new(state.db.clone());
    let logs = audit_service.list_recent(limit).await?;

    let entries: Vec<ActivityEntry> = logs.into_iter().map(|log| ActivityEntry {
        id: log.id.to_string(),
        admin_id: log.admin_id.to_string(),
        action: log.action,
        resource_type: log.resource_type,
        resource_id: log.resource_id,
        created_at: log.created_at.to_rfc3339(),
    }).collect();

    Ok(Json(entries))
}
