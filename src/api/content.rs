use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::CurrentAdmin;
use crate::models::{AuditAction, CreateAuditLog, ResourceType};
use crate::services::moderation::is_flagged;
use crate::services::{AuditService, ContentService, ListContentParams};
use crate::utils::content_preview;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/:id", delete(delete_post))
        .route("/posts/auto-moderate", post(auto_moderate_posts))
        .route("/comments", get(list_comments))
        .route("/comments/:id", delete(delete_comment))
        .route("/comments/:id/block-author", post(block_comment_author))
}

#[derive(Debug, Deserialize)]
pub struct ListContentQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummaryResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct PostSummaryResponse {
    pub id: String,
    pub author_id: String,
    pub content_preview: String,
    pub image_url: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub flagged: bool,
    pub created_at: String,
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListContentQuery>,
) -> Result<Json<PostListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let content_service = ContentService::new(state.db.clone());
    let (posts, total) = content_service.list_posts(ListContentParams {
        page,
        limit,
        search: query.search,
    }).await?;

    let posts_response: Vec<PostSummaryResponse> = posts.into_iter().map(|post| {
        let flagged = is_flagged(&post.content);

        PostSummaryResponse {
            id: post.id.to_string(),
            author_id: post.user_id.to_string(),
            content_preview: content_preview(&post.content, 100),
            image_url: post.image_url,
            likes_count: post.likes_count,
            comments_count: post.comments_count,
            flagged,
            created_at: post.created_at.to_rfc3339(),
        }
    }).collect();

    Ok(Json(PostListResponse {
        posts: posts_response,
        total,
        page,
        limit,
    }))
}

async fn delete_post(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let post_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid post ID".to_string()))?;

    if !current_admin.role.can_moderate_content() {
        return Err(AppError::Forbidden);
    }

    let content_service = ContentService::new(state.db.clone());
    content_service.delete_post(post_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::DeletePost,
        resource_type: ResourceType::Post,
        resource_id: Some(id.clone()),
        details: None,
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Post {} has been deleted", id),
    })))
}

async fn auto_moderate_posts(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>> {
    if !current_admin.role.can_moderate_content() {
        return Err(AppError::Forbidden);
    }

    let content_service = ContentService::new(state.db.clone());
    let deleted_count = content_service.auto_moderate_posts().await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::AutoModeratePosts,
        resource_type: ResourceType::Post,
        resource_id: None,
        details: Some(serde_json::json!({ "deleted_count": deleted_count })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    let message = if deleted_count == 0 {
        "No posts contained blocked words".to_string()
    } else {
        format!("{} posts deleted for blocked words", deleted_count)
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "deleted_count": deleted_count,
        "message": message,
    })))
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentSummaryResponse>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct CommentSummaryResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub status: String,
    pub flagged: bool,
    pub created_at: String,
}

async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<ListContentQuery>,
) -> Result<Json<CommentListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).min(100);

    let content_service = ContentService::new(state.db.clone());
    let (comments, total) = content_service.list_comments(ListContentParams {
        page,
        limit,
        search: query.search,
    }).await?;

    let comments_response: Vec<CommentSummaryResponse> = comments.into_iter().map(|comment| {
        let flagged = is_flagged(&comment.content);

        CommentSummaryResponse {
            id: comment.id.to_string(),
            post_id: comment.post_id.to_string(),
            author_id: comment.user_id.to_string(),
            content: comment.content,
            status: comment.status,
            flagged,
            created_at: comment.created_at.to_rfc3339(),
        }
    }).collect();

    Ok(Json(CommentListResponse {
        comments: comments_response,
        total,
        page,
        limit,
    }))
}

async fn delete_comment(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let comment_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid comment ID".to_string()))?;

    if !current_admin.role.can_moderate_content() {
        return Err(AppError::Forbidden);
    }

    let content_service = ContentService::new(state.db.clone());
    content_service.delete_comment(comment_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::DeleteComment,
        resource_type: ResourceType::Comment,
        resource_id: Some(id.clone()),
        details: None,
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Comment {} has been deleted", id),
    })))
}

async fn block_comment_author(
    State(state): State<AppState>,
    Extension(current_admin): Extension<CurrentAdmin>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let comment_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid comment ID".to_string()))?;

    if !current_admin.role.can_block_users() {
        return Err(AppError::Forbidden);
    }

    let content_service = ContentService::new(state.db.clone());
    let outcome = content_service.block_comment_author(comment_id).await?;

    let audit_service = AuditService::new(state.db.clone());
    let _ = audit_service.log(CreateAuditLog {
        admin_id: current_admin.id,
        action: AuditAction::BlockCommentAuthor,
        resource_type: ResourceType::User,
        resource_id: Some(outcome.user_id.to_string()),
        details: Some(serde_json::json!({
            "comment_id": id,
            "comments_deleted": outcome.comments_deleted,
        })),
        ip_address: Some(addr.ip().to_string()),
        user_agent: super::user_agent(&headers),
    }).await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("User {} blocked and their comments removed", outcome.user_id),
        "user_id": outcome.user_id.to_string(),
        "comments_deleted": outcome.comments_deleted,
    })))
}
