use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CreateAuditLog {
    pub admin_id: Uuid,
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // Auth
    Login,
    Logout,
    // User management
    ViewUser,
    ToggleUserStatus,
    ToggleUserRole,
    // Content moderation
    DeletePost,
    DeleteComment,
    BlockCommentAuthor,
    AutoModeratePosts,
    // Ledger
    TopUpBalance,
    CancelTransaction,
    // Packages
    CreatePackage,
    UpdatePackage,
    DeletePackage,
    // Announcements
    CreateAnnouncement,
    ToggleAnnouncement,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::ViewUser => "view_user",
            AuditAction::ToggleUserStatus => "toggle_user_status",
            AuditAction::ToggleUserRole => "toggle_user_role",
            AuditAction::DeletePost => "delete_post",
            AuditAction::DeleteComment => "delete_comment",
            AuditAction::BlockCommentAuthor => "block_comment_author",
            AuditAction::AutoModeratePosts => "auto_moderate_posts",
            AuditAction::TopUpBalance => "top_up_balance",
            AuditAction::CancelTransaction => "cancel_transaction",
            AuditAction::CreatePackage => "create_package",
            AuditAction::UpdatePackage => "update_package",
            AuditAction::DeletePackage => "delete_package",
            AuditAction::CreateAnnouncement => "create_announcement",
            AuditAction::ToggleAnnouncement => "toggle_announcement",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    User,
    Post,
    Comment,
    Transaction,
    Package,
    Announcement,
    Session,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::User => "user",
            ResourceType::Post => "post",
            ResourceType::Comment => "comment",
            ResourceType::Transaction => "transaction",
            ResourceType::Package => "package",
            ResourceType::Announcement => "announcement",
            ResourceType::Session => "session",
        }
    }
}
