// Announcement service - broadcast announcements and their active flag
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::AnnouncementType;

pub struct AnnouncementService {
    db: Database,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl AnnouncementService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List announcements, newest first.
    pub async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        let announcements: Vec<Announcement> = sqlx::query_as(
            r#"
            SELECT id, title, content, type, is_active, created_at
            FROM announcements
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.db.pg)
        .await?;

        Ok(announcements)
    }

    /// Create an announcement. New announcements always start active.
    pub async fn create_announcement(
        &self,
        title: &str,
        content: &str,
        kind: AnnouncementType,
    ) -> Result<Announcement> {
        let announcement: Announcement = sqlx::query_as(
            r#"
            INSERT INTO announcements (title, content, type, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, title, content, type, is_active, created_at
            "#
        )
        .bind(title.trim())
        .bind(content.trim())
        .bind(kind.as_str())
        .fetch_one(&self.db.pg)
        .await?;

        Ok(announcement)
    }

    /// Flip the active flag. One statement, so two toggles always restore
    /// the original value.
    pub async fn toggle_announcement(&self, announcement_id: Uuid) -> Result<Announcement> {
        let announcement: Announcement = sqlx::query_as(
            r#"
            UPDATE announcements
            SET is_active = NOT is_active
            WHERE id = $1
            RETURNING id, title, content, type, is_active, created_at
            "#
        )
        .bind(announcement_id)
        .fetch_optional(&self.db.pg)
        .await?
        .ok_or(AppError::NotFound(format!("Announcement {} not found", announcement_id)))?;

        Ok(announcement)
    }
}
