// Content service - post/comment queries, manual deletes, and the two
// moderation cascades (block-from-comment, bulk auto-moderation)
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::UserStatus;
use crate::services::moderation::is_flagged;

pub struct ContentService {
    db: Database,
}

/// Post summary for list views
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Comment summary for list views
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentSummary {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of blocking a comment's author.
#[derive(Debug, Clone, Serialize)]
pub struct BlockAuthorOutcome {
    pub user_id: Uuid,
    pub comments_deleted: u64,
}

#[derive(Debug, Deserialize)]
pub struct ListContentParams {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl ContentService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List posts with pagination, newest first.
    pub async fn list_posts(&self, params: ListContentParams) -> Result<(Vec<PostSummary>, i64)> {
        let offset = ((params.page - 1) * params.limit) as i64;
        let limit = params.limit as i64;

        let (where_clause, limit_param) = match params.search {
            Some(_) => ("content ILIKE $1", 2),
            None => ("1=1", 1),
        };

        let query = format!(
            r#"
            SELECT
                id,
                user_id,
                content,
                image_url,
                likes_count,
                comments_count,
                created_at
            FROM posts
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            limit_param,
            limit_param + 1
        );

        let mut posts_query = sqlx::query_as::<_, PostSummary>(&query);
        if let Some(ref search) = params.search {
            posts_query = posts_query.bind(format!("%{}%", search));
        }
        let posts = posts_query.bind(limit).bind(offset).fetch_all(&self.db.pg).await?;

        let count_query = format!("SELECT COUNT(*) FROM posts WHERE {}", where_clause);
        let mut total_query = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref search) = params.search {
            total_query = total_query.bind(format!("%{}%", search));
        }
        let total = total_query.fetch_one(&self.db.pg).await?;

        Ok((posts, total))
    }

    /// List comments with pagination, newest first.
    pub async fn list_comments(&self, params: ListContentParams) -> Result<(Vec<CommentSummary>, i64)> {
        let offset = ((params.page - 1) * params.limit) as i64;
        let limit = params.limit as i64;

        let (where_clause, limit_param) = match params.search {
            Some(_) => ("content ILIKE $1", 2),
            None => ("1=1", 1),
        };

        let query = format!(
            r#"
            SELECT
                id,
                post_id,
                user_id,
                content,
                status,
                created_at
            FROM comments
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            limit_param,
            limit_param + 1
        );

        let mut comments_query = sqlx::query_as::<_, CommentSummary>(&query);
        if let Some(ref search) = params.search {
            comments_query = comments_query.bind(format!("%{}%", search));
        }
        let comments = comments_query.bind(limit).bind(offset).fetch_all(&self.db.pg).await?;

        let count_query = format!("SELECT COUNT(*) FROM comments WHERE {}", where_clause);
        let mut total_query = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref search) = params.search {
            total_query = total_query.bind(format!("%{}%", search));
        }
        let total = total_query.fetch_one(&self.db.pg).await?;

        Ok((comments, total))
    }

    /// Delete a single post. No cascade beyond the row itself.
    pub async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.db.pg)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post {} not found", post_id)));
        }

        Ok(())
    }

    /// Delete a single comment. No cascade beyond the row itself.
    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.db.pg)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", comment_id)));
        }

        Ok(())
    }

    /// Block the author of a comment and delete every comment they wrote.
    ///
    /// Both writes run in one transaction: either the user ends up blocked
    /// with zero remaining comments, or nothing changes.
    pub async fn block_comment_author(&self, comment_id: Uuid) -> Result<BlockAuthorOutcome> {
        let mut tx = self.db.pg.begin().await?;

        let user_id: Uuid = sqlx::query_scalar("SELECT user_id FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound(format!("Comment {} not found", comment_id)))?;

        sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(UserStatus::Blocked.as_str())
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM comments WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(BlockAuthorOutcome {
            user_id,
            comments_deleted: deleted.rows_affected(),
        })
    }

    /// Delete every post whose content is flagged. Returns the number of
    /// posts removed; zero matches means zero deletes.
    pub async fn auto_moderate_posts(&self) -> Result<u64> {
        let posts: Vec<(Uuid, String)> = sqlx::query_as("SELECT id, content FROM posts")
            .fetch_all(&self.db.pg)
            .await?;

        let flagged: Vec<Uuid> = posts
            .into_iter()
            .filter(|(_, content)| is_flagged(content))
            .map(|(id, _)| id)
            .collect();

        if flagged.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM posts WHERE id = ANY($1)")
            .bind(&flagged)
            .execute(&self.db.pg)
            .await?;

        Ok(result.rows_affected())
    }
}
