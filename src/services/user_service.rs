// User service - user queries plus the status/role toggles
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{UserRole, UserStatus};

pub struct UserService {
    db: Database,
}

/// User summary for list views
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub status: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

/// Full user details
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserDetail {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub status: String,
    pub balance: f64,
    pub is_premium: bool,
    pub premium_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub page: u32,
    pub limit: u32,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List users with pagination and filters, newest first.
    pub async fn list_users(&self, params: ListUsersParams) -> Result<(Vec<UserSummary>, i64)> {
        let offset = ((params.page - 1) * params.limit) as i64;
        let limit = params.limit as i64;

        // Build the WHERE clause with numbered placeholders so filter values
        // are always bound, never interpolated. Filters come first so the
        // same clause (and bind order) serves both the page and count queries.
        let mut where_clauses = vec!["1=1".to_string()];
        let mut next_param = 1;

        if params.status.is_some() {
            where_clauses.push(format!("status = ${}", next_param));
            next_param += 1;
        }

        if params.search.is_some() {
            where_clauses.push(format!(
                "(username ILIKE ${p} OR email ILIKE ${p})",
                p = next_param
            ));
            next_param += 1;
        }

        let where_clause = where_clauses.join(" AND ");

        let query = format!(
            r#"
            SELECT
                id,
                username,
                email,
                full_name,
                role,
                status,
                balance,
                created_at
            FROM users
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            next_param,
            next_param + 1
        );

        let mut users_query = sqlx::query_as::<_, UserSummary>(&query);
        if let Some(ref status) = params.status {
            users_query = users_query.bind(status.clone());
        }
        if let Some(ref search) = params.search {
            users_query = users_query.bind(format!("%{}%", search));
        }
        let users = users_query.bind(limit).bind(offset).fetch_all(&self.db.pg).await?;

        // Total count under the same filters
        let count_query = format!("SELECT COUNT(*) FROM users WHERE {}", where_clause);

        let mut total_query = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref status) = params.status {
            total_query = total_query.bind(status.clone());
        }
        if let Some(ref search) = params.search {
            total_query = total_query.bind(format!("%{}%", search));
        }

        let total = total_query.fetch_one(&self.db.pg).await?;

        Ok((users, total))
    }

    /// Get user details by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<UserDetail> {
        let user: UserDetail = sqlx::query_as(
            r#"
            SELECT
                id,
                username,
                email,
                full_name,
                phone,
                bio,
                role,
                status,
                balance,
                is_premium,
                premium_until,
                created_at,
                updated_at
            FROM users
            WHERE id = $1
            "#
        )
        .bind(user_id)
        .fetch_optional(&self.db.pg)
        .await?
        .ok_or(AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(user)
    }

    /// Flip active <-> blocked. Single-field update; no other column changes.
    pub async fn toggle_status(&self, user_id: Uuid) -> Result<UserStatus> {
        let current: String = sqlx::query_scalar("SELECT status FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db.pg)
            .await?
            .ok_or(AppError::NotFound(format!("User {} not found", user_id)))?;

        let next = UserStatus::from_db(&current).toggled();

        sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(next.as_str())
            .execute(&self.db.pg)
            .await?;

        Ok(next)
    }

    /// Flip user <-> premium. Single-field update; no other column changes.
    pub async fn toggle_role(&self, user_id: Uuid) -> Result<UserRole> {
        let current: String = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db.pg)
            .await?
            .ok_or(AppError::NotFound(format!("User {} not found", user_id)))?;

        let next = UserRole::from_db(&current).toggled();

        sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(next.as_str())
            .execute(&self.db.pg)
            .await?;

        Ok(next)
    }
}
