// Stats service - dashboard overview aggregates
use serde::Serialize;

use crate::db::Database;
use crate::error::Result;
use crate::models::TransactionType;

pub struct StatsService {
    db: Database,
}

#[derive(Debug, Serialize)]
pub struct OverviewStats {
    pub total_users: i64,
    pub active_users: i64,
    pub premium_users: i64,
    pub blocked_users: i64,
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_transactions: i64,
    pub total_revenue: f64,
}

impl StatsService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Dashboard overview. Aggregation happens in SQL; nothing is paged
    /// through the service.
    pub async fn get_overview(&self) -> Result<OverviewStats> {
        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db.pg)
            .await?;

        let active_users: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE status = 'active'"
        )
        .fetch_one(&self.db.pg)
        .await?;

        // Premium by flag or by role, matching how the app marks upgrades.
        let premium_users: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE is_premium OR role = 'premium'"
        )
        .fetch_one(&self.db.pg)
        .await?;

        let blocked_users: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE status = 'blocked'"
        )
        .fetch_one(&self.db.pg)
        .await?;

        let total_posts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.db.pg)
            .await?;

        let total_comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.db.pg)
            .await?;

        let total_transactions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.db.pg)
            .await?;

        // Revenue counts top-ups only; transfers between users are not income.
        let revenue_types: Vec<&str> = TransactionType::REVENUE.iter().map(|t| t.as_str()).collect();
        let total_revenue: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE type = ANY($1)
            "#
        )
        .bind(&revenue_types)
        .fetch_one(&self.db.pg)
        .await?;

        Ok(OverviewStats {
            total_users,
            active_users,
            premium_users,
            blocked_users,
            total_posts,
            total_comments,
            total_transactions,
            total_revenue,
        })
    }
}
