// Billing service - transaction ledger and manual balance top-ups
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::TransactionType;

pub const TOP_UP_DESCRIPTION: &str = "Manual top-up by admin";
pub const STATUS_COMPLETED: &str = "completed";

pub struct BillingService {
    db: Database,
}

/// Ledger row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl BillingService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List transactions, newest first.
    pub async fn list_transactions(&self, page: u32, limit: u32) -> Result<(Vec<TransactionRecord>, i64)> {
        let offset = ((page - 1) * limit) as i64;

        let transactions: Vec<TransactionRecord> = sqlx::query_as(
            r#"
            SELECT id, user_id, type, amount, description, status, created_at
            FROM transactions
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        )
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.db.pg)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.db.pg)
            .await?;

        Ok((transactions, total))
    }

    /// Credit a user's balance and record the matching ledger entry.
    ///
    /// The insert and the balance update commit together or not at all; a
    /// ledger row never exists without its balance effect.
    pub async fn top_up(&self, user_id: Uuid, amount: f64) -> Result<TransactionRecord> {
        if amount <= 0.0 {
            return Err(AppError::BadRequest("Top-up amount must be positive".to_string()));
        }

        let mut tx = self.db.pg.begin().await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        if !exists {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let record: TransactionRecord = sqlx::query_as(
            r#"
            INSERT INTO transactions (user_id, type, amount, description, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, type, amount, description, status, created_at
            "#
        )
        .bind(user_id)
        .bind(TransactionType::AdminTopUp.as_str())
        .bind(amount)
        .bind(TOP_UP_DESCRIPTION)
        .bind(STATUS_COMPLETED)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE users SET balance = balance + $2, updated_at = NOW() WHERE id = $1"
        )
        .bind(user_id)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Cancel a transaction. Removes the ledger row only; the user's balance
    /// is left untouched even if the row had already been applied to it.
    pub async fn cancel_transaction(&self, transaction_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&self.db.pg)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Transaction {} not found", transaction_id)));
        }

        Ok(())
    }
}
