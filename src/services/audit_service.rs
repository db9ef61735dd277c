// Audit service - records every admin-triggered mutation
use uuid::Uuid;

use crate::db::Database;
use crate::error::Result;
use crate::models::{AuditLog, CreateAuditLog};

pub struct AuditService {
    db: Database,
}

impl AuditService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn log(&self, entry: CreateAuditLog) -> Result<AuditLog> {
        let log: AuditLog = sqlx::query_as(
            r#"
            INSERT INTO audit_logs (id, admin_id, action, resource_type, resource_id, details, ip_address, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING *
            "#
        )
        .bind(Uuid::new_v4())
        .bind(entry.admin_id)
        .bind(entry.action.as_str())
        .bind(entry.resource_type.as_str())
        .bind(entry.resource_id)
        .bind(entry.details)
        .bind(entry.ip_address)
        .bind(entry.user_agent)
        .fetch_one(&self.db.pg)
        .await?;

        Ok(log)
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<AuditLog>> {
        let logs: Vec<AuditLog> = sqlx::query_as(
            "SELECT * FROM audit_logs ORDER BY created_at DESC LIMIT $1"
        )
        .bind(limit)
        .fetch_all(&self.db.pg)
        .await?;

        Ok(logs)
    }
}
