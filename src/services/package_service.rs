// Package service - subscription package CRUD
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};

pub struct PackageService {
    db: Database,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Package {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_days: i32,
    pub features: Json<Vec<String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct PackageInput {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_days: i32,
    pub features: Vec<String>,
    pub is_active: Option<bool>,
}

impl PackageService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List all packages, cheapest first.
    pub async fn list_packages(&self) -> Result<Vec<Package>> {
        let packages: Vec<Package> = sqlx::query_as(
            "SELECT * FROM packages ORDER BY price ASC"
        )
        .fetch_all(&self.db.pg)
        .await?;

        Ok(packages)
    }

    /// Create a package. New packages are active unless told otherwise.
    pub async fn create_package(&self, input: PackageInput) -> Result<Package> {
        let features = Self::clean_features(input.features);

        let package: Package = sqlx::query_as(
            r#"
            INSERT INTO packages (name, description, price, duration_days, features, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.duration_days)
        .bind(Json(features))
        .bind(input.is_active.unwrap_or(true))
        .fetch_one(&self.db.pg)
        .await?;

        Ok(package)
    }

    /// Update a package in place. A missing `is_active` keeps the stored flag.
    pub async fn update_package(&self, package_id: Uuid, input: PackageInput) -> Result<Package> {
        let features = Self::clean_features(input.features);

        let package: Package = sqlx::query_as(
            r#"
            UPDATE packages
            SET name = $2,
                description = $3,
                price = $4,
                duration_days = $5,
                features = $6,
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(package_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.duration_days)
        .bind(Json(features))
        .bind(input.is_active)
        .fetch_optional(&self.db.pg)
        .await?
        .ok_or(AppError::NotFound(format!("Package {} not found", package_id)))?;

        Ok(package)
    }

    pub async fn delete_package(&self, package_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(package_id)
            .execute(&self.db.pg)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Package {} not found", package_id)));
        }

        Ok(())
    }

    /// Blank feature lines from the form are dropped, order is preserved.
    fn clean_features(features: Vec<String>) -> Vec<String> {
        features
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_features_drops_blanks_keeps_order() {
        let cleaned = PackageService::clean_features(vec![
            "Unlimited likes".to_string(),
            "   ".to_string(),
            "".to_string(),
            "Profile boost".to_string(),
        ]);

        assert_eq!(cleaned, vec!["Unlimited likes".to_string(), "Profile boost".to_string()]);
    }
}
