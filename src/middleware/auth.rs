use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,       // Admin ID
    pub email: String,
    pub role: AdminRole,
    pub exp: usize,        // Expiration time
    pub iat: usize,        // Issued at
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    Moderator,
}

impl AdminRole {
    pub fn can_block_users(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin | AdminRole::Admin)
    }

    pub fn can_manage_billing(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin | AdminRole::Admin)
    }

    pub fn can_moderate_content(&self) -> bool {
        true // All roles can moderate content
    }
}

/// Authenticated admin context attached to the request by `require_auth`.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: Uuid,
    pub email: String,
    pub role: AdminRole,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if is_blacklisted(&state, token).await {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?
    .claims;

    let admin_id = Uuid::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let current_admin = CurrentAdmin {
        id: admin_id,
        email: claims.email,
        role: claims.role,
    };

    request.extensions_mut().insert(current_admin);

    Ok(next.run(request).await)
}

/// Tokens invalidated by logout sit in Redis until their natural expiry.
/// An unreachable blacklist is logged and treated as empty.
async fn is_blacklisted(state: &AppState, token: &str) -> bool {
    let key = format!("token_blacklist:{}", token);
    match state.db.get_redis_conn().await {
        Ok(mut conn) => conn.exists::<_, bool>(&key).await.unwrap_or(false),
        Err(e) => {
            tracing::warn!("Token blacklist unavailable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderator_cannot_block_users() {
        assert!(!AdminRole::Moderator.can_block_users());
        assert!(AdminRole::Admin.can_block_users());
        assert!(AdminRole::SuperAdmin.can_block_users());
    }

    #[test]
    fn test_all_roles_moderate_content() {
        assert!(AdminRole::Moderator.can_moderate_content());
        assert!(AdminRole::Admin.can_moderate_content());
        assert!(AdminRole::SuperAdmin.can_moderate_content());
    }

    #[test]
    fn test_moderator_cannot_manage_billing() {
        assert!(!AdminRole::Moderator.can_manage_billing());
        assert!(AdminRole::Admin.can_manage_billing());
    }
}
