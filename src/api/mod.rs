mod announcements;
mod auth;
mod content;
mod dashboard;
mod packages;
mod transactions;
mod users;

use axum::http::HeaderMap;
use axum::{middleware, Router};

use crate::middleware::require_auth;
use crate::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/dashboard", dashboard::routes())
        .nest("/users", users::routes())
        .nest("/content", content::routes())
        .nest("/transactions", transactions::routes())
        .nest("/packages", packages::routes())
        .nest("/announcements", announcements::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/auth", auth::routes(state))
        .merge(protected)
}

pub(crate) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
