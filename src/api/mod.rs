//! API module
//!
//! HTTP API endpoints, middleware and router composition.

pub mod auth;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{
    http::{HeaderName, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::TransactionHandler;

pub use auth::{Principal, PrincipalResolver};
pub use routes::create_router;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub transactions: Arc<TransactionHandler>,
    pub principals: Arc<PrincipalResolver>,
}

impl AppState {
    pub fn new(transactions: TransactionHandler, principals: PrincipalResolver) -> Self {
        Self {
            transactions: Arc::new(transactions),
            principals: Arc::new(principals),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Layers run last-added first: logging -> auth -> handler
    let protected_routes = create_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::logging_middleware));

    let request_id = HeaderName::from_static(middleware::REQUEST_ID_HEADER);

    Router::new()
        // Health check (no auth)
        .route("/health", get(health_check))
        .nest("/api/v1", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "streaming",
    }))
}
