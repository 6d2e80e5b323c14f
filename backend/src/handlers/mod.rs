pub mod matches;
pub mod chats;

pub use matches::{my_matches, swipe, AppState};
pub use chats::{list_chats, send_message};

use axum::{
    http::{HeaderValue, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    constants::SERVICE_NAME,
    services::{ChatService, MatchResolver},
    utils::Config,
};

pub fn create_router(resolver: Arc<MatchResolver>, chats: Arc<ChatService>, config: Config) -> Router {
    let cors_layer = create_cors_layer(std::env::var("ALLOWED_ORIGINS").ok().as_deref());
    let app_state: AppState = (resolver, chats, config);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/matches/swipe", post(swipe))
        .route("/api/matches/mine", get(my_matches))
        .route("/api/chats", get(list_chats))
        .route("/api/chats/message", post(send_message))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(app_state)
}

fn create_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    // Comma separated list, permissive when unset or unparseable
    let origins: Vec<HeaderValue> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .filter_map(|origin| {
            let trimmed = origin.trim();
            if !trimmed.is_empty() {
                trimmed.parse().ok()
            } else {
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        cors = cors.allow_origin(origins);
    } else {
        cors = cors.allow_origin(Any);
    }

    cors
}

async fn health_check() -> Json<Value> {
    Json(json!({ "ok": true, "service": SERVICE_NAME }))
}
