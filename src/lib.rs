// src/lib.rs

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::AppConfig;
use services::item_repository::ItemRepository;

#[derive(Clone)]
pub struct AppState {
    pub items: ItemRepository,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            items: ItemRepository::new(db),
            config: Arc::new(config),
        }
    }
}

pub mod entities;

pub mod services {
    pub mod item_repository;
    pub mod lifecycle;
    pub mod projector;
}

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

/// Full API router with CORS, request tracing and the body size ceiling
pub fn build_router(state: AppState) -> Router {
    use handlers::{auth, health, investment};

    let body_limit = state.config.body_limit_bytes;

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/investments",
            get(investment::get_all_items).post(investment::create_item),
        )
        .route(
            "/api/investments/{id}",
            get(investment::get_item_by_id)
                .put(investment::update_item)
                .delete(investment::delete_item),
        )
        .route(
            "/api/investments/{id}/status",
            patch(investment::update_item_status),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
