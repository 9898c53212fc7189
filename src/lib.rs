//! Warelist API library
//!
//! Backend for a warehouse-listing dashboard: authenticated users create,
//! browse, search, update and soft-delete warehouse records, each carrying
//! four fixed image slots.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod images;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod uploads;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Process-wide immutable state, built once at startup and cloned per
/// request. Components receive their collaborators here instead of doing
/// ambient lookups.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth: Arc<auth::AuthService>,
    pub warehouses: services::warehouses::WarehouseService,
    pub images: Arc<uploads::ImageStore>,
}

impl AppState {
    /// Wire up all services over one connection pool.
    pub fn new(db: DatabaseConnection, config: config::AppConfig) -> Self {
        let db = Arc::new(db);
        let auth = Arc::new(auth::AuthService::new(
            auth::AuthConfig::new(config.jwt_secret.clone(), config.token_ttl_secs),
            db.clone(),
        ));
        let warehouses = services::warehouses::WarehouseService::new(db.clone());
        let images = Arc::new(uploads::ImageStore::new(
            config.upload_dir.clone(),
            config.upload_public_prefix.clone(),
        ));
        Self {
            db,
            config,
            auth,
            warehouses,
            images,
        }
    }
}

/// All `/api` routes: auth, warehouses and the health probe.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", handlers::auth::routes())
        .nest("/api/warehouses", handlers::warehouses::routes())
        .route("/api/health", get(handlers::health))
}
