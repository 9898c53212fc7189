#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;
use warelist_api::{api_routes, config::AppConfig, db, AppState};

const TEST_SECRET: &str = "test_secret_key_for_tests_only_padded_to_length";

/// In-memory SQLite database with the full schema applied. A single pooled
/// connection keeps the in-memory database alive across queries.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let pool = Database::connect(opts)
        .await
        .expect("failed to open in-memory sqlite");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

/// Application harness: fresh database, tempdir-backed image store, and the
/// full API router.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _upload_dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = test_db().await;
        let upload_dir = tempfile::tempdir().expect("tempdir");

        let cfg = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: TEST_SECRET.to_string(),
            token_ttl_secs: 3600,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
            auto_migrate: false,
            upload_dir: upload_dir.path().to_string_lossy().into_owned(),
            upload_public_prefix: "/uploads/warehouses".to_string(),
            cors_allowed_origins: None,
        };

        let state = AppState::new(pool, cfg);
        let router = api_routes().with_state(state.clone());

        Self {
            router,
            state,
            _upload_dir: upload_dir,
        }
    }

    /// Issue a JSON (or empty-body) request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Issue a request with an explicit content type and raw body (multipart).
    pub async fn raw_request(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: Vec<u8>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body)).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register a user and return a valid session token.
    pub async fn signup(&self, email: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/auth/signup",
                Some(serde_json::json!({
                    "email": email,
                    "name": "Test User",
                    "password": "hunter2!",
                })),
                None,
            )
            .await;
        assert_eq!(response.status(), 201, "signup should succeed");
        let json = response_json(response).await;
        json["data"]["token"]
            .as_str()
            .expect("signup returns a token")
            .to_string()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

const BOUNDARY: &str = "warelist-test-boundary";

/// Hand-rolled multipart body: text fields followed by image files under the
/// `warehouseImages[]` field.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (filename, data) in files {
        body.extend(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"warehouseImages[]\"; \
                 filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend(*data);
        body.extend(b"\r\n");
    }
    body.extend(format!("--{BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={BOUNDARY}"),
        body,
    )
}

/// The eight required create fields for a valid warehouse form.
pub fn valid_warehouse_fields<'a>() -> Vec<(&'a str, &'a str)> {
    vec![
        ("warehouse_name", "Alpha Storage"),
        ("address1", "Plot 12, Ring Road"),
        ("areaLocality", "Naroda"),
        ("state", "Gujarat"),
        ("city", "Ahmedabad"),
        ("pincode", "380001"),
        ("totalLotArea", "10000"),
        ("coveredArea", "8000"),
    ]
}
