use crate::{errors::ServiceError, services::warehouses::DEFAULT_PAGE_SIZE};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use utoipa::IntoParams;

/// `Json` body extractor whose rejection keeps the `{success:false, message}`
/// envelope instead of axum's plain-text response.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// 200 envelope with a data payload.
pub fn success_response<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": data })),
    )
        .into_response()
}

/// 201 envelope with a data payload.
pub fn created_response<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": data })),
    )
        .into_response()
}

/// 200 envelope with no payload (delete acknowledgements).
pub fn ok_response() -> Response {
    (StatusCode::OK, Json(json!({ "success": true }))).into_response()
}

/// 200 envelope for paginated listings.
pub fn paginated_response<T: Serialize>(
    rows: Vec<T>,
    total: u64,
    page: u64,
    total_pages: u64,
) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": rows,
            "total": total,
            "page": page,
            "totalPages": total_pages,
        })),
    )
        .into_response()
}

/// Pagination query parameters for list/search endpoints.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}
