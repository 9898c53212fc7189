use crate::{
    auth::AuthenticatedUser,
    errors::ServiceError,
    handlers::common::{
        created_response, ok_response, paginated_response, success_response, ApiJson,
        PaginationParams,
    },
    images::SLOT_COUNT,
    services::warehouses::{SearchFilter, WarehouseForm, DEFAULT_PAGE_SIZE},
    uploads::ImageStore,
    AppState,
};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Multipart, Path, Query, State},
    http::request::Parts,
    response::Response,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Multipart field carrying image files; the bare name is accepted alongside
/// the bracketed form the dashboard sends.
const IMAGE_FIELD: &str = "warehouseImages[]";
const IMAGE_FIELD_BARE: &str = "warehouseImages";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_warehouses).post(create_warehouse))
        .route("/search", get(search_warehouses))
        .route(
            "/:id",
            get(get_warehouse)
                .put(update_warehouse)
                .delete(delete_warehouse),
        )
        .route("/:id/status", patch(update_status))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    pub q: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
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

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusBody {
    pub status: Option<String>,
}

/// Path id extractor; a non-numeric id answers with the 400 envelope instead
/// of axum's plain-text rejection.
pub(crate) struct WarehouseId(i32);

#[async_trait]
impl FromRequestParts<AppState> for WarehouseId {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|_| ServiceError::Validation("Invalid warehouse id".to_string()))?;
        Ok(Self(id))
    }
}

/// List visible warehouses, newest first.
#[utoipa::path(
    get,
    path = "/api/warehouses",
    tag = "warehouses",
    params(PaginationParams),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Paginated warehouse rows"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub(crate) async fn list_warehouses(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ServiceError> {
    let page = state.warehouses.list(params.page, params.limit).await?;
    Ok(paginated_response(
        page.rows,
        page.total,
        params.page.max(1),
        page.total_pages,
    ))
}

/// Search visible warehouses; all supplied filters are combined with AND.
#[utoipa::path(
    get,
    path = "/api/warehouses/search",
    tag = "warehouses",
    params(SearchParams),
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Paginated warehouse rows matching the filters"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub(crate) async fn search_warehouses(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Result<Response, ServiceError> {
    let filter = SearchFilter {
        q: non_blank(params.q),
        state: non_blank(params.state),
        city: non_blank(params.city),
    };
    let page = state
        .warehouses
        .search(filter, params.page, params.limit)
        .await?;
    Ok(paginated_response(
        page.rows,
        page.total,
        params.page.max(1),
        page.total_pages,
    ))
}

/// Fetch one warehouse by numeric id.
#[utoipa::path(
    get,
    path = "/api/warehouses/{id}",
    tag = "warehouses",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Warehouse returned"),
        (status = 404, description = "Unknown or soft-deleted id"),
    )
)]
pub(crate) async fn get_warehouse(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
    WarehouseId(id): WarehouseId,
) -> Result<Response, ServiceError> {
    let warehouse = state.warehouses.get_by_id(id).await?;
    Ok(success_response(warehouse))
}

/// Create a warehouse from a multipart form (fields plus up to 4 images).
#[utoipa::path(
    post,
    path = "/api/warehouses",
    tag = "warehouses",
    security(("bearer_token" = [])),
    responses(
        (status = 201, description = "Warehouse created"),
        (status = 400, description = "Missing required fields or bad upload"),
    )
)]
pub(crate) async fn create_warehouse(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Response, ServiceError> {
    let (form, image_paths) = collect_form(&mut multipart, &state.images).await?;
    let warehouse = state.warehouses.create(form, image_paths).await?;
    Ok(created_response(warehouse))
}

/// Partially update a warehouse; untouched fields and image slots survive.
#[utoipa::path(
    put,
    path = "/api/warehouses/{id}",
    tag = "warehouses",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Warehouse updated"),
        (status = 404, description = "Unknown or soft-deleted id"),
    )
)]
pub(crate) async fn update_warehouse(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
    WarehouseId(id): WarehouseId,
    mut multipart: Multipart,
) -> Result<Response, ServiceError> {
    let (form, image_paths) = collect_form(&mut multipart, &state.images).await?;
    let warehouse = state.warehouses.update(id, form, image_paths).await?;
    Ok(success_response(warehouse))
}

/// Soft-delete a warehouse.
#[utoipa::path(
    delete,
    path = "/api/warehouses/{id}",
    tag = "warehouses",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Warehouse marked inactive"),
        (status = 404, description = "Unknown or already-deleted id"),
    )
)]
pub(crate) async fn delete_warehouse(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
    WarehouseId(id): WarehouseId,
) -> Result<Response, ServiceError> {
    state.warehouses.soft_delete(id).await?;
    Ok(ok_response())
}

/// Toggle a warehouse between publish and unpublish.
#[utoipa::path(
    patch,
    path = "/api/warehouses/{id}/status",
    tag = "warehouses",
    request_body = StatusBody,
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Status outside {publish, unpublish}"),
        (status = 404, description = "Unknown id"),
    )
)]
pub(crate) async fn update_status(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
    WarehouseId(id): WarehouseId,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Response, ServiceError> {
    let status = body
        .status
        .ok_or_else(|| ServiceError::Validation("Invalid status value".to_string()))?;
    let warehouse = state.warehouses.set_status(id, &status).await?;
    Ok(success_response(warehouse))
}

/// Drain a multipart body into form fields and stored image paths. Images are
/// positional: the n-th file lands in slot n.
pub(crate) async fn collect_form(
    multipart: &mut Multipart,
    store: &ImageStore,
) -> Result<(WarehouseForm, Vec<String>), ServiceError> {
    let mut form = WarehouseForm::default();
    let mut image_paths = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGE_FIELD || name == IMAGE_FIELD_BARE {
            if image_paths.len() >= SLOT_COUNT {
                return Err(ServiceError::Validation(
                    "Maximum 4 images allowed".to_string(),
                ));
            }
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(|ct| ct.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| ServiceError::Validation(format!("Failed reading upload: {e}")))?;
            let path = store.save(&file_name, content_type.as_deref(), data).await?;
            image_paths.push(path);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ServiceError::Validation(format!("Malformed form field: {e}")))?;
            form.set_field(&name, value);
        }
    }

    Ok((form, image_paths))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
