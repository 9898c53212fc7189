use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warelist API",
        version = "0.1.0",
        description = "Warehouse listing management: authenticated CRUD, search and fixed-slot \
                       image uploads over a REST API.\n\nAll `/api/warehouses` endpoints require \
                       `Authorization: Bearer <token>`; tokens come from the signup/login routes \
                       and expire after 7 days."
    ),
    paths(
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::auth::verify,
        crate::handlers::warehouses::list_warehouses,
        crate::handlers::warehouses::search_warehouses,
        crate::handlers::warehouses::get_warehouse,
        crate::handlers::warehouses::create_warehouse,
        crate::handlers::warehouses::update_warehouse,
        crate::handlers::warehouses::delete_warehouse,
        crate::handlers::warehouses::update_status,
    ),
    components(schemas(
        crate::handlers::auth::SignupRequest,
        crate::handlers::auth::LoginRequest,
        crate::handlers::warehouses::StatusBody,
        crate::auth::UserResponse,
        crate::entities::warehouse::WarehouseStatus,
    )),
    modifiers(&BearerTokenAddon),
    tags(
        (name = "auth", description = "Signup, login and token verification"),
        (name = "warehouses", description = "Warehouse listing CRUD and search"),
    )
)]
pub struct ApiDoc;

struct BearerTokenAddon;

impl Modify for BearerTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Swagger UI mounted at `/docs`, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
