use crate::{
    auth::{AuthenticatedUser, UserResponse},
    errors::ServiceError,
    handlers::common::{created_response, success_response, ApiJson},
    AppState,
};
use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/verify", get(verify))
}

/// Register a new account and hand back a session token.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created; token and user returned"),
        (status = 400, description = "Invalid payload or email already registered"),
    )
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<Response, ServiceError> {
    payload
        .validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    let user = state
        .auth
        .register(&payload.email, &payload.name, &payload.password)
        .await?;
    let token = state.auth.issue_token(user.id, &user.email)?;

    info!(email = %user.email, "user registered");
    Ok(created_response(json!({
        "token": token,
        "user": UserResponse::from(user),
    })))
}

/// Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token and user returned"),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ServiceError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ServiceError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .auth
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = state.auth.issue_token(user.id, &user.email)?;

    info!(email = %user.email, "user logged in");
    Ok(success_response(json!({
        "token": token,
        "user": UserResponse::from(user),
    })))
}

/// Resolve the bearer token back to its user record.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "auth",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Token is valid; user returned"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Token user no longer exists"),
    )
)]
pub(crate) async fn verify(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<Response, ServiceError> {
    let user = state
        .auth
        .get_user(caller.user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    Ok(success_response(UserResponse::from(user)))
}
