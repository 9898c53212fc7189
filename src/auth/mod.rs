//! Authentication: password hashing, session token issuance/validation, and
//! the bearer-token request extractor.
//!
//! Tokens are HMAC-signed JWTs carrying `{userId, email, exp, iat}` and expire
//! seven days after issuance. Login failures deliberately use one message for
//! both unknown emails and wrong passwords.

use crate::{entities::user, errors::ServiceError, AppState};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const NO_TOKEN: &str = "No token provided";
const INVALID_TOKEN: &str = "Invalid token";

/// Claims carried by every session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Caller identity injected into authenticated handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
}

/// User shape returned by the API (never includes the password hash).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Authentication configuration (signing secret and token lifetime).
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_ttl_secs: u64) -> Self {
        Self {
            jwt_secret,
            token_ttl_secs,
        }
    }
}

/// Credential store and token issuer. Exclusively owns User rows.
#[derive(Clone, Debug)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Create a new user with a hashed password. Fails with `Conflict` if the
    /// email is already registered.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let created = user::ActiveModel {
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            password: Set(hash_password(password)?),
            role: Set("user".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        debug!(user_id = created.id, "registered user");
        Ok(created)
    }

    /// Verify credentials. Unknown email and wrong password yield the same
    /// error so callers cannot enumerate accounts.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &user.password)? {
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        Ok(user)
    }

    /// Look up a user by id (backs the token-verification endpoint).
    pub async fn get_user(&self, user_id: i32) -> Result<Option<user::Model>, ServiceError> {
        let user = user::Entity::find_by_id(user_id).one(&*self.db).await?;
        Ok(user)
    }

    /// Issue a signed session token for the given identity.
    pub fn issue_token(&self, user_id: i32, email: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.token_ttl_secs as i64)).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("signing token: {e}")))
    }

    /// Validate a token's signature and expiry and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthorized(INVALID_TOKEN.to_string()))
    }
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("hashing password: {e}")))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ServiceError::Internal(format!("parsing stored hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split_whitespace().nth(1))
            .ok_or_else(|| ServiceError::Unauthorized(NO_TOKEN.to_string()))?;

        let claims = state.auth.verify_token(token)?;
        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}
