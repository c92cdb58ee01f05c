use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
    repository::RepositoryState,
};

/// Claims
///
/// Payload expected inside the identity provider's JWTs. `sub` is the user
/// UUID, which doubles as the primary key of the local `profiles` row.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    /// Expiration (seconds since epoch). Always validated.
    pub exp: usize,
    /// Issued-at (seconds since epoch).
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Handlers take this as
/// an argument; extraction failure rejects the request before the handler
/// runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    /// "editor" or "admin"; drives the admin-route checks.
    pub role: String,
}

impl AuthUser {
    /// Admin gate used by every `/admin` handler.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == "admin" {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ))
        }
    }
}

/// AuthUser extractor.
///
/// 1. In `Env::Local`, an `x-user-id` header naming an existing profile
///    authenticates directly (development bypass; never active in prod).
/// 2. Otherwise the Bearer token is decoded against the shared secret with
///    expiry validation.
/// 3. The subject is looked up in `profiles` so a deleted user's still-valid
///    token stops working, and so the current role is always fresh.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            if let Some(user_id_header) = parts.headers.get("x-user-id") {
                if let Ok(id_str) = user_id_header.to_str() {
                    if let Ok(user_id) = Uuid::parse_str(id_str) {
                        // The bypass still requires a real profile row so the
                        // role is loaded from the database, not invented.
                        if let Ok(Some(user)) = repo.get_user(user_id).await {
                            return Ok(AuthUser {
                                id: user.id,
                                role: user.role,
                            });
                        }
                    }
                }
            }
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("You are not logged in. Please log in to get access.".to_string())
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Malformed Authorization header".to_string())
        })?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Unauthorized("Your token has expired. Please log in again.".to_string())
                }
                _ => ApiError::Unauthorized("Invalid token. Please log in again.".to_string()),
            }
        })?;

        let user = repo
            .get_user(token_data.claims.sub)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::Unauthorized(
                    "The user belonging to this token no longer exists.".to_string(),
                )
            })?;

        Ok(AuthUser {
            id: user.id,
            role: user.role,
        })
    }
}
