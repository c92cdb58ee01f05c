use axum::{Json, extract::State};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, FieldError},
    models::{LoginRequest, LoginResponse, RegisterRequest, User, looks_like_email},
};

/// Minimal slice of the identity provider's signup response.
#[derive(Deserialize)]
struct IdpSignupResponse {
    id: Uuid,
}

/// Minimal slice of the identity provider's password-grant response.
#[derive(Deserialize)]
struct IdpTokenResponse {
    access_token: String,
    user: IdpUser,
}

#[derive(Deserialize)]
struct IdpUser {
    id: Uuid,
}

/// register_user
///
/// [Public Route] Registers an account with the external identity provider
/// and mirrors it into the local `profiles` table, so the provider-issued
/// UUID and the local primary key stay in sync.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = User),
        (status = 400, description = "Rejected by identity provider")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<User>, ApiError> {
    let mut errors = Vec::new();
    if !looks_like_email(&payload.email) {
        errors.push(FieldError::new("email", "Valid email is required"));
    }
    if payload.password.len() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    let role = payload.role.clone().unwrap_or_else(|| "editor".to_string());
    if role != "editor" && role != "admin" {
        errors.push(FieldError::new("role", "Role must be editor or admin"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let client = reqwest::Client::new();
    let signup_url = format!("{}/auth/v1/signup", state.config.auth_url);

    let response = client
        .post(signup_url)
        .header("apikey", &state.config.auth_api_key)
        .json(&serde_json::json!({
            "email": payload.email,
            "password": payload.password,
        }))
        .send()
        .await
        .map_err(ApiError::internal)?;

    if !response.status().is_success() {
        // Provider-side rejection: email already registered, weak password.
        return Err(ApiError::BadRequest(
            "Registration was rejected by the identity provider".to_string(),
        ));
    }

    let idp_user = response
        .json::<IdpSignupResponse>()
        .await
        .map_err(ApiError::internal)?;

    let user = state
        .repo
        .create_user(User {
            id: idp_user.id,
            email: payload.email,
            role,
        })
        .await?;

    Ok(Json(user))
}

/// login
///
/// [Public Route] Exchanges credentials for an access token via the identity
/// provider's password grant, then attaches the local profile.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let client = reqwest::Client::new();
    let token_url = format!(
        "{}/auth/v1/token?grant_type=password",
        state.config.auth_url
    );

    let response = client
        .post(token_url)
        .header("apikey", &state.config.auth_api_key)
        .json(&serde_json::json!({
            "email": payload.email,
            "password": payload.password,
        }))
        .send()
        .await
        .map_err(ApiError::internal)?;

    if !response.status().is_success() {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = response
        .json::<IdpTokenResponse>()
        .await
        .map_err(ApiError::internal)?;

    let user = state
        .repo
        .get_user(token.user.id)
        .await?
        .ok_or_else(|| {
            ApiError::Unauthorized("The user belonging to this token no longer exists.".to_string())
        })?;

    Ok(Json(LoginResponse {
        access_token: token.access_token,
        user,
    }))
}

/// get_me
///
/// [Authenticated Route] The requesting user's profile.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Profile", body = User))
)]
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    state
        .repo
        .get_user(auth.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Profile"))
}
