use axum::http::HeaderMap;
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::LANGUAGES;

pub mod about;
pub mod auth;
pub mod blogs;
pub mod careers;
pub mod clients;
pub mod contact;
pub mod pages;
pub mod partners;
pub mod services;
pub mod stats;
pub mod uploads;

/// `?lang=` query parameter shared by every language-scoped endpoint.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct LangQuery {
    /// Content language ("en" or "ar"). Defaults to "en".
    pub lang: Option<String>,
}

/// Resolves and validates the requested content language.
pub(crate) fn resolve_language(lang: Option<String>) -> Result<String, ApiError> {
    let lang = lang.unwrap_or_else(|| "en".to_string());
    if LANGUAGES.contains(&lang.as_str()) {
        Ok(lang)
    } else {
        Err(ApiError::BadRequest(format!("Unsupported language: {lang}")))
    }
}

/// Best-effort client address for throttling and audit columns. Reads the
/// first hop of `x-forwarded-for`; absent behind no proxy, which the callers
/// tolerate.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}
