use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    handlers::{LangQuery, resolve_language, services::cleanup_replaced_image},
    models::{About, ImageAsset, UpsertAboutRequest},
    repository::AboutDocument,
    storage::sanitize_key,
};

/// get_about
///
/// [Public Route] The about document for a language.
#[utoipa::path(
    get,
    path = "/about",
    params(LangQuery),
    responses(
        (status = 200, description = "About document", body = About),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_about(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Json<About>, ApiError> {
    let language = resolve_language(query.lang)?;
    state
        .repo
        .get_about(&language)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("About page"))
}

/// upsert_about
///
/// [Admin Route] Creates or updates the about document. A replacement image
/// is stored with its upload metadata and the previous object is deleted.
#[utoipa::path(
    put,
    path = "/admin/about",
    params(LangQuery),
    request_body = UpsertAboutRequest,
    responses((status = 200, description = "Upserted", body = About))
)]
pub async fn upsert_about(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    Json(payload): Json<UpsertAboutRequest>,
) -> Result<Json<About>, ApiError> {
    auth.require_admin()?;
    payload.validate()?;
    let language = resolve_language(query.lang)?;

    let existing = state.repo.get_about(&language).await?;

    let image = payload.image.map(|upload| {
        let key = sanitize_key(&upload.key);
        sqlx::types::Json(ImageAsset {
            url: state.storage.object_url(&key),
            alt: upload.alt.unwrap_or_default(),
            size: upload.size.unwrap_or(0),
            mime_type: upload.mime_type.unwrap_or_default(),
            uploaded_at: Some(Utc::now()),
        })
    });

    let about = state
        .repo
        .upsert_about(
            &language,
            AboutDocument {
                title: payload.title,
                image,
                content: payload.content,
                features: payload.features,
            },
        )
        .await?;

    let old_url = existing
        .as_ref()
        .and_then(|a| a.image.as_ref())
        .map(|img| img.url.clone());
    let new_url = about.image.as_ref().map(|img| img.url.clone());
    cleanup_replaced_image(&state.storage, old_url.as_deref(), new_url.as_deref()).await;

    Ok(Json(about))
}
