use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    handlers::{LangQuery, resolve_language},
    models::{PAGE_TYPES, Page, PageDocument, UpsertPageRequest},
    sections,
    storage::sanitize_key,
};

fn check_page_type(page_type: &str) -> Result<(), ApiError> {
    if PAGE_TYPES.contains(&page_type) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid page type: {page_type}")))
    }
}

/// get_page
///
/// [Public Route] Returns the active page document for a page type and
/// language. The home page is composed rather than returned raw: defaults
/// fill missing sections, the about section comes from the About document,
/// and empty featured lists are back-filled with recent content.
#[utoipa::path(
    get,
    path = "/pages/{page_type}",
    params(("page_type" = String, Path, description = "Page type"), LangQuery),
    responses(
        (status = 200, description = "Page document", body = Page),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_page(
    State(state): State<AppState>,
    Path(page_type): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Value>, ApiError> {
    check_page_type(&page_type)?;
    let language = resolve_language(query.lang)?;

    if page_type == "home" {
        return Ok(Json(compose_home(&state, &language).await?));
    }

    let page = state
        .repo
        .get_active_page(&page_type, &language)
        .await?
        .ok_or_else(|| ApiError::not_found("Page"))?;
    Ok(Json(serde_json::to_value(page).map_err(ApiError::internal)?))
}

/// Builds the home-page response. The stored document (when present) is laid
/// over the default structure, then the dynamic sections are resolved:
/// about from the About document, featured services/blogs back-filled from
/// the newest active content whenever the stored lists are empty.
async fn compose_home(state: &AppState, language: &str) -> Result<Value, ApiError> {
    let stored = state.repo.get_active_page("home", language).await?;

    let mut sections = sections::default_home_sections();
    if let Some(page) = &stored {
        sections::deep_merge(&mut sections, page.sections.clone());
    }

    if let Some(about) = state.repo.get_about(language).await? {
        sections::set_section_path(
            &mut sections,
            "about",
            serde_json::to_value(about).map_err(ApiError::internal)?,
        );
    }

    let featured_empty = sections["services"]["featuredServices"]
        .as_array()
        .map(|list| list.is_empty())
        .unwrap_or(true);
    if featured_empty {
        let cards = state.repo.featured_service_cards(language, 6).await?;
        sections::set_section_path(
            &mut sections,
            "services.featuredServices",
            serde_json::to_value(cards).map_err(ApiError::internal)?,
        );
    }

    let blogs_empty = sections["blog"]["featuredBlogs"]
        .as_array()
        .map(|list| list.is_empty())
        .unwrap_or(true);
    if blogs_empty {
        let cards = state.repo.latest_blog_cards(language, 3).await?;
        sections::set_section_path(
            &mut sections,
            "blog.featuredBlogs",
            serde_json::to_value(cards).map_err(ApiError::internal)?,
        );
    }

    let mut body = match stored {
        Some(page) => serde_json::to_value(page).map_err(ApiError::internal)?,
        // No stored document yet: serve the defaults without persisting them.
        None => json!({
            "page_type": "home",
            "language": language,
            "title": "Home",
            "slug": "home",
            "is_active": true,
        }),
    };
    body["sections"] = sections;
    Ok(body)
}

/// get_page_by_id
///
/// [Public Route] Returns an active page by its UUID.
#[utoipa::path(
    get,
    path = "/pages/id/{id}",
    params(("id" = Uuid, Path, description = "Page ID")),
    responses(
        (status = 200, description = "Page document", body = Page),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_page_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Page>, ApiError> {
    state
        .repo
        .get_active_page_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Page"))
}

/// upsert_page
///
/// [Admin Route] Creates or updates the page document for a (page type,
/// language) pair. Incoming sections are deep-merged over the stored tree
/// (objects merge, arrays replace), then each uploaded file is recorded at
/// its section path with url/alt/size/mimeType/uploadedAt metadata.
#[utoipa::path(
    put,
    path = "/admin/pages/{page_type}",
    params(("page_type" = String, Path, description = "Page type"), LangQuery),
    request_body = UpsertPageRequest,
    responses((status = 200, description = "Upserted page", body = Page))
)]
pub async fn upsert_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(page_type): Path<String>,
    Query(query): Query<LangQuery>,
    Json(payload): Json<UpsertPageRequest>,
) -> Result<Json<Page>, ApiError> {
    auth.require_admin()?;
    check_page_type(&page_type)?;
    let language = resolve_language(query.lang)?;

    let existing = state.repo.get_page_any_status(&page_type, &language).await?;

    let mut sections = match &existing {
        Some(page) => page.sections.clone(),
        None if page_type == "home" => sections::default_home_sections(),
        None => json!({}),
    };
    if let Some(patch) = payload.sections.clone() {
        sections::deep_merge(&mut sections, patch);
    }
    for upload in &payload.uploads {
        let key = sanitize_key(&upload.key);
        let url = state.storage.object_url(&key);
        let asset = sections::image_asset_value(upload, &url);
        sections::set_section_path(&mut sections, &upload.path, asset);
    }

    let doc = PageDocument {
        title: payload.title,
        slug: payload
            .slug
            .map(|slug| slug.to_lowercase())
            .or_else(|| Some(page_type.clone())),
        seo: payload.seo.map(sqlx::types::Json),
        sections,
        is_active: payload.is_active.unwrap_or(true),
    };

    let page = state.repo.upsert_page(&page_type, &language, doc).await?;
    Ok(Json(page))
}

/// deactivate_page
///
/// [Admin Route] Soft-deletes a page; it disappears from public reads but
/// stays in the database for the next upsert.
#[utoipa::path(
    delete,
    path = "/admin/pages/{id}",
    params(("id" = Uuid, Path, description = "Page ID")),
    responses(
        (status = 204, description = "Deactivated"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn deactivate_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;
    if state.repo.deactivate_page(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Page"))
    }
}
