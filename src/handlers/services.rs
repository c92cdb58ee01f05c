use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{
        CreateServiceRequest, ListMeta, ListResponse, Service, UpdateServiceRequest, slugify,
    },
    repository::{NewService, ServiceChanges, ServiceFilter},
    storage::{StorageState, sanitize_key},
};

/// Accepted query parameters for the service listings.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ServiceListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub featured: Option<bool>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub lang: Option<String>,
}

impl ServiceListQuery {
    fn into_filter(self, include_inactive: bool) -> Result<ServiceFilter, ApiError> {
        Ok(ServiceFilter {
            language: super::resolve_language(self.lang)?,
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(10),
            featured: self.featured,
            tag: self.tag,
            search: self.search,
            include_inactive,
        })
    }
}

/// Deletes the previously stored image when an update replaced it. Failures
/// are logged only; the content change has already been persisted.
pub(crate) async fn cleanup_replaced_image(
    storage: &StorageState,
    old_url: Option<&str>,
    new_url: Option<&str>,
) {
    if let Some(old) = old_url {
        if new_url != Some(old) {
            if let Some(key) = storage.key_for_url(old) {
                if let Err(err) = storage.delete_object(&key).await {
                    tracing::warn!(key, error = err, "failed to delete replaced object");
                }
            }
        }
    }
}

/// list_services
///
/// [Public Route] Paginated listing of active services with featured, tag,
/// and substring search filters.
#[utoipa::path(
    get,
    path = "/services",
    params(ServiceListQuery),
    responses((status = 200, description = "Paginated services"))
)]
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
) -> Result<Json<ListResponse<Service>>, ApiError> {
    let filter = query.into_filter(false)?;
    let (page, limit) = (filter.page, filter.limit);
    let (services, total) = state.repo.list_services(filter).await?;
    Ok(Json(ListResponse {
        data: services,
        meta: ListMeta::new(page, limit, total),
    }))
}

/// admin_list_services
///
/// [Admin Route] Same listing including soft-deleted rows.
#[utoipa::path(
    get,
    path = "/admin/services",
    params(ServiceListQuery),
    responses((status = 200, description = "Paginated services incl. inactive"))
)]
pub async fn admin_list_services(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
) -> Result<Json<ListResponse<Service>>, ApiError> {
    auth.require_admin()?;
    let filter = query.into_filter(true)?;
    let (page, limit) = (filter.page, filter.limit);
    let (services, total) = state.repo.list_services(filter).await?;
    Ok(Json(ListResponse {
        data: services,
        meta: ListMeta::new(page, limit, total),
    }))
}

/// get_service
///
/// [Public Route] Single active service by slug and language. Each hit
/// increments the view counter.
#[utoipa::path(
    get,
    path = "/services/{slug}",
    params(("slug" = String, Path, description = "Service slug")),
    responses(
        (status = 200, description = "Service", body = Service),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<super::LangQuery>,
) -> Result<Json<Service>, ApiError> {
    let language = super::resolve_language(query.lang)?;
    state
        .repo
        .get_service_by_slug(&slug, &language)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service"))
}

/// create_service
///
/// [Admin Route] Creates a service. The slug is derived from the title when
/// not provided; the featured image arrives as an object key from the
/// presigned-upload flow and is stored as its public URL.
#[utoipa::path(
    post,
    path = "/admin/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Created", body = Service),
        (status = 409, description = "Duplicate slug")
    )
)]
pub async fn create_service(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    auth.require_admin()?;
    payload.validate()?;

    let data = NewService {
        language: payload.language.unwrap_or_else(|| "en".to_string()),
        slug: payload
            .slug
            .map(|slug| slugify(&slug))
            .unwrap_or_else(|| slugify(&payload.title)),
        title: payload.title,
        subtitle: payload.subtitle,
        icon: payload.icon,
        thumbnail: payload.thumbnail,
        featured_image: payload
            .featured_image_key
            .map(|key| state.storage.object_url(&sanitize_key(&key))),
        excerpt: payload.excerpt,
        content: payload.content,
        display_order: payload.display_order.unwrap_or(0),
        featured: payload.featured.unwrap_or(false),
        tags: payload.tags.unwrap_or_default(),
        seo: payload.seo.map(sqlx::types::Json),
    };

    let service = state.repo.create_service(data).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// update_service
///
/// [Admin Route] Partial update. A changed title regenerates the slug; a new
/// featured image replaces and deletes the stored one.
#[utoipa::path(
    put,
    path = "/admin/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Updated", body = Service),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_service(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    auth.require_admin()?;
    payload.validate()?;

    let existing = state
        .repo
        .get_service(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Service"))?;

    let changes = ServiceChanges {
        slug: payload.title.as_deref().map(slugify),
        title: payload.title,
        subtitle: payload.subtitle,
        icon: payload.icon,
        thumbnail: payload.thumbnail,
        featured_image: payload
            .featured_image_key
            .map(|key| state.storage.object_url(&sanitize_key(&key))),
        excerpt: payload.excerpt,
        content: payload.content,
        display_order: payload.display_order,
        featured: payload.featured,
        tags: payload.tags,
        seo: payload.seo.map(sqlx::types::Json),
        is_active: payload.is_active,
    };

    let service = state
        .repo
        .update_service(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Service"))?;

    cleanup_replaced_image(
        &state.storage,
        existing.featured_image.as_deref(),
        service.featured_image.as_deref(),
    )
    .await;

    Ok(Json(service))
}

/// delete_service
///
/// [Admin Route] Soft delete: the row is deactivated and its featured image
/// removed from storage.
#[utoipa::path(
    delete,
    path = "/admin/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_service(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;
    let service = state
        .repo
        .deactivate_service(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Service"))?;

    cleanup_replaced_image(&state.storage, service.featured_image.as_deref(), None).await;
    Ok(StatusCode::NO_CONTENT)
}
