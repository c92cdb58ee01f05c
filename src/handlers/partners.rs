use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    handlers::services::cleanup_replaced_image,
    models::{CreatePartnerRequest, Partner, UpdatePartnerRequest, slugify},
    repository::{NewPartner, PartnerChanges},
    storage::sanitize_key,
};

/// list_partners
///
/// [Public Route] Every partner, alphabetically.
#[utoipa::path(
    get,
    path = "/partners",
    responses((status = 200, description = "Partners", body = [Partner]))
)]
pub async fn list_partners(State(state): State<AppState>) -> Result<Json<Vec<Partner>>, ApiError> {
    Ok(Json(state.repo.list_partners().await?))
}

/// get_partner
///
/// [Public Route] Single partner by ID.
#[utoipa::path(
    get,
    path = "/partners/{id}",
    params(("id" = Uuid, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Partner", body = Partner),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_partner(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Partner>, ApiError> {
    state
        .repo
        .get_partner(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Partner"))
}

/// create_partner
///
/// [Admin Route] Creates a partner; slug is derived from the name when not
/// provided.
#[utoipa::path(
    post,
    path = "/admin/partners",
    request_body = CreatePartnerRequest,
    responses(
        (status = 201, description = "Created", body = Partner),
        (status = 409, description = "Duplicate slug")
    )
)]
pub async fn create_partner(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePartnerRequest>,
) -> Result<(StatusCode, Json<Partner>), ApiError> {
    auth.require_admin()?;
    payload.validate()?;

    let partner = state
        .repo
        .create_partner(NewPartner {
            slug: payload
                .slug
                .map(|slug| slugify(&slug))
                .unwrap_or_else(|| slugify(&payload.name)),
            name: payload.name,
            logo: state.storage.object_url(&sanitize_key(&payload.logo_key)),
            brief: payload.brief,
            url: payload.url,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(partner)))
}

/// update_partner
///
/// [Admin Route] Partial update; a changed name regenerates the slug, a new
/// logo replaces and deletes the stored one.
#[utoipa::path(
    put,
    path = "/admin/partners/{id}",
    params(("id" = Uuid, Path, description = "Partner ID")),
    request_body = UpdatePartnerRequest,
    responses(
        (status = 200, description = "Updated", body = Partner),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_partner(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePartnerRequest>,
) -> Result<Json<Partner>, ApiError> {
    auth.require_admin()?;

    let existing = state
        .repo
        .get_partner(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner"))?;

    let partner = state
        .repo
        .update_partner(
            id,
            PartnerChanges {
                slug: payload.name.as_deref().map(slugify),
                name: payload.name,
                logo: payload
                    .logo_key
                    .map(|key| state.storage.object_url(&sanitize_key(&key))),
                brief: payload.brief,
                url: payload.url,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Partner"))?;

    cleanup_replaced_image(&state.storage, Some(&existing.logo), Some(&partner.logo)).await;
    Ok(Json(partner))
}

/// delete_partner
///
/// [Admin Route] Removes the record and its stored logo.
#[utoipa::path(
    delete,
    path = "/admin/partners/{id}",
    params(("id" = Uuid, Path, description = "Partner ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_partner(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;
    let partner = state
        .repo
        .delete_partner(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Partner"))?;

    cleanup_replaced_image(&state.storage, Some(&partner.logo), None).await;
    Ok(StatusCode::NO_CONTENT)
}
