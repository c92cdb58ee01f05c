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
    models::{Client, CreateClientRequest, UpdateClientRequest},
    repository::{ClientChanges, NewClient},
    storage::sanitize_key,
};

/// list_clients
///
/// [Public Route] Every client, alphabetically.
#[utoipa::path(
    get,
    path = "/clients",
    responses((status = 200, description = "Clients", body = [Client]))
)]
pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.repo.list_clients().await?))
}

/// get_client
///
/// [Public Route] Single client by ID.
#[utoipa::path(
    get,
    path = "/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client", body = Client),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, ApiError> {
    state
        .repo
        .get_client(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Client"))
}

/// create_client
///
/// [Admin Route] Creates a client record; the logo arrives as an object key.
#[utoipa::path(
    post,
    path = "/admin/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Created", body = Client),
        (status = 409, description = "Duplicate name")
    )
)]
pub async fn create_client(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    auth.require_admin()?;
    payload.validate()?;

    let client = state
        .repo
        .create_client(NewClient {
            name: payload.name,
            logo: state.storage.object_url(&sanitize_key(&payload.logo_key)),
            brief: payload.brief,
            url: payload.url,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// update_client
///
/// [Admin Route] Partial update; a new logo replaces and deletes the old one.
#[utoipa::path(
    put,
    path = "/admin/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Updated", body = Client),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_client(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    auth.require_admin()?;

    let existing = state
        .repo
        .get_client(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client"))?;

    let client = state
        .repo
        .update_client(
            id,
            ClientChanges {
                name: payload.name,
                logo: payload
                    .logo_key
                    .map(|key| state.storage.object_url(&sanitize_key(&key))),
                brief: payload.brief,
                url: payload.url,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Client"))?;

    cleanup_replaced_image(&state.storage, Some(&existing.logo), Some(&client.logo)).await;
    Ok(Json(client))
}

/// delete_client
///
/// [Admin Route] Removes the record and its stored logo.
#[utoipa::path(
    delete,
    path = "/admin/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_client(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;
    let client = state
        .repo
        .delete_client(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client"))?;

    cleanup_replaced_image(&state.storage, Some(&client.logo), None).await;
    Ok(StatusCode::NO_CONTENT)
}
