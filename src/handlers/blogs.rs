use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    handlers::services::cleanup_replaced_image,
    models::{BlogCard, BlogPost, CreateBlogRequest, UpdateBlogRequest, slugify},
    repository::{BlogChanges, BlogFilter, NewBlogPost},
    storage::sanitize_key,
};

/// Accepted query parameters for the blog listings.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct BlogListQuery {
    pub tag: Option<String>,
    pub search: Option<String>,
    pub lang: Option<String>,
}

/// list_blogs
///
/// [Public Route] Published posts for a language, newest first, with tag and
/// substring search filters. Content documents are not included; fetch the
/// post by slug for the full body.
#[utoipa::path(
    get,
    path = "/blogs",
    params(BlogListQuery),
    responses((status = 200, description = "Published posts", body = [BlogCard]))
)]
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<Vec<BlogCard>>, ApiError> {
    let filter = BlogFilter {
        language: super::resolve_language(query.lang)?,
        tag: query.tag,
        search: query.search,
        include_unpublished: false,
    };
    Ok(Json(state.repo.list_blog_cards(filter).await?))
}

/// admin_list_blogs
///
/// [Admin Route] Same listing including drafts and archived posts.
#[utoipa::path(
    get,
    path = "/admin/blogs",
    params(BlogListQuery),
    responses((status = 200, description = "All posts", body = [BlogCard]))
)]
pub async fn admin_list_blogs(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<Vec<BlogCard>>, ApiError> {
    auth.require_admin()?;
    let filter = BlogFilter {
        language: super::resolve_language(query.lang)?,
        tag: query.tag,
        search: query.search,
        include_unpublished: true,
    };
    Ok(Json(state.repo.list_blog_cards(filter).await?))
}

/// get_blog
///
/// [Public Route] Single published post by slug and language. Each hit
/// increments the view counter.
#[utoipa::path(
    get,
    path = "/blogs/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post", body = BlogPost),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<super::LangQuery>,
) -> Result<Json<BlogPost>, ApiError> {
    let language = super::resolve_language(query.lang)?;
    state
        .repo
        .get_blog_by_slug(&slug, &language)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No blog post found with that slug".to_string()))
}

/// create_blog
///
/// [Admin Route] Creates a post. Defaults to draft; creating directly as
/// published stamps `published_at` immediately.
#[utoipa::path(
    post,
    path = "/admin/blogs",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Created", body = BlogPost),
        (status = 409, description = "Duplicate slug")
    )
)]
pub async fn create_blog(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    auth.require_admin()?;
    payload.validate()?;

    let status = payload.status.unwrap_or_else(|| "draft".to_string());
    let data = NewBlogPost {
        language: payload.language.unwrap_or_else(|| "en".to_string()),
        slug: payload
            .slug
            .map(|slug| slugify(&slug))
            .unwrap_or_else(|| slugify(&payload.title)),
        title: payload.title,
        subtitle: payload.subtitle,
        excerpt: Some(payload.excerpt),
        thumbnail: payload.thumbnail,
        featured_image: payload
            .featured_image_key
            .map(|key| state.storage.object_url(&sanitize_key(&key))),
        content: payload.content,
        published_at: (status == "published").then(Utc::now),
        status,
        tags: payload.tags.unwrap_or_default(),
        reading_time: payload.reading_time.unwrap_or(5),
        seo: payload.seo.map(sqlx::types::Json),
    };

    let post = state.repo.create_blog(data).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// update_blog
///
/// [Admin Route] Partial update. The first transition to `published` stamps
/// `published_at`; a replaced featured image is deleted from storage.
#[utoipa::path(
    patch,
    path = "/admin/blogs/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Updated", body = BlogPost),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_blog(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlogRequest>,
) -> Result<Json<BlogPost>, ApiError> {
    auth.require_admin()?;
    payload.validate()?;

    let existing = state
        .repo
        .get_blog(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No blog post found with that ID".to_string()))?;

    let changes = BlogChanges {
        title: payload.title,
        subtitle: payload.subtitle,
        excerpt: payload.excerpt,
        thumbnail: payload.thumbnail,
        featured_image: payload
            .featured_image_key
            .map(|key| state.storage.object_url(&sanitize_key(&key))),
        content: payload.content,
        status: payload.status,
        tags: payload.tags,
        reading_time: payload.reading_time,
        seo: payload.seo.map(sqlx::types::Json),
    };

    let post = state
        .repo
        .update_blog(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("No blog post found with that ID".to_string()))?;

    cleanup_replaced_image(
        &state.storage,
        existing.featured_image.as_deref(),
        post.featured_image.as_deref(),
    )
    .await;

    Ok(Json(post))
}

/// delete_blog
///
/// [Admin Route] Hard delete; the featured image is removed from storage.
#[utoipa::path(
    delete,
    path = "/admin/blogs/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_blog(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;
    let post = state
        .repo
        .delete_blog(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No blog post found with that ID".to_string()))?;

    cleanup_replaced_image(&state.storage, post.featured_image.as_deref(), None).await;
    Ok(StatusCode::NO_CONTENT)
}
