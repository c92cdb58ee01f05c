use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{
        APPLICATION_STATUSES, ApplicationReceipt, ApplicationStatusRequest, ApplyRequest,
        CAREER_STATUSES, Career, CreateCareerRequest, JobApplication, JobSummary, ListMeta,
        ListResponse, UpdateCareerRequest, slugify,
    },
    repository::{CareerChanges, CareerFilter, NewCareer, is_unique_violation},
    storage::sanitize_key,
};

/// Accepted query parameters for the career listings.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct CareerListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub lang: Option<String>,
}

/// list_careers
///
/// [Public Route] Published postings with open deadlines, paginated, with
/// substring search.
#[utoipa::path(
    get,
    path = "/careers",
    params(CareerListQuery),
    responses((status = 200, description = "Open postings"))
)]
pub async fn list_careers(
    State(state): State<AppState>,
    Query(query): Query<CareerListQuery>,
) -> Result<Json<ListResponse<Career>>, ApiError> {
    let filter = CareerFilter {
        language: match query.lang {
            Some(lang) => Some(super::resolve_language(Some(lang))?),
            None => None,
        },
        search: query.search,
        status: None,
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(10),
        only_open: true,
    };
    let (page, limit) = (filter.page, filter.limit);
    let (careers, total) = state.repo.list_careers(filter).await?;
    Ok(Json(ListResponse {
        data: careers,
        meta: ListMeta::new(page, limit, total),
    }))
}

/// admin_list_careers
///
/// [Admin Route] All postings regardless of status, with an optional status
/// filter.
#[utoipa::path(
    get,
    path = "/admin/careers",
    params(CareerListQuery),
    responses((status = 200, description = "All postings"))
)]
pub async fn admin_list_careers(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CareerListQuery>,
) -> Result<Json<ListResponse<Career>>, ApiError> {
    auth.require_admin()?;
    if let Some(status) = &query.status {
        if !CAREER_STATUSES.contains(&status.as_str()) {
            return Err(ApiError::BadRequest(format!("Invalid status: {status}")));
        }
    }
    let filter = CareerFilter {
        language: match query.lang {
            Some(lang) => Some(super::resolve_language(Some(lang))?),
            None => None,
        },
        search: query.search,
        status: query.status,
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(10),
        only_open: false,
    };
    let (page, limit) = (filter.page, filter.limit);
    let (careers, total) = state.repo.list_careers(filter).await?;
    Ok(Json(ListResponse {
        data: careers,
        meta: ListMeta::new(page, limit, total),
    }))
}

/// get_career
///
/// [Public Route] Single posting addressed by UUID or slug.
#[utoipa::path(
    get,
    path = "/careers/{id_or_slug}",
    params(("id_or_slug" = String, Path, description = "Posting UUID or slug")),
    responses(
        (status = 200, description = "Posting", body = Career),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_career(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<Career>, ApiError> {
    let career = match Uuid::parse_str(&id_or_slug) {
        Ok(id) => state.repo.get_career(id).await?,
        Err(_) => state.repo.get_career_by_slug(&id_or_slug).await?,
    };
    career.map(Json).ok_or_else(|| ApiError::not_found("Job posting"))
}

/// create_career
///
/// [Admin Route] Creates a posting; slug is derived from the title.
#[utoipa::path(
    post,
    path = "/admin/careers",
    request_body = CreateCareerRequest,
    responses(
        (status = 201, description = "Created", body = Career),
        (status = 409, description = "Duplicate slug")
    )
)]
pub async fn create_career(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCareerRequest>,
) -> Result<(StatusCode, Json<Career>), ApiError> {
    auth.require_admin()?;
    payload.validate()?;

    let data = NewCareer {
        language: payload.language.unwrap_or_else(|| "en".to_string()),
        slug: slugify(&payload.title),
        title: payload.title,
        department: payload.department,
        job_type: payload.job_type,
        work_type: payload.work_type,
        location: payload.location,
        experience_level: payload.experience_level,
        required_skills: payload.required_skills.unwrap_or_default(),
        preferred_skills: payload.preferred_skills.unwrap_or_default(),
        salary: payload.salary.map(sqlx::types::Json),
        description: payload.description,
        requirements: payload.requirements,
        responsibilities: payload.responsibilities,
        benefits: payload.benefits,
        application_deadline: payload.application_deadline,
        status: payload.status.unwrap_or_else(|| "draft".to_string()),
        seo: payload.seo.map(sqlx::types::Json),
    };

    let career = state.repo.create_career(data).await?;
    Ok((StatusCode::CREATED, Json(career)))
}

/// update_career
///
/// [Admin Route] Partial update; a changed title regenerates the slug.
#[utoipa::path(
    put,
    path = "/admin/careers/{id}",
    params(("id" = Uuid, Path, description = "Posting ID")),
    request_body = UpdateCareerRequest,
    responses(
        (status = 200, description = "Updated", body = Career),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_career(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCareerRequest>,
) -> Result<Json<Career>, ApiError> {
    auth.require_admin()?;
    payload.validate()?;

    let changes = CareerChanges {
        slug: payload.title.as_deref().map(slugify),
        title: payload.title,
        department: payload.department,
        job_type: payload.job_type,
        work_type: payload.work_type,
        location: payload.location,
        experience_level: payload.experience_level,
        required_skills: payload.required_skills,
        preferred_skills: payload.preferred_skills,
        salary: payload.salary.map(sqlx::types::Json),
        description: payload.description,
        requirements: payload.requirements,
        responsibilities: payload.responsibilities,
        benefits: payload.benefits,
        application_deadline: payload.application_deadline,
        status: payload.status,
        seo: payload.seo.map(sqlx::types::Json),
    };

    state
        .repo
        .update_career(id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Job posting"))
}

/// delete_career
///
/// [Admin Route] Hard delete. Applications cascade away with the posting.
#[utoipa::path(
    delete,
    path = "/admin/careers/{id}",
    params(("id" = Uuid, Path, description = "Posting ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_career(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin()?;
    if state.repo.delete_career(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Job posting"))
    }
}

/// apply_to_career
///
/// [Public Route] Submits a job application for an open posting. The resume
/// must already be uploaded through the presigned pipeline; one application
/// per (posting, email) is enforced by the database.
#[utoipa::path(
    post,
    path = "/careers/{id}/apply",
    params(("id" = Uuid, Path, description = "Posting ID")),
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application received", body = ApplicationReceipt),
        (status = 404, description = "Posting not found"),
        (status = 409, description = "Already applied")
    )
)]
pub async fn apply_to_career(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationReceipt>), ApiError> {
    payload.validate()?;

    let career = state
        .repo
        .get_career(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job posting"))?;
    if !career.is_open() {
        return Err(ApiError::BadRequest(
            "Applications for this posting are closed".to_string(),
        ));
    }

    let data = crate::repository::NewApplication {
        career_id: career.id,
        full_name: payload.full_name,
        email: payload.email.to_lowercase(),
        phone: payload.phone,
        resume_key: sanitize_key(&payload.resume_key),
        cover_letter: payload.cover_letter,
        portfolio_url: payload.portfolio_url,
        linkedin_url: payload.linkedin_url,
        ip_address: super::client_ip(&headers),
        user_agent: super::user_agent(&headers),
    };

    let application = match state.repo.create_application(data).await {
        Ok(application) => application,
        Err(err) if is_unique_violation(&err) => {
            return Err(ApiError::Conflict(
                "You have already applied to this job with this email".to_string(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    let receipt = ApplicationReceipt {
        id: application.id,
        full_name: application.full_name,
        email: application.email,
        phone: application.phone,
        resume_url: state.storage.object_url(&application.resume_key),
        status: application.status,
        source: application.source,
        created_at: application.created_at,
        job: JobSummary {
            id: career.id,
            title: career.title,
            location: career.location,
        },
    };
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// list_applications
///
/// [Admin Route] All applications for a posting, newest first.
#[utoipa::path(
    get,
    path = "/admin/careers/{id}/applications",
    params(("id" = Uuid, Path, description = "Posting ID")),
    responses((status = 200, description = "Applications", body = [JobApplication]))
)]
pub async fn list_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<JobApplication>>, ApiError> {
    auth.require_admin()?;
    Ok(Json(state.repo.list_applications(id).await?))
}

/// update_application_status
///
/// [Admin Route] Moves an application through the review pipeline.
#[utoipa::path(
    patch,
    path = "/admin/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = ApplicationStatusRequest,
    responses(
        (status = 200, description = "Updated", body = JobApplication),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_application_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplicationStatusRequest>,
) -> Result<Json<JobApplication>, ApiError> {
    auth.require_admin()?;
    if !APPLICATION_STATUSES.contains(&payload.status.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "Invalid status: {}",
            payload.status
        )));
    }
    state
        .repo
        .set_application_status(id, &payload.status)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Application"))
}
