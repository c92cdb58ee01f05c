use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    mailer,
    models::{
        ContactReceipt, ContactRequest, ContactSubmission, ListMeta, ListResponse,
        SUBMISSION_STATUSES, SubmissionStatusRequest,
    },
    repository::NewSubmission,
};

/// Max submissions per email or IP within the 24h window before the throttle
/// kicks in.
const FLOOD_LIMIT: i64 = 5;

/// submit_contact
///
/// [Public Route] Stores a contact-form submission and sends the templated
/// confirmation email in the background. Repeat submitters (same email or
/// source address, more than five in 24 hours) are throttled.
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Submission stored", body = ContactReceipt),
        (status = 429, description = "Too many submissions")
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactReceipt>), ApiError> {
    payload.validate()?;

    let email = payload.email.to_lowercase();
    let ip = super::client_ip(&headers);
    let since = Utc::now() - Duration::hours(24);
    let recent = state
        .repo
        .recent_submission_count(&email, ip.as_deref(), since)
        .await?;
    if recent > FLOOD_LIMIT {
        return Err(ApiError::RateLimited(
            "Too many submissions. Please try again later.".to_string(),
        ));
    }

    let submission = state
        .repo
        .create_submission(NewSubmission {
            name: payload.name,
            email: email.clone(),
            phone: payload.phone,
            subject: payload.subject,
            message: payload.message.clone(),
            ip_address: ip,
            user_agent: super::user_agent(&headers),
            referrer: headers
                .get(axum::http::header::REFERER)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string()),
        })
        .await?;

    // Confirmation mail is fire-and-forget: a provider outage must not fail
    // the submission.
    let mail = state.mailer.clone();
    let body = mailer::contact_confirmation_html(&payload.message);
    tokio::spawn(async move {
        if let Err(err) = mail
            .send(&[email], "Thank you for contacting us", &body)
            .await
        {
            tracing::warn!(error = err, "contact confirmation email failed");
        }
    });

    let receipt = ContactReceipt {
        submission_id: submission.id,
        submitted_at: submission.created_at,
        message: "Thank you for contacting us. We will get back to you soon!".to_string(),
    };
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Accepted query parameters for the submission inbox.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SubmissionListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// list_submissions
///
/// [Admin Route] Paginated inbox, newest first, with a status filter.
#[utoipa::path(
    get,
    path = "/admin/contact",
    params(SubmissionListQuery),
    responses((status = 200, description = "Submissions"))
)]
pub async fn list_submissions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SubmissionListQuery>,
) -> Result<Json<ListResponse<ContactSubmission>>, ApiError> {
    auth.require_admin()?;
    if let Some(status) = &query.status {
        if !SUBMISSION_STATUSES.contains(&status.as_str()) {
            return Err(ApiError::BadRequest(format!("Invalid status: {status}")));
        }
    }
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let (submissions, total) = state.repo.list_submissions(query.status, page, limit).await?;
    Ok(Json(ListResponse {
        data: submissions,
        meta: ListMeta::new(page, limit, total),
    }))
}

/// update_submission_status
///
/// [Admin Route] Moves a submission through the triage states and optionally
/// records the response sent to the visitor.
#[utoipa::path(
    patch,
    path = "/admin/contact/{id}/status",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = SubmissionStatusRequest,
    responses(
        (status = 200, description = "Updated", body = ContactSubmission),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_submission_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmissionStatusRequest>,
) -> Result<Json<ContactSubmission>, ApiError> {
    auth.require_admin()?;
    payload.validate()?;
    state
        .repo
        .respond_to_submission(id, &payload.status, payload.response)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Submission"))
}
