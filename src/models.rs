use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, FieldError};

// --- Vocabulary ---
//
// Enum-valued fields are validated strings rather than Rust enums, the same
// way the profile `role` is modeled. The accepted values live here so the
// request validators and the repository agree on them.

pub const LANGUAGES: &[&str] = &["en", "ar"];
pub const PAGE_TYPES: &[&str] = &[
    "home",
    "about",
    "services",
    "blog",
    "careers",
    "contact",
    "privacy-policy",
    "terms-conditions",
    "faq",
];
pub const BLOG_STATUSES: &[&str] = &["draft", "published", "archived"];
pub const CAREER_STATUSES: &[&str] = &["draft", "published", "closed", "archived"];
pub const DEPARTMENTS: &[&str] = &[
    "engineering",
    "design",
    "marketing",
    "sales",
    "support",
    "hr",
    "operations",
    "other",
];
pub const JOB_TYPES: &[&str] = &["full-time", "part-time", "contract", "internship", "freelance"];
pub const WORK_TYPES: &[&str] = &["on-site", "hybrid", "remote"];
pub const EXPERIENCE_LEVELS: &[&str] = &["entry", "mid", "senior", "lead", "executive"];
pub const SUBMISSION_STATUSES: &[&str] = &["new", "in-progress", "resolved", "spam"];
pub const APPLICATION_STATUSES: &[&str] = &[
    "submitted",
    "under-review",
    "shortlisted",
    "interview",
    "offered",
    "rejected",
    "withdrawn",
];

/// Derives a URL slug from a title: lowercase, runs of non-alphanumerics
/// collapsed to single dashes, no leading/trailing dash.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Minimal shape check used everywhere an email is accepted.
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

fn check_one_of(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&str>,
    allowed: &[&str],
) {
    if let Some(v) = value {
        if !allowed.contains(&v) {
            errors.push(FieldError::new(
                field,
                &format!("must be one of: {}", allowed.join(", ")),
            ));
        }
    }
}

fn finish_validation(errors: Vec<FieldError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

// --- Shared document fragments (stored as jsonb) ---

/// SEO metadata attached to every content document. Stored verbatim in a
/// jsonb column; keys stay camelCase to match the documents the dashboard
/// already holds.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Seo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

/// An uploaded file as stored inside a document: public URL plus the metadata
/// captured at upload time.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImageAsset {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub mime_type: String,
    #[ts(type = "string | null")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

// --- Profiles ---

/// A local profile row mirroring the identity provider's user record. `role`
/// drives the admin checks ("editor" or "admin").
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

// --- Pages ---

/// A per-language page document. `sections` is the free-form JSON tree the
/// merge engine operates on.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Page {
    pub id: Uuid,
    pub page_type: String,
    pub language: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    #[ts(type = "any")]
    #[schema(value_type = Object)]
    pub sections: Value,
    #[ts(type = "Seo | null")]
    #[schema(value_type = Option<Seo>)]
    pub seo: Option<Json<Seo>>,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// A file uploaded through the presigned pipeline, to be recorded at a nested
/// section path ("hero.backgroundImage", "about[image]").
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SectionUpload {
    /// Dotted (or bracketed) path inside the sections tree.
    pub path: String,
    /// Object key returned by the presigned-upload endpoint.
    pub key: String,
    pub alt: Option<String>,
    pub size: Option<i64>,
    pub mime_type: Option<String>,
}

/// Upsert payload for a page. Only the provided sections are touched; the
/// uploads are written into the merged tree afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpsertPageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    #[ts(type = "any")]
    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub uploads: Vec<SectionUpload>,
}

/// The fully-resolved document the repository persists for a page upsert,
/// produced by the handler after merging sections and placing uploads.
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub seo: Option<Json<Seo>>,
    pub sections: Value,
    pub is_active: bool,
}

// --- Services ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Service {
    pub id: Uuid,
    pub language: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub slug: String,
    pub icon: Option<String>,
    pub thumbnail: Option<String>,
    pub featured_image: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub display_order: i32,
    pub featured: bool,
    pub tags: Vec<String>,
    #[ts(type = "Seo | null")]
    #[schema(value_type = Option<Seo>)]
    pub seo: Option<Json<Seo>>,
    pub is_active: bool,
    pub views: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Trimmed service row used by the home-page services section.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ServiceCard {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
    pub thumbnail: Option<String>,
    pub slug: String,
    pub featured_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateServiceRequest {
    pub title: String,
    pub subtitle: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub thumbnail: Option<String>,
    /// Object key from the presigned-upload flow.
    pub featured_image_key: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub display_order: Option<i32>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub seo: Option<Seo>,
    pub language: Option<String>,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if self.title.len() > 200 {
            errors.push(FieldError::new("title", "Title cannot be more than 200 characters"));
        }
        check_one_of(&mut errors, "language", self.language.as_deref(), LANGUAGES);
        finish_validation(errors)
    }
}

/// Partial update; only provided fields change. A new `title` regenerates the
/// slug, a new `featured_image_key` replaces (and deletes) the stored image.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors.push(FieldError::new("title", "Title cannot be empty"));
            }
        }
        finish_validation(errors)
    }
}

// --- Blogs ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct BlogPost {
    pub id: Uuid,
    pub language: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
    pub featured_image: Option<String>,
    /// Block-editor content document.
    #[ts(type = "any")]
    #[schema(value_type = Option<Object>)]
    pub content: Option<Value>,
    pub status: String,
    #[ts(type = "string | null")]
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub reading_time: i32,
    pub slug: String,
    #[ts(type = "Seo | null")]
    #[schema(value_type = Option<Seo>)]
    pub seo: Option<Json<Seo>>,
    pub is_active: bool,
    pub views: i64,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Listing/teaser row: everything except the content document.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct BlogCard {
    pub id: Uuid,
    pub language: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
    pub featured_image: Option<String>,
    pub status: String,
    #[ts(type = "string | null")]
    pub published_at: Option<DateTime<Utc>>,
    pub slug: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateBlogRequest {
    pub title: String,
    pub subtitle: Option<String>,
    pub excerpt: String,
    pub slug: Option<String>,
    #[ts(type = "any")]
    #[schema(value_type = Option<Object>)]
    pub content: Option<Value>,
    pub thumbnail: Option<String>,
    pub featured_image_key: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub reading_time: Option<i32>,
    pub seo: Option<Seo>,
    pub language: Option<String>,
}

impl CreateBlogRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if self.title.len() > 200 {
            errors.push(FieldError::new("title", "Title cannot be more than 200 characters"));
        }
        if self.excerpt.trim().is_empty() {
            errors.push(FieldError::new("excerpt", "Excerpt is required"));
        }
        check_one_of(&mut errors, "status", self.status.as_deref(), BLOG_STATUSES);
        check_one_of(&mut errors, "language", self.language.as_deref(), LANGUAGES);
        finish_validation(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateBlogRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[ts(type = "any")]
    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
}

impl UpdateBlogRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors.push(FieldError::new("title", "Title cannot be empty"));
            }
        }
        if let Some(excerpt) = &self.excerpt {
            if excerpt.trim().is_empty() {
                errors.push(FieldError::new("excerpt", "Excerpt cannot be empty"));
            }
        }
        check_one_of(&mut errors, "status", self.status.as_deref(), BLOG_STATUSES);
        finish_validation(errors)
    }
}

// --- Careers ---

/// Salary block stored as jsonb on a posting.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Salary {
    pub min: Option<i64>,
    pub max: Option<i64>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub is_negotiable: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Career {
    pub id: Uuid,
    pub language: String,
    pub title: String,
    pub slug: String,
    pub department: String,
    pub job_type: String,
    pub work_type: String,
    pub location: String,
    pub experience_level: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    #[ts(type = "Salary | null")]
    #[schema(value_type = Option<Salary>)]
    pub salary: Option<Json<Salary>>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    #[ts(type = "string")]
    pub application_deadline: DateTime<Utc>,
    pub status: String,
    pub views: i64,
    #[ts(type = "Seo | null")]
    #[schema(value_type = Option<Seo>)]
    pub seo: Option<Json<Seo>>,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl Career {
    /// Whether applications are currently accepted.
    pub fn is_open(&self) -> bool {
        self.status == "published" && self.application_deadline >= Utc::now()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCareerRequest {
    pub title: String,
    pub department: String,
    pub job_type: String,
    pub work_type: String,
    pub location: String,
    pub experience_level: String,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub salary: Option<Salary>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    #[ts(type = "string")]
    pub application_deadline: DateTime<Utc>,
    pub status: Option<String>,
    pub seo: Option<Seo>,
    pub language: Option<String>,
}

impl CreateCareerRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Job title is required"));
        }
        if self.location.trim().is_empty() {
            errors.push(FieldError::new("location", "Location is required"));
        }
        check_one_of(&mut errors, "department", Some(&self.department), DEPARTMENTS);
        check_one_of(&mut errors, "job_type", Some(&self.job_type), JOB_TYPES);
        check_one_of(&mut errors, "work_type", Some(&self.work_type), WORK_TYPES);
        check_one_of(
            &mut errors,
            "experience_level",
            Some(&self.experience_level),
            EXPERIENCE_LEVELS,
        );
        check_one_of(&mut errors, "status", self.status.as_deref(), CAREER_STATUSES);
        check_one_of(&mut errors, "language", self.language.as_deref(), LANGUAGES);
        if let Some(salary) = &self.salary {
            if let (Some(min), Some(max)) = (salary.min, salary.max) {
                if max < min {
                    errors.push(FieldError::new(
                        "salary.max",
                        "Max salary must be greater than or equal to min salary",
                    ));
                }
            }
        }
        finish_validation(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateCareerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<Salary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[ts(type = "string | null")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
}

impl UpdateCareerRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                errors.push(FieldError::new("title", "Job title cannot be empty"));
            }
        }
        check_one_of(&mut errors, "department", self.department.as_deref(), DEPARTMENTS);
        check_one_of(&mut errors, "job_type", self.job_type.as_deref(), JOB_TYPES);
        check_one_of(&mut errors, "work_type", self.work_type.as_deref(), WORK_TYPES);
        check_one_of(
            &mut errors,
            "experience_level",
            self.experience_level.as_deref(),
            EXPERIENCE_LEVELS,
        );
        check_one_of(&mut errors, "status", self.status.as_deref(), CAREER_STATUSES);
        finish_validation(errors)
    }
}

// --- Job applications ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct JobApplication {
    pub id: Uuid,
    pub career_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Object key of the uploaded resume.
    pub resume_key: String,
    pub cover_letter: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub status: String,
    pub source: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ApplyRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Object key from the presigned-upload flow. Required.
    pub resume_key: String,
    pub cover_letter: Option<String>,
    pub portfolio_url: Option<String>,
    pub linkedin_url: Option<String>,
}

impl ApplyRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.full_name.trim().is_empty() {
            errors.push(FieldError::new("full_name", "Full name is required"));
        }
        if !looks_like_email(&self.email) {
            errors.push(FieldError::new("email", "Valid email is required"));
        }
        if self.resume_key.trim().is_empty() {
            errors.push(FieldError::new("resume_key", "Resume is required"));
        }
        finish_validation(errors)
    }
}

/// Summary of the posting an application belongs to, embedded in the receipt.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
}

/// Response body for a successful application, with the resume resolved to a
/// fetchable URL.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ApplicationReceipt {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub resume_url: String,
    pub status: String,
    pub source: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub job: JobSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ApplicationStatusRequest {
    pub status: String,
}

// --- Contact ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub response_message: Option<String>,
    #[ts(type = "string | null")]
    pub responded_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if self.name.len() > 100 {
            errors.push(FieldError::new("name", "Name cannot be more than 100 characters"));
        }
        if !looks_like_email(&self.email) {
            errors.push(FieldError::new("email", "Valid email is required"));
        }
        if self.subject.trim().is_empty() {
            errors.push(FieldError::new("subject", "Subject is required"));
        }
        if self.subject.len() > 200 {
            errors.push(FieldError::new(
                "subject",
                "Subject cannot be more than 200 characters",
            ));
        }
        if self.message.trim().is_empty() {
            errors.push(FieldError::new("message", "Message is required"));
        }
        if self.message.len() > 5000 {
            errors.push(FieldError::new(
                "message",
                "Message cannot be more than 5000 characters",
            ));
        }
        finish_validation(errors)
    }
}

/// Acknowledgement returned to the site visitor.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ContactReceipt {
    pub submission_id: Uuid,
    #[ts(type = "string")]
    pub submitted_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SubmissionStatusRequest {
    pub status: String,
    pub response: Option<String>,
}

impl SubmissionStatusRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        check_one_of(&mut errors, "status", Some(&self.status), SUBMISSION_STATUSES);
        finish_validation(errors)
    }
}

// --- Clients & partners ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub logo: String,
    pub brief: String,
    pub url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateClientRequest {
    pub name: String,
    /// Object key of the uploaded logo.
    pub logo_key: String,
    pub brief: String,
    pub url: Option<String>,
}

impl CreateClientRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if self.name.len() > 200 {
            errors.push(FieldError::new("name", "Name cannot be more than 200 characters"));
        }
        if self.logo_key.trim().is_empty() {
            errors.push(FieldError::new("logo_key", "Logo is required"));
        }
        if self.brief.trim().is_empty() {
            errors.push(FieldError::new("brief", "Brief is required"));
        }
        finish_validation(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateClientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brief: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo: String,
    pub brief: Option<String>,
    pub url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePartnerRequest {
    pub name: String,
    pub slug: Option<String>,
    pub logo_key: String,
    pub brief: Option<String>,
    pub url: Option<String>,
}

impl CreatePartnerRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if self.name.len() > 200 {
            errors.push(FieldError::new("name", "Name cannot be more than 200 characters"));
        }
        if self.logo_key.trim().is_empty() {
            errors.push(FieldError::new("logo_key", "Logo is required"));
        }
        finish_validation(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePartnerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brief: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// --- About ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct About {
    pub id: Uuid,
    pub language: String,
    pub title: String,
    #[ts(type = "ImageAsset | null")]
    #[schema(value_type = Option<ImageAsset>)]
    pub image: Option<Json<ImageAsset>>,
    #[ts(type = "any")]
    #[schema(value_type = Option<Object>)]
    pub content: Option<Value>,
    #[ts(type = "any")]
    #[schema(value_type = Object)]
    pub features: Value,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpsertAboutRequest {
    pub title: String,
    #[ts(type = "any")]
    #[schema(value_type = Option<Object>)]
    pub content: Option<Value>,
    #[ts(type = "any")]
    #[schema(value_type = Option<Object>)]
    pub features: Option<Value>,
    /// Replacement image uploaded through the presigned pipeline.
    pub image: Option<SectionUpload>,
}

impl UpsertAboutRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        finish_validation(errors)
    }
}

// --- Auth ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

// --- Uploads ---

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PresignedUploadRequest {
    /// Original filename; only the extension is used.
    #[schema(example = "brochure.pdf")]
    pub filename: String,
    /// MIME type the upload will be constrained to.
    #[schema(example = "application/pdf")]
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PresignedUploadResponse {
    /// Time-limited URL for the PUT request.
    pub upload_url: String,
    /// Object key to reference the file in later requests.
    pub resource_key: String,
    /// Public URL the file is served from once uploaded.
    pub public_url: String,
}

// --- Lists & dashboard ---

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ListMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl ListMeta {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

/// Envelope for paginated collections.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ListResponse<T: TS> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

/// Counters for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DashboardStats {
    pub total_pages: i64,
    pub total_services: i64,
    pub total_blogs: i64,
    pub total_careers: i64,
    pub new_submissions: i64,
    pub submitted_applications: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("Senior Rust Engineer!"), "senior-rust-engineer");
        assert_eq!(slugify("  Hello -- World  "), "hello-world");
        assert_eq!(slugify("Árbol 2024"), "rbol-2024");
    }

    #[test]
    fn email_shape_check() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("nope"));
    }

    #[test]
    fn list_meta_pagination_math() {
        let meta = ListMeta::new(2, 10, 35);
        assert_eq!(meta.total_pages, 4);
        assert!(meta.has_next);
        assert!(meta.has_previous);

        let last = ListMeta::new(4, 10, 35);
        assert!(!last.has_next);
    }

    #[test]
    fn career_validation_rejects_bad_enums() {
        let req = CreateCareerRequest {
            title: "Engineer".to_string(),
            department: "astrology".to_string(),
            job_type: "full-time".to_string(),
            work_type: "remote".to_string(),
            location: "Riyadh".to_string(),
            experience_level: "senior".to_string(),
            application_deadline: Utc::now(),
            ..Default::default()
        };
        let err = req.validate().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert!(fields.iter().any(|f| f.field == "department"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn salary_range_is_checked() {
        let req = CreateCareerRequest {
            title: "Engineer".to_string(),
            department: "engineering".to_string(),
            job_type: "full-time".to_string(),
            work_type: "remote".to_string(),
            location: "Riyadh".to_string(),
            experience_level: "senior".to_string(),
            application_deadline: Utc::now(),
            salary: Some(Salary {
                min: Some(9000),
                max: Some(4000),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn partial_update_omits_none_fields() {
        let patch = UpdateServiceRequest {
            title: Some("New Title".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert!(json.contains("New Title"));
        assert!(!json.contains("excerpt"));
    }

    #[test]
    fn seo_serializes_camel_case() {
        let seo = Seo {
            meta_title: Some("T".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&seo).unwrap();
        assert!(json.contains("metaTitle"));
        assert!(!json.contains("meta_title"));
    }
}
