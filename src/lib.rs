use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod newsletter;
pub mod repository;
pub mod sections;
pub mod storage;

// Routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Core state types for the binary entry point and integration tests.
pub use config::AppConfig;
pub use mailer::{HttpMailer, MailerState, MockMailer};
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// Aggregates every annotated handler and schema into the OpenAPI document
/// served at `/api-docs/openapi.json` (browsable at `/swagger-ui`).
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::pages::get_page, handlers::pages::get_page_by_id,
        handlers::pages::upsert_page, handlers::pages::deactivate_page,
        handlers::services::list_services, handlers::services::get_service,
        handlers::services::admin_list_services, handlers::services::create_service,
        handlers::services::update_service, handlers::services::delete_service,
        handlers::blogs::list_blogs, handlers::blogs::get_blog,
        handlers::blogs::admin_list_blogs, handlers::blogs::create_blog,
        handlers::blogs::update_blog, handlers::blogs::delete_blog,
        handlers::careers::list_careers, handlers::careers::get_career,
        handlers::careers::admin_list_careers, handlers::careers::create_career,
        handlers::careers::update_career, handlers::careers::delete_career,
        handlers::careers::apply_to_career, handlers::careers::list_applications,
        handlers::careers::update_application_status,
        handlers::contact::submit_contact, handlers::contact::list_submissions,
        handlers::contact::update_submission_status,
        handlers::clients::list_clients, handlers::clients::get_client,
        handlers::clients::create_client, handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::partners::list_partners, handlers::partners::get_partner,
        handlers::partners::create_partner, handlers::partners::update_partner,
        handlers::partners::delete_partner,
        handlers::about::get_about, handlers::about::upsert_about,
        handlers::auth::register_user, handlers::auth::login, handlers::auth::get_me,
        handlers::uploads::get_presigned_upload,
        handlers::stats::get_admin_stats,
    ),
    components(
        schemas(
            models::Page, models::UpsertPageRequest, models::SectionUpload, models::Seo,
            models::ImageAsset, models::Service, models::ServiceCard,
            models::CreateServiceRequest, models::UpdateServiceRequest,
            models::BlogPost, models::BlogCard, models::CreateBlogRequest,
            models::UpdateBlogRequest, models::Career, models::Salary,
            models::CreateCareerRequest, models::UpdateCareerRequest,
            models::JobApplication, models::ApplyRequest, models::ApplicationReceipt,
            models::JobSummary, models::ApplicationStatusRequest,
            models::ContactSubmission, models::ContactRequest, models::ContactReceipt,
            models::SubmissionStatusRequest, models::Client, models::CreateClientRequest,
            models::UpdateClientRequest, models::Partner, models::CreatePartnerRequest,
            models::UpdatePartnerRequest, models::About, models::UpsertAboutRequest,
            models::User, models::RegisterRequest, models::LoginRequest,
            models::LoginResponse, models::PresignedUploadRequest,
            models::PresignedUploadResponse, models::ListMeta, models::DashboardStats,
        )
    ),
    tags(
        (name = "cms", description = "Corporate website CMS API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding every application service and
/// the immutable configuration, shared across all requests.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer, behind the `Repository` trait.
    pub repo: RepositoryState,
    /// Object storage, behind the `StorageService` trait.
    pub storage: StorageState,
    /// Outbound email, behind the `Mailer` trait.
    pub mailer: MailerState,
    /// Loaded, immutable environment configuration.
    pub config: AppConfig,
}

// FromRef implementations let handlers and extractors pull individual
// components out of the shared state.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for MailerState {
    fn from_ref(app_state: &AppState) -> MailerState {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Gate for the authenticated route tier. Extracting `AuthUser` performs the
/// full JWT validation and profile lookup; failure rejects the request with
/// 401 before any handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Swagger UI + OpenAPI document.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware.
        .merge(public::public_routes())
        // Authenticated routes: gated by the AuthUser extractor.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Admin routes: nested under /admin; the role check happens inside
        // the handlers after AuthUser resolution.
        .nest("/admin", admin::admin_routes())
        .with_state(state);

    // Observability and correlation layers, outermost.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: includes the generated `x-request-id` so
/// every log line of a request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
