use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

/// Admin Router Module
///
/// Every content mutation lives here, nested under `/admin`. Handlers resolve
/// `AuthUser` themselves (401 without a valid session) and then call
/// `require_admin` (403 for non-admin roles).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Dashboard ---
        .route("/stats", get(handlers::stats::get_admin_stats))
        // --- Pages ---
        // Upsert merges the incoming sections over the stored document and
        // records uploaded assets at their section paths.
        .route(
            "/pages/{page_type}",
            put(handlers::pages::upsert_page).delete(handlers::pages::deactivate_page),
        )
        // --- Services ---
        .route(
            "/services",
            get(handlers::services::admin_list_services).post(handlers::services::create_service),
        )
        .route(
            "/services/{id}",
            put(handlers::services::update_service).delete(handlers::services::delete_service),
        )
        // --- Blog ---
        .route(
            "/blogs",
            get(handlers::blogs::admin_list_blogs).post(handlers::blogs::create_blog),
        )
        .route(
            "/blogs/{id}",
            patch(handlers::blogs::update_blog).delete(handlers::blogs::delete_blog),
        )
        // --- Careers & applications ---
        .route(
            "/careers",
            get(handlers::careers::admin_list_careers).post(handlers::careers::create_career),
        )
        .route(
            "/careers/{id}",
            put(handlers::careers::update_career).delete(handlers::careers::delete_career),
        )
        .route(
            "/careers/{id}/applications",
            get(handlers::careers::list_applications),
        )
        .route(
            "/applications/{id}/status",
            patch(handlers::careers::update_application_status),
        )
        // --- Contact inbox ---
        .route("/contact", get(handlers::contact::list_submissions))
        .route(
            "/contact/{id}/status",
            patch(handlers::contact::update_submission_status),
        )
        // --- Directory ---
        .route("/clients", post(handlers::clients::create_client))
        .route(
            "/clients/{id}",
            put(handlers::clients::update_client).delete(handlers::clients::delete_client),
        )
        .route("/partners", post(handlers::partners::create_partner))
        .route(
            "/partners/{id}",
            put(handlers::partners::update_partner).delete(handlers::partners::delete_partner),
        )
        // --- About ---
        .route("/about", put(handlers::about::upsert_about))
}
