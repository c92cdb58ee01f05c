use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without authentication. Every data-returning handler
/// here goes through repository queries that enforce visibility (`is_active`,
/// `status = 'published'`, open deadlines) so hidden content never leaks to
/// anonymous clients.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for monitors and load balancers.
        .route("/health", get(|| async { "ok" }))
        // --- Pages ---
        // GET /pages/home is served by the same handler and composed from
        // defaults, the About document, and featured-content back-fill.
        .route("/pages/{page_type}", get(handlers::pages::get_page))
        .route("/pages/id/{id}", get(handlers::pages::get_page_by_id))
        // --- Services ---
        .route("/services", get(handlers::services::list_services))
        .route("/services/{slug}", get(handlers::services::get_service))
        // --- Blog ---
        .route("/blogs", get(handlers::blogs::list_blogs))
        .route("/blogs/{slug}", get(handlers::blogs::get_blog))
        // --- Careers ---
        // Listing shows open postings only; the detail route accepts a UUID
        // or a slug; applications check the posting is still open.
        .route("/careers", get(handlers::careers::list_careers))
        .route("/careers/{id_or_slug}", get(handlers::careers::get_career))
        .route("/careers/{id}/apply", post(handlers::careers::apply_to_career))
        // --- About ---
        .route("/about", get(handlers::about::get_about))
        // --- Directory ---
        .route("/clients", get(handlers::clients::list_clients))
        .route("/clients/{id}", get(handlers::clients::get_client))
        .route("/partners", get(handlers::partners::list_partners))
        .route("/partners/{id}", get(handlers::partners::get_partner))
        // --- Contact ---
        // Stores the submission, throttles flooding, and sends the
        // confirmation email in the background.
        .route("/contact", post(handlers::contact::submit_contact))
        // --- Identity ---
        // Both delegate to the external identity provider and keep the local
        // profiles table in sync.
        .route("/auth/register", post(handlers::auth::register_user))
        .route("/auth/login", post(handlers::auth::login))
}
