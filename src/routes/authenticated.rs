use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Routes for any logged-in user. The `auth_middleware` layer applied in
/// `create_router` guarantees a validated `AuthUser` before these handlers
/// run; no role check happens at this tier.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /uploads/presigned
        // Entry point of the media pipeline: a short-lived, MIME-constrained
        // presigned PUT URL for direct-to-bucket upload. The returned object
        // key is what create/update payloads reference.
        .route("/uploads/presigned", post(handlers::uploads::get_presigned_upload))
        // GET /me
        // The requesting user's profile row.
        .route("/me", get(handlers::auth::get_me))
}
