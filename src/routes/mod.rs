/// Router Module Index
///
/// Routing is segregated by access tier so access control is applied at the
/// module level rather than per-handler by convention:
///
/// - `public`: anonymous reads and the public write endpoints (contact form,
///   job applications, registration/login).
/// - `authenticated`: requires a resolved `AuthUser` (any role); the media
///   upload pipeline and profile endpoint.
/// - `admin`: nested under `/admin`; every handler additionally enforces
///   `role == "admin"`.
pub mod public;

pub mod authenticated;

pub mod admin;
