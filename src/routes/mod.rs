use actix_web::web;

/// # Health Check Endpoint
///
/// `GET /health` returns `status`, `timestamp` and the disposable list size.
pub mod health;

/// # Email Validation Endpoint
///
/// `POST /validate/email?email=<address>` returns a validation report.
/// Expected failures (bad syntax, missing MX records, disposable or
/// role-based addresses) are part of the report; only an unavailable
/// disposable domain source produces a 500.
pub mod email;

/// # Route Configuration
///
/// Mounts every endpoint on the application.
///
/// ```text
/// GET  /health          - Service health status
/// POST /validate/email  - Email validation endpoint
/// ```
///
/// Both handlers expect a `web::Data<EmailValidator>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(email::configure_routes);
}
