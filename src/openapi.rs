use utoipa::OpenApi;

/// OpenAPI Specification Documentation
///
/// Generated at compile time from the handler annotations and served at
/// `/api-docs/openapi.json`, with Swagger UI under `/swagger-ui/`.
///
/// # Endpoints
/// - Health Check: `GET /health`
/// - Email Validation: `POST /validate/email`
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::email::validate_email,
    ),
    components(
        schemas(
            crate::models::HealthResponse,
            crate::models::ValidationReport,
            crate::routes::email::ErrorResponse
        )
    ),
    tags(
        (name = "Health Check", description = "Service health monitoring endpoints"),
        (name = "Email Validation", description = "Email address validation endpoints")
    ),
    info(
        description = "Checks an email address for syntax, MX records, disposable domains and role-based local-parts",
        title = "Email Validation API",
        version = "0.3.0",
    )
)]
pub struct ApiDoc;
