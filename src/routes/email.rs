use crate::models::ValidationReport;
use crate::validation::EmailValidator;
use actix_web::{HttpResponse, Responder, post, web};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateEmailQuery {
    /// Address to validate, passed through unmodified
    pub email: String,
}

/// Body of a 500 response.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// # Email Validation Endpoint
///
/// Runs the full validation pipeline on one address:
/// 1. RFC-oriented syntax check
/// 2. Domain MX record lookup
/// 3. Disposable domain check
/// 4. Role-based local-part check
///
/// ## Request
/// - Method: POST
/// - Query parameter `email`
///
/// ## Responses
/// - **200 OK**: Validation report, whatever the verdict
/// - **400 Bad Request**: `email` parameter missing
/// - **500 Internal Server Error**: Disposable domain source unavailable
///
/// ## Example
/// ```text
/// POST /validate/email?email=jane.doe@example.com
/// ```
#[utoipa::path(
    post,
    path = "/validate/email",
    params(ValidateEmailQuery),
    responses(
        (status = 200, description = "Validation report", body = ValidationReport),
        (status = 400, description = "Missing email parameter"),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "Email Validation"
)]
#[post("/validate/email")]
pub async fn validate_email(
    query: web::Query<ValidateEmailQuery>,
    validator: web::Data<EmailValidator>,
) -> impl Responder {
    match validator.validate(&query.email).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            error!(error = %e, "Error processing request");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

/// Registers the validation endpoint
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(validate_email);
}
