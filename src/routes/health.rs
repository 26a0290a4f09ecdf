use crate::models::HealthResponse;
use crate::validation::EmailValidator;
use actix_web::{HttpResponse, Responder, get, web};

/// # Health Check Endpoint
///
/// Returns the service status, a timestamp and the size of the loaded
/// disposable domain list.
///
/// ## Response
///
/// - **200 OK**: Service is healthy
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "UP",
///   "timestamp": "2023-10-05T12:34:56.789Z",
///   "disposableDomains": 3412
/// }
/// ```
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "Health Check"
)]
#[get("/health")]
pub async fn health(validator: web::Data<EmailValidator>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::up(validator.disposable_domain_count()))
}

/// Registers the health endpoint
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::disposable::DisposableDomainSet;
    use crate::validation::dnsmx::MockMxResolver;
    use actix_web::{App, test};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_endpoint() {
        let mut resolver = MockMxResolver::new();
        resolver.expect_lookup_mx().never();
        let validator = EmailValidator::new(
            Arc::new(resolver),
            Arc::new(DisposableDomainSet::from_domains(
                ["tempbox.test", "burner.test"],
                false,
            )),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(validator))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let health_response: HealthResponse = test::read_body_json(resp).await;
        assert_eq!(health_response.status, "UP");
        assert_eq!(health_response.disposable_domains, 2);
        assert!(!health_response.timestamp.is_empty());
    }
}
