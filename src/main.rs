use actix_web::{App, HttpServer, middleware::Logger, web::Data};
use email_validation_api::config::AppConfig;
use email_validation_api::openapi::ApiDoc;
use email_validation_api::telemetry;
use email_validation_api::validation::EmailValidator;
use email_validation_api::validation::disposable::{
    self, DisposableDomainSet, DisposableDomains, DisposableSource,
};
use email_validation_api::validation::dnsmx::TrustDnsMxResolver;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Email Validation Service Entry Point
///
/// Configures and launches the Actix-web HTTP server with:
/// - Environment configuration via `.env` file and process environment
/// - A trust-dns MX resolver bounded by `DNS_TIMEOUT_MS`
/// - The disposable domain list, loaded once and optionally refreshed
/// - Swagger UI for API documentation
///
/// # Endpoints
/// - Validation: `POST /validate/email?email=...`
/// - Health: `GET /health`
/// - Swagger UI: `/swagger-ui/`
/// - OpenAPI spec: `/api-docs/openapi.json`
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let config = AppConfig::from_env()?;

    let resolver = TrustDnsMxResolver::new(config.dns_timeout, config.dns_use_system_conf)?;

    let disposable_set = Arc::new(DisposableDomainSet::new(
        config.disposable_source.clone(),
        config.disposable_match_subdomains,
    ));
    let loaded = disposable_set.reload().await?;
    if *disposable_set.source() == DisposableSource::None {
        warn!("No disposable domain source configured; no address will be flagged as disposable");
    } else {
        info!(count = loaded, "Loaded disposable domain list");
    }
    if let Some(every) = config.disposable_refresh {
        disposable::spawn_refresh(Arc::clone(&disposable_set), every);
    }

    let validator = Data::new(
        EmailValidator::new(Arc::new(resolver), disposable_set.clone())
            .with_dns_timeout(config.dns_timeout)
            .with_role_keywords(config.role_keywords.clone()),
    );

    info!(
        address = %config.bind_address,
        port = config.port,
        dns_timeout_ms = config.dns_timeout.as_millis() as u64,
        disposable_domains = disposable_set.domain_count(),
        "Starting email validation service"
    );

    HttpServer::new(move || {
        let openapi = ApiDoc::openapi();

        App::new()
            .wrap(Logger::default())
            .app_data(validator.clone())
            .configure(email_validation_api::routes::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
