//! The email validation pipeline.
//!
//! Checks run in a fixed order: syntax, domain MX records, disposable domain,
//! role-based local-part. A syntax failure ends the pipeline before any
//! network traffic; every later check always runs so the report is complete.

/// Looks up MX records for a domain through an injectable [`dnsmx::MxResolver`].
pub mod dnsmx;

/// Known disposable domains, loaded from a file or MongoDB.
pub mod disposable;

/// Role keyword matching for local-parts.
pub mod role;

/// RFC 5321/5322 address parsing.
///
/// # Examples
/// ```
/// use email_validation_api::validation::syntax::parse_email;
///
/// assert!(parse_email("user.name+tag@example.com").is_ok());
/// assert!(parse_email("invalid@ex_mple.com").is_err());
/// ```
pub mod syntax;


use crate::error::ValidationError;
use crate::models::report::{ReportBuilder, ValidationReport};
use disposable::DisposableDomains;
use dnsmx::{DnsError, MxResolver};
use role::RoleKeywords;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs every check against an address and aggregates the verdict.
///
/// Holds no per-request state, so one instance is shared by all workers.
pub struct EmailValidator {
    resolver: Arc<dyn MxResolver>,
    disposable: Arc<dyn DisposableDomains>,
    roles: RoleKeywords,
    dns_timeout: Duration,
}

impl EmailValidator {
    pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(resolver: Arc<dyn MxResolver>, disposable: Arc<dyn DisposableDomains>) -> Self {
        Self {
            resolver,
            disposable,
            roles: RoleKeywords::default(),
            dns_timeout: Self::DEFAULT_DNS_TIMEOUT,
        }
    }

    pub fn with_role_keywords(mut self, roles: RoleKeywords) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_dns_timeout(mut self, dns_timeout: Duration) -> Self {
        self.dns_timeout = dns_timeout;
        self
    }

    pub fn disposable_domain_count(&self) -> usize {
        self.disposable.domain_count()
    }

    /// Validates one address.
    ///
    /// Bad syntax and DNS failures are recorded in the returned report. An
    /// `Err` means the disposable domain source itself is broken.
    ///
    /// # Examples
    /// ```no_run
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// use email_validation_api::validation::EmailValidator;
    /// use email_validation_api::validation::disposable::DisposableDomainSet;
    /// use email_validation_api::validation::dnsmx::TrustDnsMxResolver;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let resolver = TrustDnsMxResolver::new(Duration::from_secs(3), true)?;
    /// let disposable = DisposableDomainSet::from_domains(["tempbox.test"], false);
    /// let validator = EmailValidator::new(Arc::new(resolver), Arc::new(disposable));
    ///
    /// let report = validator.validate("jane.doe@example.com").await?;
    /// println!("valid: {}", report.is_valid());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn validate(&self, email: &str) -> Result<ValidationReport, ValidationError> {
        let address = match syntax::parse_email(email) {
            Ok(address) => address,
            Err(reason) => {
                debug!(%reason, "Syntax check failed");
                return Ok(ValidationReport::syntax_failure(reason));
            }
        };

        let mut builder = ReportBuilder::new();
        builder.domain_and_mx(self.has_mx_records(address.domain()).await);
        builder.disposable(self.disposable.contains(address.domain())?);
        builder.role_based(self.roles.matches(address.local_part()));
        let report = builder.finish();

        info!(
            domain = address.domain(),
            valid = report.is_valid(),
            issues = report.detected_issues().len(),
            "Email validated"
        );
        Ok(report)
    }

    /// Every failure, including hitting the timeout, counts as "no MX".
    async fn has_mx_records(&self, domain: &str) -> bool {
        let outcome =
            match tokio::time::timeout(self.dns_timeout, self.resolver.lookup_mx(domain)).await {
                Ok(Ok(hosts)) if hosts.is_empty() => Err(DnsError::NoRecords),
                Ok(result) => result,
                Err(_) => Err(DnsError::Timeout),
            };

        match outcome {
            Ok(hosts) => {
                debug!(domain, mx_count = hosts.len(), "MX records found");
                true
            }
            Err(e) => {
                warn!(domain, error = %e, "MX lookup failed");
                false
            }
        }
    }
}
