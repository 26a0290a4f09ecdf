use crate::error::ConfigError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
    system_conf,
};

/// One mail exchanger returned for a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxHost {
    pub preference: u16,
    pub exchange: String,
}

/// Why an MX lookup produced nothing usable.
///
/// The validator never surfaces these to callers; they only feed the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    #[error("domain does not exist (NXDOMAIN)")]
    NxDomain,
    #[error("no MX records found")]
    NoRecords,
    #[error("lookup timed out")]
    Timeout,
    #[error("resolver error: {0}")]
    Resolver(String),
}

impl From<ResolveError> for DnsError {
    fn from(err: ResolveError) -> Self {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. }
                if *response_code == ResponseCode::NXDomain =>
            {
                DnsError::NxDomain
            }
            ResolveErrorKind::NoRecordsFound { .. } => DnsError::NoRecords,
            ResolveErrorKind::Timeout => DnsError::Timeout,
            _ => DnsError::Resolver(err.to_string()),
        }
    }
}

/// Looks up the MX records of a domain.
///
/// Implementations return the exchangers they found (possibly none) or a
/// [`DnsError`] describing the failure. Tests swap in `MockMxResolver`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MxResolver: Send + Sync {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxHost>, DnsError>;
}

/// [`MxResolver`] backed by the trust-dns async resolver.
///
/// Configured with:
/// - the caller's timeout per request
/// - a single attempt, retries are left to callers
/// - system resolver configuration, or trust-dns defaults when disabled
pub struct TrustDnsMxResolver {
    resolver: TokioAsyncResolver,
}

impl TrustDnsMxResolver {
    pub fn new(timeout: Duration, use_system_conf: bool) -> Result<Self, ConfigError> {
        let (config, mut opts) = if use_system_conf {
            system_conf::read_system_conf().map_err(|e| ConfigError::Resolver(e.to_string()))?
        } else {
            (ResolverConfig::default(), ResolverOpts::default())
        };
        opts.timeout = timeout;
        opts.attempts = 1;

        Ok(Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        })
    }
}

#[async_trait]
impl MxResolver for TrustDnsMxResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxHost>, DnsError> {
        // Fully qualified so search domains from resolv.conf are not appended
        let lookup = self.resolver.mx_lookup(format!("{domain}.")).await?;

        let mut hosts: Vec<MxHost> = lookup
            .iter()
            .map(|mx| MxHost {
                preference: mx.preference(),
                exchange: mx.exchange().to_utf8(),
            })
            .collect();
        hosts.sort_by_key(|host| host.preference);
        Ok(hosts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_classified() {
        let err = ResolveError::from(ResolveErrorKind::Timeout);
        assert_eq!(DnsError::from(err), DnsError::Timeout);
    }

    #[test]
    fn other_errors_keep_their_message() {
        let err = ResolveError::from(ResolveErrorKind::Message("upstream SERVFAIL"));
        match DnsError::from(err) {
            DnsError::Resolver(message) => assert!(message.contains("upstream SERVFAIL")),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolver_builds_without_system_conf() {
        let resolver = TrustDnsMxResolver::new(Duration::from_millis(500), false);
        assert!(resolver.is_ok());
    }

    #[tokio::test]
    async fn mock_resolver_returns_stubbed_hosts() {
        let mut resolver = MockMxResolver::new();
        resolver
            .expect_lookup_mx()
            .withf(|domain| domain == "validmx.test")
            .times(1)
            .returning(|_| {
                Ok(vec![MxHost {
                    preference: 10,
                    exchange: "mx1.validmx.test.".to_string(),
                }])
            });

        let hosts = resolver.lookup_mx("validmx.test").await.unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].preference, 10);
    }
}
