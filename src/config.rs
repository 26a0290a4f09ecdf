use crate::error::ConfigError;
use crate::validation::EmailValidator;
use crate::validation::disposable::DisposableSource;
use crate::validation::role::{RoleKeywords, RoleMatch};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration read from the environment.
///
/// | Variable | Default |
/// |---|---|
/// | `BIND_ADDRESS` | `127.0.0.1` |
/// | `PORT` | `8080` |
/// | `DNS_TIMEOUT_MS` | `3000` |
/// | `DNS_USE_SYSTEM_CONF` | `true` |
/// | `DISPOSABLE_DOMAINS_FILE` | unset |
/// | `MONGODB_URI`, `DB_NAME`, `DB_DISPOSABLE_EMAILS_COLLECTION` | unset |
/// | `DISPOSABLE_MATCH_SUBDOMAINS` | `false` |
/// | `DISPOSABLE_REFRESH_SECS` | unset (no refresh) |
/// | `ROLE_KEYWORDS` | `info,support,admin` |
/// | `ROLE_MATCH_MODE` | `substring` |
/// | `ROLE_CASE_SENSITIVE` | `true` |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub dns_timeout: Duration,
    pub dns_use_system_conf: bool,
    pub disposable_source: DisposableSource,
    pub disposable_match_subdomains: bool,
    pub disposable_refresh: Option<Duration>,
    pub role_keywords: RoleKeywords,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            dns_timeout: EmailValidator::DEFAULT_DNS_TIMEOUT,
            dns_use_system_conf: true,
            disposable_source: DisposableSource::None,
            disposable_match_subdomains: false,
            disposable_refresh: None,
            role_keywords: RoleKeywords::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(address) = var("BIND_ADDRESS") {
            config.bind_address = address.trim().to_string();
        }
        if let Some(port) = var("PORT") {
            config.port = parse_value("PORT", &port)?;
        }

        if let Some(ms) = var("DNS_TIMEOUT_MS") {
            let ms: u64 = parse_value("DNS_TIMEOUT_MS", &ms)?;
            if ms == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "DNS_TIMEOUT_MS",
                    value: ms.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.dns_timeout = Duration::from_millis(ms);
        }
        if let Some(flag) = var("DNS_USE_SYSTEM_CONF") {
            config.dns_use_system_conf = parse_bool("DNS_USE_SYSTEM_CONF", &flag)?;
        }

        config.disposable_source = match (var("DISPOSABLE_DOMAINS_FILE"), var("MONGODB_URI")) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingDisposableSources),
            (Some(path), None) => DisposableSource::File(PathBuf::from(path.trim())),
            (None, Some(uri)) => DisposableSource::MongoDb {
                uri,
                database: var("DB_NAME").ok_or(ConfigError::MissingVariable("DB_NAME"))?,
                collection: var("DB_DISPOSABLE_EMAILS_COLLECTION").ok_or(
                    ConfigError::MissingVariable("DB_DISPOSABLE_EMAILS_COLLECTION"),
                )?,
            },
            (None, None) => DisposableSource::None,
        };
        if let Some(flag) = var("DISPOSABLE_MATCH_SUBDOMAINS") {
            config.disposable_match_subdomains = parse_bool("DISPOSABLE_MATCH_SUBDOMAINS", &flag)?;
        }
        if let Some(secs) = var("DISPOSABLE_REFRESH_SECS") {
            let secs: u64 = parse_value("DISPOSABLE_REFRESH_SECS", &secs)?;
            // Zero disables the refresh
            config.disposable_refresh = (secs > 0).then_some(Duration::from_secs(secs));
        }

        let keywords = var("ROLE_KEYWORDS");
        let mode = var("ROLE_MATCH_MODE")
            .map(|mode| mode.parse::<RoleMatch>())
            .transpose()?
            .unwrap_or_default();
        let case_sensitive = var("ROLE_CASE_SENSITIVE")
            .map(|flag| parse_bool("ROLE_CASE_SENSITIVE", &flag))
            .transpose()?
            .unwrap_or(true);
        config.role_keywords = match keywords {
            Some(list) => RoleKeywords::new(list.split(','), mode, case_sensitive),
            None => RoleKeywords::new(
                RoleKeywords::default().keywords(),
                mode,
                case_sensitive,
            ),
        };

        Ok(config)
    }
}

fn parse_value<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.dns_timeout, Duration::from_secs(3));
        assert!(config.dns_use_system_conf);
        assert_eq!(config.disposable_source, DisposableSource::None);
        assert!(!config.disposable_match_subdomains);
        assert_eq!(config.disposable_refresh, None);
        assert_eq!(config.role_keywords, RoleKeywords::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("BIND_ADDRESS", "0.0.0.0"),
            ("PORT", "9000"),
            ("DNS_TIMEOUT_MS", "1500"),
            ("DNS_USE_SYSTEM_CONF", "false"),
            ("DISPOSABLE_DOMAINS_FILE", "/etc/disposable.txt"),
            ("DISPOSABLE_MATCH_SUBDOMAINS", "yes"),
            ("DISPOSABLE_REFRESH_SECS", "3600"),
            ("ROLE_KEYWORDS", "info, sales ,noreply"),
            ("ROLE_MATCH_MODE", "token"),
            ("ROLE_CASE_SENSITIVE", "0"),
        ])
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.dns_timeout, Duration::from_millis(1500));
        assert!(!config.dns_use_system_conf);
        assert_eq!(
            config.disposable_source,
            DisposableSource::File(PathBuf::from("/etc/disposable.txt"))
        );
        assert!(config.disposable_match_subdomains);
        assert_eq!(config.disposable_refresh, Some(Duration::from_secs(3600)));
        assert_eq!(config.role_keywords.keywords(), ["info", "sales", "noreply"]);
        assert_eq!(config.role_keywords.mode(), RoleMatch::Token);
        assert!(config.role_keywords.matches("NoReply"));
    }

    #[test]
    fn mongodb_source_requires_database_and_collection() {
        let err = config_from(&[("MONGODB_URI", "mongodb://localhost:27017")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable("DB_NAME")));

        let config = config_from(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("DB_NAME", "emails"),
            ("DB_DISPOSABLE_EMAILS_COLLECTION", "disposable_domains"),
        ])
        .unwrap();
        assert_eq!(
            config.disposable_source,
            DisposableSource::MongoDb {
                uri: "mongodb://localhost:27017".to_string(),
                database: "emails".to_string(),
                collection: "disposable_domains".to_string(),
            }
        );
    }

    #[test]
    fn rejects_two_disposable_sources() {
        let err = config_from(&[
            ("DISPOSABLE_DOMAINS_FILE", "/etc/disposable.txt"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingDisposableSources));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue { name: "PORT", .. })
        ));
        assert!(matches!(
            config_from(&[("DNS_TIMEOUT_MS", "0")]),
            Err(ConfigError::InvalidValue { name: "DNS_TIMEOUT_MS", .. })
        ));
        assert!(matches!(
            config_from(&[("ROLE_CASE_SENSITIVE", "maybe")]),
            Err(ConfigError::InvalidValue { name: "ROLE_CASE_SENSITIVE", .. })
        ));
        assert!(matches!(
            config_from(&[("ROLE_MATCH_MODE", "regex")]),
            Err(ConfigError::InvalidValue { name: "ROLE_MATCH_MODE", .. })
        ));
    }

    #[test]
    fn zero_refresh_disables_reload() {
        let config = config_from(&[("DISPOSABLE_REFRESH_SECS", "0")]).unwrap();
        assert_eq!(config.disposable_refresh, None);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "  "), ("ROLE_KEYWORDS", "")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.role_keywords, RoleKeywords::default());
    }
}
