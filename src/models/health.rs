use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Health Status Response
///
/// Liveness payload for the health endpoint.
///
/// ## Fields
/// - `status`: "UP" while the service accepts requests
/// - `timestamp`: RFC 3339 time of the check
/// - `disposableDomains`: size of the loaded disposable domain list
///
/// ## Example JSON
/// ```json
/// {
///   "status": "UP",
///   "timestamp": "2024-03-10T15:30:45.123456789Z",
///   "disposableDomains": 3412
/// }
/// ```
#[derive(Serialize, Debug, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub disposable_domains: usize,
}

impl HealthResponse {
    pub fn up(disposable_domains: usize) -> Self {
        Self {
            status: "UP".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            disposable_domains,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_health_response_up() {
        let response = HealthResponse::up(42);

        assert_eq!(response.status, "UP");
        assert_eq!(response.disposable_domains, 42);
        assert!(
            DateTime::parse_from_rfc3339(&response.timestamp).is_ok(),
            "Timestamp should be valid RFC3339 format"
        );
    }

    #[test]
    fn test_health_response_keys() {
        let json = serde_json::to_value(HealthResponse::up(0)).unwrap();
        assert_eq!(json["status"], "UP");
        assert_eq!(json["disposableDomains"], 0);
    }
}
