/// Health endpoint payload, see [`health::HealthResponse`].
pub mod health;

/// The validation report returned for every address.
pub mod report;

pub use health::HealthResponse;
pub use report::ValidationReport;
