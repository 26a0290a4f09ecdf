use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DNS_ISSUE: &str = "Domain does not exist or no MX records found.";
pub const DISPOSABLE_ISSUE: &str = "Email domain is disposable.";
pub const ROLE_ISSUE: &str = "Email is role-based.";

/// # Email Validation Report
///
/// Outcome of every check run against one address, plus the final verdict.
///
/// ## Fields
/// - `isValid`: final verdict, true only when every check passed
/// - `isValidSyntax`: the address parsed
/// - `hasValidDomainAndMX`: the domain returned at least one MX record
/// - `isDisposable`: the domain is a known throwaway provider
/// - `isRoleBased`: the local-part names a role (`info`, `support`, ...)
/// - `detectedIssues`: diagnostics in check order, empty when valid
///
/// ## Example JSON
/// ```json
/// {
///   "isValid": false,
///   "isValidSyntax": true,
///   "hasValidDomainAndMX": true,
///   "isDisposable": false,
///   "isRoleBased": true,
///   "detectedIssues": ["Email is role-based."]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    is_valid: bool,
    is_valid_syntax: bool,
    #[serde(rename = "hasValidDomainAndMX")]
    has_valid_domain_and_mx: bool,
    is_disposable: bool,
    is_role_based: bool,
    detected_issues: Vec<String>,
}

impl ValidationReport {
    /// Report for an address that failed to parse; nothing else was checked.
    pub(crate) fn syntax_failure(reason: impl std::fmt::Display) -> Self {
        Self {
            is_valid: false,
            is_valid_syntax: false,
            has_valid_domain_and_mx: false,
            is_disposable: false,
            is_role_based: false,
            detected_issues: vec![format!("Invalid syntax: {reason}")],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn is_valid_syntax(&self) -> bool {
        self.is_valid_syntax
    }

    pub fn has_valid_domain_and_mx(&self) -> bool {
        self.has_valid_domain_and_mx
    }

    pub fn is_disposable(&self) -> bool {
        self.is_disposable
    }

    pub fn is_role_based(&self) -> bool {
        self.is_role_based
    }

    pub fn detected_issues(&self) -> &[String] {
        &self.detected_issues
    }
}

/// Accumulates check results for an address that passed the syntax check.
#[derive(Debug, Default)]
pub(crate) struct ReportBuilder {
    has_valid_domain_and_mx: bool,
    is_disposable: bool,
    is_role_based: bool,
    detected_issues: Vec<String>,
}

impl ReportBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn domain_and_mx(&mut self, found: bool) -> &mut Self {
        self.has_valid_domain_and_mx = found;
        if !found {
            self.detected_issues.push(DNS_ISSUE.to_string());
        }
        self
    }

    pub(crate) fn disposable(&mut self, disposable: bool) -> &mut Self {
        self.is_disposable = disposable;
        if disposable {
            self.detected_issues.push(DISPOSABLE_ISSUE.to_string());
        }
        self
    }

    pub(crate) fn role_based(&mut self, role_based: bool) -> &mut Self {
        self.is_role_based = role_based;
        if role_based {
            self.detected_issues.push(ROLE_ISSUE.to_string());
        }
        self
    }

    /// Applies the verdict: syntax AND mx AND NOT disposable AND NOT role-based.
    pub(crate) fn finish(self) -> ValidationReport {
        let is_valid = self.has_valid_domain_and_mx && !self.is_disposable && !self.is_role_based;
        let detected_issues = if is_valid {
            Vec::new()
        } else {
            self.detected_issues
        };

        ValidationReport {
            is_valid,
            is_valid_syntax: true,
            has_valid_domain_and_mx: self.has_valid_domain_and_mx,
            is_disposable: self.is_disposable,
            is_role_based: self.is_role_based,
            detected_issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut builder = ReportBuilder::new();
        builder.domain_and_mx(true).disposable(false).role_based(true);
        let report = builder.finish();

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "isValid": false,
                "isValidSyntax": true,
                "hasValidDomainAndMX": true,
                "isDisposable": false,
                "isRoleBased": true,
                "detectedIssues": ["Email is role-based."]
            })
        );
    }

    #[test]
    fn syntax_failure_holds_single_issue() {
        let report = ValidationReport::syntax_failure("There must be something before the @-sign.");

        assert!(!report.is_valid());
        assert!(!report.is_valid_syntax());
        assert!(!report.has_valid_domain_and_mx());
        assert_eq!(
            report.detected_issues(),
            ["Invalid syntax: There must be something before the @-sign."]
        );
    }

    #[test]
    fn issues_keep_check_order() {
        let mut builder = ReportBuilder::new();
        builder.domain_and_mx(false).disposable(true).role_based(true);
        let report = builder.finish();

        assert!(!report.is_valid());
        assert_eq!(report.detected_issues(), [DNS_ISSUE, DISPOSABLE_ISSUE, ROLE_ISSUE]);
    }

    #[test]
    fn valid_report_has_no_issues() {
        let mut builder = ReportBuilder::new();
        builder.domain_and_mx(true).disposable(false).role_based(false);
        let report = builder.finish();

        assert!(report.is_valid());
        assert!(report.is_valid_syntax());
        assert!(report.detected_issues().is_empty());
    }

    #[test]
    fn disposable_alone_fails_verdict() {
        let mut builder = ReportBuilder::new();
        builder.domain_and_mx(true).disposable(true).role_based(false);
        let report = builder.finish();

        assert!(!report.is_valid());
        assert!(report.is_disposable());
        assert_eq!(report.detected_issues(), [DISPOSABLE_ISSUE]);
    }
}
