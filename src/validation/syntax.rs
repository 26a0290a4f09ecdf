use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use trust_dns_resolver::proto::rr::domain::Label;

const MAX_ADDRESS_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// Reason an address was rejected by [`parse_email`].
///
/// The `Display` text is what ends up after `"Invalid syntax: "` in a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("The email address is empty.")]
    Empty,
    #[error("The email address is too long ({0} characters, at most 254 are allowed).")]
    TooLong(usize),
    #[error("The email address is not valid. It must have exactly one @-sign.")]
    MissingAt,
    #[error("The email address has more than one unquoted @-sign.")]
    MultipleAt,
    #[error("There must be something before the @-sign.")]
    EmptyLocalPart,
    #[error("There must be something after the @-sign.")]
    EmptyDomain,
    #[error("The part before the @-sign is too long ({0} characters, at most 64 are allowed).")]
    LocalPartTooLong(usize),
    #[error("The email address contains whitespace or a control character.")]
    Whitespace,
    #[error("The part before the @-sign cannot start or end with a period or contain two periods in a row.")]
    LocalPartDots,
    #[error("The part before the @-sign contains an invalid character: '{0}'.")]
    LocalPartCharacter(char),
    #[error("The quoted part before the @-sign is malformed.")]
    MalformedQuotedString,
    #[error("Domain literals such as [192.0.2.1] are not accepted.")]
    DomainLiteral,
    #[error("The part after the @-sign is too long ({0} characters, at most 253 are allowed).")]
    DomainTooLong(usize),
    #[error("The part after the @-sign cannot start or end with a period or contain two periods in a row.")]
    EmptyLabel,
    #[error("The domain label '{0}' is longer than 63 characters.")]
    LabelTooLong(String),
    #[error("The domain label '{0}' is not a valid internationalized domain label.")]
    InvalidIdnLabel(String),
    #[error("The domain label '{0}' cannot start or end with a hyphen.")]
    LabelHyphen(String),
    #[error("The part after the @-sign contains an invalid character: '{0}'.")]
    DomainCharacter(char),
    #[error("The part after the @-sign is not valid. It should have a period.")]
    SingleLabelDomain,
    #[error("The part after the @-sign has a numeric top-level domain.")]
    NumericTld,
}

/// A syntactically valid address split into its two halves.
///
/// The local-part is kept exactly as written; the domain is lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    local_part: String,
    domain: String,
}

impl EmailAddress {
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

impl FromStr for EmailAddress {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_email(s)
    }
}

/// Parses an email address according to RFC 5321/5322 syntax rules.
///
/// Supports dot-atom and quoted-string local parts, Unicode letters in both
/// halves, and the usual length limits. Domain literals are rejected since
/// they cannot be checked for MX records.
///
/// # Examples
/// ```
/// use email_validation_api::validation::syntax::{parse_email, SyntaxError};
///
/// let address = parse_email("Jane.Doe@Example.COM").unwrap();
/// assert_eq!(address.local_part(), "Jane.Doe");
/// assert_eq!(address.domain(), "example.com");
///
/// assert_eq!(parse_email("not-an-email"), Err(SyntaxError::MissingAt));
/// ```
pub fn parse_email(email: &str) -> Result<EmailAddress, SyntaxError> {
    if email.is_empty() {
        return Err(SyntaxError::Empty);
    }
    if email.len() > MAX_ADDRESS_LEN {
        return Err(SyntaxError::TooLong(email.len()));
    }

    let (local_part, domain) = split_at_sign(email)?;
    if local_part.is_empty() {
        return Err(SyntaxError::EmptyLocalPart);
    }
    if domain.is_empty() {
        return Err(SyntaxError::EmptyDomain);
    }

    check_local_part(local_part)?;
    let domain = normalize_domain(domain)?;

    Ok(EmailAddress {
        local_part: local_part.to_string(),
        domain,
    })
}

/// Splits on the single `@` that sits outside of any quoted section.
fn split_at_sign(email: &str) -> Result<(&str, &str), SyntaxError> {
    let mut in_quotes = false;
    let mut escaped = false;
    let mut split_index = None;

    for (i, c) in email.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '@' if !in_quotes => {
                if split_index.is_some() {
                    return Err(SyntaxError::MultipleAt);
                }
                split_index = Some(i);
            }
            _ => {}
        }
    }

    let i = split_index.ok_or(SyntaxError::MissingAt)?;
    Ok((&email[..i], &email[i + 1..]))
}

fn check_local_part(local: &str) -> Result<(), SyntaxError> {
    if local.len() > MAX_LOCAL_PART_LEN {
        return Err(SyntaxError::LocalPartTooLong(local.len()));
    }

    if local.len() >= 2 && local.starts_with('"') && local.ends_with('"') {
        check_quoted_string(&local[1..local.len() - 1])
    } else {
        check_dot_atom(local)
    }
}

/// Quoted-string content from RFC 5322 section 3.2.4, without the quotes.
///
/// Blank content and control characters (tab included) are refused.
fn check_quoted_string(content: &str) -> Result<(), SyntaxError> {
    if content.trim().is_empty() {
        return Err(SyntaxError::EmptyLocalPart);
    }
    if content.chars().any(char::is_control) {
        return Err(SyntaxError::Whitespace);
    }

    let mut escaped = false;

    for c in content.chars() {
        if escaped {
            if !matches!(c, '\\' | '"') {
                return Err(SyntaxError::MalformedQuotedString);
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Err(SyntaxError::MalformedQuotedString);
        }
    }

    if escaped {
        return Err(SyntaxError::MalformedQuotedString);
    }
    Ok(())
}

/// Dot-atom form from RFC 5322 section 3.4.1, extended to Unicode letters (RFC 6531).
fn check_dot_atom(local: &str) -> Result<(), SyntaxError> {
    if local.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SyntaxError::Whitespace);
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(SyntaxError::LocalPartDots);
    }
    match local
        .chars()
        .find(|&c| c != '.' && !c.is_alphanumeric() && !ATEXT_SPECIALS.contains(c))
    {
        Some(c) => Err(SyntaxError::LocalPartCharacter(c)),
        None => Ok(()),
    }
}

fn normalize_domain(domain: &str) -> Result<String, SyntaxError> {
    if domain.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SyntaxError::Whitespace);
    }
    if domain.starts_with('[') {
        return Err(SyntaxError::DomainLiteral);
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let mut encoded_len = labels.len() - 1;
    for label in &labels {
        encoded_len += check_label(label)?;
    }
    // DNS limits apply to the ASCII form
    if encoded_len > MAX_DOMAIN_LEN {
        return Err(SyntaxError::DomainTooLong(encoded_len));
    }

    if labels.len() < 2 {
        return Err(SyntaxError::SingleLabelDomain);
    }
    if labels
        .last()
        .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(SyntaxError::NumericTld);
    }

    Ok(domain.to_lowercase())
}

/// Validates one label and returns its length once encoded for DNS.
fn check_label(label: &str) -> Result<usize, SyntaxError> {
    if label.is_empty() {
        return Err(SyntaxError::EmptyLabel);
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(SyntaxError::LabelHyphen(label.to_string()));
    }
    if let Some(c) = label.chars().find(|&c| !c.is_alphanumeric() && c != '-') {
        return Err(SyntaxError::DomainCharacter(c));
    }

    let encoded_len = ascii_label(label)
        .ok_or_else(|| SyntaxError::InvalidIdnLabel(label.to_string()))?
        .len();
    if encoded_len > MAX_LABEL_LEN {
        return Err(SyntaxError::LabelTooLong(label.to_string()));
    }
    Ok(encoded_len)
}

/// Lowercased ASCII form of one label; Unicode labels become punycode (`xn--`).
fn ascii_label(label: &str) -> Option<String> {
    if label.is_ascii() {
        return Some(label.to_ascii_lowercase());
    }
    Label::from_utf8(label).ok().map(|label| label.to_ascii())
}

/// ASCII (IDNA) form of a domain, so `münchen.de` and `xn--mnchen-3ya.de`
/// compare equal. `None` when a label cannot be encoded.
///
/// ```
/// use email_validation_api::validation::syntax::to_ascii_domain;
///
/// assert_eq!(to_ascii_domain("Example.COM").as_deref(), Some("example.com"));
/// assert_eq!(to_ascii_domain("münchen.de").as_deref(), Some("xn--mnchen-3ya.de"));
/// ```
pub fn to_ascii_domain(domain: &str) -> Option<String> {
    domain
        .split('.')
        .map(ascii_label)
        .collect::<Option<Vec<_>>>()
        .map(|labels| labels.join("."))
}
