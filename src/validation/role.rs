use crate::error::ConfigError;
use std::str::FromStr;

const TOKEN_SEPARATORS: [char; 4] = ['.', '-', '_', '+'];

/// How a role keyword is compared against a local-part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleMatch {
    /// Keyword appears anywhere, so `information` matches `info`.
    #[default]
    Substring,
    /// Keyword equals one token of the local-part split on `.`, `-`, `_` and `+`.
    Token,
}

impl FromStr for RoleMatch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(RoleMatch::Substring),
            "token" => Ok(RoleMatch::Token),
            _ => Err(ConfigError::InvalidValue {
                name: "ROLE_MATCH_MODE",
                value: s.to_string(),
                reason: "expected 'substring' or 'token'".to_string(),
            }),
        }
    }
}

/// Keywords marking a local-part as a function rather than a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleKeywords {
    keywords: Vec<String>,
    mode: RoleMatch,
    case_sensitive: bool,
}

impl Default for RoleKeywords {
    fn default() -> Self {
        Self::new(["info", "support", "admin"], RoleMatch::Substring, true)
    }
}

impl RoleKeywords {
    /// Empty keywords are dropped since they would match every address.
    pub fn new<I, S>(keywords: I, mode: RoleMatch, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .map(|keyword| {
                if case_sensitive {
                    keyword
                } else {
                    keyword.to_lowercase()
                }
            })
            .collect();
        Self {
            keywords,
            mode,
            case_sensitive,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn mode(&self) -> RoleMatch {
        self.mode
    }

    pub fn matches(&self, local_part: &str) -> bool {
        let local_part = if self.case_sensitive {
            local_part.to_string()
        } else {
            local_part.to_lowercase()
        };

        match self.mode {
            RoleMatch::Substring => self
                .keywords
                .iter()
                .any(|keyword| local_part.contains(keyword.as_str())),
            RoleMatch::Token => local_part
                .split(TOKEN_SEPARATORS)
                .any(|token| self.keywords.iter().any(|keyword| keyword == token)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keywords_use_substring_case_sensitive() {
        let roles = RoleKeywords::default();
        assert_eq!(roles.keywords(), ["info", "support", "admin"]);
        assert_eq!(roles.mode(), RoleMatch::Substring);

        assert!(roles.matches("admin"));
        assert!(roles.matches("support-team"));
        assert!(roles.matches("information"));
        assert!(!roles.matches("Admin"));
        assert!(!roles.matches("jane.doe"));
    }

    #[test]
    fn token_mode_ignores_embedded_keywords() {
        let roles = RoleKeywords::new(["info", "admin"], RoleMatch::Token, true);
        assert!(roles.matches("info"));
        assert!(roles.matches("sales.info"));
        assert!(roles.matches("admin+alerts"));
        assert!(!roles.matches("information"));
        assert!(!roles.matches("sysadmin"));
    }

    #[test]
    fn case_insensitive_matching() {
        let roles = RoleKeywords::new(["Support"], RoleMatch::Substring, false);
        assert!(roles.matches("SUPPORT"));
        assert!(roles.matches("customer-support"));
    }

    #[test]
    fn empty_keywords_are_dropped() {
        let roles = RoleKeywords::new(["", "  ", "info"], RoleMatch::Substring, true);
        assert_eq!(roles.keywords(), ["info"]);
        assert!(!roles.matches("jane"));
    }

    #[test]
    fn parses_match_mode() {
        assert_eq!("substring".parse::<RoleMatch>().unwrap(), RoleMatch::Substring);
        assert_eq!(" Token ".parse::<RoleMatch>().unwrap(), RoleMatch::Token);
        assert!("regex".parse::<RoleMatch>().is_err());
    }
}
