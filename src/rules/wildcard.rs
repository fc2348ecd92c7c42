//! Wildcard patterns for string matchers.
//!
//! A pattern without `*` is an exact comparison against the URL href. Otherwise
//! `*` matches any run of characters (non-greedy), `\*` is a literal asterisk,
//! and a pattern that names no scheme implicitly accepts the common ones, so
//! `example.com*` matches both `https://example.com/x` and `mailto:example.com`.

use crate::host::Host;
use regex::{Regex, RegexBuilder};
use tracing::warn;

const IMPLICIT_SCHEMES: &str = "(?:https?:|ftp:|mailto:|file:|tel:|sms:|data:)?(?://)?";

#[derive(Debug, Clone)]
pub enum WildcardPattern {
    Never,
    Exact(String),
    Regex(Regex),
}

impl WildcardPattern {
    /// Compile a pattern. Compilation failures degrade to a pattern that never
    /// matches and are reported to the host.
    pub fn compile(pattern: &str, host: &dyn Host) -> Self {
        match Self::try_compile(pattern) {
            Ok(compiled) => compiled,
            Err(source) => {
                warn!(pattern, error = %source, "Invalid wildcard pattern");
                host.log(&format!("Invalid wildcard pattern: {} ({})", pattern, source));
                WildcardPattern::Never
            }
        }
    }

    pub fn try_compile(pattern: &str) -> Result<Self, regex::Error> {
        if pattern.is_empty() {
            return Ok(WildcardPattern::Never);
        }
        if !pattern.contains('*') {
            return Ok(WildcardPattern::Exact(pattern.to_string()));
        }

        RegexBuilder::new(&to_regex_source(pattern))
            .case_insensitive(true)
            .build()
            .map(WildcardPattern::Regex)
    }

    pub fn is_match(&self, href: &str) -> bool {
        match self {
            WildcardPattern::Never => false,
            WildcardPattern::Exact(expected) => expected == href,
            WildcardPattern::Regex(re) => re.is_match(href),
        }
    }
}

/// Translate a wildcard pattern into an anchored regular expression.
pub(crate) fn to_regex_source(pattern: &str) -> String {
    let mut body = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();
    let mut buf = [0u8; 4];

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'*') => {
                chars.next();
                body.push_str(r"\*");
            }
            '*' => body.push_str(".*?"),
            _ => body.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }

    let mut source = String::from("^");
    if !starts_with_scheme(pattern) {
        if !pattern.starts_with('*') {
            source.push_str(IMPLICIT_SCHEMES);
        }
        source.push_str(&body);
    } else {
        source.push_str(&body);
        if pattern.ends_with("//") {
            source.push_str(".*");
        }
    }
    source.push('$');
    source
}

/// `true` for patterns opening with a `word:` scheme token.
fn starts_with_scheme(pattern: &str) -> bool {
    let scheme_len = pattern
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .count();
    scheme_len > 0 && pattern[scheme_len..].starts_with(':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    fn matches(pattern: &str, href: &str) -> bool {
        WildcardPattern::compile(pattern, &RecordingHost::new()).is_match(href)
    }

    #[test]
    fn test_protocol_free_pattern_matches_common_schemes() {
        let pattern = "example.com*";
        assert!(matches(pattern, "https://example.com"));
        assert!(matches(pattern, "http://example.com"));
        assert!(matches(pattern, "mailto:example.com"));
        assert!(matches(pattern, "ftp://example.com"));
        assert!(matches(pattern, "https://example.com/path"));
        assert!(matches(pattern, "https://example.com?query=123"));
        assert!(matches(pattern, "https://example.com#fragment"));

        assert!(!matches(pattern, "https://notexample.com"));
        assert!(!matches(pattern, "https://sub.different.com"));
    }

    #[test]
    fn test_wildcard_positions() {
        assert!(matches("*.example.com", "https://sub.example.com"));
        assert!(matches("*.example.com", "https://another.sub.example.com"));
        assert!(!matches("*.example.com", "https://example.com"));

        assert!(matches("example.*/path", "https://example.org/path"));
        assert!(!matches("example.*/path", "https://example.com/other"));

        assert!(matches("*.example.*/path/*", "https://sub.example.org/path/foo/bar"));
        assert!(!matches("*.example.*/path/*", "https://sub.example.com/other/test"));
    }

    #[test]
    fn test_escaped_asterisks() {
        assert!(matches(r"example\*.com", "https://example*.com"));
        assert!(!matches(r"example\*.com", "https://example.com"));

        assert!(matches(r"*example\*.com/*", "https://test.example*.com/path"));
        assert!(!matches(r"*example\*.com/*", "https://example.com/path"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("example.com/path?*", "https://example.com/path?query=123"));
        assert!(!matches("example.com/path?*", "https://example.com/path"));
        assert!(!matches("example.com*", "https://exampleXcom/"));
        assert!(matches("*.com/*#*", "https://sub.example.com/path?query=123#fragment"));
    }

    #[test]
    fn test_scheme_patterns() {
        assert!(matches("https://*.github.io/*", "https://user1.github.io/repo"));
        assert!(!matches("https://*.github.io/*", "https://github.io/test"));
        assert!(matches("https://*", "https://example.com/"));
        assert!(!matches("https://*", "http://example.com/"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("*.GOOGLE.*", "https://mail.google.com"));
    }

    #[test]
    fn test_exact_and_empty_patterns() {
        assert!(matches("https://example.com", "https://example.com"));
        assert!(!matches("https://example.com", "http://example.com"));
        assert!(!matches("https://example.com", "https://example.com/"));
        assert!(!matches("", ""));
        assert!(!matches("", "https://example.com/"));
    }

    #[test]
    fn test_malformed_looking_pattern_does_not_panic() {
        assert!(!matches("[invalid.pattern", "https://example.com"));
        assert!(!matches("[invalid*", "https://example.com"));
        assert!(matches("[invalid*", "https://[invalid.example"));
    }

    #[test]
    fn test_oversized_pattern_never_matches_and_reports() {
        let host = RecordingHost::new();
        let pattern = "a*".repeat(200_000);

        let compiled = WildcardPattern::compile(&pattern, &host);
        assert!(matches!(compiled, WildcardPattern::Never));
        assert!(!compiled.is_match("https://aaaa.example/"));

        let logs = host.logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].starts_with("Invalid wildcard pattern: a*a*"));
    }

    #[test]
    fn test_regex_source_shape() {
        assert_eq!(
            to_regex_source("example.com*"),
            format!("^{}example\\.com.*?$", IMPLICIT_SCHEMES)
        );
        assert_eq!(to_regex_source("*.com"), "^.*?\\.com$");
        assert_eq!(to_regex_source("https://a*//"), "^https://a.*?//.*$");
    }
}
