use crate::error::{EngineError, Result};
use crate::host::RuleContext;
use crate::rules::wildcard::WildcardPattern;
use crate::url::RouteUrl;
use crate::value::{Callback, CallbackError, Value};
use regex::Regex;

/// A single condition deciding whether a rule applies to a URL.
#[derive(Debug, Clone)]
pub enum UrlMatcher {
    /// Literal or wildcard string, compared against the href.
    Wildcard(String),
    Regex(Regex),
    /// User predicate; its result is coerced to a boolean.
    Predicate(Callback),
}

impl UrlMatcher {
    pub fn wildcard(pattern: impl Into<String>) -> Self {
        UrlMatcher::Wildcard(pattern.into())
    }

    pub fn regex(re: Regex) -> Self {
        UrlMatcher::Regex(re)
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&RouteUrl, &RuleContext<'_>) -> std::result::Result<bool, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        UrlMatcher::Predicate(Callback::new(move |url, ctx| f(url, ctx).map(Value::Bool)))
    }

    /// Errors raised by predicates are passed through untouched.
    pub fn is_match(&self, url: &RouteUrl, ctx: &RuleContext<'_>) -> Result<bool> {
        match self {
            UrlMatcher::Wildcard(pattern) if pattern.is_empty() => Ok(false),
            UrlMatcher::Wildcard(pattern) => {
                Ok(WildcardPattern::compile(pattern, ctx.host()).is_match(url.href()))
            }
            UrlMatcher::Regex(re) => Ok(re.is_match(url.href())),
            UrlMatcher::Predicate(callback) => callback
                .call(url, ctx)
                .map(|value| value.is_truthy())
                .map_err(EngineError::Callback),
        }
    }
}

/// Matchers combined with OR, evaluated left to right until one matches.
#[derive(Debug, Clone)]
pub struct UrlMatcherPattern(Vec<UrlMatcher>);

impl UrlMatcherPattern {
    pub fn any(matchers: Vec<UrlMatcher>) -> Self {
        UrlMatcherPattern(matchers)
    }

    pub fn matchers(&self) -> &[UrlMatcher] {
        &self.0
    }

    pub fn is_match(&self, url: &RouteUrl, ctx: &RuleContext<'_>) -> Result<bool> {
        for matcher in &self.0 {
            if matcher.is_match(url, ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl From<UrlMatcher> for UrlMatcherPattern {
    fn from(matcher: UrlMatcher) -> Self {
        UrlMatcherPattern(vec![matcher])
    }
}

impl From<&str> for UrlMatcherPattern {
    fn from(pattern: &str) -> Self {
        UrlMatcher::wildcard(pattern).into()
    }
}

impl From<Regex> for UrlMatcherPattern {
    fn from(re: Regex) -> Self {
        UrlMatcher::Regex(re).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::url::OpenUrlOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn url(href: &str) -> RouteUrl {
        RouteUrl::parse(href, None).unwrap()
    }

    #[test]
    fn test_exact_string_compares_href() {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);

        let matcher = UrlMatcher::wildcard("https://example.com/");
        assert!(matcher.is_match(&url("https://example.com"), &ctx).unwrap());

        let matcher = UrlMatcher::wildcard("https://example.com");
        assert!(!matcher.is_match(&url("https://example.com"), &ctx).unwrap());
    }

    #[test]
    fn test_empty_string_never_matches() {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);

        let matcher = UrlMatcher::wildcard("");
        assert!(!matcher.is_match(&url("https://example.com"), &ctx).unwrap());
    }

    #[test]
    fn test_regex_tests_href() {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);

        let matcher = UrlMatcher::regex(Regex::new("amazon").unwrap());
        assert!(matcher.is_match(&url("https://amazon.com/product"), &ctx).unwrap());
        assert!(!matcher.is_match(&url("https://example.com"), &ctx).unwrap());
    }

    #[test]
    fn test_predicate_result_is_coerced() {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);

        let matcher = UrlMatcher::Predicate(Callback::new(|url, _| Ok(url.path().into())));
        assert!(matcher.is_match(&url("https://example.com/docs"), &ctx).unwrap());

        let matcher = UrlMatcher::Predicate(Callback::new(|_, _| Ok(Value::Undefined)));
        assert!(!matcher.is_match(&url("https://example.com/docs"), &ctx).unwrap());
    }

    #[test]
    fn test_predicate_errors_propagate() {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);

        let matcher = UrlMatcher::predicate(|_, _| Err("predicate exploded".into()));
        let err = matcher
            .is_match(&url("https://example.com"), &ctx)
            .unwrap_err();
        assert_eq!(err.to_string(), "predicate exploded");
    }

    #[test]
    fn test_pattern_short_circuits_left_to_right() {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);

        let order = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));

        let first_order = Arc::clone(&order);
        let second_order = Arc::clone(&order);
        let third_calls = Arc::clone(&calls);
        let pattern = UrlMatcherPattern::any(vec![
            UrlMatcher::predicate(move |_, _| {
                first_order.lock().unwrap().push("first");
                Ok(false)
            }),
            UrlMatcher::predicate(move |_, _| {
                second_order.lock().unwrap().push("second");
                Ok(true)
            }),
            UrlMatcher::predicate(move |_, _| {
                third_calls.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }),
        ]);

        assert!(pattern.is_match(&url("https://example.com"), &ctx).unwrap());
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_pattern_list_never_matches() {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);

        let pattern = UrlMatcherPattern::any(Vec::new());
        assert!(!pattern.is_match(&url("https://example.com"), &ctx).unwrap());
    }
}
