use crate::error::UrlError;
use crate::legacy::LegacyUrlObject;
use crate::rules::UrlMatcher;
use regex::Regex;
use tracing::warn;
use url::Url;

/// Compared against the hostname only, never the full href.
#[derive(Debug, Clone)]
pub enum HostnameMatcher {
    Exact(String),
    Regex(Regex),
}

impl HostnameMatcher {
    fn is_match(&self, hostname: &str) -> bool {
        match self {
            HostnameMatcher::Exact(expected) => expected == hostname,
            HostnameMatcher::Regex(re) => re.is_match(hostname),
        }
    }
}

impl From<&str> for HostnameMatcher {
    fn from(hostname: &str) -> Self {
        HostnameMatcher::Exact(hostname.to_string())
    }
}

impl From<String> for HostnameMatcher {
    fn from(hostname: String) -> Self {
        HostnameMatcher::Exact(hostname)
    }
}

impl From<Regex> for HostnameMatcher {
    fn from(re: Regex) -> Self {
        HostnameMatcher::Regex(re)
    }
}

/// Build a predicate matcher that accepts URLs whose hostname matches any of
/// `matchers`.
pub fn match_hostnames<I>(matchers: I) -> UrlMatcher
where
    I: IntoIterator,
    I::Item: Into<HostnameMatcher>,
{
    let matchers: Vec<HostnameMatcher> = matchers.into_iter().map(Into::into).collect();

    UrlMatcher::predicate(move |url, ctx| {
        let hostname = url.host_str().unwrap_or_default();
        if hostname.is_empty() {
            warn!(url = %url.href(), "No hostname available");
            ctx.log(&format!("No hostname available for {}", url.href()));
            return Ok(false);
        }
        Ok(matchers.iter().any(|matcher| matcher.is_match(hostname)))
    })
}

#[deprecated(note = "use match_hostnames instead")]
pub fn match_domains<I>(matchers: I) -> UrlMatcher
where
    I: IntoIterator,
    I::Item: Into<HostnameMatcher>,
{
    warn!("match_domains is deprecated. Use match_hostnames instead.");
    match_hostnames(matchers)
}

/// Split a URL string into its legacy parts.
pub fn url_parts(input: &str) -> Result<LegacyUrlObject, UrlError> {
    let url = Url::parse(input).map_err(|source| UrlError::Invalid {
        input: input.to_string(),
        source,
    })?;
    Ok(LegacyUrlObject::from_url(&url))
}
