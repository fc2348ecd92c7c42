use crate::error::UrlError;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use tracing::debug;
use url::Url;

/// The process that asked for a URL to be opened.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub name: String,
    pub bundle_id: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OpenUrlOptions {
    pub opener: Option<ProcessInfo>,
}

/// The working URL threaded through rewrite and handler rules.
///
/// Matchers always look at [`RouteUrl::href`], the WHATWG serialization, so
/// `https://example.com` is seen as `https://example.com/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUrl {
    url: Url,
    opener: Option<ProcessInfo>,
}

impl RouteUrl {
    pub fn parse(input: &str, opener: Option<ProcessInfo>) -> Result<Self, UrlError> {
        debug!("Input: \"{}\"", input);

        let url = Url::parse(input).map_err(|source| UrlError::Invalid {
            input: input.to_string(),
            source,
        })?;

        Ok(RouteUrl { url, opener })
    }

    pub fn from_url(url: Url, opener: Option<ProcessInfo>) -> Self {
        RouteUrl { url, opener }
    }

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn into_url(self) -> Url {
        self.url
    }

    /// Opener carried along with the URL; user code reaches it through
    /// [`RuleContext::opener`](crate::host::RuleContext::opener) instead.
    pub(crate) fn opener_info(&self) -> Option<&ProcessInfo> {
        self.opener.as_ref()
    }
}

impl Deref for RouteUrl {
    type Target = Url;

    fn deref(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for RouteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.href())
    }
}
