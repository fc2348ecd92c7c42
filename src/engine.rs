use crate::browser::{resolve_browser, resolve_default_browser, BrowserConfigStrict};
use crate::config::{validate_config, Config};
use crate::error::{EngineError, Result};
use crate::host::{Host, RuleContext};
use crate::rules::rewrite_url;
use crate::shorturl::is_short_url;
use crate::url::{OpenUrlOptions, ProcessInfo, RouteUrl};
use crate::value::Value;
use serde::Serialize;
use tracing::{debug, info, warn};

/// The routing decision for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenUrlResult {
    pub browser: BrowserConfigStrict,
    /// Href after all matching rewrites.
    pub url: String,
    /// The incoming URL points at a link shortener, built-in or from
    /// `options.urlShorteners`.
    pub short_url: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    pub handlers: usize,
    pub rewrites: usize,
    pub default_browser: String,
}

/// Validate `document` and route `url` through it.
///
/// Fails only for an invalid configuration or an unparsable `url`. Errors raised
/// while evaluating rules fall back to the default browser and are recorded in
/// [`OpenUrlResult::error`].
pub fn open_url(
    url: &str,
    opener: Option<ProcessInfo>,
    document: &Value,
    host: &dyn Host,
) -> Result<OpenUrlResult> {
    let config = validate_config(document).map_err(|err| {
        warn!(error = %err, "Configuration rejected");
        host.log(&err.to_string());
        EngineError::InvalidConfig(err)
    })?;
    open_url_with_config(url, opener, &config, host)
}

pub fn open_url_with_config(
    url: &str,
    opener: Option<ProcessInfo>,
    config: &Config,
    host: &dyn Host,
) -> Result<OpenUrlResult> {
    let options = OpenUrlOptions {
        opener: opener.clone(),
    };
    let ctx = RuleContext::new(&options, host);
    let mut current = RouteUrl::parse(url, opener)?;
    let short_url = is_short_url(current.as_url(), config.shortener_domains());
    if short_url {
        debug!(url = %current.href(), "URL points at a link shortener");
    }

    let mut errors = Vec::new();
    let browser = match evaluate_rules(config, &mut current, &ctx) {
        Ok(Some(browser)) => browser,
        Ok(None) => default_browser(config, &current, &ctx, &mut errors),
        Err(err) => {
            record(&ctx, &mut errors, &err);
            default_browser(config, &current, &ctx, &mut errors)
        }
    };

    if config.options.log_requests == Some(true) {
        ctx.log(&format!(
            "Opening {} with {}",
            current.href(),
            if browser.name.is_empty() {
                "no browser"
            } else {
                browser.name.as_str()
            }
        ));
    }
    info!(
        url = %current.href(),
        browser = %browser.name,
        app_type = browser.app_type.canonical_name(),
        "Routed URL"
    );

    Ok(OpenUrlResult {
        browser,
        url: current.href().to_string(),
        short_url,
        error: (!errors.is_empty()).then(|| errors.join("\n")),
    })
}

/// Apply every matching rewrite in order, then return the browser of the first
/// matching handler. `current` keeps the rewrites applied before any failure.
fn evaluate_rules(
    config: &Config,
    current: &mut RouteUrl,
    ctx: &RuleContext<'_>,
) -> Result<Option<BrowserConfigStrict>> {
    for (index, rule) in config.rewrite.iter().enumerate() {
        if rule.matcher.is_match(current, ctx)? {
            let rewritten = rewrite_url(&rule.url, current, ctx)?;
            debug!(index, from = %current.href(), to = %rewritten.href(), "Rewrite rule matched");
            *current = rewritten;
        }
    }

    for (index, handler) in config.handlers.iter().enumerate() {
        if handler.matcher.is_match(current, ctx)? {
            debug!(index, url = %current.href(), "Handler matched");
            return Ok(Some(resolve_browser(&handler.browser, current, ctx)?));
        }
    }

    debug!(url = %current.href(), "No handler matched");
    Ok(None)
}

fn default_browser(
    config: &Config,
    current: &RouteUrl,
    ctx: &RuleContext<'_>,
    errors: &mut Vec<String>,
) -> BrowserConfigStrict {
    resolve_default_browser(&config.default_browser, current, ctx).unwrap_or_else(|err| {
        record(ctx, errors, &EngineError::Browser(err));
        BrowserConfigStrict::none(current.href())
    })
}

fn record(ctx: &RuleContext<'_>, errors: &mut Vec<String>, err: &EngineError) {
    warn!(error = %err, "Rule evaluation failed, falling back to the default browser");
    ctx.log(&format!("Error while routing URL: {}", err));
    errors.push(err.to_string());
}

/// Summary of a configuration: rule counts and the default browser's name.
pub fn config_state(config: &Config, host: &dyn Host) -> ConfigState {
    let options = OpenUrlOptions::default();
    let ctx = RuleContext::new(&options, host);
    let default_browser = RouteUrl::parse("https://example.com", None)
        .ok()
        .and_then(|url| resolve_default_browser(&config.default_browser, &url, &ctx).ok())
        .map(|browser| browser.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "None".to_string());

    ConfigState {
        handlers: config.handlers.len(),
        rewrites: config.rewrite.len(),
        default_browser,
    }
}
