use crate::error::{EngineError, Result};
use crate::host::RuleContext;
use crate::legacy::LegacyUrlObject;
use crate::url::RouteUrl;
use crate::value::{Callback, CallbackResult, Value};
use tracing::debug;

/// Upper bound on transform functions returning further transform functions.
pub const MAX_TRANSFORM_DEPTH: usize = 32;

/// What a matching rewrite rule turns the working URL into.
#[derive(Debug, Clone)]
pub enum UrlTransform {
    Href(String),
    Url(RouteUrl),
    Legacy(LegacyUrlObject),
    Function(Callback),
    /// A value of no recognized shape; leaves the URL untouched.
    Unsupported(Value),
}

impl UrlTransform {
    pub fn href(href: impl Into<String>) -> Self {
        UrlTransform::Href(href.into())
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&RouteUrl, &RuleContext<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        UrlTransform::Function(Callback::new(f))
    }

    /// Classify a value returned by a transform function.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(href) => UrlTransform::Href(href),
            Value::Url(url) => UrlTransform::Url(url),
            Value::Function(callback) => UrlTransform::Function(callback),
            other => match LegacyUrlObject::from_value(&other) {
                Some(legacy) => UrlTransform::Legacy(legacy),
                None => UrlTransform::Unsupported(other),
            },
        }
    }
}

/// Resolve a transform against the current URL.
///
/// Functions are called with the URL the rule matched on; whatever they return is
/// resolved again, up to [`MAX_TRANSFORM_DEPTH`] nested calls.
pub fn rewrite_url(
    transform: &UrlTransform,
    current: &RouteUrl,
    ctx: &RuleContext<'_>,
) -> Result<RouteUrl> {
    resolve(transform, current, ctx, 0)
}

fn resolve(
    transform: &UrlTransform,
    current: &RouteUrl,
    ctx: &RuleContext<'_>,
    depth: usize,
) -> Result<RouteUrl> {
    match transform {
        UrlTransform::Url(url) => Ok(url.clone()),
        UrlTransform::Href(href) => Ok(RouteUrl::parse(href, ctx.opener().cloned())?),
        UrlTransform::Legacy(legacy) => Ok(RouteUrl::parse(
            &legacy.to_url_string(),
            ctx.opener().cloned(),
        )?),
        UrlTransform::Function(callback) => {
            if depth >= MAX_TRANSFORM_DEPTH {
                return Err(EngineError::TransformDepth {
                    limit: MAX_TRANSFORM_DEPTH,
                });
            }
            let returned = callback.call(current, ctx).map_err(EngineError::Callback)?;
            resolve(&UrlTransform::from_value(returned), current, ctx, depth + 1)
        }
        UrlTransform::Unsupported(value) => {
            debug!(
                kind = value.type_name(),
                "Ignoring rewrite value of unsupported type"
            );
            Ok(current.clone())
        }
    }
}
