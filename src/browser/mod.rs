use crate::host::RuleContext;
use crate::url::RouteUrl;
use crate::value::{Callback, CallbackResult, Value};
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;
use tracing::debug;

mod catalog;
pub mod launch;
pub mod profile;

pub use catalog::{find_known_browser, BrowserFamily, BrowserKind, KnownBrowser};
pub use launch::{plan_launch, LaunchCommand, LaunchOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AppType {
    #[default]
    AppName,
    BundleId,
    Path,
    None,
}

impl AppType {
    pub fn canonical_name(self) -> &'static str {
        match self {
            AppType::AppName => "appName",
            AppType::BundleId => "bundleId",
            AppType::Path => "path",
            AppType::None => "none",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "appName" => Some(AppType::AppName),
            "bundleId" => Some(AppType::BundleId),
            "path" => Some(AppType::Path),
            "none" => Some(AppType::None),
            _ => None,
        }
    }
}

/// Which heuristic classifies a browser name when `appType` is not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTypeInference {
    /// Bundle-identifier grammar, then leading `/` or `~` for paths.
    BundleGrammar,
    /// Character-class checks used for the default browser.
    CharacterClass,
}

impl AppTypeInference {
    pub fn infer(self, name: &str) -> AppType {
        match self {
            AppTypeInference::BundleGrammar => {
                if name.is_empty() {
                    AppType::None
                } else if looks_like_bundle_id(name) {
                    AppType::BundleId
                } else if name.starts_with('/') || name.starts_with('~') {
                    AppType::Path
                } else {
                    AppType::AppName
                }
            }
            AppTypeInference::CharacterClass => {
                if is_non_empty_and(name, |c| c.is_ascii_alphanumeric() || c == ' ') {
                    AppType::AppName
                } else if is_non_empty_and(name, |c| {
                    c.is_ascii_alphanumeric() || c == '.' || c == '-'
                }) {
                    AppType::BundleId
                } else if looks_like_app_bundle_path(name) {
                    AppType::Path
                } else {
                    AppType::AppName
                }
            }
        }
    }
}

fn is_non_empty_and(value: &str, allowed: impl Fn(char) -> bool) -> bool {
    !value.is_empty() && value.chars().all(allowed)
}

/// `^[A-Za-z]{2,6}(\.[A-Za-z0-9-]{1,63})+$`
fn looks_like_bundle_id(value: &str) -> bool {
    let mut segments = value.split('.');
    let prefix = segments.next().unwrap_or_default();
    if !(2..=6).contains(&prefix.len()) || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    let mut rest = segments.peekable();
    if rest.peek().is_none() {
        return false;
    }
    rest.all(|segment| {
        (1..=63).contains(&segment.len())
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// `^~?(/[^/\n]+)+/[^/\n]+\.app$`, an absolute or home-relative `.app` bundle.
fn looks_like_app_bundle_path(value: &str) -> bool {
    let path = value.strip_prefix('~').unwrap_or(value);
    let Some(path) = path.strip_prefix('/') else {
        return false;
    };
    let segments: Vec<&str> = path.split('/').collect();
    let Some(last) = segments.last() else {
        return false;
    };

    segments.len() >= 2
        && segments
            .iter()
            .all(|segment| !segment.is_empty() && !segment.contains('\n'))
        && last.len() > ".app".len()
        && last.ends_with(".app")
}

/// A partially specified browser; missing fields are filled in on resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_type: Option<AppType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_in_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

impl BrowserConfig {
    pub fn new(name: impl Into<String>) -> Self {
        BrowserConfig {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The fully resolved descriptor handed to the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfigStrict {
    pub name: String,
    pub app_type: AppType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_in_background: Option<bool>,
    pub profile: String,
    pub args: Vec<String>,
    pub url: String,
}

impl BrowserConfigStrict {
    /// A descriptor that launches nothing.
    pub fn none(url: impl Into<String>) -> Self {
        BrowserConfigStrict {
            name: String::new(),
            app_type: AppType::None,
            open_in_background: None,
            profile: String::new(),
            args: Vec::new(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum BrowserSpec {
    None,
    /// `name` or `name:profile`.
    Name(String),
    Config(BrowserConfig),
    Resolver(Callback),
    /// Only accepted for the default browser; the first entry wins.
    List(Vec<BrowserSpec>),
}

impl BrowserSpec {
    pub fn name(name: impl Into<String>) -> Self {
        BrowserSpec::Name(name.into())
    }

    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(&RouteUrl, &RuleContext<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        BrowserSpec::Resolver(Callback::new(f))
    }
}

impl From<BrowserConfig> for BrowserSpec {
    fn from(config: BrowserConfig) -> Self {
        BrowserSpec::Config(config)
    }
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error(
        "{}",
        payload(
            "Browser config cannot be undefined",
            None,
            "Browser config must be a string, object, or null"
        )
    )]
    Undefined,

    #[error("{}", payload("Invalid browser option", Some(.browser), .error))]
    Invalid {
        browser: serde_json::Value,
        error: String,
    },

    #[error("{}", payload("Browser resolver failed", None, .error))]
    Resolver { error: String },
}

fn payload(message: &str, browser: Option<&serde_json::Value>, error: &str) -> String {
    let mut body = serde_json::Map::new();
    body.insert("message".to_string(), message.into());
    if let Some(browser) = browser {
        body.insert("browser".to_string(), browser.clone());
    }
    body.insert("error".to_string(), error.into());

    serde_json::to_string_pretty(&serde_json::Value::Object(body))
        .unwrap_or_else(|_| format!("{}: {}", message, error))
}

/// Resolve a handler's browser specification.
pub fn resolve_browser(
    spec: &BrowserSpec,
    url: &RouteUrl,
    ctx: &RuleContext<'_>,
) -> Result<BrowserConfigStrict, BrowserError> {
    resolve_with(spec, url, ctx, AppTypeInference::BundleGrammar)
}

/// Resolve the configuration's default browser.
pub fn resolve_default_browser(
    spec: &BrowserSpec,
    url: &RouteUrl,
    ctx: &RuleContext<'_>,
) -> Result<BrowserConfigStrict, BrowserError> {
    resolve_with(spec, url, ctx, AppTypeInference::CharacterClass)
}

fn resolve_with(
    spec: &BrowserSpec,
    url: &RouteUrl,
    ctx: &RuleContext<'_>,
    inference: AppTypeInference,
) -> Result<BrowserConfigStrict, BrowserError> {
    let spec: Cow<'_, BrowserSpec> = match spec {
        BrowserSpec::Resolver(callback) => {
            let value = callback
                .call(url, ctx)
                .map_err(|err| BrowserError::Resolver {
                    error: err.to_string(),
                })?;
            Cow::Owned(spec_from_resolver(&value)?)
        }
        BrowserSpec::List(entries) => {
            let first = entries.first().ok_or_else(|| BrowserError::Invalid {
                browser: serde_json::Value::Array(Vec::new()),
                error: "Validation error: browser list is empty".to_string(),
            })?;
            return resolve_with(first, url, ctx, inference);
        }
        other => Cow::Borrowed(other),
    };

    let (name, app_type, open_in_background, profile, args) = match spec.as_ref() {
        BrowserSpec::None => (String::new(), AppType::None, None, String::new(), Vec::new()),
        BrowserSpec::Name(value) => {
            let (name, profile) = value.split_once(':').unwrap_or((value.as_str(), ""));
            (
                name.to_string(),
                inference.infer(name),
                None,
                profile.to_string(),
                Vec::new(),
            )
        }
        BrowserSpec::Config(config) => (
            config.name.clone(),
            config
                .app_type
                .unwrap_or_else(|| inference.infer(&config.name)),
            config.open_in_background,
            config.profile.clone().unwrap_or_default(),
            config.args.clone().unwrap_or_default(),
        ),
        BrowserSpec::Resolver(_) | BrowserSpec::List(_) => {
            return Err(BrowserError::Invalid {
                browser: serde_json::Value::String("[Function]".to_string()),
                error: "Validation error: a browser resolver must not return another resolver or a list"
                    .to_string(),
            });
        }
    };

    debug!(name = %name, app_type = app_type.canonical_name(), "Resolved browser");

    Ok(BrowserConfigStrict {
        name,
        app_type,
        open_in_background,
        profile,
        args,
        url: url.href().to_string(),
    })
}

fn spec_from_resolver(value: &Value) -> Result<BrowserSpec, BrowserError> {
    if value.is_undefined() {
        return Err(BrowserError::Undefined);
    }

    let invalid = |error: String| BrowserError::Invalid {
        browser: value.to_json(),
        error,
    };

    match value {
        Value::Function(_) | Value::Array(_) => Err(invalid(format!(
            "Validation error: a browser resolver must return null, a string or a browser config object, received {}",
            value.type_name()
        ))),
        _ => {
            let mut errors = Vec::new();
            match browser_spec_from_value(value, "browser", &mut errors) {
                Some(spec) if errors.is_empty() => Ok(spec),
                _ => Err(invalid(format!("Validation error: {}", errors.join("; ")))),
            }
        }
    }
}

const BROWSER_SPEC_EXPECTED: &str = "null, a string, a browser config object or a function";

/// Check a value against the browser specification shape, recording problems
/// under `path`. Arrays are not accepted here.
pub(crate) fn browser_spec_from_value(
    value: &Value,
    path: &str,
    errors: &mut Vec<String>,
) -> Option<BrowserSpec> {
    match value {
        Value::Null => Some(BrowserSpec::None),
        Value::String(name) => Some(BrowserSpec::Name(name.clone())),
        Value::Function(callback) => Some(BrowserSpec::Resolver(callback.clone())),
        Value::Object(_) => browser_config_from_value(value, path, errors).map(BrowserSpec::Config),
        other => {
            errors.push(format!(
                "{}: expected {}, received {}",
                path,
                BROWSER_SPEC_EXPECTED,
                other.type_name()
            ));
            None
        }
    }
}

fn browser_config_from_value(
    value: &Value,
    path: &str,
    errors: &mut Vec<String>,
) -> Option<BrowserConfig> {
    let before = errors.len();

    let name = match value.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(other) if !other.is_undefined() => {
            errors.push(format!(
                "{}.name: expected string, received {}",
                path,
                other.type_name()
            ));
            String::new()
        }
        _ => {
            errors.push(format!("{}.name: required", path));
            String::new()
        }
    };

    let app_type = match value.get("appType") {
        None | Some(Value::Undefined) => None,
        Some(Value::String(kind)) => match AppType::from_name(kind) {
            Some(app_type) => Some(app_type),
            None => {
                errors.push(format!(
                    "{}.appType: expected one of appName, bundleId, path, none, received \"{}\"",
                    path, kind
                ));
                None
            }
        },
        Some(other) => {
            errors.push(format!(
                "{}.appType: expected string, received {}",
                path,
                other.type_name()
            ));
            None
        }
    };

    let open_in_background = match value.get("openInBackground") {
        None | Some(Value::Undefined) => None,
        Some(Value::Bool(flag)) => Some(*flag),
        Some(other) => {
            errors.push(format!(
                "{}.openInBackground: expected boolean, received {}",
                path,
                other.type_name()
            ));
            None
        }
    };

    let profile = match value.get("profile") {
        None | Some(Value::Undefined) => None,
        Some(Value::String(profile)) => Some(profile.clone()),
        Some(other) => {
            errors.push(format!(
                "{}.profile: expected string, received {}",
                path,
                other.type_name()
            ));
            None
        }
    };

    let args = match value.get("args") {
        None | Some(Value::Undefined) => None,
        Some(Value::Array(items)) => {
            let mut args = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(arg) => args.push(arg.clone()),
                    other => errors.push(format!(
                        "{}.args[{}]: expected string, received {}",
                        path,
                        index,
                        other.type_name()
                    )),
                }
            }
            Some(args)
        }
        Some(other) => {
            errors.push(format!(
                "{}.args: expected array, received {}",
                path,
                other.type_name()
            ));
            None
        }
    };

    (errors.len() == before).then(|| BrowserConfig {
        name,
        app_type,
        open_in_background,
        profile,
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::url::OpenUrlOptions;

    fn resolve(spec: &BrowserSpec) -> Result<BrowserConfigStrict, BrowserError> {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);
        let url = RouteUrl::parse("https://example.com/page", None).unwrap();
        resolve_browser(spec, &url, &ctx)
    }

    fn resolve_default(spec: &BrowserSpec) -> BrowserConfigStrict {
        let host = RecordingHost::new();
        let options = OpenUrlOptions::default();
        let ctx = RuleContext::new(&options, &host);
        let url = RouteUrl::parse("https://example.com/page", None).unwrap();
        resolve_default_browser(spec, &url, &ctx).unwrap()
    }

    #[test]
    fn test_app_type_inference_from_names() {
        let cases = [
            ("com.google.Chrome", AppType::BundleId),
            ("Google Chrome", AppType::AppName),
            ("~/Apps/X.app", AppType::Path),
            ("/Applications/Firefox.app", AppType::Path),
            ("Safari", AppType::AppName),
        ];
        for (name, expected) in cases {
            let browser = resolve(&BrowserSpec::name(name)).unwrap();
            assert_eq!(browser.app_type, expected, "name: {}", name);
            assert_eq!(browser.name, name);
            assert_eq!(browser.url, "https://example.com/page");
        }
    }

    #[test]
    fn test_null_resolves_to_none() {
        let browser = resolve(&BrowserSpec::None).unwrap();
        assert_eq!(browser, BrowserConfigStrict::none("https://example.com/page"));
    }

    #[test]
    fn test_name_with_profile() {
        let browser = resolve(&BrowserSpec::name("Google Chrome:Work")).unwrap();
        assert_eq!(browser.name, "Google Chrome");
        assert_eq!(browser.profile, "Work");
        assert_eq!(browser.app_type, AppType::AppName);
        assert!(browser.args.is_empty());
    }

    #[test]
    fn test_config_object_fills_defaults() {
        let browser = resolve(&BrowserSpec::Config(BrowserConfig {
            profile: Some("Design".to_string()),
            ..BrowserConfig::new("Google Chrome")
        }))
        .unwrap();
        assert_eq!(browser.app_type, AppType::AppName);
        assert_eq!(browser.profile, "Design");
        assert_eq!(browser.open_in_background, None);

        let browser = resolve(&BrowserSpec::Config(BrowserConfig {
            app_type: Some(AppType::AppName),
            open_in_background: Some(true),
            args: Some(vec!["--incognito".to_string()]),
            ..BrowserConfig::new("com.google.Chrome")
        }))
        .unwrap();
        assert_eq!(browser.app_type, AppType::AppName);
        assert_eq!(browser.open_in_background, Some(true));
        assert_eq!(browser.args, vec!["--incognito".to_string()]);
    }

    #[test]
    fn test_resolver_function() {
        let spec = BrowserSpec::resolver(|url, _| {
            Ok(if url.path().starts_with("/page") {
                Value::object([("name", Value::from("Firefox")), ("profile", Value::from("dev"))])
            } else {
                Value::Null
            })
        });
        let browser = resolve(&spec).unwrap();
        assert_eq!(browser.name, "Firefox");
        assert_eq!(browser.profile, "dev");
    }

    #[test]
    fn test_resolver_returning_undefined() {
        let spec = BrowserSpec::resolver(|_, _| Ok(Value::Undefined));
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, BrowserError::Undefined));
        assert!(err.to_string().contains("Browser config cannot be undefined"));
    }

    #[test]
    fn test_resolver_returning_invalid_shape() {
        let spec = BrowserSpec::resolver(|_, _| Ok(Value::from(123.0)));
        let err = resolve(&spec).unwrap_err();
        let payload: serde_json::Value = serde_json::from_str(&err.to_string()).unwrap();
        assert_eq!(payload["message"], "Invalid browser option");
        assert_eq!(payload["browser"], 123.0);
        assert!(payload["error"].as_str().unwrap().contains("received number"));
    }

    #[test]
    fn test_resolver_returning_function_is_rejected() {
        let spec = BrowserSpec::resolver(|_, _| Ok(Value::function(|_, _| Ok("Safari".into()))));
        let err = resolve(&spec).unwrap_err();
        assert!(matches!(err, BrowserError::Invalid { .. }));
    }

    #[test]
    fn test_resolver_error_is_wrapped() {
        let spec = BrowserSpec::resolver(|_, _| Err("boom".into()));
        let err = resolve(&spec).unwrap_err();
        let payload: serde_json::Value = serde_json::from_str(&err.to_string()).unwrap();
        assert_eq!(payload["error"], "boom");
    }

    #[test]
    fn test_invalid_object_from_resolver() {
        let spec = BrowserSpec::resolver(|_, _| {
            Ok(Value::object([
                ("name", Value::from("Firefox")),
                ("appType", Value::from("browser")),
            ]))
        });
        let err = resolve(&spec).unwrap_err();
        assert!(err.to_string().contains("browser.appType"));
    }

    #[test]
    fn test_default_browser_uses_character_class_inference() {
        assert_eq!(
            resolve_default(&BrowserSpec::name("Google Chrome")).app_type,
            AppType::AppName
        );
        assert_eq!(
            resolve_default(&BrowserSpec::name("com.google.Chrome")).app_type,
            AppType::BundleId
        );
        assert_eq!(
            resolve_default(&BrowserSpec::name("~/Applications/Google Chrome.app")).app_type,
            AppType::Path
        );
        // Diverges from handler resolution: no `.app` suffix means no path.
        assert_eq!(
            resolve_default(&BrowserSpec::name("/usr/bin/firefox")).app_type,
            AppType::AppName
        );
        assert_eq!(
            resolve(&BrowserSpec::name("/usr/bin/firefox")).unwrap().app_type,
            AppType::Path
        );
        // Dotted names without a short alphabetic prefix are still bundle ids here.
        assert_eq!(
            resolve_default(&BrowserSpec::name("Firefox-3.5")).app_type,
            AppType::BundleId
        );
    }

    #[test]
    fn test_list_resolves_first_entry() {
        let spec = BrowserSpec::List(vec![
            BrowserSpec::name("Safari"),
            BrowserSpec::name("Firefox"),
        ]);
        assert_eq!(resolve_default(&spec).name, "Safari");
    }

    #[test]
    fn test_bundle_id_grammar() {
        assert!(looks_like_bundle_id("com.apple.Safari"));
        assert!(looks_like_bundle_id("org.mozilla.firefox-dev"));
        assert!(!looks_like_bundle_id("com"));
        assert!(!looks_like_bundle_id("c.apple"));
        assert!(!looks_like_bundle_id("company1.apple"));
        assert!(!looks_like_bundle_id("com..apple"));
        assert!(!looks_like_bundle_id("Google Chrome"));
    }

    #[test]
    fn test_app_bundle_path() {
        assert!(looks_like_app_bundle_path("/Applications/Safari.app"));
        assert!(looks_like_app_bundle_path("~/Applications/Google Chrome.app"));
        assert!(!looks_like_app_bundle_path("/Safari.app"));
        assert!(!looks_like_app_bundle_path("Applications/Safari.app"));
        assert!(!looks_like_app_bundle_path("/Applications/.app"));
    }
}
