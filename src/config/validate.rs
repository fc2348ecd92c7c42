use super::types::{Config, ConfigOptions, HandlerRule, RewriteRule};
use super::ConfigError;
use crate::browser::{browser_spec_from_value, BrowserSpec};
use crate::legacy::LegacyUrlObject;
use crate::rules::{UrlMatcher, UrlMatcherPattern, UrlTransform};
use crate::value::Value;
use std::collections::BTreeMap;
use tracing::debug;

const TOP_LEVEL_KEYS: &[&str] = &["defaultBrowser", "options", "rewrite", "handlers"];
const OPTION_KEYS: &[&str] = &["urlShorteners", "logRequests", "checkForUpdates"];

/// Narrow a loosely-typed document into a [`Config`].
///
/// Every problem found is reported with its field path; nothing is returned
/// unless the whole document is valid.
pub fn validate_config(document: &Value) -> Result<Config, ConfigError> {
    if !document.is_truthy() {
        return Err(ConfigError::Missing);
    }
    let Value::Object(entries) = document else {
        return Err(ConfigError::Invalid {
            errors: vec![format!(
                "config: expected object, received {}",
                document.type_name()
            )],
        });
    };

    let mut errors = Vec::new();
    for key in entries.keys() {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            errors.push(format!("{}: unrecognized key", key));
        }
    }

    let default_browser = default_browser_from_value(entries.get("defaultBrowser"), &mut errors);
    let options = match present(entries, "options") {
        None => Some(ConfigOptions::default()),
        Some(value) => options_from_value(value, &mut errors),
    };
    let rewrite = rules_from_value(entries, "rewrite", rewrite_rule_from_value, &mut errors);
    let handlers = rules_from_value(entries, "handlers", handler_rule_from_value, &mut errors);

    match (default_browser, options, rewrite, handlers) {
        (Some(default_browser), Some(options), Some(rewrite), Some(handlers))
            if errors.is_empty() =>
        {
            debug!(
                rewrites = rewrite.len(),
                handlers = handlers.len(),
                "Configuration is valid"
            );
            Ok(Config {
                default_browser,
                options,
                rewrite,
                handlers,
            })
        }
        _ => Err(ConfigError::Invalid { errors }),
    }
}

fn present<'a>(entries: &'a BTreeMap<String, Value>, key: &str) -> Option<&'a Value> {
    entries.get(key).filter(|value| !value.is_undefined())
}

fn field<'a>(rule: &'a Value, key: &str) -> Option<&'a Value> {
    rule.get(key).filter(|value| !value.is_undefined())
}

fn default_browser_from_value(
    value: Option<&Value>,
    errors: &mut Vec<String>,
) -> Option<BrowserSpec> {
    match value {
        None | Some(Value::Undefined) => {
            errors.push("defaultBrowser: required".to_string());
            None
        }
        Some(Value::Array(items)) if items.is_empty() => {
            errors.push("defaultBrowser: array must contain at least one browser".to_string());
            None
        }
        Some(Value::Array(items)) => {
            let specs: Vec<_> = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    browser_spec_from_value(item, &format!("defaultBrowser[{}]", index), errors)
                })
                .collect();
            specs
                .into_iter()
                .collect::<Option<Vec<_>>>()
                .map(BrowserSpec::List)
        }
        Some(value) => browser_spec_from_value(value, "defaultBrowser", errors),
    }
}

fn options_from_value(value: &Value, errors: &mut Vec<String>) -> Option<ConfigOptions> {
    let Value::Object(entries) = value else {
        errors.push(format!(
            "options: expected object, received {}",
            value.type_name()
        ));
        return None;
    };

    let before = errors.len();
    for key in entries.keys() {
        if !OPTION_KEYS.contains(&key.as_str()) {
            errors.push(format!("options.{}: unrecognized key", key));
        }
    }

    let flag = |key: &str, errors: &mut Vec<String>| match present(entries, key) {
        None => None,
        Some(Value::Bool(enabled)) => Some(*enabled),
        Some(other) => {
            errors.push(format!(
                "options.{}: expected boolean, received {}",
                key,
                other.type_name()
            ));
            None
        }
    };
    let log_requests = flag("logRequests", errors);
    let check_for_updates = flag("checkForUpdates", errors);

    let url_shorteners = match present(entries, "urlShorteners") {
        None => None,
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match item {
                    Value::String(domain) => Some(domain.clone()),
                    other => {
                        errors.push(format!(
                            "options.urlShorteners[{}]: expected string, received {}",
                            index,
                            other.type_name()
                        ));
                        None
                    }
                })
                .collect(),
        ),
        Some(other) => {
            errors.push(format!(
                "options.urlShorteners: expected array, received {}",
                other.type_name()
            ));
            None
        }
    };

    (errors.len() == before).then_some(ConfigOptions {
        url_shorteners,
        log_requests,
        check_for_updates,
    })
}

fn rules_from_value<T>(
    entries: &BTreeMap<String, Value>,
    key: &str,
    parse: fn(&Value, &str, &mut Vec<String>) -> Option<T>,
    errors: &mut Vec<String>,
) -> Option<Vec<T>> {
    match present(entries, key) {
        None => Some(Vec::new()),
        Some(Value::Array(items)) => {
            let rules: Vec<_> = items
                .iter()
                .enumerate()
                .map(|(index, item)| parse(item, &format!("{}[{}]", key, index), errors))
                .collect();
            rules.into_iter().collect()
        }
        Some(other) => {
            errors.push(format!(
                "{}: expected array, received {}",
                key,
                other.type_name()
            ));
            None
        }
    }
}

fn expect_rule_object(rule: &Value, path: &str, errors: &mut Vec<String>) -> bool {
    if matches!(rule, Value::Object(_)) {
        true
    } else {
        errors.push(format!(
            "{}: expected object, received {}",
            path,
            rule.type_name()
        ));
        false
    }
}

fn rewrite_rule_from_value(
    rule: &Value,
    path: &str,
    errors: &mut Vec<String>,
) -> Option<RewriteRule> {
    if !expect_rule_object(rule, path, errors) {
        return None;
    }
    let matcher =
        matcher_pattern_from_value(field(rule, "match"), &format!("{}.match", path), errors);
    let url = transform_from_value(field(rule, "url"), &format!("{}.url", path), errors);
    Some(RewriteRule {
        matcher: matcher?,
        url: url?,
    })
}

fn handler_rule_from_value(
    rule: &Value,
    path: &str,
    errors: &mut Vec<String>,
) -> Option<HandlerRule> {
    if !expect_rule_object(rule, path, errors) {
        return None;
    }
    let matcher =
        matcher_pattern_from_value(field(rule, "match"), &format!("{}.match", path), errors);
    let browser_path = format!("{}.browser", path);
    let browser = match field(rule, "browser") {
        None => {
            errors.push(format!("{}: required", browser_path));
            None
        }
        Some(value) => browser_spec_from_value(value, &browser_path, errors),
    };
    Some(HandlerRule {
        matcher: matcher?,
        browser: browser?,
    })
}

fn matcher_pattern_from_value(
    value: Option<&Value>,
    path: &str,
    errors: &mut Vec<String>,
) -> Option<UrlMatcherPattern> {
    match value {
        None => {
            errors.push(format!("{}: required", path));
            None
        }
        Some(Value::Array(items)) => {
            let matchers: Vec<_> = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    matcher_from_value(item, &format!("{}[{}]", path, index), errors)
                })
                .collect();
            matchers
                .into_iter()
                .collect::<Option<Vec<_>>>()
                .map(UrlMatcherPattern::any)
        }
        Some(value) => matcher_from_value(value, path, errors).map(UrlMatcherPattern::from),
    }
}

fn matcher_from_value(value: &Value, path: &str, errors: &mut Vec<String>) -> Option<UrlMatcher> {
    match value {
        Value::String(pattern) => Some(UrlMatcher::Wildcard(pattern.clone())),
        Value::Regex(re) => Some(UrlMatcher::Regex(re.clone())),
        Value::Function(callback) => Some(UrlMatcher::Predicate(callback.clone())),
        other => {
            errors.push(format!(
                "{}: expected string, regular expression or function, received {}",
                path,
                other.type_name()
            ));
            None
        }
    }
}

fn transform_from_value(
    value: Option<&Value>,
    path: &str,
    errors: &mut Vec<String>,
) -> Option<UrlTransform> {
    let Some(value) = value else {
        errors.push(format!("{}: required", path));
        return None;
    };
    match value {
        Value::String(href) => Some(UrlTransform::Href(href.clone())),
        Value::Url(url) => Some(UrlTransform::Url(url.clone())),
        Value::Function(callback) => Some(UrlTransform::Function(callback.clone())),
        Value::Object(_) => match LegacyUrlObject::from_value(value) {
            Some(legacy) => Some(UrlTransform::Legacy(legacy)),
            None => {
                errors.push(format!(
                    "{}: expected a URL object with a string host",
                    path
                ));
                None
            }
        },
        other => {
            errors.push(format!(
                "{}: expected string, URL or function, received {}",
                path,
                other.type_name()
            ));
            None
        }
    }
}
