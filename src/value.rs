//! Loosely-typed configuration values.
//!
//! Rule documents mix strings, regular expressions, plain objects and user callbacks
//! in the same positions. `Value` models that document before it is narrowed into the
//! typed [`Config`](crate::config::Config) by the validator, and it is also what user
//! callbacks hand back to the engine.

use crate::host::RuleContext;
use crate::url::RouteUrl;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;
pub type CallbackResult = std::result::Result<Value, CallbackError>;

type CallbackFn = dyn Fn(&RouteUrl, &RuleContext<'_>) -> CallbackResult + Send + Sync;

/// A user-supplied function shared by matchers, transforms and browser resolvers.
#[derive(Clone)]
pub struct Callback(Arc<CallbackFn>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RouteUrl, &RuleContext<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        Callback(Arc::new(f))
    }

    pub fn call(&self, url: &RouteUrl, ctx: &RuleContext<'_>) -> CallbackResult {
        (self.0)(url, ctx)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Regex(Regex),
    Url(RouteUrl),
    Function(Callback),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&RouteUrl, &RuleContext<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        Value::Function(Callback::new(f))
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Array(items.into_iter().collect())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Truthiness as used when coercing matcher results to a boolean.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Regex(_) => "regexp",
            Value::Url(_) => "URL",
            Value::Function(_) => "function",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Render for diagnostics. Functions and regexes have no JSON form and are
    /// described instead.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Regex(re) => serde_json::Value::String(format!("/{}/", re.as_str())),
            Value::Url(url) => serde_json::Value::String(url.href().to_string()),
            Value::Function(_) => serde_json::Value::String("[Function]".to_string()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .filter(|(_, value)| !value.is_undefined())
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Convert a JSON document. An object whose only keys are `$regex` and an
    /// optional `flags` string becomes a regular expression.
    pub fn from_json(json: serde_json::Value) -> Result<Value, regex::Error> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => {
                if let Some(re) = regex_literal(&map)? {
                    return Ok(Value::Regex(re));
                }
                Value::Object(
                    map.into_iter()
                        .map(|(key, value)| Ok((key, Value::from_json(value)?)))
                        .collect::<Result<_, regex::Error>>()?,
                )
            }
        })
    }
}

fn regex_literal(
    map: &serde_json::Map<String, serde_json::Value>,
) -> Result<Option<Regex>, regex::Error> {
    let Some(serde_json::Value::String(source)) = map.get("$regex") else {
        return Ok(None);
    };
    let flags = match map.get("flags") {
        None => "",
        Some(serde_json::Value::String(flags)) => flags.as_str(),
        Some(_) => return Ok(None),
    };
    if map.keys().any(|key| key != "$regex" && key != "flags") {
        return Ok(None);
    }

    RegexBuilder::new(source)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map(Some)
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Regex> for Value {
    fn from(value: Regex) -> Self {
        Value::Regex(value)
    }
}

impl From<RouteUrl> for Value {
    fn from(value: RouteUrl) -> Self {
        Value::Url(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());

        assert!(Value::from("x").is_truthy());
        assert!(Value::from(2.0).is_truthy());
        assert!(Value::array([]).is_truthy());
        assert!(Value::object::<&str, _>([]).is_truthy());
    }

    #[test]
    fn test_from_json_regex_literal() {
        let value =
            Value::from_json(json!({ "$regex": "^https://t\\.co/", "flags": "i" })).unwrap();
        match value {
            Value::Regex(re) => {
                assert!(re.is_match("HTTPS://T.CO/abc"));
            }
            other => panic!("Expected regex, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_from_json_plain_object_with_regex_key_and_extras() {
        let value = Value::from_json(json!({ "$regex": "a", "other": 1 })).unwrap();
        assert!(matches!(value, Value::Object(_)));
    }

    #[test]
    fn test_from_json_invalid_regex() {
        assert!(Value::from_json(json!({ "$regex": "[unclosed" })).is_err());
    }

    #[test]
    fn test_to_json_describes_non_json_values() {
        let value = Value::object([
            ("name", Value::from("Safari")),
            ("resolver", Value::function(|_, _| Ok(Value::Null))),
            ("skipped", Value::Undefined),
        ]);
        assert_eq!(
            value.to_json(),
            json!({ "name": "Safari", "resolver": "[Function]" })
        );
    }
}
