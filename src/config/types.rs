use crate::browser::BrowserSpec;
use crate::rules::{UrlMatcherPattern, UrlTransform};
use serde::Serialize;

/// A validated rule set. Read-only during evaluation.
#[derive(Debug, Clone)]
pub struct Config {
    pub default_browser: BrowserSpec,
    pub options: ConfigOptions,
    pub rewrite: Vec<RewriteRule>,
    pub handlers: Vec<HandlerRule>,
}

impl Config {
    pub fn new(default_browser: BrowserSpec) -> Self {
        Config {
            default_browser,
            options: ConfigOptions::default(),
            rewrite: Vec::new(),
            handlers: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ConfigOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_rewrite(mut self, rule: RewriteRule) -> Self {
        self.rewrite.push(rule);
        self
    }

    pub fn with_handler(mut self, rule: HandlerRule) -> Self {
        self.handlers.push(rule);
        self
    }

    /// Extra shortener domains from `options.urlShorteners`.
    pub fn shortener_domains(&self) -> &[String] {
        self.options.url_shorteners.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_shorteners: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_requests: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_for_updates: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub matcher: UrlMatcherPattern,
    pub url: UrlTransform,
}

impl RewriteRule {
    pub fn new(matcher: impl Into<UrlMatcherPattern>, url: UrlTransform) -> Self {
        RewriteRule {
            matcher: matcher.into(),
            url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HandlerRule {
    pub matcher: UrlMatcherPattern,
    pub browser: BrowserSpec,
}

impl HandlerRule {
    pub fn new(matcher: impl Into<UrlMatcherPattern>, browser: BrowserSpec) -> Self {
        HandlerRule {
            matcher: matcher.into(),
            browser,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    UrlShorteners,
    LogRequests,
    CheckForUpdates,
}

impl OptionKey {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "urlShorteners" => Some(OptionKey::UrlShorteners),
            "logRequests" => Some(OptionKey::LogRequests),
            "checkForUpdates" => Some(OptionKey::CheckForUpdates),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    List(Vec<String>),
}

/// Look up an option; `None` when the configuration leaves it unset.
pub fn get_option(config: &Config, key: OptionKey) -> Option<OptionValue> {
    let options = &config.options;
    match key {
        OptionKey::UrlShorteners => options.url_shorteners.clone().map(OptionValue::List),
        OptionKey::LogRequests => options.log_requests.map(OptionValue::Flag),
        OptionKey::CheckForUpdates => options.check_for_updates.map(OptionValue::Flag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_option() {
        let config = Config::new(BrowserSpec::name("Safari")).with_options(ConfigOptions {
            log_requests: Some(true),
            url_shorteners: Some(vec!["sho.rt".to_string()]),
            ..ConfigOptions::default()
        });

        assert_eq!(
            get_option(&config, OptionKey::LogRequests),
            Some(OptionValue::Flag(true))
        );
        assert_eq!(
            get_option(&config, OptionKey::UrlShorteners),
            Some(OptionValue::List(vec!["sho.rt".to_string()]))
        );
        assert_eq!(get_option(&config, OptionKey::CheckForUpdates), None);
        assert_eq!(config.shortener_domains(), &["sho.rt".to_string()]);
    }

    #[test]
    fn test_unset_options() {
        let config = Config::new(BrowserSpec::None);
        assert_eq!(get_option(&config, OptionKey::LogRequests), None);
        assert!(config.shortener_domains().is_empty());
    }

    #[test]
    fn test_option_key_names() {
        assert_eq!(OptionKey::from_name("logRequests"), Some(OptionKey::LogRequests));
        assert_eq!(OptionKey::from_name("log_requests"), None);
    }

    #[test]
    fn test_builder_keeps_declaration_order() {
        let config = Config::new(BrowserSpec::name("Safari"))
            .with_handler(HandlerRule::new("first.com*", BrowserSpec::name("A")))
            .with_handler(HandlerRule::new("second.com*", BrowserSpec::name("B")))
            .with_rewrite(RewriteRule::new("x.com*", UrlTransform::href("https://y.com")));

        assert_eq!(config.handlers.len(), 2);
        assert!(matches!(
            &config.handlers[0].browser,
            BrowserSpec::Name(name) if name == "A"
        ));
        assert_eq!(config.rewrite.len(), 1);
    }
}
