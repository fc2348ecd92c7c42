pub mod browser;
pub mod config;
pub mod engine;
pub mod error;
pub mod filesystem;
pub mod host;
pub mod legacy;
pub mod logging;
pub mod rules;
pub mod shorturl;
pub mod url;
pub mod utilities;
pub mod value;

pub use browser::{
    plan_launch, resolve_browser, resolve_default_browser, AppType, BrowserConfig,
    BrowserConfigStrict, BrowserError, BrowserSpec, LaunchCommand, LaunchOptions,
};
pub use config::{
    get_option, load_config, load_config_document, validate_config, Config, ConfigError,
    ConfigOptions, HandlerRule, OptionKey, OptionValue, RewriteRule,
};
pub use engine::{config_state, open_url, open_url_with_config, ConfigState, OpenUrlResult};
pub use error::{EngineError, Result, UrlError};
pub use filesystem::{FileSystem, RealFileSystem};
pub use host::{Host, ModifierKeys, RecordingHost, RuleContext, SystemInfo, TracingHost};
pub use legacy::{LegacyError, LegacyUrl, LegacyUrlObject, LegacyUrlView};
pub use rules::{rewrite_url, UrlMatcher, UrlMatcherPattern, UrlTransform};
pub use shorturl::is_short_url;
pub use utilities::{match_hostnames, url_parts, HostnameMatcher};
pub use value::{Callback, CallbackError, CallbackResult, Value};

pub use crate::url::{OpenUrlOptions, ProcessInfo, RouteUrl};
