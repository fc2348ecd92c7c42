use crate::browser::BrowserError;
use crate::config::ConfigError;
use crate::value::CallbackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UrlError {
    #[error("Invalid URL: {input}")]
    Invalid {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors surfaced while routing a single URL.
///
/// Only `InvalidConfig` and `InvalidUrl` ever leave `open_url`; everything else is
/// recorded on the result next to the fallback browser.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid config")]
    InvalidConfig(#[source] ConfigError),

    #[error(transparent)]
    InvalidUrl(#[from] UrlError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("{0}")]
    Callback(CallbackError),

    #[error("URL transform nested deeper than {limit} function calls")]
    TransformDepth { limit: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
