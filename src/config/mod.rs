mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_document};
pub use types::{
    get_option, Config, ConfigOptions, HandlerRule, OptionKey, OptionValue, RewriteRule,
};
pub use validate::validate_config;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find configuration object, please check your config file and make sure it has a default export.")]
    Missing,

    #[error("Invalid configuration:\n{}", bullet_list(.errors))]
    Invalid { errors: Vec<String> },

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid regular expression in configuration file {}: {source}", .path.display())]
    Regex {
        path: PathBuf,
        #[source]
        source: regex::Error,
    },
}

fn bullet_list(errors: &[String]) -> String {
    errors
        .iter()
        .map(|error| format!("  - {}", error))
        .collect::<Vec<_>>()
        .join("\n")
}
