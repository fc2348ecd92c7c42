//! Capabilities the host shell lends to the rule engine.
//!
//! Nothing here reaches for global state: every entry point that can run user
//! callbacks receives a `&dyn Host`, and callbacks see it through [`RuleContext`].

use crate::error::UrlError;
use crate::legacy::{LegacyUrl, LegacyUrlObject};
use crate::url::{OpenUrlOptions, ProcessInfo, RouteUrl};
use serde::Serialize;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierKeys {
    pub shift: bool,
    pub option: bool,
    pub command: bool,
    pub control: bool,
    pub caps_lock: bool,
    pub function: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl Default for SystemInfo {
    fn default() -> Self {
        SystemInfo {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            hostname: None,
        }
    }
}

pub trait Host: Send + Sync {
    fn log(&self, message: &str);

    fn notify(&self, title: &str, subtitle: &str);

    fn modifier_keys(&self) -> ModifierKeys {
        ModifierKeys::default()
    }

    fn system_info(&self) -> SystemInfo {
        SystemInfo::default()
    }
}

/// Host that forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHost;

impl Host for TracingHost {
    fn log(&self, message: &str) {
        info!("{}", message);
    }

    fn notify(&self, title: &str, subtitle: &str) {
        info!(title, subtitle, "Notification");
    }
}

/// Host that keeps every message in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    logs: Mutex<Vec<String>>,
    notifications: Mutex<Vec<(String, String)>>,
    keys: ModifierKeys,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modifier_keys(keys: ModifierKeys) -> Self {
        RecordingHost {
            keys,
            ..Self::default()
        }
    }

    pub fn logs(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn notifications(&self) -> Vec<(String, String)> {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Host for RecordingHost {
    fn log(&self, message: &str) {
        self.logs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.to_string());
    }

    fn notify(&self, title: &str, subtitle: &str) {
        self.notifications
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((title.to_string(), subtitle.to_string()));
    }

    fn modifier_keys(&self) -> ModifierKeys {
        self.keys
    }
}

/// Second argument of every user callback.
pub struct RuleContext<'a> {
    pub options: &'a OpenUrlOptions,
    host: &'a dyn Host,
}

impl<'a> RuleContext<'a> {
    pub fn new(options: &'a OpenUrlOptions, host: &'a dyn Host) -> Self {
        RuleContext { options, host }
    }

    pub fn opener(&self) -> Option<&ProcessInfo> {
        self.options.opener.as_ref()
    }

    pub fn host(&self) -> &dyn Host {
        self.host
    }

    pub fn log(&self, message: &str) {
        self.host.log(message);
    }

    pub fn notify(&self, title: &str, subtitle: &str) {
        self.host.notify(title, subtitle);
    }

    pub fn modifier_keys(&self) -> ModifierKeys {
        self.host.modifier_keys()
    }

    pub fn system_info(&self) -> SystemInfo {
        self.host.system_info()
    }

    pub fn url_parts(&self, input: &str) -> Result<LegacyUrlObject, UrlError> {
        crate::utilities::url_parts(input)
    }

    pub fn legacy<'b>(&'b self, url: &'b RouteUrl) -> LegacyUrl<'b> {
        LegacyUrl::new(url, self.host)
    }
}
