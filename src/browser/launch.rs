use super::catalog::{find_known_browser, BrowserFamily};
use super::profile::chromium_profile_directory;
use super::{AppType, BrowserConfigStrict};
use crate::filesystem::FileSystem;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

const OPEN_COMMAND: &str = "open";
const APPLICATION_SUPPORT: &str = "Library/Application Support";

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Used when the browser does not set `openInBackground` itself.
    pub open_in_background_by_default: bool,
    /// Root for Chromium `Local State` lookups; profile detection is skipped without one.
    pub home_dir: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        LaunchOptions {
            open_in_background_by_default: false,
            home_dir: dirs_next::home_dir(),
        }
    }
}

/// A command line that would open the resolved browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Shell-quoted rendering of the whole command.
    pub display: String,
}

/// Build the `open` invocation for a resolved browser. Returns `None` when
/// the descriptor's app type is `none`.
pub fn plan_launch<F: FileSystem + ?Sized>(
    browser: &BrowserConfigStrict,
    options: &LaunchOptions,
    fs: &F,
) -> Option<LaunchCommand> {
    let mut args: Vec<String> = match browser.app_type {
        AppType::None => {
            debug!(url = %browser.url, "Browser app type is none, nothing to launch");
            return None;
        }
        AppType::BundleId => vec!["-b".to_string(), browser.name.clone()],
        AppType::AppName | AppType::Path => vec!["-a".to_string(), browser.name.clone()],
    };

    if browser
        .open_in_background
        .unwrap_or(options.open_in_background_by_default)
    {
        args.push("-g".to_string());
    }

    let profile_arg = profile_argument(browser, options, fs);
    if profile_arg.is_some() {
        args.push("-n".to_string());
    }

    if profile_arg.is_some() || !browser.args.is_empty() {
        args.push("--args".to_string());
        args.extend(profile_arg);
        if browser.args.is_empty() {
            args.push(browser.url.clone());
        } else {
            args.extend(browser.args.iter().cloned());
        }
    } else {
        args.push(browser.url.clone());
    }

    let rendered =
        shell_words::join(std::iter::once(OPEN_COMMAND).chain(args.iter().map(String::as_str)));
    debug!(command = %rendered, "Planned browser launch");

    Some(LaunchCommand {
        program: PathBuf::from(OPEN_COMMAND),
        args,
        display: rendered,
    })
}

fn profile_argument<F: FileSystem + ?Sized>(
    browser: &BrowserConfigStrict,
    options: &LaunchOptions,
    fs: &F,
) -> Option<String> {
    if browser.profile.is_empty() {
        return None;
    }
    let known = find_known_browser(&browser.name)?;
    debug!(identifier = %browser.name, kind = known.kind.canonical_name(), "Known browser");

    match known.family {
        BrowserFamily::Firefox => Some(format!("-P={}", shell_words::quote(&browser.profile))),
        BrowserFamily::Chromium => {
            let Some(home) = options.home_dir.as_ref() else {
                info!("Could not determine home directory, skipping profile detection");
                return None;
            };
            let local_state = home
                .join(APPLICATION_SUPPORT)
                .join(known.config_dir)
                .join("Local State");
            match chromium_profile_directory(fs, &local_state, &browser.profile) {
                Ok(directory) => Some(format!("--profile-directory={}", directory)),
                Err(err) => {
                    info!(
                        error = %err,
                        profile = %browser.profile,
                        "Could not resolve browser profile"
                    );
                    None
                }
            }
        }
        BrowserFamily::Other => {
            info!(
                identifier = %browser.name,
                "Browser does not support profiles, skipping profile detection"
            );
            None
        }
    }
}
