use clap::{Parser, Subcommand, ValueEnum};
use pathway_rules::{
    config_state, load_config, load_config_document, logging, open_url, plan_launch,
    ConfigState, LaunchCommand, LaunchOptions, OpenUrlResult, ProcessInfo, RealFileSystem,
    TracingHost,
};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rule-driven URL routing for Pathway", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decide which browser opens a URL
    Resolve {
        /// URL to route
        url: String,

        /// Rules document (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Name of the application that opened the URL
        #[arg(long)]
        opener_name: Option<String>,

        /// Bundle identifier of the opening application
        #[arg(long)]
        opener_bundle_id: Option<String>,

        /// Path of the opening application
        #[arg(long)]
        opener_path: Option<String>,

        /// Pass -g to open when the browser does not say otherwise
        #[arg(long)]
        background: bool,
    },
    /// Validate a rules document
    Check {
        /// Rules document (JSON)
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Serialize)]
struct ResolveJsonResponse {
    action: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<OpenUrlResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<LaunchCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckJsonResponse {
    action: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<ConfigState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logging(cli.verbose, cli.format == OutputFormat::Json);

    match cli.command {
        Commands::Resolve {
            url,
            config,
            opener_name,
            opener_bundle_id,
            opener_path,
            background,
        } => {
            let opener = if opener_name.is_some()
                || opener_bundle_id.is_some()
                || opener_path.is_some()
            {
                Some(ProcessInfo {
                    name: opener_name.unwrap_or_default(),
                    bundle_id: opener_bundle_id.unwrap_or_default(),
                    path: opener_path.unwrap_or_default(),
                })
            } else {
                None
            };
            let launch_options = LaunchOptions {
                open_in_background_by_default: background,
                ..LaunchOptions::default()
            };
            handle_resolve(&url, &config, opener, &launch_options, cli.format);
        }
        Commands::Check { config } => handle_check(&config, cli.format),
    }
}

fn handle_resolve(
    url: &str,
    config_path: &Path,
    opener: Option<ProcessInfo>,
    launch_options: &LaunchOptions,
    format: OutputFormat,
) {
    let fs = RealFileSystem;
    let outcome = load_config_document(config_path, &fs)
        .map_err(|err| describe(&err))
        .and_then(|document| {
            open_url(url, opener, &document, &TracingHost).map_err(|err| describe(&err))
        });

    let result = match outcome {
        Ok(result) => result,
        Err(message) => {
            match format {
                OutputFormat::Human => error!("{}", message),
                OutputFormat::Json => print_json(&ResolveJsonResponse {
                    action: "resolve",
                    status: "error",
                    result: None,
                    command: None,
                    message: Some(message),
                }),
            }
            process::exit(1);
        }
    };

    let command = plan_launch(&result.browser, launch_options, &fs);

    match format {
        OutputFormat::Human => {
            info!("Resolved URL: {}", result.url);
            if result.short_url {
                info!("Short URL: {}", url);
            }
            if result.browser.name.is_empty() {
                info!("Browser: none");
            } else {
                info!(
                    "Browser: {} ({})",
                    result.browser.name,
                    result.browser.app_type.canonical_name()
                );
            }
            if !result.browser.profile.is_empty() {
                info!("Profile: {}", result.browser.profile);
            }
            match &command {
                Some(command) => info!("Launch command: {}", command.display),
                None => info!("Nothing to launch"),
            }
            if let Some(err) = &result.error {
                warn!("Rule error: {}", err);
            }
        }
        OutputFormat::Json => print_json(&ResolveJsonResponse {
            action: "resolve",
            status: if result.error.is_some() { "fallback" } else { "success" },
            result: Some(result),
            command,
            message: None,
        }),
    }
}

fn handle_check(config_path: &Path, format: OutputFormat) {
    match load_config(config_path, &RealFileSystem) {
        Ok(config) => {
            let state = config_state(&config, &TracingHost);
            match format {
                OutputFormat::Human => {
                    info!("Configuration is valid: {}", config_path.display());
                    info!("Default browser: {}", state.default_browser);
                    info!("Handlers: {}", state.handlers);
                    info!("Rewrites: {}", state.rewrites);
                }
                OutputFormat::Json => print_json(&CheckJsonResponse {
                    action: "check",
                    status: "valid",
                    state: Some(state),
                    message: None,
                }),
            }
        }
        Err(err) => {
            let message = describe(&err);
            match format {
                OutputFormat::Human => error!("{}", message),
                OutputFormat::Json => print_json(&CheckJsonResponse {
                    action: "check",
                    status: "invalid",
                    state: None,
                    message: Some(message),
                }),
            }
            process::exit(1);
        }
    }
}

/// Join an error with its sources, outermost first.
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("Failed to serialize output: {}", err);
            process::exit(1);
        }
    }
}
