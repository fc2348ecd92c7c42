use crate::filesystem::FileSystem;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile '{profile}' not found, available profiles: {available}")]
    ProfileNotFound { profile: String, available: String },
    #[error("Local State file not found at {0}")]
    MissingLocalState(String),
    #[error("Local State has no profile info cache")]
    MissingInfoCache,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Find the profile directory of a Chromium-family browser.
///
/// `profile` is matched against the display names in the `Local State`
/// `profile.info_cache` first, then against the directory keys themselves.
pub fn chromium_profile_directory<F: FileSystem + ?Sized>(
    fs: &F,
    local_state_path: &Path,
    profile: &str,
) -> Result<String, ProfileError> {
    if !fs.exists(local_state_path) {
        return Err(ProfileError::MissingLocalState(
            local_state_path.display().to_string(),
        ));
    }

    let content = fs.read_to_string(local_state_path)?;
    let local_state: serde_json::Value = serde_json::from_str(&content)?;
    let info_cache = local_state
        .get("profile")
        .and_then(|p| p.get("info_cache"))
        .and_then(|cache| cache.as_object())
        .ok_or(ProfileError::MissingInfoCache)?;

    let display_name = |data: &serde_json::Value| {
        data.get("name")
            .and_then(|name| name.as_str())
            .map(str::to_string)
    };

    for (directory, data) in info_cache {
        if display_name(data).as_deref() == Some(profile) {
            info!(name = profile, path = %directory, "Found profile by name");
            return Ok(directory.clone());
        }
    }

    debug!(profile, "Profile name not found, trying profile directories");
    if let Some(data) = info_cache.get(profile) {
        if let Some(name) = display_name(data) {
            warn!(
                path = profile,
                name = %name,
                "Found profile using profile path, please use the profile name instead"
            );
        }
        return Ok(profile.to_string());
    }

    let available = info_cache
        .values()
        .filter_map(display_name)
        .collect::<Vec<_>>()
        .join(", ");
    Err(ProfileError::ProfileNotFound {
        profile: profile.to_string(),
        available,
    })
}
