//! Downloading and silently installing interpreters from the release index.

use std::env;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use super::version::{compare_versions, is_prefix};
use crate::core::config::PypxConfig;
use crate::core::runtime::effects::{Effects, FetchError};
use crate::core::tooling::errors::{DownloadError, InstallationError, PypxError};

static RELEASE_DIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(\d+\.\d+\.\d+)/""#).expect("valid regex"));
static INSTALLER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(python-[\w.-]*amd64\.exe)""#).expect("valid regex"));

/// Latest patch release of `prefix` that publishes a 64-bit Windows
/// installer, as `(version, installer_url)`.
///
/// Release directories are tried newest first; a directory whose listing
/// cannot be fetched is skipped.
///
/// # Errors
/// [`DownloadError::IndexUnreachable`] when the index itself cannot be read,
/// [`DownloadError::NoVersions`] when it lists no `<prefix>.<patch>/` entry and
/// [`DownloadError::NoInstaller`] when none of those entries has an installer.
pub fn resolve_prefix_to_latest_patch(
    config: &PypxConfig,
    effects: &dyn Effects,
    prefix: &str,
) -> Result<(String, String), DownloadError> {
    let base = config.index_url.as_str();
    info!(prefix, "searching available versions");
    let listing = effects
        .http()
        .get_text(base)
        .map_err(|err| DownloadError::IndexUnreachable {
            url: base.to_string(),
            reason: err.to_string(),
        })?;

    let mut candidates = release_dirs(&listing, prefix);
    if candidates.is_empty() {
        return Err(DownloadError::NoVersions {
            prefix: prefix.to_string(),
        });
    }
    candidates.sort_by(|left, right| compare_versions(right, left));
    candidates.dedup();

    for version in candidates {
        let dir_url = format!("{base}{version}/");
        let page = match effects.http().get_text(&dir_url) {
            Ok(page) => page,
            Err(err) => {
                debug!(%version, error = %err, "skipping unreadable release directory");
                continue;
            }
        };
        if let Some(captures) = INSTALLER_RE.captures(&page) {
            let url = format!("{dir_url}{}", &captures[1]);
            debug!(%version, %url, "found installer");
            return Ok((version, url));
        }
        debug!(%version, "release has no Windows installer");
    }

    Err(DownloadError::NoInstaller {
        prefix: prefix.to_string(),
    })
}

fn release_dirs(listing: &str, prefix: &str) -> Vec<String> {
    RELEASE_DIR_RE
        .captures_iter(listing)
        .map(|captures| captures[1].to_string())
        .filter(|version| is_patch_of(version, prefix))
        .collect()
}

/// True when `version` is exactly `<prefix>.<digits>`.
fn is_patch_of(version: &str, prefix: &str) -> bool {
    version
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|patch| !patch.is_empty() && patch.bytes().all(|b| b.is_ascii_digit()))
}

/// Installer URL for an exact version.
#[must_use]
pub fn installer_url(config: &PypxConfig, version: &str) -> String {
    format!(
        "{}{version}/python-{version}-amd64.exe",
        config.index_url
    )
}

/// Fetches the installer for `token` into the temporary directory.
///
/// Prefix tokens are expanded through the index first; exact tokens go
/// straight to their installer URL.
///
/// # Errors
/// Returns [`DownloadError`] for index failures, HTTP status failures and
/// transfer failures.
pub fn download(
    config: &PypxConfig,
    effects: &dyn Effects,
    token: &str,
) -> Result<PathBuf, DownloadError> {
    let (version, url) = if is_prefix(token) {
        resolve_prefix_to_latest_patch(config, effects, token)?
    } else {
        (token.to_string(), installer_url(config, token))
    };
    let dest = download_destination(&url, &version)?;
    info!(%version, %url, "downloading installer");
    let written = effects
        .http()
        .download_to(&url, &dest)
        .map_err(|err| match err {
            FetchError::Status { code } => DownloadError::Http {
                status: code,
                url: url.clone(),
            },
            FetchError::Transfer { message } => DownloadError::Transfer {
                version: version.clone(),
                url: url.clone(),
                reason: message,
            },
        })?;
    debug!(bytes = written, dest = %dest.display(), "installer downloaded");
    Ok(dest)
}

fn download_destination(url: &str, version: &str) -> Result<PathBuf, DownloadError> {
    let parsed = Url::parse(url).map_err(|err| DownloadError::Transfer {
        version: version.to_string(),
        url: url.to_string(),
        reason: err.to_string(),
    })?;
    let file_name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map_or_else(|| format!("python-{version}-amd64.exe"), ToString::to_string);
    Ok(env::temp_dir().join(file_name))
}

/// Unattended installer arguments targeting `install_dir`.
#[must_use]
pub fn installer_args(install_dir: &Path) -> Vec<String> {
    vec![
        "/quiet".to_string(),
        "InstallAllUsers=0".to_string(),
        "PrependPath=0".to_string(),
        format!("TargetDir={}", install_dir.display()),
        "Include_launcher=0".to_string(),
        "Include_test=0".to_string(),
        "SimpleInstall=1".to_string(),
    ]
}

/// Installs `token` into its managed directory and returns that directory.
///
/// An existing directory counts as installed and is returned untouched, even
/// if an earlier install was interrupted.
///
/// # Errors
/// Returns [`PypxError::Download`] when the installer cannot be fetched and
/// [`PypxError::Installation`] when it fails to run or leaves no interpreter.
pub fn install(
    config: &PypxConfig,
    effects: &dyn Effects,
    token: &str,
) -> Result<PathBuf, PypxError> {
    let install_dir = config.install_dir(token);
    if install_dir.exists() {
        debug!(dir = %install_dir.display(), "already installed");
        return Ok(install_dir);
    }

    let installer = download(config, effects, token)?;
    info!(version = token, target = %install_dir.display(), "installing");
    let program = installer.display().to_string();
    let output = effects
        .process()
        .run(&program, &installer_args(&install_dir))
        .map_err(|err| InstallationError::Launch {
            installer: installer.clone(),
            reason: format!("{err:#}"),
        })?;
    if !output.success() {
        return Err(InstallationError::InstallerFailed {
            installer,
            code: output.code,
        }
        .into());
    }

    let executable = config.managed_executable(&install_dir);
    if !executable.exists() {
        return Err(InstallationError::MissingExecutable {
            install_dir,
            executable,
        }
        .into());
    }
    Ok(install_dir)
}
