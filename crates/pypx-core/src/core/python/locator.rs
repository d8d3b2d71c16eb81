//! Finding interpreters on the search path and in the managed tree.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::version::{compare_versions, extract_version};
use crate::core::config::PypxConfig;
use crate::core::runtime::effects::Effects;
use crate::core::tooling::errors::NotFoundError;

/// Token that selects the generic default interpreter.
pub const DEFAULT_SENTINEL: &str = "default";

const DEFAULT_NAMES: [&str; 2] = ["python3", "python"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Managed,
    System,
}

impl Origin {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Managed => "pypx",
            Self::System => "global",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InterpreterRecord {
    pub version: String,
    pub path: PathBuf,
    pub origin: Origin,
}

/// Resolves a version token to an interpreter path.
///
/// A missing token (or `default`) picks the first of `python3`/`python` on the
/// search path. Any other token is used literally: first as a `python<token>`
/// executable on the search path, then as a managed directory name. Prefix
/// tokens are never expanded to an installed patch release.
///
/// # Errors
/// Returns [`NotFoundError`] when neither strategy yields an interpreter.
pub fn resolve(
    config: &PypxConfig,
    effects: &dyn Effects,
    version: Option<&str>,
) -> Result<PathBuf, NotFoundError> {
    let paths = effects.paths();
    let token = match version {
        None | Some(DEFAULT_SENTINEL) => {
            return DEFAULT_NAMES
                .iter()
                .find_map(|name| paths.find_executable(name))
                .ok_or(NotFoundError::Default);
        }
        Some(token) => token,
    };

    if let Some(path) = paths.find_executable(&format!("python{token}")) {
        debug!(version = token, path = %path.display(), "resolved system interpreter");
        return Ok(path);
    }

    let managed = config.managed_executable(&config.install_dir(token));
    if managed.exists() {
        debug!(version = token, path = %managed.display(), "resolved managed interpreter");
        return Ok(managed);
    }

    Err(NotFoundError::new(token))
}

/// Lists managed interpreters, plus well-known system ones when
/// `include_system` is set, newest first.
///
/// Candidates whose version cannot be queried are left out.
#[must_use]
pub fn discover_all(
    config: &PypxConfig,
    effects: &dyn Effects,
    include_system: bool,
) -> Vec<InterpreterRecord> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();

    if include_system {
        for name in system_probe_names(config) {
            let Some(path) = effects.paths().find_executable(&name) else {
                continue;
            };
            if !seen.insert(dedup_key(&path)) {
                continue;
            }
            if let Some(version) = query_version(config, effects, &path) {
                records.push(InterpreterRecord {
                    version,
                    path,
                    origin: Origin::System,
                });
            }
        }
    }

    for install_dir in managed_dirs(&config.pythons_root) {
        let executable = config.managed_executable(&install_dir);
        if !executable.exists() || !seen.insert(dedup_key(&executable)) {
            continue;
        }
        if let Some(version) = query_version(config, effects, &executable) {
            records.push(InterpreterRecord {
                version,
                path: executable,
                origin: Origin::Managed,
            });
        }
    }

    records.sort_by(|left, right| compare_versions(&right.version, &left.version));
    records
}

fn system_probe_names(config: &PypxConfig) -> Vec<String> {
    let mut versions: Vec<&str> = config
        .supported_versions
        .iter()
        .map(String::as_str)
        .collect();
    versions.sort_by(|left, right| compare_versions(right, left));
    versions
        .into_iter()
        .map(|version| format!("python{version}"))
        .chain(DEFAULT_NAMES.iter().map(ToString::to_string))
        .collect()
}

fn managed_dirs(root: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(root = %root.display(), %err, "managed root unreadable");
            return Vec::new();
        }
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect()
}

fn dedup_key(path: &Path) -> String {
    path.display().to_string().to_lowercase()
}

/// Runs `<executable> --version` and parses the banner.
pub(crate) fn query_version(
    config: &PypxConfig,
    effects: &dyn Effects,
    executable: &Path,
) -> Option<String> {
    let program = executable.display().to_string();
    let output = match effects.process().capture(
        &program,
        &["--version".to_string()],
        config.version_query_timeout,
    ) {
        Ok(output) => output,
        Err(err) => {
            debug!(%program, error = %err, "version query failed");
            return None;
        }
    };
    if !output.success() {
        debug!(%program, code = output.code, "version query exited unsuccessfully");
        return None;
    }
    let banner = match output.stdout.trim() {
        "" => output.stderr.trim(),
        stdout => stdout,
    };
    extract_version(banner)
}
