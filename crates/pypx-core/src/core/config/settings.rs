use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use dirs_next::home_dir;

use super::Layout;

pub const HOME_ENV: &str = "PYPX_HOME";
pub const INDEX_URL_ENV: &str = "PYPX_PYTHON_INDEX_URL";
pub const DEFAULT_INDEX_URL: &str = "https://www.python.org/ftp/python/";
pub const DEFAULT_ENV_VERSION: &str = "3.11";
pub const SUPPORTED_VERSIONS: [&str; 6] = ["3.8", "3.9", "3.10", "3.11", "3.12", "3.13"];

const HOME_DIRNAME: &str = ".pypx";
const VERSION_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Managed roots and fixed parameters shared by every operation.
///
/// Nothing here touches the filesystem; call [`ensure_roots_exist`] before
/// dispatching a command.
#[derive(Debug, Clone)]
pub struct PypxConfig {
    pub home: PathBuf,
    pub pythons_root: PathBuf,
    pub envs_root: PathBuf,
    pub index_url: String,
    pub supported_versions: Vec<String>,
    pub default_env_version: String,
    pub layout: Layout,
    pub version_query_timeout: Duration,
}

impl PypxConfig {
    /// Builds the configuration from the current process environment.
    ///
    /// # Errors
    /// Returns an error when no home directory can be determined and
    /// `PYPX_HOME` is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_snapshot(&EnvSnapshot::capture())
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> Result<Self> {
        let home = match snapshot.var(HOME_ENV) {
            Some(path) => PathBuf::from(path),
            None => home_dir()
                .ok_or_else(|| anyhow!("home directory not found; set {HOME_ENV}"))?
                .join(HOME_DIRNAME),
        };
        let mut config = Self::with_home(home);
        if let Some(url) = snapshot.var(INDEX_URL_ENV) {
            config.index_url = normalize_index_url(url);
        }
        Ok(config)
    }

    /// Configuration rooted at an explicit directory with default settings.
    #[must_use]
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            pythons_root: home.join("pythons"),
            envs_root: home.join("envs"),
            home,
            index_url: DEFAULT_INDEX_URL.to_string(),
            supported_versions: SUPPORTED_VERSIONS.iter().map(ToString::to_string).collect(),
            default_env_version: DEFAULT_ENV_VERSION.to_string(),
            layout: Layout::host(),
            version_query_timeout: VERSION_QUERY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_index_url(mut self, url: &str) -> Self {
        self.index_url = normalize_index_url(url);
        self
    }

    /// Managed installation directory named exactly by `version`.
    #[must_use]
    pub fn install_dir(&self, version: &str) -> PathBuf {
        self.pythons_root.join(version)
    }

    #[must_use]
    pub fn env_dir(&self, name: &str) -> PathBuf {
        self.envs_root.join(name)
    }

    #[must_use]
    pub fn managed_executable(&self, install_dir: &Path) -> PathBuf {
        self.layout.managed_executable(install_dir)
    }
}

/// Creates the managed-installations and environments roots.
///
/// # Errors
/// Returns an error when either directory cannot be created.
pub fn ensure_roots_exist(config: &PypxConfig) -> Result<()> {
    for root in [&config.pythons_root, &config.envs_root] {
        fs::create_dir_all(root)
            .with_context(|| format!("creating pypx directory at {}", root.display()))?;
    }
    Ok(())
}

fn normalize_index_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
