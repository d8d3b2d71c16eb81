//! Typed failures for interpreter lookup, installation and environments.
//!
//! Each variant carries the underlying cause in its rendered message so the
//! CLI can print it verbatim, while callers match on the variant instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("no default Python interpreter found on PATH")]
    Default,
    #[error("Python {version} not found")]
    Version { version: String },
}

impl NotFoundError {
    pub fn new(version: impl Into<String>) -> Self {
        Self::Version {
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DownloadError {
    #[error("failed to reach {url}: {reason}")]
    IndexUnreachable { url: String, reason: String },
    #[error("no versions found for {prefix}")]
    NoVersions { prefix: String },
    #[error("no installer found for {prefix}")]
    NoInstaller { prefix: String },
    #[error("HTTP error {status} while downloading {url}")]
    Http { status: u16, url: String },
    #[error("failed to download Python {version} from {url}: {reason}")]
    Transfer {
        version: String,
        url: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstallationError {
    #[error("failed to run installer {}: {reason}", .installer.display())]
    Launch { installer: PathBuf, reason: String },
    #[error("installer {} exited with status {code}", .installer.display())]
    InstallerFailed { installer: PathBuf, code: i32 },
    #[error("{} not found after installing into {}", .executable.display(), .install_dir.display())]
    MissingExecutable {
        install_dir: PathBuf,
        executable: PathBuf,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VenvError {
    #[error("failed to resolve Python {version}: {source}")]
    Interpreter {
        version: String,
        #[source]
        source: NotFoundError,
    },
    #[error("failed to create environment at {}: {reason}", .path.display())]
    Creation { path: PathBuf, reason: String },
    #[error("environment \"{name}\" not found")]
    NotFound { name: String },
    #[error("activation script not found: {}", .path.display())]
    MissingActivationScript { path: PathBuf },
    #[error("failed to launch {shell}: {reason}")]
    Shell { shell: String, reason: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PypxError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Installation(#[from] InstallationError),
    #[error(transparent)]
    Venv(#[from] VenvError),
}

impl PypxError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Download(_) => "download",
            Self::Installation(_) => "installation",
            Self::Venv(_) => "venv",
        }
    }

    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotFound(NotFoundError::Version { version }) => {
                Some(format!("run `pypx install {version}` to install it"))
            }
            Self::NotFound(NotFoundError::Default) => {
                Some("install Python or pass an explicit version".to_string())
            }
            Self::Venv(VenvError::NotFound { .. }) => {
                Some("run `pypx env list` to see available environments".to_string())
            }
            Self::Installation(InstallationError::MissingExecutable { install_dir, .. }) => {
                Some(format!(
                    "remove {} and install again",
                    install_dir.display()
                ))
            }
            _ => None,
        }
    }
}
