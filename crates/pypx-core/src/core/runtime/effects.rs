use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use once_cell::sync::OnceCell;
use thiserror::Error;

use super::net::ReqwestHttpClient;
use super::process::{
    run_command_captured, run_command_inherited, run_command_interactive, RunOutput,
};

/// Failure of a single HTTP exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP status {code}")]
    Status { code: u16 },
    #[error("{message}")]
    Transfer { message: String },
}

pub trait PathLookup: Send + Sync {
    /// Absolute path of `name` on the process search path, if any.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;
}

pub trait ProcessRunner: Send + Sync {
    fn capture(&self, program: &str, args: &[String], timeout: Duration) -> Result<RunOutput>;
    fn run(&self, program: &str, args: &[String]) -> Result<RunOutput>;
    fn interactive(&self, program: &str, args: &[String]) -> Result<i32>;
}

pub trait HttpClient: Send + Sync {
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
    fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

pub trait Effects: Send + Sync {
    fn paths(&self) -> &dyn PathLookup;
    fn process(&self) -> &dyn ProcessRunner;
    fn http(&self) -> &dyn HttpClient;
}

pub type SharedEffects = Arc<dyn Effects>;

pub struct SystemEffects {
    paths: SystemPathLookup,
    process: SystemProcessRunner,
    http: SystemHttpClient,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            paths: SystemPathLookup,
            process: SystemProcessRunner,
            http: SystemHttpClient::default(),
        }
    }

    #[must_use]
    pub fn shared() -> SharedEffects {
        Arc::new(Self::new())
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn paths(&self) -> &dyn PathLookup {
        &self.paths
    }

    fn process(&self) -> &dyn ProcessRunner {
        &self.process
    }

    fn http(&self) -> &dyn HttpClient {
        &self.http
    }
}

struct SystemPathLookup;

impl PathLookup for SystemPathLookup {
    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn capture(&self, program: &str, args: &[String], timeout: Duration) -> Result<RunOutput> {
        run_command_captured(program, args, Some(timeout))
    }

    fn run(&self, program: &str, args: &[String]) -> Result<RunOutput> {
        run_command_inherited(program, args)
    }

    fn interactive(&self, program: &str, args: &[String]) -> Result<i32> {
        run_command_interactive(program, args)
    }
}

#[derive(Default)]
struct SystemHttpClient {
    inner: OnceCell<ReqwestHttpClient>,
}

impl SystemHttpClient {
    fn client(&self) -> Result<&ReqwestHttpClient, FetchError> {
        self.inner
            .get_or_try_init(ReqwestHttpClient::new)
            .map_err(|err| FetchError::Transfer {
                message: format!("{err:#}"),
            })
    }
}

impl HttpClient for SystemHttpClient {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.client()?.get_text(url)
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        self.client()?.download_to(url, dest)
    }
}
