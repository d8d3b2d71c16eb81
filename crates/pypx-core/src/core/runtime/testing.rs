//! In-memory effects for unit tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};

use super::effects::{Effects, FetchError, HttpClient, PathLookup, ProcessRunner};
use super::process::RunOutput;

type RunHook = Box<dyn Fn(&str, &[String]) -> Result<RunOutput> + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CallKind {
    Capture,
    Run,
    Interactive,
}

#[derive(Clone, Debug)]
pub(crate) struct RecordedCall {
    pub kind: CallKind,
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeEffects {
    paths: FakePaths,
    process: FakeRunner,
    http: FakeHttp,
}

impl FakeEffects {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_executable(&self, name: &str, path: impl Into<PathBuf>) {
        self.paths
            .entries
            .lock()
            .expect("paths lock")
            .insert(name.to_string(), path.into());
    }

    /// Makes `program --version` print `banner` and exit cleanly.
    pub(crate) fn set_banner(&self, program: impl AsRef<Path>, banner: &str) {
        self.set_capture(
            program,
            RunOutput {
                code: 0,
                stdout: banner.to_string(),
                stderr: String::new(),
            },
        );
    }

    /// Scripts the full result of capturing `program`.
    pub(crate) fn set_capture(&self, program: impl AsRef<Path>, output: RunOutput) {
        self.process
            .captures
            .lock()
            .expect("capture lock")
            .insert(program.as_ref().display().to_string(), output);
    }

    pub(crate) fn on_run<F>(&self, hook: F)
    where
        F: Fn(&str, &[String]) -> Result<RunOutput> + Send + Sync + 'static,
    {
        *self.process.hook.lock().expect("hook lock") = Some(Box::new(hook));
    }

    pub(crate) fn set_page(&self, url: &str, body: Result<String, FetchError>) {
        self.http
            .pages
            .lock()
            .expect("pages lock")
            .insert(url.to_string(), body);
    }

    pub(crate) fn set_download(&self, url: &str, body: Result<Vec<u8>, FetchError>) {
        self.http
            .downloads
            .lock()
            .expect("downloads lock")
            .insert(url.to_string(), body);
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.process.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn calls_of(&self, kind: &CallKind) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| &call.kind == kind)
            .collect()
    }

    pub(crate) fn fetched_urls(&self) -> Vec<String> {
        self.http.requested.lock().expect("requested lock").clone()
    }
}

impl Effects for FakeEffects {
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

#[derive(Default)]
struct FakePaths {
    entries: Mutex<HashMap<String, PathBuf>>,
}

impl PathLookup for FakePaths {
    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        self.entries.lock().expect("paths lock").get(name).cloned()
    }
}

#[derive(Default)]
struct FakeRunner {
    captures: Mutex<HashMap<String, RunOutput>>,
    hook: Mutex<Option<RunHook>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeRunner {
    fn record(&self, kind: CallKind, program: &str, args: &[String]) {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            kind,
            program: program.to_string(),
            args: args.to_vec(),
        });
    }
}

impl ProcessRunner for FakeRunner {
    fn capture(&self, program: &str, args: &[String], _timeout: Duration) -> Result<RunOutput> {
        self.record(CallKind::Capture, program, args);
        self.captures
            .lock()
            .expect("capture lock")
            .get(program)
            .cloned()
            .ok_or_else(|| anyhow!("failed to start {program}"))
    }

    fn run(&self, program: &str, args: &[String]) -> Result<RunOutput> {
        self.record(CallKind::Run, program, args);
        match self.hook.lock().expect("hook lock").as_ref() {
            Some(hook) => hook(program, args),
            None => Ok(RunOutput {
                code: 0,
                stdout: String::new(),
                stderr: String::new(),
            }),
        }
    }

    fn interactive(&self, program: &str, args: &[String]) -> Result<i32> {
        self.record(CallKind::Interactive, program, args);
        Ok(0)
    }
}

#[derive(Default)]
struct FakeHttp {
    pages: Mutex<HashMap<String, Result<String, FetchError>>>,
    downloads: Mutex<HashMap<String, Result<Vec<u8>, FetchError>>>,
    requested: Mutex<Vec<String>>,
}

impl HttpClient for FakeHttp {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.requested
            .lock()
            .expect("requested lock")
            .push(url.to_string());
        self.pages
            .lock()
            .expect("pages lock")
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Transfer {
                    message: "connection refused".to_string(),
                })
            })
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        self.requested
            .lock()
            .expect("requested lock")
            .push(url.to_string());
        let body = self
            .downloads
            .lock()
            .expect("downloads lock")
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Status { code: 404 }))?;
        fs::write(dest, &body).map_err(|err| FetchError::Transfer {
            message: err.to_string(),
        })?;
        Ok(body.len() as u64)
    }
}
