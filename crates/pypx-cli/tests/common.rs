#![allow(dead_code)]

use std::{fs, path::Path, path::PathBuf};

use assert_cmd::assert::Assert;
use assert_cmd::cargo::{cargo_bin, cargo_bin_cmd};
use assert_cmd::Command;
use serde_json::Value;

/// Nothing listens on the discard port, so index and download requests fail fast.
pub const UNREACHABLE_INDEX: &str = "http://127.0.0.1:9/";

/// `pypx` with its home and release index pinned to test-owned locations.
pub fn pypx(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("pypx");
    cmd.env("PYPX_HOME", home)
        .env("PYPX_PYTHON_INDEX_URL", UNREACHABLE_INDEX)
        .env("NO_COLOR", "1")
        .env_remove("PYPX_KEEP_PROXIES");
    cmd
}

/// Same environment as [`pypx`], as a plain command for tests that need the child handle.
pub fn pypx_process(home: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(cargo_bin!("pypx"));
    cmd.env("PYPX_HOME", home)
        .env("PYPX_PYTHON_INDEX_URL", UNREACHABLE_INDEX)
        .env("NO_COLOR", "1")
        .env_remove("PYPX_KEEP_PROXIES");
    cmd
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stderr_of(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).to_string()
}

pub fn stdout_of(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).to_string()
}

/// Lays down a shell script posing as a managed interpreter.
///
/// It answers `--version`, fakes `-m venv <dir>`, echoes script arguments, and
/// exits 3 when the script is named `fail.py`. `sleep.py` touches
/// `$PYPX_HOME/started` and then sleeps detached from the caller's pipes.
#[cfg(unix)]
pub fn fake_managed_python(home: &Path, version: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = home.join("pythons").join(version).join("bin");
    fs::create_dir_all(&bin).expect("create fake python dir");
    let python = bin.join("python");
    let script = format!(
        r##"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "Python {version}"
    exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
    mkdir -p "$3/bin"
    echo "# activate" > "$3/bin/activate"
    exit 0
fi
if [ "$1" = "sleep.py" ]; then
    touch "$PYPX_HOME/started"
    exec sleep 20 </dev/null >/dev/null 2>&1
fi
echo "args: $*"
if [ "$1" = "fail.py" ]; then
    exit 3
fi
exit 0
"##
    );
    fs::write(&python, script).expect("write fake python");
    let mut perms = fs::metadata(&python).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&python, perms).expect("chmod fake python");
    python
}
