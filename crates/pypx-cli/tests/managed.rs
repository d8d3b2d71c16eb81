#![cfg(unix)]

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::tempdir;

mod common;

use common::{fake_managed_python, parse_json, pypx, pypx_process, stdout_of};

#[test]
fn list_reports_managed_interpreter() {
    let temp = tempdir().expect("tempdir");
    let python = fake_managed_python(temp.path(), "3.12.4");

    let assert = pypx(temp.path()).args(["--json", "list"]).assert().success();
    let payload = parse_json(&assert);
    let interpreters = payload["details"]["interpreters"]
        .as_array()
        .expect("interpreters array");
    assert_eq!(interpreters.len(), 1);
    assert_eq!(interpreters[0]["version"], "3.12.4");
    assert_eq!(interpreters[0]["origin"], "managed");
    assert_eq!(interpreters[0]["path"], python.display().to_string());

    let human = pypx(temp.path()).arg("list").assert().success();
    assert!(stdout_of(&human).contains("3.12.4 → "));
    assert!(stdout_of(&human).contains("(pypx)"));
}

#[test]
fn which_resolves_managed_directory() {
    let temp = tempdir().expect("tempdir");
    let python = fake_managed_python(temp.path(), "3.12.4");

    let assert = pypx(temp.path())
        .args(["--json", "which", "3.12.4"])
        .assert()
        .success();
    let payload = parse_json(&assert);
    assert_eq!(payload["details"]["path"], python.display().to_string());
}

#[test]
fn run_forwards_arguments_and_reports_script_failure() {
    let temp = tempdir().expect("tempdir");
    fake_managed_python(temp.path(), "3.12.4");

    let ok = pypx(temp.path())
        .args(["run", "3.12.4", "hello.py", "--name", "world"])
        .assert()
        .success();
    assert!(stdout_of(&ok).contains("args: hello.py --name world"));

    let failed = pypx(temp.path())
        .args(["--json", "run", "3.12.4", "fail.py"])
        .assert()
        .code(1);
    let stdout = stdout_of(&failed);
    let json_start = stdout.find('{').expect("json payload");
    let payload: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("valid json");
    assert_eq!(payload["status"], "user-error");
    assert_eq!(payload["details"]["code"], 3);
}

#[test]
fn env_create_is_idempotent_and_listed() {
    let temp = tempdir().expect("tempdir");
    fake_managed_python(temp.path(), "3.12.4");

    pypx(temp.path())
        .args(["env", "create", "work", "--python", "3.12.4"])
        .assert()
        .success();
    let activate = temp.path().join("envs").join("work").join("bin").join("activate");
    assert!(activate.exists());

    pypx(temp.path())
        .args(["env", "create", "work", "--python", "3.99.9"])
        .assert()
        .success();

    let listed = pypx(temp.path()).args(["--json", "env", "list"]).assert().success();
    assert_eq!(
        parse_json(&listed)["details"]["environments"],
        serde_json::json!(["work"])
    );
}

#[test]
fn env_create_without_name_uses_version() {
    let temp = tempdir().expect("tempdir");
    fake_managed_python(temp.path(), "3.12.4");

    let assert = pypx(temp.path())
        .args(["--json", "env", "create", "--python", "3.12.4"])
        .assert()
        .success();
    assert_eq!(parse_json(&assert)["details"]["name"], "pypx-3.12.4");
    assert!(temp.path().join("envs").join("pypx-3.12.4").join("bin").join("activate").exists());
}

#[test]
fn interrupt_during_run_exits_130() {
    let temp = tempdir().expect("tempdir");
    fake_managed_python(temp.path(), "3.12.4");

    let mut child = pypx_process(temp.path())
        .args(["run", "3.12.4", "sleep.py"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn pypx");

    let started = temp.path().join("started");
    let deadline = Instant::now() + Duration::from_secs(15);
    while !started.exists() {
        assert!(Instant::now() < deadline, "script never started");
        thread::sleep(Duration::from_millis(50));
    }

    let kill = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("send SIGINT");
    assert!(kill.success());

    let status = child.wait().expect("wait for pypx");
    let mut stderr = String::new();
    child
        .stderr
        .take()
        .expect("stderr pipe")
        .read_to_string(&mut stderr)
        .expect("read stderr");
    assert_eq!(status.code(), Some(130));
    assert!(stderr.contains("operation cancelled"), "stderr: {stderr}");
}
