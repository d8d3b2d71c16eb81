use std::{
    io::Read,
    process::{Command, Stdio},
    thread,
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use wait_timeout::ChildExt;

use super::interrupt::InterruptSuspendGuard;

const MAX_CAPTURE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Execute a program and capture stdout/stderr, killing it once `timeout`
/// elapses.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned, times out, or its
/// output streams cannot be read.
pub fn run_command_captured(
    program: &str,
    args: &[String],
    timeout: Option<Duration>,
) -> Result<RunOutput> {
    let mut command = Command::new(program);
    command.args(args);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout missing for {program}"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr missing for {program}"))?;
    let stdout_handle = thread::spawn(move || read_to_string_limited(stdout, MAX_CAPTURE_BYTES));
    let stderr_handle = thread::spawn(move || read_to_string_limited(stderr, MAX_CAPTURE_BYTES));

    let status = match timeout {
        Some(limit) => match child
            .wait_timeout(limit)
            .with_context(|| format!("failed to wait for {program}"))?
        {
            Some(status) => status,
            None => {
                child
                    .kill()
                    .with_context(|| format!("failed to terminate {program}"))?;
                let _ = child.wait();
                bail!("{program} timed out after {}s", limit.as_secs());
            }
        },
        None => child
            .wait()
            .with_context(|| format!("failed to wait for {program}"))?,
    };
    let code = status.code().unwrap_or(-1);
    let stdout = stdout_handle
        .join()
        .map_err(|_| anyhow!("stdout thread panicked"))??;
    let stderr = stderr_handle
        .join()
        .map_err(|_| anyhow!("stderr thread panicked"))??;
    Ok(RunOutput {
        code,
        stdout,
        stderr,
    })
}

/// Execute a program with inherited stdio and block until it exits.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned.
pub fn run_command_inherited(program: &str, args: &[String]) -> Result<RunOutput> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to start {program}"))?;
    Ok(RunOutput {
        code: status.code().unwrap_or(-1),
        stdout: String::new(),
        stderr: String::new(),
    })
}

/// Run an interactive program; Ctrl-C belongs to the child while it runs.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned.
pub fn run_command_interactive(program: &str, args: &[String]) -> Result<i32> {
    let _suspend = InterruptSuspendGuard::new();
    run_command_inherited(program, args).map(|output| output.code)
}

fn read_to_string_limited(mut reader: impl Read, limit: usize) -> Result<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        let room = limit.saturating_sub(buffer.len());
        if room < read {
            truncated = true;
        }
        buffer.extend_from_slice(&chunk[..read.min(room)]);
    }
    let mut text = String::from_utf8_lossy(&buffer).to_string();
    if truncated {
        text.push_str("\n[...truncated...]\n");
    }
    Ok(text)
}
