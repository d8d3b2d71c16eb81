use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::info;

use super::installer;
use super::locator::{self, InterpreterRecord, DEFAULT_SENTINEL};
use crate::core::config::context::CommandContext;
use crate::core::tooling::errors::PypxError;
use crate::core::tooling::outcome::ExecutionOutcome;

#[derive(Clone, Copy, Debug, Default)]
pub struct PythonListRequest {
    pub include_system: bool,
}

#[derive(Clone, Debug)]
pub struct PythonInstallRequest {
    pub version: String,
}

#[derive(Clone, Debug, Default)]
pub struct PythonWhichRequest {
    pub version: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RunScriptRequest {
    pub version: String,
    pub script: String,
    pub args: Vec<String>,
}

fn domain_outcome(err: impl Into<PypxError>) -> ExecutionOutcome {
    ExecutionOutcome::from_domain_error(&err.into())
}

fn record_to_json(record: &InterpreterRecord) -> Value {
    json!({
        "version": record.version,
        "path": record.path.display().to_string(),
        "origin": record.origin,
    })
}

/// Lists managed interpreters, and system ones when requested.
///
/// # Errors
/// None at present; scan failures drop candidates instead.
pub fn python_list(ctx: &CommandContext, request: &PythonListRequest) -> Result<ExecutionOutcome> {
    let records = locator::discover_all(ctx.config(), ctx.effects(), request.include_system);
    let details: Vec<Value> = records.iter().map(record_to_json).collect();
    if records.is_empty() {
        return Ok(ExecutionOutcome::success(
            "no Python interpreters found",
            json!({ "interpreters": details }),
        ));
    }
    let summary = records
        .iter()
        .map(|record| {
            format!(
                "{} → {} ({})",
                record.version,
                record.path.display(),
                record.origin.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(ExecutionOutcome::success(
        format!("available interpreters:\n{summary}"),
        json!({ "interpreters": details }),
    ))
}

/// Installs a managed interpreter without running anything.
///
/// # Errors
/// Domain failures are reported as user errors, not as `Err`.
pub fn python_install(
    ctx: &CommandContext,
    request: &PythonInstallRequest,
) -> Result<ExecutionOutcome> {
    let config = ctx.config();
    let already = config.install_dir(&request.version).exists();
    match installer::install(config, ctx.effects(), &request.version) {
        Ok(dir) => {
            let message = if already {
                format!("Python {} already installed at {}", request.version, dir.display())
            } else {
                format!("installed Python {} into {}", request.version, dir.display())
            };
            Ok(ExecutionOutcome::success(
                message,
                json!({
                    "version": request.version,
                    "install_dir": dir.display().to_string(),
                    "already_installed": already,
                }),
            ))
        }
        Err(err) => Ok(domain_outcome(err)),
    }
}

/// Prints the interpreter a version token resolves to.
///
/// # Errors
/// Domain failures are reported as user errors, not as `Err`.
pub fn python_which(
    ctx: &CommandContext,
    request: &PythonWhichRequest,
) -> Result<ExecutionOutcome> {
    let token = request.version.as_deref().unwrap_or(DEFAULT_SENTINEL);
    match locator::resolve(ctx.config(), ctx.effects(), Some(token)) {
        Ok(path) => Ok(ExecutionOutcome::success(
            path.display().to_string(),
            json!({ "version": token, "path": path.display().to_string() }),
        )),
        Err(err) => Ok(domain_outcome(err)),
    }
}

/// Runs a script under the requested version, installing it on a miss.
///
/// # Errors
/// Returns an error when the interpreter process cannot be started.
pub fn run_script(ctx: &CommandContext, request: &RunScriptRequest) -> Result<ExecutionOutcome> {
    let config = ctx.config();
    let effects = ctx.effects();
    let python = match locator::resolve(config, effects, Some(&request.version)) {
        Ok(path) => path,
        Err(missing) => {
            info!(version = %request.version, "{missing}, installing");
            if let Err(err) = installer::install(config, effects, &request.version) {
                return Ok(domain_outcome(err));
            }
            match locator::resolve(config, effects, Some(&request.version)) {
                Ok(path) => path,
                Err(err) => return Ok(domain_outcome(err)),
            }
        }
    };

    let program = python.display().to_string();
    let mut args = Vec::with_capacity(request.args.len() + 1);
    args.push(request.script.clone());
    args.extend(request.args.iter().cloned());
    let output = effects
        .process()
        .run(&program, &args)
        .with_context(|| format!("running {} with {program}", request.script))?;

    let details = json!({
        "python": program,
        "script": request.script,
        "code": output.code,
    });
    if output.success() {
        Ok(ExecutionOutcome::success(String::new(), details))
    } else {
        Ok(ExecutionOutcome::user_error(
            format!("{} exited with status {}", request.script, output.code),
            details,
        ))
    }
}
