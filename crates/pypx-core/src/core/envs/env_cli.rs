use anyhow::Result;
use serde_json::json;

use super::venv_manager;
use crate::core::config::context::CommandContext;
use crate::core::tooling::errors::PypxError;
use crate::core::tooling::outcome::ExecutionOutcome;

pub struct EnvListRequest;

#[derive(Clone, Debug)]
pub struct EnvCreateRequest {
    pub name: Option<String>,
    pub python: Option<String>,
}

#[derive(Clone, Debug)]
pub struct EnvActivateRequest {
    pub name: String,
}

/// Lists environment names, sorted.
///
/// # Errors
/// None at present; an unreadable root lists as empty.
pub fn env_list(ctx: &CommandContext, _request: &EnvListRequest) -> Result<ExecutionOutcome> {
    let mut names = venv_manager::list_all(ctx.config());
    names.sort();
    if names.is_empty() {
        return Ok(ExecutionOutcome::success(
            "no environments",
            json!({ "environments": names }),
        ));
    }
    let summary = names
        .iter()
        .map(|name| format!("  {name}"))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(ExecutionOutcome::success(
        format!("environments:\n{summary}"),
        json!({ "environments": names }),
    ))
}

/// Creates an environment, named `pypx-<version>` when no name is given.
///
/// # Errors
/// Domain failures are reported as user errors, not as `Err`.
pub fn env_create(ctx: &CommandContext, request: &EnvCreateRequest) -> Result<ExecutionOutcome> {
    let config = ctx.config();
    let version = request
        .python
        .as_deref()
        .unwrap_or(config.default_env_version.as_str());
    let name = request
        .name
        .clone()
        .unwrap_or_else(|| venv_manager::default_env_name(version));
    match venv_manager::create(config, ctx.effects(), version, Some(&name)) {
        Ok(path) => Ok(ExecutionOutcome::success(
            format!("environment {name} ready at {}", path.display()),
            json!({
                "name": name,
                "python": version,
                "path": path.display().to_string(),
            }),
        )),
        Err(err) => Ok(ExecutionOutcome::from_domain_error(&PypxError::from(err))),
    }
}

/// Opens a shell inside a named environment.
///
/// # Errors
/// Domain failures are reported as user errors, not as `Err`.
pub fn env_activate(
    ctx: &CommandContext,
    request: &EnvActivateRequest,
) -> Result<ExecutionOutcome> {
    match venv_manager::activate(ctx.config(), ctx.effects(), &request.name) {
        Ok(()) => Ok(ExecutionOutcome::success(
            format!("left environment {}", request.name),
            json!({ "name": request.name }),
        )),
        Err(err) => Ok(ExecutionOutcome::from_domain_error(&PypxError::from(err))),
    }
}
