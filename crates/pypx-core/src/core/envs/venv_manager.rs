//! Named virtual environments under the managed envs root.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::core::config::PypxConfig;
use crate::core::python::locator;
use crate::core::runtime::effects::Effects;
use crate::core::tooling::errors::VenvError;

const VENV_MODULE: &str = "venv";

/// Name used when `env create` is not given one.
#[must_use]
pub fn default_env_name(version: &str) -> String {
    format!("pypx-{version}")
}

/// Creates an environment with the interpreter `version` resolves to.
///
/// An existing directory with the target name is returned as is.
///
/// # Errors
/// Returns [`VenvError::Interpreter`] when `version` cannot be resolved and
/// [`VenvError::Creation`] when `python -m venv` fails.
pub fn create(
    config: &PypxConfig,
    effects: &dyn Effects,
    version: &str,
    name: Option<&str>,
) -> Result<PathBuf, VenvError> {
    let name = name.map_or_else(|| default_env_name(version), ToString::to_string);
    let env_dir = config.env_dir(&name);
    if env_dir.exists() {
        debug!(env = %name, "environment already exists");
        return Ok(env_dir);
    }

    let python = locator::resolve(config, effects, Some(version)).map_err(|source| {
        VenvError::Interpreter {
            version: version.to_string(),
            source,
        }
    })?;
    let program = python.display().to_string();
    info!(env = %name, python = %program, "creating environment");
    let args = vec![
        "-m".to_string(),
        VENV_MODULE.to_string(),
        env_dir.display().to_string(),
    ];
    let output = effects
        .process()
        .run(&program, &args)
        .map_err(|err| VenvError::Creation {
            path: env_dir.clone(),
            reason: format!("{err:#}"),
        })?;
    if !output.success() {
        return Err(VenvError::Creation {
            path: env_dir,
            reason: format!("{program} -m {VENV_MODULE} exited with status {}", output.code),
        });
    }
    Ok(env_dir)
}

/// Opens an interactive shell with the environment activated and waits for
/// it to exit. The shell's own exit status is not an error.
///
/// # Errors
/// Returns [`VenvError::NotFound`] or [`VenvError::MissingActivationScript`]
/// before launching anything, and [`VenvError::Shell`] when the shell cannot
/// be started.
pub fn activate(config: &PypxConfig, effects: &dyn Effects, name: &str) -> Result<(), VenvError> {
    let env_dir = config.env_dir(name);
    if !env_dir.is_dir() {
        return Err(VenvError::NotFound {
            name: name.to_string(),
        });
    }
    let script = config.layout.activation_script(&env_dir);
    if !script.exists() {
        return Err(VenvError::MissingActivationScript { path: script });
    }

    let (shell, args) = config.layout.activation_shell(&script);
    info!(env = name, %shell, "activating environment");
    let code = effects
        .process()
        .interactive(&shell, &args)
        .map_err(|err| VenvError::Shell {
            shell: shell.clone(),
            reason: format!("{err:#}"),
        })?;
    debug!(code, "shell exited");
    Ok(())
}

/// Environment directory names, in filesystem order.
#[must_use]
pub fn list_all(config: &PypxConfig) -> Vec<String> {
    let Ok(entries) = fs::read_dir(&config.envs_root) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}
