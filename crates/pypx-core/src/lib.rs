#![deny(clippy::all, warnings)]

mod core;

pub use crate::core::config::context::{CommandContext, CommandInfo};
pub use crate::core::config::{ensure_roots_exist, Layout, PypxConfig};
pub use crate::core::runtime::effects::{
    Effects, FetchError, HttpClient, PathLookup, ProcessRunner, SharedEffects, SystemEffects,
};
pub use crate::core::runtime::interrupt::{install_interrupt_handler, interrupts_suspended};
pub use crate::core::runtime::process::RunOutput;
pub use crate::core::runtime::{format_status_message, to_json_response, CommandGroup};
pub use crate::core::tooling::errors::{
    DownloadError, InstallationError, NotFoundError, PypxError, VenvError,
};
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};

pub use crate::core::envs::env_cli::{
    env_activate, env_create, env_list, EnvActivateRequest, EnvCreateRequest, EnvListRequest,
};
pub use crate::core::envs::venv_manager;
pub use crate::core::python::python_cli::{
    python_install, python_list, python_which, run_script, PythonInstallRequest,
    PythonListRequest, PythonWhichRequest, RunScriptRequest,
};
pub use crate::core::python::{installer, locator, version};

pub use crate::core::runtime::PYPX_VERSION;
