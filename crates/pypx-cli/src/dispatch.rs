use color_eyre::Result;
use pypx_core::{
    CommandContext, CommandGroup, CommandInfo, EnvActivateRequest, EnvCreateRequest,
    EnvListRequest, ExecutionOutcome, PythonInstallRequest, PythonListRequest, PythonWhichRequest,
    PypxError, RunScriptRequest,
};

use crate::cli::{CommandGroupCli, EnvCommand};

pub fn dispatch_command(
    ctx: &CommandContext,
    group: &CommandGroupCli,
) -> Result<(CommandInfo, ExecutionOutcome)> {
    match group {
        CommandGroupCli::List(args) => {
            let info = CommandInfo::new(CommandGroup::List, "list");
            let request = PythonListRequest {
                include_system: args.all,
            };
            core_call(info, || pypx_core::python_list(ctx, &request))
        }
        CommandGroupCli::Install(args) => {
            let info = CommandInfo::new(CommandGroup::Install, "install");
            let request = PythonInstallRequest {
                version: args.version.clone(),
            };
            core_call(info, || pypx_core::python_install(ctx, &request))
        }
        CommandGroupCli::Run(args) => {
            let info = CommandInfo::new(CommandGroup::Run, "run");
            let request = RunScriptRequest {
                version: args.version.clone(),
                script: args.script.clone(),
                args: args.args.clone(),
            };
            core_call(info, || pypx_core::run_script(ctx, &request))
        }
        CommandGroupCli::Which(args) => {
            let info = CommandInfo::new(CommandGroup::Which, "which");
            let request = PythonWhichRequest {
                version: args.version.clone(),
            };
            core_call(info, || pypx_core::python_which(ctx, &request))
        }
        CommandGroupCli::Env(cmd) => match cmd {
            EnvCommand::List => {
                let info = CommandInfo::new(CommandGroup::Env, "list");
                core_call(info, || pypx_core::env_list(ctx, &EnvListRequest))
            }
            EnvCommand::Create(args) => {
                let info = CommandInfo::new(CommandGroup::Env, "create");
                let request = EnvCreateRequest {
                    name: args.name.clone(),
                    python: args.python.clone(),
                };
                core_call(info, || pypx_core::env_create(ctx, &request))
            }
            EnvCommand::Activate(args) => {
                let info = CommandInfo::new(CommandGroup::Env, "activate");
                let request = EnvActivateRequest {
                    name: args.name.clone(),
                };
                core_call(info, || pypx_core::env_activate(ctx, &request))
            }
        },
    }
}

fn core_call<F>(info: CommandInfo, action: F) -> Result<(CommandInfo, ExecutionOutcome)>
where
    F: FnOnce() -> anyhow::Result<ExecutionOutcome>,
{
    match action() {
        Ok(outcome) => Ok((info, outcome)),
        Err(err) => {
            if let Some(domain) = err.downcast_ref::<PypxError>() {
                return Ok((info, ExecutionOutcome::from_domain_error(domain)));
            }
            let issues: Vec<String> = err.chain().map(ToString::to_string).collect();
            tracing::debug!(error = ?err, "command failed unexpectedly");
            Ok((
                info,
                ExecutionOutcome::failure(
                    format!("{err:#}"),
                    serde_json::json!({
                        "reason": "internal_error",
                        "error": err.to_string(),
                        "issues": issues,
                        "hint": "re-run with -v for more detail",
                    }),
                ),
            ))
        }
    }
}
