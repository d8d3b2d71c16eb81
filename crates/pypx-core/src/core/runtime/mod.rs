pub(crate) mod effects;
pub(crate) mod interrupt;
pub(crate) mod net;
pub(crate) mod process;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

use serde_json::{json, Value};

use crate::core::config::context::CommandInfo;
use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};

pub const PYPX_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandGroup {
    List,
    Install,
    Run,
    Which,
    Env,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandGroup::List => "list",
            CommandGroup::Install => "install",
            CommandGroup::Run => "run",
            CommandGroup::Which => "which",
            CommandGroup::Env => "env",
        };
        f.write_str(name)
    }
}

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome, code: i32) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(info, &outcome.message),
        "exit_code": code,
        "details": details,
    })
}

/// Prefixes `message` with the command that produced it (`pypx env list: ...`).
#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let group_name = info.group.to_string();
    let prefix = if group_name == info.name {
        format!("pypx {}", info.name)
    } else {
        format!("pypx {} {}", group_name, info.name)
    };
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}
