use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::PypxError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    /// Renders a domain error as a user-facing outcome, keeping its kind for
    /// machine consumers.
    #[must_use]
    pub fn from_domain_error(err: &PypxError) -> Self {
        let mut details = json!({
            "kind": err.kind(),
            "error": err.to_string(),
        });
        if let Some(hint) = err.hint() {
            details["hint"] = Value::String(hint);
        }
        Self::user_error(err.to_string(), details)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}
