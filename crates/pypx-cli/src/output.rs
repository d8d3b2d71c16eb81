use atty::Stream;
use color_eyre::Result;
use pypx_core::{CommandInfo, CommandStatus, ExecutionOutcome};
use serde_json::Value;

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

#[must_use]
pub fn exit_code(status: CommandStatus) -> i32 {
    match status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError | CommandStatus::Failure => 1,
    }
}

pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = exit_code(outcome.status);

    if opts.json {
        let payload = pypx_core::to_json_response(info, outcome, code);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    if let CommandStatus::Ok = outcome.status {
        if opts.quiet || outcome.message.is_empty() {
            return Ok(code);
        }
        let style = Style::new(opts.no_color, atty::is(Stream::Stdout));
        let (head, body) = split_message(&outcome.message);
        let message = pypx_core::format_status_message(info, head);
        println!("{}", style.status(&outcome.status, &message));
        for line in body {
            println!("{}", style.detail(line));
        }
    } else {
        let style = Style::new(opts.no_color, atty::is(Stream::Stderr));
        let message = pypx_core::format_status_message(info, &outcome.message);
        eprintln!("{}", style.status(&outcome.status, &message));
        if let Some(hint) = hint_from_details(&outcome.details) {
            eprintln!("{}", style.info(&format!("Tip: {hint}")));
        }
    }

    Ok(code)
}

/// First line becomes the status line; the rest is printed as detail.
fn split_message(message: &str) -> (&str, std::str::Lines<'_>) {
    let mut lines = message.lines();
    let head = lines.next().unwrap_or_default();
    (head, lines)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}
