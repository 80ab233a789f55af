mod classify_text;
mod error_text;
mod format;
mod json;
mod mode;
mod rewards_text;

use std::io;

use greenbean_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "scan" => classify_text::render_scan(&success.data),
        "classify" => classify_text::render_classify(&success.data),
        "allow-list show" => classify_text::render_allow_list(&success.data),
        "rewards show" => rewards_text::render_rewards_show(&success.data),
        "rewards earn" => rewards_text::render_rewards_earn(&success.data),
        "rewards reset" | "activity reminder" | "activity medicine" => {
            rewards_text::render_message_with_rewards(&success.data)
        }
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
