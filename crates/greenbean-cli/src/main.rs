mod cli;
mod dispatch;
mod output;
mod stdout_io;
mod telemetry;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use greenbean_client::ClientError;
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "GreenBean - sustainable grocery rewards

Usage:
  greenbean <command>

Start here:
  greenbean scan --help
  greenbean rewards show
";

const TOP_LEVEL_HELP: &str = "GreenBean - sustainable grocery rewards

USAGE: greenbean <command>

Scan a receipt:
  1. greenbean scan --help                        Read how points and badges work
  2. greenbean scan --dry-run <image>             Preview classification without earning points
  3. greenbean scan <image>                       Earn points for sustainable products

Check a saved extraction response offline:
  greenbean classify <path>                       Classify a saved JSON body (use `-` for stdin)

Rewards:
  greenbean rewards show                          Points, badge and progress to the next badge
  greenbean rewards earn <amount>                 Score a purchase amount by hand
  greenbean rewards reset                         Start over from zero

Activity:
  greenbean activity reminder                     Record a scheduled expiration reminder
  greenbean activity medicine <name>              Log a medicine you keep at home

Other commands:
  greenbean allow-list show                       List the sustainable-product allow-list

Add --json to any command for machine-readable output.
Set GREENBEAN_LOG=debug to see diagnostic logs on stderr.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Err(error) = telemetry::init() {
        eprintln!("greenbean: {error}; continuing without logs");
    }

    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            tracing::debug!(command = %success.command, "command completed");
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            return Ok(ExitCode::SUCCESS);
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let command_hint = if matches!(
        err.kind(),
        ErrorKind::MissingRequiredArgument
            | ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::UnknownArgument
            | ErrorKind::InvalidSubcommand
    ) {
        command_path_from_args(raw_args)
    } else {
        None
    };
    let clean_message = strip_clap_boilerplate(&err.to_string());
    let parse_error = ClientError::invalid_argument_for_command(&clean_message, command_hint);
    let mode = infer_requested_output_mode(raw_args);
    if output::print_failure(&parse_error, mode).is_err() {
        return Err(ExitCode::from(2));
    }
    Err(ExitCode::from(1))
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so the recovery steps are the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Maps raw CLI args to the subcommand path used in help hints, e.g. "rewards earn".
fn command_path_from_args(raw_args: &[String]) -> Option<&'static str> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();

    match non_flags.as_slice() {
        ["scan", ..] => Some("scan"),
        ["classify", ..] => Some("classify"),
        ["rewards", "show", ..] => Some("rewards show"),
        ["rewards", "earn", ..] => Some("rewards earn"),
        ["rewards", "reset", ..] => Some("rewards reset"),
        ["rewards", ..] => Some("rewards"),
        ["activity", "reminder", ..] => Some("activity reminder"),
        ["activity", "medicine", ..] => Some("activity medicine"),
        ["activity", ..] => Some("activity"),
        ["allow-list", "show", ..] => Some("allow-list show"),
        ["allow-list", ..] => Some("allow-list"),
        _ => None,
    }
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}
