use greenbean_client::commands;
use greenbean_client::commands::scan::ScanRunOptions;
use greenbean_client::{ClientResult, SuccessEnvelope};

use crate::cli::{ActivityCommand, AllowListCommand, Cli, Commands, RewardsCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Scan {
            image,
            event,
            timeout_ms,
            endpoint,
            dry_run,
            json: _,
        } => commands::scan::run_with_options(ScanRunOptions {
            image_path: image.clone(),
            event: event.clone(),
            timeout_ms: *timeout_ms,
            dry_run: *dry_run,
            endpoint_override: endpoint.clone(),
            home_override: None,
        }),
        Commands::Classify { path, .. } => commands::classify::run(path.clone()),
        Commands::Rewards { command } => match command {
            RewardsCommand::Show { .. } => commands::rewards::show(),
            RewardsCommand::Earn { amount, event, .. } => {
                commands::rewards::earn(*amount, event.clone())
            }
            RewardsCommand::Reset { .. } => commands::rewards::reset(),
        },
        Commands::Activity { command } => match command {
            ActivityCommand::Reminder { .. } => commands::activity::reminder(),
            ActivityCommand::Medicine { name, .. } => commands::activity::medicine(name),
        },
        Commands::AllowList { command } => match command {
            AllowListCommand::Show { .. } => commands::allow_list::show(),
        },
    }
}
