use clap::{Parser, Subcommand};
use greenbean_client::config::parse_timeout_ms;

/// Extended help shown after `greenbean scan --help`.
pub const SCAN_AFTER_HELP: &str = "\
How scanning works:
  The receipt photo is sent to your document extraction service, every line
  item it finds is listed, and items on the allow-list earn points.

  Points:
    5 points per whole dollar of sustainable spend
    +50 one-time bonus on your first rewarded purchase
    +100 with --event birthday, +150 with --event referral

  Badges:
    100 points     Planet Caretaker
    500 points     Ecological Hero
    2000 points    Sustainability Champion

Configuration:
  GREENBEAN_EXTRACTION_URL          extraction endpoint (or --endpoint)
  GREENBEAN_EXTRACTION_HEADERS      credentials, e.g. `CLIENT-ID: abc;AUTHORIZATION: apikey u:k`
  GREENBEAN_EXTRACTION_TIMEOUT_MS   request budget in milliseconds (default 30000)
  GREENBEAN_ALLOW_LIST              path to a custom allow-list JSON file

What to do next:
  1. Run `greenbean scan --dry-run <image>` to preview classification.
  2. Run `greenbean scan <image>` to earn points.
  3. Run `greenbean rewards show` to see your badge progress.
";

#[derive(Debug, Parser)]
#[command(
    name = "greenbean",
    version,
    about = "sustainable grocery rewards",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a receipt photo and earn points for sustainable products
    #[command(after_long_help = SCAN_AFTER_HELP)]
    Scan {
        /// Path to the receipt image (JPEG)
        image: String,
        /// Promotional event for this purchase: birthday or referral
        #[arg(long)]
        event: Option<String>,
        /// Give up on extraction after this many milliseconds
        #[arg(long, value_parser = parse_timeout_ms)]
        timeout_ms: Option<u64>,
        /// Extraction endpoint, overriding GREENBEAN_EXTRACTION_URL
        #[arg(long)]
        endpoint: Option<String>,
        /// Classify without updating rewards
        #[arg(long)]
        dry_run: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Classify a saved extraction response without earning points
    Classify {
        /// Path to a saved extraction JSON body (use `-` for stdin)
        path: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Inspect or change your rewards
    #[command(arg_required_else_help = true)]
    Rewards {
        #[command(subcommand)]
        command: RewardsCommand,
    },
    /// Record rewarded app activity
    #[command(arg_required_else_help = true)]
    Activity {
        #[command(subcommand)]
        command: ActivityCommand,
    },
    /// Inspect the sustainable-product allow-list
    #[command(arg_required_else_help = true)]
    AllowList {
        #[command(subcommand)]
        command: AllowListCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum RewardsCommand {
    /// Show points, badge and progress to the next badge
    Show {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Score a purchase amount by hand
    Earn {
        /// Dollars spent on sustainable products
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Promotional event for this purchase: birthday or referral
        #[arg(long)]
        event: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Clear points, badge and one-time bonuses
    Reset {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ActivityCommand {
    /// Record that an expiration reminder was scheduled
    Reminder {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Log a medicine you keep at home
    Medicine {
        /// Medicine name
        name: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AllowListCommand {
    /// List every allow-list entry and where the list was loaded from
    Show {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn json_requested(&self) -> bool {
        match self {
            Self::Scan { json, .. } | Self::Classify { json, .. } => *json,
            Self::Rewards { command } => match command {
                RewardsCommand::Show { json }
                | RewardsCommand::Earn { json, .. }
                | RewardsCommand::Reset { json } => *json,
            },
            Self::Activity { command } => match command {
                ActivityCommand::Reminder { json } | ActivityCommand::Medicine { json, .. } => {
                    *json
                }
            },
            Self::AllowList {
                command: AllowListCommand::Show { json },
            } => *json,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
