//! Command-line interface definitions.
//!
//! Defines the CLI structure for the punter binary using `clap`. The
//! CLI covers the full order lifecycle (placing and claiming bets)
//! plus the read-only views: games, balances, allowance, and bet
//! history.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::adapter::outbound::feed::GameOrder;
use crate::config::paths;

/// Wagering-order lifecycle CLI for on-chain betting venues
#[derive(Parser, Debug)]
#[command(name = "punter")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the network profile file
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the punter CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List upcoming games and their open selections
    Games(GamesArgs),

    /// Show native and bet token balances for a wallet
    Balances(WalletArgs),

    /// Show the relayer's bet token allowance for a wallet
    Allowance(WalletArgs),

    /// List bets recorded for a wallet
    Bets(BetsArgs),

    /// Place a bet: payload, allowance, signature, submission, tracking
    Place(PlaceArgs),

    /// Claim payouts for redeemable bets
    Claim(ClaimArgs),

    /// Manage the network profile
    #[command(subcommand)]
    Profile(ProfileCommand),
}

/// Subcommands for `punter profile`.
///
/// Provides inspection and generation of the network profile that
/// names the chain, contracts, and service endpoints.
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Print the effective network profile.
    Show,
    /// Write a starter profile file.
    Init(ProfileInitArgs),
}

/// Sort order for the games listing.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OrderByArg {
    /// Busiest markets first.
    #[default]
    Turnover,
    /// Soonest kick-off first.
    StartsAt,
}

impl From<OrderByArg> for GameOrder {
    fn from(arg: OrderByArg) -> Self {
        match arg {
            OrderByArg::Turnover => GameOrder::Turnover,
            OrderByArg::StartsAt => GameOrder::StartsAt,
        }
    }
}

/// Arguments for the `games` subcommand.
#[derive(Parser, Debug)]
pub struct GamesArgs {
    /// Maximum number of games to list (capped at 50).
    #[arg(long, default_value = "5")]
    pub first: u32,

    /// Sport slug filter (e.g. "football").
    #[arg(long)]
    pub sport: Option<String>,

    /// Country slug filter (e.g. "england").
    #[arg(long)]
    pub country: Option<String>,

    /// Sort order for the listing.
    #[arg(long, value_enum, default_value_t = OrderByArg::Turnover)]
    pub order_by: OrderByArg,
}

/// Shared arguments for the read-only wallet views.
///
/// Both fields fall back to environment variables (`BETTOR_ADDRESS`,
/// `POLYGON_RPC_URL`) and then to a prompt or the profile default.
#[derive(Parser, Debug)]
pub struct WalletArgs {
    /// Wallet address (0x-prefixed).
    #[arg(long)]
    pub address: Option<String>,

    /// JSON-RPC endpoint override.
    #[arg(long)]
    pub rpc_url: Option<String>,
}

/// Arguments for the `bets` subcommand.
#[derive(Parser, Debug)]
pub struct BetsArgs {
    /// Wallet address (0x-prefixed).
    #[arg(long)]
    pub address: Option<String>,

    /// Only list bets with a redeemable payout.
    #[arg(long)]
    pub redeemable: bool,

    /// Maximum number of bets to list (capped at 50).
    #[arg(long, default_value = "10")]
    pub first: u32,
}

/// Arguments for the `place` subcommand.
///
/// Anything not supplied here is resolved from the environment and
/// then prompted for interactively. The bettor key is never accepted
/// as a flag; set `BETTOR_PRIVATE_KEY` or answer the prompt.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// Stake in smallest token units (e.g. 1000000 = 1 USDT).
    #[arg(long)]
    pub amount: Option<u64>,

    /// Condition id of a selection; repeat together with --outcome-id
    /// for a combo.
    #[arg(long)]
    pub condition_id: Vec<String>,

    /// Outcome id of a selection; repeat together with --condition-id
    /// for a combo.
    #[arg(long)]
    pub outcome_id: Vec<String>,

    /// Minimum acceptable odds as a decimal quote (e.g. "1.5").
    #[arg(long)]
    pub min_odds: Option<String>,

    /// JSON-RPC endpoint override.
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Pause between order status checks, in milliseconds.
    #[arg(long, default_value_t = crate::adapter::outbound::book::DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// Number of status checks before giving up on tracking.
    #[arg(long, default_value_t = crate::adapter::outbound::book::DEFAULT_POLL_ATTEMPTS)]
    pub poll_attempts: u32,

    /// Skip the confirmation prompt.
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `claim` subcommand.
#[derive(Parser, Debug)]
pub struct ClaimArgs {
    /// Comma-separated bet ids to claim (e.g. "123,456").
    #[arg(long)]
    pub bet_ids: Option<String>,

    /// JSON-RPC endpoint override.
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `profile init` subcommand.
#[derive(Parser, Debug)]
pub struct ProfileInitArgs {
    /// Output path for the generated profile file.
    #[arg(default_value_os_t = paths::default_profile())]
    pub path: PathBuf,

    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}
