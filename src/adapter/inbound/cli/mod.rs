//! CLI module graph.

pub mod allowance;
pub mod balances;
pub mod bets;
pub mod claim;
pub mod command;
pub mod diagnostic;
pub mod games;
pub mod output;
pub mod place;
pub mod profile;
pub mod resolve;

use command::{Cli, Commands, ProfileCommand};

use crate::error::Result;

/// Dispatch a parsed command line to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    let profile_path = cli.profile.as_deref();
    match &cli.command {
        Commands::Games(args) => games::execute(profile_path, args).await,
        Commands::Balances(args) => balances::execute(profile_path, args).await,
        Commands::Allowance(args) => allowance::execute(profile_path, args).await,
        Commands::Bets(args) => bets::execute(profile_path, args).await,
        Commands::Place(args) => place::execute(profile_path, args).await,
        Commands::Claim(args) => claim::execute(profile_path, args).await,
        Commands::Profile(ProfileCommand::Show) => profile::execute_show(profile_path),
        Commands::Profile(ProfileCommand::Init(args)) => {
            profile::execute_init(&args.path, args.force)
        }
    }
}
