use clap::Parser;

use punter::adapter::inbound::cli::command::{Cli, ColorChoice};
use punter::adapter::inbound::cli::output::{self, OutputConfig};
use punter::adapter::inbound::cli::run;
use punter::config::logging;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    logging::init(cli.verbose);

    if let Err(err) = run(cli).await {
        output::render_error(&err);
        std::process::exit(1);
    }
}
