//! streamwhere - find where movies and TV shows are streaming
//!
//! # Usage
//!
//! ```bash
//! streamwhere search "blade runner"
//! streamwhere providers 414906 -t movie
//! streamwhere countries 1396 -t tv --country GB --json
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use streamwhere::cli::{Cli, Command, Output};
use streamwhere::commands;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Logs go to stderr so piped stdout stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(&cli);
    let config_path = cli.config.as_deref();

    let exit_code = match cli.command {
        Command::Search(cmd) => commands::search_cmd(cmd, config_path, &output).await,
        Command::Trending(cmd) => commands::trending_cmd(cmd, config_path, &output).await,
        Command::Info(cmd) => commands::info_cmd(cmd, config_path, &output).await,
        Command::Providers(cmd) => commands::providers_cmd(cmd, config_path, &output).await,
        Command::Countries(cmd) => commands::countries_cmd(cmd, config_path, &output).await,
        Command::Regions(cmd) => commands::regions_cmd(cmd, config_path, &output).await,
        Command::Watchlist(cmd) => commands::watchlist_cmd(cmd, config_path, &output).await,
    };

    exit_code.into()
}
