//! CLI - Command Line Interface for streamwhere
//!
//! Designed for automation and scripting.
//! Every lookup is a subcommand. All output is JSON-parseable with --json.
//!
//! # Examples
//!
//! ```bash
//! # Search for a title
//! streamwhere search "the batman" --json
//!
//! # Who streams it, and where
//! streamwhere providers 414906 -t movie
//! streamwhere countries 1396 -t tv --country GB
//!
//! # Keep track of titles
//! streamwhere watchlist add 414906 -t movie
//! streamwhere watchlist list
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Title not found
    NotFound = 4,
    /// No TMDB API key configured
    NoApiKey = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// streamwhere - find where movies and TV shows are streaming
///
/// Every command is scriptable and exits with a semantic code.
#[derive(Parser, Debug)]
#[command(
    name = "streamwhere",
    version,
    author = "Gorka & Hermes",
    about = "Find where movies and TV shows are streaming",
    long_about = "Looks up watch-provider availability for movies and TV shows: \
                  which services carry a title, in which countries, and what the \
                  offers look like from a given country.\n\n\
                  All commands support --json for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  streamwhere search \"the batman\"          Search for a title\n\
                  streamwhere providers 414906 -t movie    Who streams it, and where\n\
                  streamwhere countries 1396 -t tv         Offers per country\n\
                  streamwhere regions --json               All known watch regions"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get trending content
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Get details for a movie or show
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List streaming providers that carry a title
    #[command(visible_alias = "p")]
    Providers(ProvidersCmd),

    /// Show per-country availability for a title
    #[command(visible_alias = "co")]
    Countries(CountriesCmd),

    /// List all watch regions known to TMDB
    #[command(visible_alias = "reg")]
    Regions(RegionsCmd),

    /// Manage the local watchlist
    #[command(visible_alias = "wl")]
    Watchlist(WatchlistCmd),
}

// =============================================================================
// Search Command
// =============================================================================

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,

    /// Minimum year
    #[arg(long)]
    pub year_from: Option<u16>,

    /// Maximum year
    #[arg(long)]
    pub year_to: Option<u16>,
}

/// Media type filter for search and lookups
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFilter {
    /// Movies only
    Movie,
    /// TV shows only
    Tv,
}

// =============================================================================
// Trending Command
// =============================================================================

/// Get trending movies and TV shows
#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Time window for trending
    #[arg(long, short = 'w', value_enum, default_value = "day")]
    pub window: TrendingWindow,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Time window for trending content
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    /// Today's trending
    #[default]
    Day,
    /// This week's trending
    Week,
}

// =============================================================================
// Info Command
// =============================================================================

/// Get detailed information about a movie or TV show
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB ID (e.g., 414906)
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum)]
    pub media_type: MediaTypeFilter,
}

// =============================================================================
// Providers Command
// =============================================================================

/// List streaming providers that carry a title anywhere in the world
#[derive(Args, Debug)]
pub struct ProvidersCmd {
    /// TMDB ID (e.g., 414906)
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum)]
    pub media_type: MediaTypeFilter,

    /// Provider ID to focus on (default: first provider alphabetically)
    #[arg(long, short = 'p', value_name = "PROVIDER_ID")]
    pub provider: Option<String>,
}

// =============================================================================
// Countries Command
// =============================================================================

/// Show where a title is available and the offers in one country
#[derive(Args, Debug)]
pub struct CountriesCmd {
    /// TMDB ID (e.g., 414906)
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum)]
    pub media_type: MediaTypeFilter,

    /// Country to inspect, as ISO 3166-1 code (e.g., GB)
    #[arg(long, value_name = "CODE")]
    pub country: Option<String>,
}

// =============================================================================
// Regions Command
// =============================================================================

/// List all watch regions TMDB reports provider data for
#[derive(Args, Debug)]
pub struct RegionsCmd {}

// =============================================================================
// Watchlist Command
// =============================================================================

/// Manage the local watchlist
#[derive(Args, Debug)]
pub struct WatchlistCmd {
    #[command(subcommand)]
    pub action: WatchlistAction,
}

/// Watchlist operations
#[derive(Subcommand, Debug)]
pub enum WatchlistAction {
    /// Add a title to the watchlist
    Add(WatchlistAddCmd),

    /// Remove a title from the watchlist
    #[command(visible_alias = "rm")]
    Remove(WatchlistRemoveCmd),

    /// List saved titles
    #[command(visible_alias = "ls")]
    List(WatchlistListCmd),
}

/// Add a title to the watchlist
#[derive(Args, Debug)]
pub struct WatchlistAddCmd {
    /// TMDB ID (e.g., 414906)
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum)]
    pub media_type: MediaTypeFilter,
}

/// Remove a title from the watchlist
#[derive(Args, Debug)]
pub struct WatchlistRemoveCmd {
    /// TMDB ID of the saved title
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum)]
    pub media_type: MediaTypeFilter,
}

/// List saved titles
#[derive(Args, Debug)]
pub struct WatchlistListCmd {}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data wrapped in the JSON envelope
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print a human-readable content line
    pub fn line(&self, msg: impl std::fmt::Display) {
        println!("{}", msg);
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["streamwhere", "search", "batman"]);
        if let Command::Search(cmd) = cli.command {
            assert_eq!(cmd.query, "batman");
            assert_eq!(cmd.limit, 20);
            assert!(cmd.media_type.is_none());
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["streamwhere", "--json", "--quiet", "search", "test"]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_providers_with_options() {
        let cli = Cli::parse_from([
            "streamwhere",
            "providers",
            "414906",
            "-t",
            "movie",
            "-p",
            "337",
        ]);
        if let Command::Providers(cmd) = cli.command {
            assert_eq!(cmd.id, 414906);
            assert_eq!(cmd.media_type, MediaTypeFilter::Movie);
            assert_eq!(cmd.provider.as_deref(), Some("337"));
        } else {
            panic!("Expected Providers command");
        }
    }

    #[test]
    fn test_countries_defaults() {
        let cli = Cli::parse_from(["streamwhere", "countries", "1396", "-t", "tv"]);
        if let Command::Countries(cmd) = cli.command {
            assert_eq!(cmd.id, 1396);
            assert_eq!(cmd.media_type, MediaTypeFilter::Tv);
            assert!(cmd.country.is_none());
        } else {
            panic!("Expected Countries command");
        }
    }

    #[test]
    fn test_countries_with_country() {
        let cli = Cli::parse_from([
            "streamwhere",
            "countries",
            "1396",
            "-t",
            "tv",
            "--country",
            "GB",
        ]);
        if let Command::Countries(cmd) = cli.command {
            assert_eq!(cmd.country.as_deref(), Some("GB"));
        } else {
            panic!("Expected Countries command");
        }
    }

    #[test]
    fn test_watchlist_subcommands() {
        let cli = Cli::parse_from(["streamwhere", "watchlist", "add", "414906", "-t", "movie"]);
        if let Command::Watchlist(cmd) = cli.command {
            match cmd.action {
                WatchlistAction::Add(add) => {
                    assert_eq!(add.id, 414906);
                    assert_eq!(add.media_type, MediaTypeFilter::Movie);
                }
                _ => panic!("Expected Add action"),
            }
        } else {
            panic!("Expected Watchlist command");
        }

        let cli = Cli::parse_from(["streamwhere", "wl", "ls"]);
        if let Command::Watchlist(cmd) = cli.command {
            assert!(matches!(cmd.action, WatchlistAction::List(_)));
        } else {
            panic!("Expected Watchlist command");
        }
    }

    #[test]
    fn test_command_aliases() {
        let cli = Cli::parse_from(["streamwhere", "p", "550", "-t", "movie"]);
        assert!(matches!(cli.command, Command::Providers(_)));

        let cli = Cli::parse_from(["streamwhere", "co", "550", "-t", "movie"]);
        assert!(matches!(cli.command, Command::Countries(_)));

        let cli = Cli::parse_from(["streamwhere", "reg"]);
        assert!(matches!(cli.command, Command::Regions(_)));
    }

    #[test]
    fn test_rejects_non_numeric_id() {
        let result = Cli::try_parse_from(["streamwhere", "info", "tt1877830", "-t", "movie"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_info_requires_media_type() {
        let result = Cli::try_parse_from(["streamwhere", "info", "414906"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_trending_window_default() {
        let cli = Cli::parse_from(["streamwhere", "trending"]);
        if let Command::Trending(cmd) = cli.command {
            assert_eq!(cmd.window, TrendingWindow::Day);
        } else {
            panic!("Expected Trending command");
        }
    }

    #[test]
    fn test_json_output_success() {
        let output = JsonOutput::success(vec!["a", "b"]);
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"data\""));
        assert!(!json.contains("\"error\""));
        assert!(!json.contains("\"exit_code\""));
    }

    #[test]
    fn test_json_output_error() {
        let output = JsonOutput::<()>::error_msg("boom", ExitCode::NetworkError);
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"error\":\"boom\""));
        assert!(json.contains("\"exit_code\":3"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::NoApiKey), 5);
    }
}
