//! CLI Command Handlers
//!
//! Implements all CLI commands against the TMDB client and the availability
//! core. Each handler takes CLI args and Output, returns ExitCode.

use std::path::Path;

use serde::Serialize;

use crate::api::{TmdbClient, TmdbError};
use crate::availability::{
    countries_with_provider, dedup_providers, resolve_country, select_provider, CountryRef,
};
use crate::cli::{
    CountriesCmd, ExitCode, InfoCmd, MediaTypeFilter, Output, ProvidersCmd, RegionsCmd, SearchCmd,
    TrendingCmd, TrendingWindow, WatchlistAction, WatchlistAddCmd, WatchlistCmd,
    WatchlistRemoveCmd,
};
use crate::config::Config;
use crate::models::{MediaKind, SearchResult, WatchProvider};
use crate::watchlist::{Watchlist, WatchlistEntry};

// =============================================================================
// Shared Helpers
// =============================================================================

/// Build a TMDB client from config, or report the missing API key
fn tmdb_client(config: &Config, output: &Output) -> Result<TmdbClient, ExitCode> {
    match config.tmdb_api_key() {
        Ok(key) => Ok(TmdbClient::new(key)),
        Err(e) => Err(output.error(e.to_string(), ExitCode::NoApiKey)),
    }
}

fn media_kind(filter: MediaTypeFilter) -> MediaKind {
    match filter {
        MediaTypeFilter::Movie => MediaKind::Movie,
        MediaTypeFilter::Tv => MediaKind::Tv,
    }
}

/// Pick the exit code for a failed TMDB call
fn fetch_exit_code(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<TmdbError>() {
        Some(TmdbError::NotFound) => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    }
}

/// Print a result list as JSON or as one line per title
fn print_results(results: &[SearchResult], output: &Output) -> ExitCode {
    if output.json {
        if let Err(e) = output.print(results) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    if results.is_empty() {
        output.line("No results found");
        return ExitCode::Success;
    }
    for result in results {
        output.line(format!("{:>8}  {}", result.id, result));
    }
    ExitCode::Success
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let config = Config::load(config_path);
    let client = match tmdb_client(&config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    output.info(format!("Searching for: {}", cmd.query));

    match client.search(&cmd.query).await {
        Ok(mut results) => {
            // Filter by media type if specified
            if let Some(filter) = cmd.media_type {
                let kind = media_kind(filter);
                results.retain(|r| r.media_kind == kind);
            }

            // Filter by year range
            if let Some(year_from) = cmd.year_from {
                results.retain(|r| r.year.map(|y| y >= year_from).unwrap_or(false));
            }
            if let Some(year_to) = cmd.year_to {
                results.retain(|r| r.year.map(|y| y <= year_to).unwrap_or(false));
            }

            // Limit results
            results.truncate(cmd.limit);

            print_results(&results, output)
        }
        Err(e) => output.error(format!("Search failed: {}", e), fetch_exit_code(&e)),
    }
}

// =============================================================================
// Trending Command
// =============================================================================

pub async fn trending_cmd(
    cmd: TrendingCmd,
    config_path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let config = Config::load(config_path);
    let client = match tmdb_client(&config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    let window_str = match cmd.window {
        TrendingWindow::Day => "day",
        TrendingWindow::Week => "week",
    };
    output.info(format!("Fetching trending ({})...", window_str));

    match client.trending(window_str).await {
        Ok(mut results) => {
            // Filter by media type if specified
            if let Some(filter) = cmd.media_type {
                let kind = media_kind(filter);
                results.retain(|r| r.media_kind == kind);
            }

            // Limit results
            results.truncate(cmd.limit);

            print_results(&results, output)
        }
        Err(e) => output.error(
            format!("Trending fetch failed: {}", e),
            fetch_exit_code(&e),
        ),
    }
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let config = Config::load(config_path);
    let client = match tmdb_client(&config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let kind = media_kind(cmd.media_type);

    output.info(format!("Getting info for {} {}...", kind.as_path(), cmd.id));

    match client.title_details(kind, cmd.id).await {
        Ok(details) => {
            if output.json {
                if let Err(e) = output.print(&details) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                return ExitCode::Success;
            }

            output.line(&details);
            if !details.genres.is_empty() {
                output.line(format!("Genres: {}", details.genres.join(", ")));
            }
            if !details.overview.is_empty() {
                output.line("");
                output.line(&details.overview);
            }
            if !details.recommendations.is_empty() {
                output.line("");
                output.line("Recommended:");
                for rec in details.recommendations.iter().take(5) {
                    output.line(format!("  {:>8}  {}", rec.id, rec));
                }
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Info fetch failed: {}", e), fetch_exit_code(&e)),
    }
}

// =============================================================================
// Providers Command
// =============================================================================

/// Worldwide provider list, the focused provider, and where it carries the title
#[derive(Serialize)]
struct ProvidersView {
    providers: Vec<WatchProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<WatchProvider>,
    countries: Vec<CountryRef>,
}

pub async fn providers_cmd(
    cmd: ProvidersCmd,
    config_path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let config = Config::load(config_path);
    let client = match tmdb_client(&config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let kind = media_kind(cmd.media_type);

    output.info(format!(
        "Fetching providers for {} {}...",
        kind.as_path(),
        cmd.id
    ));

    let (catalog, regions) = match tokio::try_join!(
        client.watch_providers(kind, cmd.id),
        client.watch_regions(),
    ) {
        Ok(pair) => pair,
        Err(e) => {
            return output.error(format!("Provider fetch failed: {}", e), fetch_exit_code(&e))
        }
    };

    let providers = dedup_providers(&catalog);
    let selected = select_provider(&providers, cmd.provider.as_deref()).cloned();
    let countries = selected
        .as_ref()
        .map(|p| countries_with_provider(&catalog, p.provider_id, &regions))
        .unwrap_or_default();

    let view = ProvidersView {
        providers,
        selected,
        countries,
    };

    if output.json {
        if let Err(e) = output.print(&view) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    if view.providers.is_empty() {
        output.line("Not available on any streaming service");
        return ExitCode::Success;
    }

    output.line(format!("Providers ({}):", view.providers.len()));
    for provider in &view.providers {
        output.line(format!("  {}", provider));
    }

    if let Some(ref selected) = view.selected {
        output.line("");
        output.line(format!("Selected: {}", selected));
        output.line(format!("Available in {} countries:", view.countries.len()));
        for country in &view.countries {
            output.line(format!("  {}", country));
        }
    }

    ExitCode::Success
}

// =============================================================================
// Countries Command
// =============================================================================

pub async fn countries_cmd(
    cmd: CountriesCmd,
    config_path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let config = Config::load(config_path);
    let client = match tmdb_client(&config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let kind = media_kind(cmd.media_type);

    output.info(format!(
        "Fetching availability for {} {}...",
        kind.as_path(),
        cmd.id
    ));

    let (catalog, regions) = match tokio::try_join!(
        client.watch_providers(kind, cmd.id),
        client.watch_regions(),
    ) {
        Ok(pair) => pair,
        Err(e) => {
            return output.error(
                format!("Availability fetch failed: {}", e),
                fetch_exit_code(&e),
            )
        }
    };

    let requested = cmd.country.as_deref().or(config.default_country.as_deref());
    let availability = resolve_country(&catalog, requested, &regions);

    if output.json {
        if let Err(e) = output.print(&availability) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    if availability.available.is_empty() {
        output.line("Available nowhere");
        return ExitCode::Success;
    }

    output.line(format!(
        "Available in {} countries:",
        availability.available.len()
    ));
    for country in &availability.available {
        output.line(format!("  {}", country));
    }

    if let Some(ref country) = availability.country {
        output.line("");
        output.line(format!("Offers in {}:", country));
        if availability.groups.is_empty() {
            output.line("  No streaming offers listed");
        }
        for group in &availability.groups {
            let names: Vec<&str> = group
                .offers
                .iter()
                .map(|p| p.provider_name.as_str())
                .collect();
            output.line(format!("  {}: {}", group.label(), names.join(", ")));
        }
    }

    ExitCode::Success
}

// =============================================================================
// Regions Command
// =============================================================================

pub async fn regions_cmd(
    _cmd: RegionsCmd,
    config_path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let config = Config::load(config_path);
    let client = match tmdb_client(&config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };

    output.info("Fetching watch regions...");

    match client.watch_regions().await {
        Ok(regions) => {
            if output.json {
                if let Err(e) = output.print(&regions) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                return ExitCode::Success;
            }

            for region in &regions {
                output.line(region);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Region fetch failed: {}", e), fetch_exit_code(&e)),
    }
}

// =============================================================================
// Watchlist Command
// =============================================================================

pub async fn watchlist_cmd(
    cmd: WatchlistCmd,
    config_path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    match cmd.action {
        WatchlistAction::Add(add) => watchlist_add(add, config_path, output).await,
        WatchlistAction::Remove(remove) => watchlist_remove(remove, output),
        WatchlistAction::List(_) => watchlist_list(output),
    }
}

async fn watchlist_add(
    cmd: WatchlistAddCmd,
    config_path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let config = Config::load(config_path);
    let client = match tmdb_client(&config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let kind = media_kind(cmd.media_type);

    output.info(format!("Looking up {} {}...", kind.as_path(), cmd.id));

    // Verify the title exists and pick up its name and year
    let details = match client.title_details(kind, cmd.id).await {
        Ok(details) => details,
        Err(e) => return output.error(format!("Title lookup failed: {}", e), fetch_exit_code(&e)),
    };

    let entry = WatchlistEntry {
        id: details.id,
        media_kind: kind,
        title: details.title.clone(),
        year: details.year,
    };

    let mut list = Watchlist::load();
    let added = list.add(entry.clone());
    if added {
        if let Err(e) = list.save() {
            return output.error(format!("Failed to save watchlist: {}", e), ExitCode::Error);
        }
    }

    if output.json {
        if let Err(e) = output.print(&entry) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else if added {
        output.line(format!("Added: {}", entry));
    } else {
        output.line(format!("Already saved: {}", entry));
    }
    ExitCode::Success
}

fn watchlist_remove(cmd: WatchlistRemoveCmd, output: &Output) -> ExitCode {
    let kind = media_kind(cmd.media_type);
    let mut list = Watchlist::load();

    match list.remove(cmd.id, kind) {
        Some(entry) => {
            if let Err(e) = list.save() {
                return output.error(format!("Failed to save watchlist: {}", e), ExitCode::Error);
            }
            if output.json {
                if let Err(e) = output.print(&entry) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else {
                output.line(format!("Removed: {}", entry));
            }
            ExitCode::Success
        }
        None => output.error(
            format!("{} {} is not on the watchlist", kind.as_path(), cmd.id),
            ExitCode::NotFound,
        ),
    }
}

fn watchlist_list(output: &Output) -> ExitCode {
    let list = Watchlist::load();

    if output.json {
        if let Err(e) = output.print(&list.entries) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    if list.is_empty() {
        output.line("Watchlist is empty");
        return ExitCode::Success;
    }
    for entry in &list.entries {
        output.line(format!("{:>8}  {}", entry.id, entry));
    }
    ExitCode::Success
}
