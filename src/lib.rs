//! streamwhere - find where movies and TV shows are streaming
//!
//! Looks up watch-provider availability through the TMDB API: which
//! services carry a title, in which countries, and what the offers look
//! like from a given country.
//!
//! # Modules
//!
//! - `models` - Data structures for titles, providers, offers, regions
//! - `api` - TMDB API client
//! - `availability` - Provider dedup, selection, and per-country resolution
//! - `cli` - Argument parsing and output formatting
//! - `commands` - CLI command handlers
//! - `config` - Config file and API key resolution
//! - `watchlist` - Local watchlist persistence

pub mod api;
pub mod availability;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod watchlist;

// Re-export commonly used types
pub use api::{TmdbClient, TmdbError};
pub use availability::{
    countries_with_provider, dedup_providers, resolve_country, select_provider,
    CountryAvailability, CountryRef, OfferGroup,
};
pub use models::{
    CountryOffers, MediaKind, OfferKind, ProviderCatalog, Region, SearchResult, TitleDetails,
    TitleKind, WatchProvider,
};
