//! API clients for external services
//!
//! - TMDB: movie/TV metadata, search, and watch-provider catalogs

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};
