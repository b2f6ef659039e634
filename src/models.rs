//! Data structures and types for streamwhere
//!
//! Contains all shared models used across the application organized by domain:
//! - **Search**: TMDB search results and title details
//! - **Watch providers**: the per-country offer catalog for a title
//! - **Regions**: country reference list used for display names

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Search Models (TMDB)
// =============================================================================

/// Media kind discriminator for titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// URL path segment for this kind ("movie" or "tv")
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "Movie"),
            MediaKind::Tv => write!(f, "TV Show"),
        }
    }
}

/// Search result from TMDB multi-search (also used for recommendations)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub media_kind: MediaKind,
    pub title: String,
    pub year: Option<u16>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub vote_average: f32,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_kind)
    }
}

/// Variant payload of a title: what a movie has that a show doesn't,
/// and vice versa. Tagged so JSON output carries the discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TitleKind {
    Movie { runtime: u32 },
    Tv { seasons: u32, episodes: u32 },
}

impl TitleKind {
    pub fn media_kind(&self) -> MediaKind {
        match self {
            TitleKind::Movie { .. } => MediaKind::Movie,
            TitleKind::Tv { .. } => MediaKind::Tv,
        }
    }
}

/// Detailed title information: the base shared by movies and TV shows
/// plus the kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDetails {
    pub id: u64,
    pub title: String,
    pub year: Option<u16>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub genres: Vec<String>,
    pub vote_average: f32,
    pub recommendations: Vec<SearchResult>,
    #[serde(flatten)]
    pub kind: TitleKind,
}

impl fmt::Display for TitleDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        match &self.kind {
            TitleKind::Movie { runtime } => {
                let hours = runtime / 60;
                let mins = runtime % 60;
                write!(
                    f,
                    "{}{} - {}h {}m - ⭐ {:.1}",
                    self.title, year_str, hours, mins, self.vote_average
                )
            }
            TitleKind::Tv { seasons, episodes } => {
                write!(
                    f,
                    "{}{} - {} seasons, {} episodes - ⭐ {:.1}",
                    self.title, year_str, seasons, episodes, self.vote_average
                )
            }
        }
    }
}

// =============================================================================
// Watch Provider Models (TMDB watch/providers)
// =============================================================================

/// One streaming service's listing within one category within one country.
/// Sourced verbatim from the upstream catalog and never locally mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchProvider {
    pub provider_id: u32,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: i32,
}

impl fmt::Display for WatchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.provider_name, self.provider_id)
    }
}

/// Offer category within a country's entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    Flatrate,
    Free,
    Ads,
    Rent,
    Buy,
}

impl OfferKind {
    /// All categories, in render order.
    pub const ALL: [OfferKind; 5] = [
        OfferKind::Flatrate,
        OfferKind::Free,
        OfferKind::Ads,
        OfferKind::Rent,
        OfferKind::Buy,
    ];

    /// Presentation label. Subscription streaming shows as "Stream",
    /// everything else under its capitalized category name.
    pub fn label(&self) -> &'static str {
        match self {
            OfferKind::Flatrate => "Stream",
            OfferKind::Free => "Free",
            OfferKind::Ads => "Ads",
            OfferKind::Rent => "Rent",
            OfferKind::Buy => "Buy",
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-country offer record. Missing categories deserialize as empty lists;
/// upstream omits a country entirely when it has no offers at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryOffers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flatrate: Vec<WatchProvider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub free: Vec<WatchProvider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ads: Vec<WatchProvider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rent: Vec<WatchProvider>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buy: Vec<WatchProvider>,
}

impl CountryOffers {
    /// Offers in the given category.
    pub fn category(&self, kind: OfferKind) -> &[WatchProvider] {
        match kind {
            OfferKind::Flatrate => &self.flatrate,
            OfferKind::Free => &self.free,
            OfferKind::Ads => &self.ads,
            OfferKind::Rent => &self.rent,
            OfferKind::Buy => &self.buy,
        }
    }

    /// True if the provider appears in any category, rental and purchase
    /// included.
    pub fn has_provider(&self, provider_id: u32) -> bool {
        OfferKind::ALL
            .iter()
            .any(|kind| self.category(*kind).iter().any(|p| p.provider_id == provider_id))
    }
}

/// Per-title catalog: ISO-3166-1 country code -> offers in that country.
/// Insertion order of the upstream response is preserved; the by-country
/// view falls back to the first key when the requested country is absent.
pub type ProviderCatalog = IndexMap<String, CountryOffers>;

// =============================================================================
// Region Models (TMDB watch/providers/regions)
// =============================================================================

/// Country reference entry, used only for display-name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub iso_3166_1: String,
    pub native_name: String,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.iso_3166_1, self.native_name)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
