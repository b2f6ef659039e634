//! Watch-availability aggregation
//!
//! Pure, synchronous transforms over an already-fetched provider catalog.
//! Two independent views are derived from the same input:
//! - **By provider**: which distinct services carry the title anywhere,
//!   which one is effectively selected, and which countries have it there.
//! - **By country**: which countries have any offers, and the per-category
//!   breakdown for the effectively selected country.
//!
//! Nothing in this module performs I/O or fails: missing keys, unknown ids
//! and empty catalogs all resolve to defined defaults or empty output.

use crate::models::{CountryOffers, OfferKind, ProviderCatalog, Region, WatchProvider};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Category priority for the by-provider view. Each country contributes the
/// first non-empty list among these; rent/buy never contribute here even
/// though they count for country matching in [`countries_with_provider`].
const BROWSE_PRIORITY: [OfferKind; 3] = [OfferKind::Flatrate, OfferKind::Ads, OfferKind::Free];

/// Placeholder display name for a country code missing from the reference
/// list.
const UNKNOWN_COUNTRY: &str = "N/A";

// =============================================================================
// View Types
// =============================================================================

/// Country with its resolved display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRef {
    pub iso_code: String,
    pub display_name: String,
}

impl fmt::Display for CountryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.iso_code, self.display_name)
    }
}

/// Offers under one category, kept only when non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferGroup {
    pub kind: OfferKind,
    pub offers: Vec<WatchProvider>,
}

impl OfferGroup {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Everything the by-country view renders: the picker population, the
/// effective country (None only for an empty catalog) and its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryAvailability {
    pub available: Vec<CountryRef>,
    pub country: Option<CountryRef>,
    pub groups: Vec<OfferGroup>,
}

// =============================================================================
// By-Provider View
// =============================================================================

/// Collapses the catalog into one entry per distinct streaming service,
/// sorted ascending by name.
///
/// Each country contributes its first non-empty category among flatrate,
/// ads, free, in that order; rental and purchase listings are skipped since
/// this view answers "where can I stream it", not "where can I pay per
/// title". The first occurrence of a provider id wins and later duplicates
/// are dropped without merging attributes.
pub fn dedup_providers(catalog: &ProviderCatalog) -> Vec<WatchProvider> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut unique: Vec<WatchProvider> = Vec::new();

    for offers in catalog.values() {
        for provider in browse_offers(offers) {
            if seen.insert(provider.provider_id) {
                unique.push(provider.clone());
            }
        }
    }

    unique.sort_by(|a, b| compare_names(&a.provider_name, &b.provider_name));
    unique
}

/// Resolves the provider to display. A supplied id is honored when it parses
/// and matches the deduplicated sequence; anything else (absent, blank,
/// non-numeric, unknown) falls back to the alphabetically first entry.
/// Returns None only for an empty sequence.
pub fn select_provider<'a>(
    providers: &'a [WatchProvider],
    requested: Option<&str>,
) -> Option<&'a WatchProvider> {
    if let Some(id) = requested.and_then(|s| s.trim().parse::<u32>().ok()) {
        if let Some(found) = providers.iter().find(|p| p.provider_id == id) {
            return Some(found);
        }
    }
    providers.first()
}

/// Lists every country whose offer set contains the provider in *any*
/// category, rent and buy included. Each country appears at most once no
/// matter how many of its categories match. Catalog iteration order is
/// preserved.
pub fn countries_with_provider(
    catalog: &ProviderCatalog,
    provider_id: u32,
    regions: &[Region],
) -> Vec<CountryRef> {
    catalog
        .iter()
        .filter(|(_, offers)| offers.has_provider(provider_id))
        .map(|(code, _)| country_ref(code, regions))
        .collect()
}

// =============================================================================
// By-Country View
// =============================================================================

/// Resolves the by-country view. The requested code is matched against the
/// catalog's keys (case-insensitively, codes are stored uppercase); when
/// absent or not given, the first key in catalog iteration order is used
/// instead. An empty catalog yields no effective country and no groups,
/// which callers render as "available nowhere".
pub fn resolve_country(
    catalog: &ProviderCatalog,
    requested: Option<&str>,
    regions: &[Region],
) -> CountryAvailability {
    let available: Vec<CountryRef> = catalog.keys().map(|code| country_ref(code, regions)).collect();

    let effective = requested
        .map(|s| s.trim().to_uppercase())
        .filter(|code| catalog.contains_key(code.as_str()))
        .or_else(|| catalog.keys().next().cloned());

    let (country, groups) = match effective {
        Some(code) => {
            let groups = catalog
                .get(code.as_str())
                .map(offer_groups)
                .unwrap_or_default();
            (Some(country_ref(&code, regions)), groups)
        }
        None => (None, Vec::new()),
    };

    CountryAvailability {
        available,
        country,
        groups,
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// First non-empty category in browse priority order, or nothing.
fn browse_offers(offers: &CountryOffers) -> &[WatchProvider] {
    BROWSE_PRIORITY
        .iter()
        .map(|kind| offers.category(*kind))
        .find(|list| !list.is_empty())
        .unwrap_or(&[])
}

/// Case-insensitive name ordering with a full-string tiebreak so that
/// names equal under case folding still sort deterministically.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn country_ref(code: &str, regions: &[Region]) -> CountryRef {
    let display_name = regions
        .iter()
        .find(|r| r.iso_3166_1 == code)
        .map(|r| r.native_name.clone())
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
    CountryRef {
        iso_code: code.to_string(),
        display_name,
    }
}

/// Non-empty categories for one country, in render order.
fn offer_groups(offers: &CountryOffers) -> Vec<OfferGroup> {
    OfferKind::ALL
        .iter()
        .map(|kind| OfferGroup {
            kind: *kind,
            offers: offers.category(*kind).to_vec(),
        })
        .filter(|group| !group.offers.is_empty())
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
