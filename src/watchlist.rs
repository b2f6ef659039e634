//! Local watchlist persistence
//!
//! Saved titles live in ~/.local/share/streamwhere/watchlist.json (platform
//! equivalent via `dirs`). A title is identified by its TMDB ID plus media
//! kind, so a movie and a show that share an ID never collide.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::models::MediaKind;

/// A saved title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: u64,
    pub media_kind: MediaKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

impl fmt::Display for WatchlistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_kind)
    }
}

/// Saved titles, in the order they were added
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Watchlist {
    pub entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    /// Get watchlist file path (~/.local/share/streamwhere/watchlist.json)
    pub fn path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("streamwhere").join("watchlist.json"))
    }

    /// Load watchlist from file, or return empty if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save watchlist to file
    pub fn save(&self) -> Result<()> {
        let path =
            Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine watchlist path"))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Add an entry. Returns false if the title is already saved.
    pub fn add(&mut self, entry: WatchlistEntry) -> bool {
        if self.contains(entry.id, entry.media_kind) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove an entry by ID and kind, returning it if it was saved
    pub fn remove(&mut self, id: u64, kind: MediaKind) -> Option<WatchlistEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id && e.media_kind == kind)?;
        Some(self.entries.remove(idx))
    }

    /// Check whether a title is saved
    pub fn contains(&self, id: u64, kind: MediaKind) -> bool {
        self.entries
            .iter()
            .any(|e| e.id == id && e.media_kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
