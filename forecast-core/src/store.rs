//! Favorite cities and recent searches, behind an injectable store interface.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::config::project_dirs;

/// Number of recent searches kept.
pub const RECENT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub city: String,
    pub country: String,
}

impl Favorite {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self { city: city.into(), country: country.into() }
    }
}

impl std::fmt::Display for Favorite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

/// Cities offered to a first-time user.
pub fn default_favorites() -> Vec<Favorite> {
    [
        ("New York", "USA"),
        ("London", "UK"),
        ("Tokyo", "Japan"),
        ("Sydney", "Australia"),
        ("Paris", "France"),
        ("Dubai", "UAE"),
        ("Mumbai", "India"),
        ("Singapore", "Singapore"),
    ]
    .into_iter()
    .map(|(city, country)| Favorite::new(city, country))
    .collect()
}

/// Persistent lists owned by a presentation layer.
pub trait LocationStore {
    fn favorites(&self) -> Result<Vec<Favorite>>;

    /// Append a favorite; returns `false` if it was already present.
    fn add_favorite(&mut self, city: &str, country: &str) -> Result<bool>;

    /// Returns `false` if no such favorite existed.
    fn remove_favorite(&mut self, city: &str, country: &str) -> Result<bool>;

    /// Newest first; a repeated search keeps its original position.
    fn recent_searches(&self) -> Result<Vec<String>>;

    fn add_recent_search(&mut self, query: &str) -> Result<()>;

    fn clear_recent_searches(&mut self) -> Result<()>;
}

/// The lists themselves, shared by every store implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreState {
    pub favorites: Vec<Favorite>,
    pub recent_searches: Vec<String>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self { favorites: default_favorites(), recent_searches: Vec::new() }
    }
}

impl StoreState {
    fn add_favorite(&mut self, city: &str, country: &str) -> bool {
        if self.favorites.iter().any(|f| f.city == city && f.country == country) {
            return false;
        }
        self.favorites.push(Favorite::new(city, country));
        true
    }

    fn remove_favorite(&mut self, city: &str, country: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| !(f.city == city && f.country == country));
        self.favorites.len() != before
    }

    fn add_recent_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        // A repeated query keeps its place.
        if self.recent_searches.iter().any(|q| q == query) {
            return;
        }
        self.recent_searches.insert(0, query.to_string());
        self.recent_searches.truncate(RECENT_SEARCH_LIMIT);
    }
}

/// Store living only as long as the value itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: StoreState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: StoreState) -> Self {
        Self { state }
    }
}

impl LocationStore for MemoryStore {
    fn favorites(&self) -> Result<Vec<Favorite>> {
        Ok(self.state.favorites.clone())
    }

    fn add_favorite(&mut self, city: &str, country: &str) -> Result<bool> {
        Ok(self.state.add_favorite(city, country))
    }

    fn remove_favorite(&mut self, city: &str, country: &str) -> Result<bool> {
        Ok(self.state.remove_favorite(city, country))
    }

    fn recent_searches(&self) -> Result<Vec<String>> {
        Ok(self.state.recent_searches.clone())
    }

    fn add_recent_search(&mut self, query: &str) -> Result<()> {
        self.state.add_recent_search(query);
        Ok(())
    }

    fn clear_recent_searches(&mut self) -> Result<()> {
        self.state.recent_searches.clear();
        Ok(())
    }
}

/// Store persisted as JSON; every mutation is written through to disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    state: StoreState,
}

impl JsonFileStore {
    /// Open the store at the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open `path`, seeding default favorites if it doesn't exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse store file: {}", path.display()))?
        } else {
            StoreState::default()
        };

        Ok(Self { path, state })
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("locations.json"))
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&self.state)
            .context("Failed to serialize location store")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))?;

        debug!(path = %self.path.display(), "location store saved");
        Ok(())
    }
}

impl LocationStore for JsonFileStore {
    fn favorites(&self) -> Result<Vec<Favorite>> {
        Ok(self.state.favorites.clone())
    }

    fn add_favorite(&mut self, city: &str, country: &str) -> Result<bool> {
        let added = self.state.add_favorite(city, country);
        if added {
            self.persist()?;
        }
        Ok(added)
    }

    fn remove_favorite(&mut self, city: &str, country: &str) -> Result<bool> {
        let removed = self.state.remove_favorite(city, country);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn recent_searches(&self) -> Result<Vec<String>> {
        Ok(self.state.recent_searches.clone())
    }

    fn add_recent_search(&mut self, query: &str) -> Result<()> {
        self.state.add_recent_search(query);
        self.persist()
    }

    fn clear_recent_searches(&mut self) -> Result<()> {
        self.state.recent_searches.clear();
        self.persist()
    }
}
