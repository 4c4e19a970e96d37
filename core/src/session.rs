//! Presentation-side snapshot of the recency caches.
//!
//! A screen keeps its own copy of the recent searches and favorites. Other
//! screens (or other processes) may change the stored collections at any time,
//! so a copy is only trusted until the screen regains focus: call
//! [`Session::on_focus`] then. A failed write never touches the copy.

use crate::error::{CacheError, Notice};
use crate::favorites::{self, Favorites};
use crate::models::{Food, RecentSearch};
use crate::recent::RecentSearches;
use crate::store::KeyValueStore;

pub struct Session<'a, S: KeyValueStore + ?Sized> {
    recent: RecentSearches<'a, S>,
    favorites: Favorites<'a, S>,
    recent_snapshot: Vec<RecentSearch>,
    favorite_snapshot: Vec<Food>,
}

impl<'a, S: KeyValueStore + ?Sized> Session<'a, S> {
    /// Create a session and load both collections, as a screen does on mount.
    /// Load failures are returned as notices alongside an empty session.
    pub fn open(store: &'a S) -> (Self, Vec<Notice>) {
        let mut session = Self {
            recent: RecentSearches::new(store),
            favorites: Favorites::new(store),
            recent_snapshot: Vec::new(),
            favorite_snapshot: Vec::new(),
        };
        let notices = session.on_focus();
        (session, notices)
    }

    /// Re-read both collections from storage. A collection that fails to load
    /// keeps its previous snapshot.
    pub fn on_focus(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        match self.recent.load() {
            Ok(entries) => self.recent_snapshot = entries,
            Err(e) => notices.push(Notice::from(&e)),
        }
        match self.favorites.load() {
            Ok(foods) => self.favorite_snapshot = foods,
            Err(e) => notices.push(Notice::from(&e)),
        }
        notices
    }

    #[must_use]
    pub fn recent(&self) -> &[RecentSearch] {
        &self.recent_snapshot
    }

    #[must_use]
    pub fn favorites(&self) -> &[Food] {
        &self.favorite_snapshot
    }

    #[must_use]
    pub fn is_favorite(&self, food: &Food) -> bool {
        favorites::is_favorite(&self.favorite_snapshot, food)
    }

    /// Look a food up by id in the snapshot, favorites first.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Food> {
        self.favorite_snapshot
            .iter()
            .find(|f| f.id == id)
            .or_else(|| {
                self.recent_snapshot
                    .iter()
                    .map(|e| &e.food)
                    .find(|f| f.id == id)
            })
    }

    pub fn record_search(&mut self, food: &Food) -> Result<(), Notice> {
        let entries = self.recent.record(food).map_err(notice)?;
        self.recent_snapshot = entries;
        Ok(())
    }

    pub fn remove_recent(&mut self, id: &str) -> Result<(), Notice> {
        let entries = self.recent.remove(id).map_err(notice)?;
        self.recent_snapshot = entries;
        Ok(())
    }

    pub fn clear_recent(&mut self) -> Result<(), Notice> {
        self.recent.clear().map_err(notice)?;
        self.recent_snapshot.clear();
        Ok(())
    }

    /// Returns the food's new membership.
    pub fn toggle_favorite(&mut self, food: &Food) -> Result<bool, Notice> {
        let (now_favorite, foods) = self.favorites.toggle_with(food).map_err(notice)?;
        self.favorite_snapshot = foods;
        Ok(now_favorite)
    }
}

fn notice(err: CacheError) -> Notice {
    Notice::from(&err)
}
