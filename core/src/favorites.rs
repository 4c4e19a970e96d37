use tracing::debug;

use crate::cache;
use crate::error::CacheError;
use crate::models::Food;
use crate::store::KeyValueStore;

pub const STORAGE_KEY: &str = "favorites";

/// Membership test against an already loaded list. Does no I/O.
#[must_use]
pub fn is_favorite(favorites: &[Food], food: &Food) -> bool {
    favorites.iter().any(|f| f.id == food.id)
}

/// The favorited foods, kept in the order they were added.
pub struct Favorites<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> Favorites<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Result<Vec<Food>, CacheError> {
        let raw = cache::read_raw(self.store, STORAGE_KEY)?;
        let foods = raw
            .as_deref()
            .map(|raw| {
                cache::decode_lenient::<Food>(STORAGE_KEY, raw)
                    .into_iter()
                    .filter(Food::is_cacheable)
                    .collect()
            })
            .unwrap_or_default();
        Ok(foods)
    }

    /// Add `food` if absent, remove it if present. Returns the new membership.
    ///
    /// A food without an id or name is never stored; toggling it returns
    /// `false` and leaves the list alone.
    pub fn toggle(&self, food: &Food) -> Result<bool, CacheError> {
        self.toggle_with(food).map(|(now_favorite, _)| now_favorite)
    }

    /// Like [`toggle`](Self::toggle), also returning the list as persisted.
    pub fn toggle_with(&self, food: &Food) -> Result<(bool, Vec<Food>), CacheError> {
        let mut favorites = self.load()?;
        if !food.is_cacheable() {
            debug!(id = %food.id, name = %food.name, "not toggling invalid food");
            return Ok((false, favorites));
        }

        let was_favorite = is_favorite(&favorites, food);
        if was_favorite {
            favorites.retain(|f| f.id != food.id);
        } else {
            favorites.push(food.clone());
        }

        cache::write_json(self.store, STORAGE_KEY, &favorites)?;
        debug!(id = %food.id, favorite = !was_favorite, "toggled favorite");
        Ok((!was_favorite, favorites))
    }
}
