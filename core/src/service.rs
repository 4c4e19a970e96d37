use std::path::Path;

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::db::Database;
use crate::error::Notice;
use crate::favorites::Favorites;
use crate::models::{self, Food, FoodUpdate, MIN_QUERY_LEN, NewFood};
use crate::recent::RecentSearches;
use crate::repository::FoodRepository;
use crate::session::Session;
use crate::store::KeyValueStore;

#[derive(Debug)]
pub enum SearchOutcome {
    /// The query was blank; the presentation clears its results.
    Cleared,
    /// Fewer than [`MIN_QUERY_LEN`] characters; nothing was fetched.
    TooShort,
    Results {
        foods: Vec<Food>,
        /// Set when the first result could not be added to recent searches.
        notice: Option<Notice>,
    },
}

#[derive(Debug)]
pub enum ScanOutcome {
    Found {
        food: Food,
        notice: Option<Notice>,
    },
    /// Nobody has registered this product yet.
    NotRegistered { barcode: String },
}

/// Owns the local store and ties the remote repository to the recency caches.
pub struct NutriScanService<S: KeyValueStore = Database> {
    store: S,
}

impl NutriScanService<Database> {
    pub fn new(db_path: &str) -> Result<Self> {
        let db = Database::open(Path::new(db_path))?;
        Ok(Self { store: db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { store: db })
    }
}

impl<S: KeyValueStore> NutriScanService<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    // --- Local caches ---

    pub fn recent_searches(&self) -> RecentSearches<'_, S> {
        RecentSearches::new(&self.store)
    }

    pub fn favorites(&self) -> Favorites<'_, S> {
        Favorites::new(&self.store)
    }

    /// Open a presentation snapshot over the store, with any load notices.
    pub fn session(&self) -> (Session<'_, S>, Vec<Notice>) {
        Session::open(&self.store)
    }

    // --- Remote operations ---

    /// Search foods by name. The first result is recorded as a recent search.
    pub fn search(&self, repo: &dyn FoodRepository, query: &str) -> Result<SearchOutcome> {
        match self.find_foods(repo, query)? {
            SearchOutcome::Results { foods, .. } => {
                let notice = foods.first().and_then(|first| self.record(first));
                Ok(SearchOutcome::Results { foods, notice })
            }
            outcome => Ok(outcome),
        }
    }

    /// Same query rules as [`search`](Self::search), without touching recent searches.
    pub fn find_foods(&self, repo: &dyn FoodRepository, query: &str) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::Cleared);
        }
        if query.chars().count() < MIN_QUERY_LEN {
            debug!(query, "query too short");
            return Ok(SearchOutcome::TooShort);
        }

        let foods = repo.search_foods(query)?;
        debug!(query, results = foods.len(), "search finished");
        Ok(SearchOutcome::Results {
            foods,
            notice: None,
        })
    }

    pub fn scan_barcode(&self, repo: &dyn FoodRepository, code: &str) -> Result<ScanOutcome> {
        let Some(barcode) = models::normalize_barcode(Some(code)) else {
            bail!("Barcode must not be empty");
        };

        match repo.get_food_by_barcode(&barcode)? {
            Some(food) => {
                let notice = self.record(&food);
                Ok(ScanOutcome::Found { food, notice })
            }
            None => {
                info!(%barcode, "barcode not registered");
                Ok(ScanOutcome::NotRegistered { barcode })
            }
        }
    }

    pub fn register_food(&self, repo: &dyn FoodRepository, food: NewFood) -> Result<Food> {
        models::validate_new_food(&food)?;
        let food = NewFood {
            name: food.name.trim().to_string(),
            barcode: models::normalize_barcode(food.barcode.as_deref()),
            ..food
        };
        let created = repo.add_food(&food)?;
        info!(id = %created.id, name = %created.name, "registered food");
        Ok(created)
    }

    pub fn update_food(
        &self,
        repo: &dyn FoodRepository,
        id: &str,
        update: FoodUpdate,
    ) -> Result<Food> {
        let id = id.trim();
        if id.is_empty() {
            bail!("Food id must not be empty");
        }
        let update = FoodUpdate {
            barcode: models::normalize_barcode(update.barcode.as_deref()),
            ..update
        };
        models::validate_food_update(&update)?;
        let update = FoodUpdate {
            name: update.name.map(|n| n.trim().to_string()),
            ..update
        };
        let updated = repo.update_food(id, &update)?;
        info!(id = %updated.id, "updated food");
        Ok(updated)
    }

    fn record(&self, food: &Food) -> Option<Notice> {
        self.recent_searches()
            .record(food)
            .err()
            .map(|e| Notice::from(&e))
    }
}
