use anyhow::Result;

use crate::models::{Food, FoodUpdate, NewFood};

/// The hosted `alimentos` table.
///
/// The CLI implements this over PostgREST with reqwest; tests use an in-memory
/// mock. Called synchronously, so mobile hosts should call the service from a
/// background thread.
pub trait FoodRepository: Send + Sync {
    /// `None` is the normal outcome for a product nobody has registered yet.
    fn get_food_by_barcode(&self, barcode: &str) -> Result<Option<Food>>;

    fn add_food(&self, food: &NewFood) -> Result<Food>;

    /// Case-insensitive name substring match, ordered by name, at most
    /// [`SEARCH_LIMIT`](crate::models::SEARCH_LIMIT) rows.
    fn search_foods(&self, query: &str) -> Result<Vec<Food>>;

    fn update_food(&self, id: &str, update: &FoodUpdate) -> Result<Food>;
}
