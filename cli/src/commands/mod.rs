mod compare;
mod favorites;
mod helpers;
mod history;
mod search;

pub(crate) use compare::cmd_compare;
pub(crate) use favorites::{cmd_favorites_list, cmd_favorites_toggle};
pub(crate) use history::{cmd_history_clear, cmd_history_list, cmd_history_remove};
pub(crate) use search::{NutrientArgs, cmd_add, cmd_scan, cmd_search, cmd_update};

#[cfg(test)]
pub(crate) mod testing {
    use anyhow::{Result, bail};

    use nutriscan_core::models::{Food, FoodUpdate, NewFood};
    use nutriscan_core::repository::FoodRepository;

    /// Read-only repository over a fixed list, searched the way the food table is.
    pub(crate) struct StaticRepository {
        foods: Vec<Food>,
    }

    impl StaticRepository {
        pub(crate) fn new(foods: Vec<Food>) -> Self {
            Self { foods }
        }
    }

    impl FoodRepository for StaticRepository {
        fn get_food_by_barcode(&self, barcode: &str) -> Result<Option<Food>> {
            Ok(self
                .foods
                .iter()
                .find(|f| f.barcode.as_deref() == Some(barcode))
                .cloned())
        }

        fn add_food(&self, _food: &NewFood) -> Result<Food> {
            bail!("read-only repository")
        }

        fn search_foods(&self, query: &str) -> Result<Vec<Food>> {
            let needle = query.to_lowercase();
            let mut found: Vec<Food> = self
                .foods
                .iter()
                .filter(|f| f.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            found.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(found)
        }

        fn update_food(&self, _id: &str, _update: &FoodUpdate) -> Result<Food> {
            bail!("read-only repository")
        }
    }

    pub(crate) fn pantry() -> Vec<Food> {
        vec![
            Food::new("a", "Apple", 52.0),
            Food::new("j", "Apple juice", 46.0),
            Food::new("b", "Bread", 265.0),
            Food::new("c", "Cheese", 402.0),
        ]
    }
}
