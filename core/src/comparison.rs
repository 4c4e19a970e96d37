use serde::Serialize;

use crate::models::{Food, MAX_COMPARED_FOODS, NUTRIENTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    Added,
    /// Already holding [`MAX_COMPARED_FOODS`] foods.
    Full,
    Duplicate,
}

/// One nutrient across every compared food, in comparison order.
#[derive(Debug, Clone, Serialize)]
pub struct NutrientRow {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub values: Vec<Option<f64>>,
}

/// Side-by-side comparison of up to [`MAX_COMPARED_FOODS`] foods.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    foods: Vec<Food>,
}

impl Comparison {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, food: Food) -> AddResult {
        if self.foods.len() >= MAX_COMPARED_FOODS {
            return AddResult::Full;
        }
        if self.foods.iter().any(|f| f.id == food.id) {
            return AddResult::Duplicate;
        }
        self.foods.push(food);
        AddResult::Added
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.foods.len();
        self.foods.retain(|f| f.id != id);
        self.foods.len() != before
    }

    #[must_use]
    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.foods.len() >= MAX_COMPARED_FOODS
    }

    #[must_use]
    pub fn rows(&self) -> Vec<NutrientRow> {
        NUTRIENTS
            .iter()
            .map(|n| NutrientRow {
                key: n.key,
                label: n.label,
                unit: n.unit,
                values: self.foods.iter().map(n.value).collect(),
            })
            .collect()
    }
}
