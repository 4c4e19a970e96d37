use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in the recent-searches history.
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Maximum number of foods shown side by side in a comparison.
pub const MAX_COMPARED_FOODS: usize = 3;

/// Row limit for a name search against the `alimentos` table.
pub const SEARCH_LIMIT: usize = 10;

/// Queries shorter than this (after trimming) never reach the remote store.
pub const MIN_QUERY_LEN: usize = 2;

/// One row of the remote `alimentos` table.
///
/// JSON keys follow the table's column names so records can be stored and
/// exchanged without a mapping layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: String,
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "calorias", default)]
    pub calories: f64,
    #[serde(rename = "proteinas", default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(rename = "grasas", default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(
        rename = "grasas_saturadas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub saturated_fat: Option<f64>,
    #[serde(
        rename = "carbohidratos",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub carbohydrates: Option<f64>,
    #[serde(rename = "azucares", default, skip_serializing_if = "Option::is_none")]
    pub sugars: Option<f64>,
    #[serde(rename = "fibra", default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(rename = "sodio", default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(rename = "vitamina_a", default, skip_serializing_if = "Option::is_none")]
    pub vitamin_a: Option<f64>,
    #[serde(rename = "vitamina_c", default, skip_serializing_if = "Option::is_none")]
    pub vitamin_c: Option<f64>,
    #[serde(rename = "calcio", default, skip_serializing_if = "Option::is_none")]
    pub calcium: Option<f64>,
    #[serde(rename = "hierro", default, skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>,
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Food {
    /// A minimal record with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, calories: f64) -> Self {
        Self {
            id: id.into(),
            barcode: None,
            name: name.into(),
            calories,
            protein: None,
            fat: None,
            saturated_fat: None,
            carbohydrates: None,
            sugars: None,
            fiber: None,
            sodium: None,
            vitamin_a: None,
            vitamin_c: None,
            calcium: None,
            iron: None,
            image_url: None,
            created_at: None,
        }
    }

    /// Whether the record carries the identifier and name the local caches key on.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// Insert payload for the `alimentos` table: a [`Food`] without the
/// store-assigned `id` and `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewFood {
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "calorias")]
    pub calories: f64,
    #[serde(rename = "proteinas", default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(rename = "grasas", default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(
        rename = "grasas_saturadas",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub saturated_fat: Option<f64>,
    #[serde(
        rename = "carbohidratos",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub carbohydrates: Option<f64>,
    #[serde(rename = "azucares", default, skip_serializing_if = "Option::is_none")]
    pub sugars: Option<f64>,
    #[serde(rename = "fibra", default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(rename = "sodio", default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(rename = "vitamina_a", default, skip_serializing_if = "Option::is_none")]
    pub vitamin_a: Option<f64>,
    #[serde(rename = "vitamina_c", default, skip_serializing_if = "Option::is_none")]
    pub vitamin_c: Option<f64>,
    #[serde(rename = "calcio", default, skip_serializing_if = "Option::is_none")]
    pub calcium: Option<f64>,
    #[serde(rename = "hierro", default, skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>,
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update for an existing row. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodUpdate {
    #[serde(rename = "codigo", skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "calorias", skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(rename = "proteinas", skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(rename = "grasas", skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(rename = "grasas_saturadas", skip_serializing_if = "Option::is_none")]
    pub saturated_fat: Option<f64>,
    #[serde(rename = "carbohidratos", skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
    #[serde(rename = "azucares", skip_serializing_if = "Option::is_none")]
    pub sugars: Option<f64>,
    #[serde(rename = "fibra", skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(rename = "sodio", skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(rename = "vitamina_a", skip_serializing_if = "Option::is_none")]
    pub vitamin_a: Option<f64>,
    #[serde(rename = "vitamina_c", skip_serializing_if = "Option::is_none")]
    pub vitamin_c: Option<f64>,
    #[serde(rename = "calcio", skip_serializing_if = "Option::is_none")]
    pub calcium: Option<f64>,
    #[serde(rename = "hierro", skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>,
    #[serde(rename = "imagen_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl FoodUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// --- Recency cache types ---

/// A searched food as stored in the recent-searches history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearch {
    #[serde(flatten)]
    pub food: Food,
    /// Capture time, epoch milliseconds.
    pub timestamp: i64,
}

impl RecentSearch {
    #[must_use]
    pub fn new(food: Food, timestamp: i64) -> Self {
        Self { food, timestamp }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.food.is_cacheable() && self.timestamp > 0
    }
}

// --- Nutrient table ---

/// A displayable nutrient column, shared by detail views and comparisons.
#[derive(Clone, Copy)]
pub struct Nutrient {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub value: fn(&Food) -> Option<f64>,
}

pub const NUTRIENTS: &[Nutrient] = &[
    Nutrient {
        key: "calorias",
        label: "Calories",
        unit: "kcal",
        value: |f| Some(f.calories),
    },
    Nutrient {
        key: "proteinas",
        label: "Protein",
        unit: "g",
        value: |f| f.protein,
    },
    Nutrient {
        key: "grasas",
        label: "Fat",
        unit: "g",
        value: |f| f.fat,
    },
    Nutrient {
        key: "grasas_saturadas",
        label: "Saturated fat",
        unit: "g",
        value: |f| f.saturated_fat,
    },
    Nutrient {
        key: "carbohidratos",
        label: "Carbohydrates",
        unit: "g",
        value: |f| f.carbohydrates,
    },
    Nutrient {
        key: "azucares",
        label: "Sugars",
        unit: "g",
        value: |f| f.sugars,
    },
    Nutrient {
        key: "sodio",
        label: "Sodium",
        unit: "mg",
        value: |f| f.sodium,
    },
    Nutrient {
        key: "fibra",
        label: "Fiber",
        unit: "g",
        value: |f| f.fiber,
    },
    Nutrient {
        key: "vitamina_a",
        label: "Vitamin A",
        unit: "IU",
        value: |f| f.vitamin_a,
    },
    Nutrient {
        key: "vitamina_c",
        label: "Vitamin C",
        unit: "mg",
        value: |f| f.vitamin_c,
    },
    Nutrient {
        key: "calcio",
        label: "Calcium",
        unit: "mg",
        value: |f| f.calcium,
    },
    Nutrient {
        key: "hierro",
        label: "Iron",
        unit: "mg",
        value: |f| f.iron,
    },
];

// --- Validation ---

pub fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        bail!("{field} must be a finite number");
    }
    if value < 0.0 {
        bail!("{field} must be non-negative (got {value})");
    }
    Ok(())
}

fn validate_optional(field: &str, value: Option<f64>) -> Result<()> {
    value.map_or(Ok(()), |v| validate_amount(field, v))
}

/// Trim a barcode, treating blank input as unset.
#[must_use]
pub fn normalize_barcode(barcode: Option<&str>) -> Option<String> {
    barcode
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(ToString::to_string)
}

pub fn validate_new_food(food: &NewFood) -> Result<()> {
    if food.name.trim().is_empty() {
        bail!("Food name must not be empty");
    }
    validate_amount("calories", food.calories)?;
    validate_nutrients(&[
        ("protein", food.protein),
        ("fat", food.fat),
        ("saturated fat", food.saturated_fat),
        ("carbohydrates", food.carbohydrates),
        ("sugars", food.sugars),
        ("fiber", food.fiber),
        ("sodium", food.sodium),
        ("vitamin A", food.vitamin_a),
        ("vitamin C", food.vitamin_c),
        ("calcium", food.calcium),
        ("iron", food.iron),
    ])
}

pub fn validate_food_update(update: &FoodUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update");
    }
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            bail!("Food name must not be empty");
        }
    }
    validate_nutrients(&[
        ("calories", update.calories),
        ("protein", update.protein),
        ("fat", update.fat),
        ("saturated fat", update.saturated_fat),
        ("carbohydrates", update.carbohydrates),
        ("sugars", update.sugars),
        ("fiber", update.fiber),
        ("sodium", update.sodium),
        ("vitamin A", update.vitamin_a),
        ("vitamin C", update.vitamin_c),
        ("calcium", update.calcium),
        ("iron", update.iron),
    ])
}

fn validate_nutrients(values: &[(&str, Option<f64>)]) -> Result<()> {
    for (field, value) in values {
        validate_optional(field, *value)?;
    }
    Ok(())
}
