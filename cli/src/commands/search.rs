use anyhow::{Result, bail};
use clap::Args;
use std::process;

use nutriscan_core::comparison::Comparison;
use nutriscan_core::error::Notice;
use nutriscan_core::models::{Food, FoodUpdate, MIN_QUERY_LEN, NewFood};
use nutriscan_core::repository::FoodRepository;
use nutriscan_core::service::{NutriScanService, ScanOutcome, SearchOutcome};

use super::helpers::{json_error, print_comparison_table, print_food_table, print_notices};

/// Optional nutrient values, per 100 g.
#[derive(Args, Debug, Default)]
pub(crate) struct NutrientArgs {
    /// Protein (g)
    #[arg(long)]
    pub protein: Option<f64>,
    /// Fat (g)
    #[arg(long)]
    pub fat: Option<f64>,
    /// Saturated fat (g)
    #[arg(long)]
    pub saturated_fat: Option<f64>,
    /// Carbohydrates (g)
    #[arg(long)]
    pub carbs: Option<f64>,
    /// Sugars (g)
    #[arg(long)]
    pub sugars: Option<f64>,
    /// Fiber (g)
    #[arg(long)]
    pub fiber: Option<f64>,
    /// Sodium (mg)
    #[arg(long)]
    pub sodium: Option<f64>,
    /// Vitamin A (µg)
    #[arg(long)]
    pub vitamin_a: Option<f64>,
    /// Vitamin C (mg)
    #[arg(long)]
    pub vitamin_c: Option<f64>,
    /// Calcium (mg)
    #[arg(long)]
    pub calcium: Option<f64>,
    /// Iron (mg)
    #[arg(long)]
    pub iron: Option<f64>,
}

pub(crate) fn cmd_search(
    svc: &NutriScanService,
    repo: &dyn FoodRepository,
    query: &str,
    favorite: Option<usize>,
    json: bool,
) -> Result<()> {
    let (foods, notice) = match svc.search(repo, query)? {
        SearchOutcome::Cleared => bail!("Search query must not be empty"),
        SearchOutcome::TooShort => {
            bail!("Search query must be at least {MIN_QUERY_LEN} characters")
        }
        SearchOutcome::Results { foods, notice } => (foods, notice),
    };
    print_notices(notice.as_slice());

    if foods.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No results found for '{}'", query.trim());
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&foods)?);
    } else {
        let refs: Vec<&Food> = foods.iter().collect();
        print_food_table(&refs);
    }

    if let Some(position) = favorite {
        match toggle_result_favorite(svc, &foods, position)? {
            (food, Ok(true)) => eprintln!("Added {} to favorites", food.name),
            (food, Ok(false)) => eprintln!("Removed {} from favorites", food.name),
            (_, Err(notice)) => print_notices(&[notice]),
        }
    }

    Ok(())
}

/// Toggle the favorite state of the result at 1-based `position`.
fn toggle_result_favorite<'f>(
    svc: &NutriScanService,
    foods: &'f [Food],
    position: usize,
) -> Result<(&'f Food, Result<bool, Notice>)> {
    let Some(food) = position.checked_sub(1).and_then(|i| foods.get(i)) else {
        bail!("--favorite must be between 1 and {}", foods.len());
    };
    let (mut session, notices) = svc.session();
    print_notices(&notices);
    Ok((food, session.toggle_favorite(food)))
}

pub(crate) fn cmd_scan(
    svc: &NutriScanService,
    repo: &dyn FoodRepository,
    code: &str,
    json: bool,
) -> Result<()> {
    match svc.scan_barcode(repo, code)? {
        ScanOutcome::Found { food, notice } => {
            print_notices(notice.as_slice());
            if json {
                println!("{}", serde_json::to_string_pretty(&food)?);
            } else {
                print_food_detail(food);
            }
            Ok(())
        }
        ScanOutcome::NotRegistered { barcode } => {
            if json {
                println!(
                    "{}",
                    json_error(&format!("No food registered for barcode {barcode}"))
                );
            } else {
                eprintln!("No food registered for barcode {barcode}");
                eprintln!(
                    "Register it with: nutriscan add <name> --calories <kcal> --barcode {barcode}"
                );
            }
            process::exit(2);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_add(
    svc: &NutriScanService,
    repo: &dyn FoodRepository,
    name: &str,
    calories: f64,
    nutrients: &NutrientArgs,
    barcode: Option<String>,
    image_url: Option<String>,
    json: bool,
) -> Result<()> {
    let food = svc.register_food(
        repo,
        NewFood {
            barcode,
            name: name.to_string(),
            calories,
            protein: nutrients.protein,
            fat: nutrients.fat,
            saturated_fat: nutrients.saturated_fat,
            carbohydrates: nutrients.carbs,
            sugars: nutrients.sugars,
            fiber: nutrients.fiber,
            sodium: nutrients.sodium,
            vitamin_a: nutrients.vitamin_a,
            vitamin_c: nutrients.vitamin_c,
            calcium: nutrients.calcium,
            iron: nutrients.iron,
            image_url,
        },
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&food)?);
    } else {
        let name = &food.name;
        let id = &food.id;
        println!("Added food: {name} (id: {id})");
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_update(
    svc: &NutriScanService,
    repo: &dyn FoodRepository,
    id: &str,
    name: Option<String>,
    calories: Option<f64>,
    nutrients: &NutrientArgs,
    barcode: Option<String>,
    image_url: Option<String>,
    json: bool,
) -> Result<()> {
    let food = svc.update_food(
        repo,
        id,
        FoodUpdate {
            barcode,
            name,
            calories,
            protein: nutrients.protein,
            fat: nutrients.fat,
            saturated_fat: nutrients.saturated_fat,
            carbohydrates: nutrients.carbs,
            sugars: nutrients.sugars,
            fiber: nutrients.fiber,
            sodium: nutrients.sodium,
            vitamin_a: nutrients.vitamin_a,
            vitamin_c: nutrients.vitamin_c,
            calcium: nutrients.calcium,
            iron: nutrients.iron,
            image_url,
        },
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&food)?);
    } else {
        let name = &food.name;
        let id = &food.id;
        println!("Updated food: {name} (id: {id})");
    }

    Ok(())
}

fn print_food_detail(food: Food) {
    print_food_table(&[&food]);
    let mut single = Comparison::new();
    single.add(food);
    print_comparison_table(&single);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{StaticRepository, pantry};

    #[test]
    fn test_favorite_second_result() {
        let svc = NutriScanService::new_in_memory().unwrap();
        let repo = StaticRepository::new(pantry());

        cmd_search(&svc, &repo, "apple", Some(2), true).unwrap();

        let favorites = svc.favorites().load().unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "j");
        let recent = svc.recent_searches().load().unwrap();
        assert_eq!(recent[0].food.id, "a");
    }

    #[test]
    fn test_favorite_result_toggles_off() {
        let svc = NutriScanService::new_in_memory().unwrap();
        let foods = pantry();

        let (food, now_favorite) = toggle_result_favorite(&svc, &foods, 3).unwrap();
        assert_eq!(food.id, "b");
        assert_eq!(now_favorite, Ok(true));
        let (_, now_favorite) = toggle_result_favorite(&svc, &foods, 3).unwrap();
        assert_eq!(now_favorite, Ok(false));
        assert!(svc.favorites().load().unwrap().is_empty());
    }

    #[test]
    fn test_favorite_position_out_of_range() {
        let svc = NutriScanService::new_in_memory().unwrap();
        let foods = pantry();

        assert!(toggle_result_favorite(&svc, &foods, 0).is_err());
        assert!(toggle_result_favorite(&svc, &foods, 5).is_err());
        assert!(svc.favorites().load().unwrap().is_empty());
    }
}
