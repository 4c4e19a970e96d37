use anyhow::Result;
use serde::Serialize;
use std::process;

use nutriscan_core::comparison::{AddResult, Comparison, NutrientRow};
use nutriscan_core::models::{Food, MAX_COMPARED_FOODS, MIN_QUERY_LEN};
use nutriscan_core::repository::FoodRepository;
use nutriscan_core::service::{NutriScanService, SearchOutcome};

use super::helpers::print_comparison_table;

#[derive(Serialize)]
struct ComparisonJson<'a> {
    foods: &'a [Food],
    nutrients: Vec<NutrientRow>,
}

/// Compare the best match for each query side by side. Recent searches are
/// left untouched.
pub(crate) fn cmd_compare(
    svc: &NutriScanService,
    repo: &dyn FoodRepository,
    queries: &[String],
    json: bool,
) -> Result<()> {
    let mut comparison = Comparison::new();

    for query in queries {
        if comparison.is_full() {
            eprintln!("Skipping '{query}': at most {MAX_COMPARED_FOODS} foods can be compared");
            continue;
        }
        let first = match svc.find_foods(repo, query)? {
            SearchOutcome::Results { foods, .. } => foods.into_iter().next(),
            SearchOutcome::Cleared | SearchOutcome::TooShort => {
                eprintln!("Skipping '{query}': queries need at least {MIN_QUERY_LEN} characters");
                continue;
            }
        };
        let Some(food) = first else {
            eprintln!("No results found for '{query}'");
            continue;
        };
        let name = food.name.clone();
        match comparison.add(food) {
            AddResult::Added => {}
            AddResult::Duplicate => eprintln!("'{query}' matched {name}, already compared"),
            AddResult::Full => {
                eprintln!("Skipping '{query}': at most {MAX_COMPARED_FOODS} foods can be compared");
            }
        }
    }

    if comparison.foods().is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("Nothing to compare");
        }
        process::exit(2);
    }

    if json {
        let out = ComparisonJson {
            foods: comparison.foods(),
            nutrients: comparison.rows(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_comparison_table(&comparison);
    }

    Ok(())
}
