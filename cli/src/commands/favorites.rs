use anyhow::Result;
use std::process;

use nutriscan_core::models::Food;
use nutriscan_core::service::NutriScanService;

use super::helpers::{print_food_table, print_notices};

pub(crate) fn cmd_favorites_list(svc: &NutriScanService, json: bool) -> Result<()> {
    let (session, notices) = svc.session();
    print_notices(&notices);

    if session.favorites().is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No favorites yet");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(session.favorites())?);
    } else {
        let refs: Vec<&Food> = session.favorites().iter().collect();
        print_food_table(&refs);
    }

    Ok(())
}

/// Toggle a food that is already cached locally, as a favorite or a recent search.
pub(crate) fn cmd_favorites_toggle(svc: &NutriScanService, id: &str) -> Result<()> {
    let (mut session, notices) = svc.session();
    print_notices(&notices);

    let Some(food) = session.find(id).cloned() else {
        eprintln!("No favorite or recent search with id '{id}'");
        eprintln!("Favorite a search result with: nutriscan search <query> --favorite <N>");
        process::exit(2);
    };

    match session.toggle_favorite(&food) {
        Ok(true) => println!("Added {} to favorites", food.name),
        Ok(false) => println!("Removed {} from favorites", food.name),
        Err(notice) => print_notices(&[notice]),
    }
    Ok(())
}
