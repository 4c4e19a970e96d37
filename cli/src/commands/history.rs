use anyhow::Result;
use std::process;

use nutriscan_core::service::NutriScanService;

use super::helpers::{confirm, print_notices, print_recent_table};

pub(crate) fn cmd_history_list(svc: &NutriScanService, json: bool) -> Result<()> {
    let (session, notices) = svc.session();
    print_notices(&notices);

    if session.recent().is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recent searches");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(session.recent())?);
    } else {
        print_recent_table(session.recent());
    }

    Ok(())
}

pub(crate) fn cmd_history_remove(svc: &NutriScanService, id: &str) -> Result<()> {
    let (mut session, notices) = svc.session();
    print_notices(&notices);

    let Some(name) = session
        .recent()
        .iter()
        .find(|e| e.food.id == id)
        .map(|e| e.food.name.clone())
    else {
        eprintln!("No recent search with id '{id}'");
        process::exit(2);
    };

    match session.remove_recent(id) {
        Ok(()) => println!("Removed {name} from recent searches"),
        Err(notice) => print_notices(&[notice]),
    }
    Ok(())
}

pub(crate) fn cmd_history_clear(svc: &NutriScanService, yes: bool) -> Result<()> {
    let (mut session, notices) = svc.session();
    print_notices(&notices);

    let count = session.recent().len();
    if count == 0 {
        println!("No recent searches to clear");
        return Ok(());
    }
    if !yes && !confirm(&format!("Clear {count} recent searches?"))? {
        eprintln!("Cancelled");
        return Ok(());
    }

    match session.clear_recent() {
        Ok(()) => println!("Cleared {count} recent searches"),
        Err(notice) => print_notices(&[notice]),
    }
    Ok(())
}
