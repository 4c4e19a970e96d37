use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutriscan_core::comparison::Comparison;
use nutriscan_core::error::Notice;
use nutriscan_core::models::{Food, RecentSearch};

pub(crate) fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{notice}");
    }
}

pub(crate) fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N]: ");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let Some(line) = stdin.lock().lines().next() else {
        return Ok(false);
    };
    let line = line.context("Failed to read confirmation")?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub(crate) fn print_food_table(foods: &[&Food]) {
    #[derive(Tabled)]
    struct FoodRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Barcode")]
        barcode: String,
        #[tabled(rename = "Cal")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Carbs")]
        carbs: String,
        #[tabled(rename = "Fat")]
        fat: String,
    }

    let rows: Vec<FoodRow> = foods
        .iter()
        .enumerate()
        .map(|(i, f)| FoodRow {
            idx: i + 1,
            id: truncate(&f.id, 12),
            name: truncate(&f.name, 35),
            barcode: f.barcode.clone().unwrap_or_default(),
            calories: {
                let cal = no_neg_zero(f.calories);
                format!("{cal:.0}")
            },
            protein: fmt_amount(f.protein),
            carbs: fmt_amount(f.carbohydrates),
            fat: fmt_amount(f.fat),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..8)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_recent_table(entries: &[RecentSearch]) {
    #[derive(Tabled)]
    struct RecentRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Cal")]
        calories: String,
        #[tabled(rename = "Searched")]
        searched: String,
    }

    let now = Local::now();
    let rows: Vec<RecentRow> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| RecentRow {
            idx: i + 1,
            id: truncate(&e.food.id, 12),
            name: truncate(&e.food.name, 35),
            calories: format!("{:.0}", no_neg_zero(e.food.calories)),
            searched: format_searched_at(e.timestamp, &now),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// One row per nutrient, one column per compared food.
pub(crate) fn print_comparison_table(comparison: &Comparison) {
    let mut builder = Builder::default();

    let mut header = vec!["Nutrient".to_string()];
    header.extend(comparison.foods().iter().map(|f| truncate(&f.name, 20)));
    builder.push_record(header);

    for row in comparison.rows() {
        let mut record = vec![format!("{} ({})", row.label, row.unit)];
        record.extend(row.values.iter().map(|v| fmt_amount(*v)));
        builder.push_record(record);
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// Render an epoch-millisecond timestamp relative to `now`: "Today 14:05",
/// "Yesterday 09:12", or a full date.
pub(crate) fn format_searched_at<Tz: TimeZone>(timestamp_ms: i64, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(at) = now.timezone().timestamp_millis_opt(timestamp_ms).single() else {
        return "-".to_string();
    };
    let today = now.date_naive();
    let day = at.date_naive();
    if day == today {
        format!("Today {}", at.format("%H:%M"))
    } else if today.pred_opt() == Some(day) {
        format!("Yesterday {}", at.format("%H:%M"))
    } else {
        at.format("%Y-%m-%d %H:%M").to_string()
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

fn fmt_amount(value: Option<f64>) -> String {
    value.map_or("-".into(), |v| format!("{:.1}", no_neg_zero(v)))
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
