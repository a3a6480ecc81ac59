//! Shared CLI output helpers for consistent operator-facing text.

use std::fmt::Display;

use owo_colors::OwoColorize;
use tabled::{Table, Tabled};

use crate::domain::PriceCorrection;
use crate::marketplace::PushFailure;

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
}

/// Print a dimmed label with its value.
pub fn field(label: &str, value: impl Display) {
    println!("  {:<18} {}", label.dimmed(), value);
}

/// Print a successful status line.
pub fn success(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

/// Print a warning status line.
pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error status line.
pub fn error(message: &str) {
    eprintln!("  {} {}", "×".red(), message);
}

#[derive(Tabled)]
struct CorrectionRow {
    #[tabled(rename = "Offer")]
    offer_id: String,
    #[tabled(rename = "Observed")]
    observed: String,
    #[tabled(rename = "Base")]
    base: String,
    #[tabled(rename = "Multiplier")]
    multiplier: String,
    #[tabled(rename = "New price")]
    new_price: String,
    #[tabled(rename = "Display")]
    display: String,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Offer")]
    offer_id: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

fn print_table(table: &str) {
    for line in table.lines() {
        println!("  {line}");
    }
}

/// Print corrections as a table.
pub fn corrections(corrections: &[PriceCorrection]) {
    let rows = corrections.iter().map(|c| CorrectionRow {
        offer_id: c.offer_id.clone(),
        observed: c.debug.observed_price.normalize().to_string(),
        base: c.debug.new_base.normalize().to_string(),
        multiplier: c.debug.multiplier.normalize().to_string(),
        new_price: c.new_price.normalize().to_string(),
        display: c.display_reference_price.normalize().to_string(),
    });
    print_table(&Table::new(rows).to_string());
}

/// Print push failures as a table.
pub fn failures(failures: &[PushFailure]) {
    let rows = failures.iter().map(|f| FailureRow {
        offer_id: f.offer_id.clone(),
        reason: f.reason.to_string(),
    });
    print_table(&Table::new(rows).to_string());
}
