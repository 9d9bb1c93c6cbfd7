//! Sync command implementations
//!
//! Every run mode goes through the same driver and prints the same
//! per-pass summary.

use colored::Colorize;

use leadsync_core::{CardId, Direction, LeadId, PassSummary, SyncMode, SyncReport};

use crate::context::Workspace;
use crate::error::{CliError, Result};

/// Pick the single-item mode for `id`.
///
/// All-digit ids name a lead unless `as_card` is set; anything else names a
/// card unless `as_lead` is set.
pub fn item_mode(id: &str, direction: Direction, as_lead: bool, as_card: bool) -> SyncMode {
    let numeric = !id.is_empty() && id.chars().all(|c| c.is_ascii_digit());
    if as_lead || (numeric && !as_card) {
        SyncMode::Lead {
            id: LeadId::new(id),
            direction,
        }
    } else {
        SyncMode::Card {
            id: CardId::new(id),
            direction,
        }
    }
}

fn headline(mode: &SyncMode) -> String {
    match mode {
        SyncMode::Full => "Running full sync".to_string(),
        SyncMode::LeadsToCards => "Pushing leads to cards".to_string(),
        SyncMode::CardsToLeads => "Pulling cards into leads".to_string(),
        SyncMode::Prune => "Pruning deleted leads and cards".to_string(),
        SyncMode::Lead { id, direction } => format!("Syncing lead {} ({:?})", id, direction),
        SyncMode::Card { id, direction } => format!("Syncing card {} ({:?})", id, direction),
    }
}

/// Run the sync command in `mode`
///
/// Item failures are listed in the output and turn the exit code non-zero;
/// everything that could be processed has already been applied.
pub fn run_sync(ws: &Workspace, mode: SyncMode, dry_run: bool, json: bool) -> Result<()> {
    if !json {
        let suffix = if dry_run { " (dry run)" } else { "" };
        println!("{} {}{}...", "=>".blue().bold(), headline(&mode), suffix);
    }

    let mut driver = ws.driver(dry_run);
    let report = driver.run(mode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} item(s) failed to sync",
            report.failed()
        )))
    }
}

fn print_report(report: &SyncReport) {
    for summary in &report.passes {
        print_pass(summary);
    }
    println!();

    let changes = report.mutations();
    if !report.success() {
        println!(
            "{} {} change(s), {} item(s) failed",
            "WARN".yellow().bold(),
            changes,
            report.failed()
        );
    } else if changes == 0 {
        println!("{} Already in sync. No changes needed.", "OK".green().bold());
    } else if report.dry_run {
        println!(
            "{} Dry run: {} change(s) would be made.",
            "OK".green().bold(),
            changes
        );
    } else {
        println!("{} Sync complete: {} change(s).", "OK".green().bold(), changes);
    }
}

fn print_pass(summary: &PassSummary) {
    println!(
        "   {} {}",
        summary.pass.name().cyan(),
        format!(
            "created {}, updated {}, deleted {}, repaired {}, skipped {}, failed {}",
            summary.created,
            summary.updated,
            summary.deleted,
            summary.repaired,
            summary.skipped,
            summary.failed
        )
        .dimmed()
    );
    for action in &summary.actions {
        println!("      {} {}", "+".green(), action);
    }
    for failure in &summary.failures {
        println!("      {} {}: {}", "!".red(), failure.item.cyan(), failure.message);
    }
}
