//! Check and status command implementations
//!
//! Both are read-only: they report on the mapping and the trackers without
//! changing either.

use colored::Colorize;
use serde::Serialize;

use leadsync_core::{CheckStatus, DriftItem, LeadTracker, WorkTracker};

use crate::context::Workspace;
use crate::error::Result;

/// Run the check command
///
/// Compares the identity mapping against both trackers.
pub fn run_check(ws: &Workspace, json: bool) -> Result<()> {
    let report = ws.driver(false).check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} Checking lead and card drift...", "=>".blue().bold());

    match report.status {
        CheckStatus::Healthy => {
            println!("{} Trackers are in sync. No drift detected.", "OK".green().bold());
        }
        CheckStatus::Missing => {
            println!("{} Some counterparts are missing:", "MISSING".yellow().bold());
            print_items(&report.missing, "-".yellow().to_string());
            println!();
            println!("Run {} to repair.", "leadsync sync".cyan());
        }
        CheckStatus::Drifted => {
            println!("{} Status has drifted:", "DRIFTED".red().bold());
            print_items(&report.drifted, "!".red().to_string());
            if !report.missing.is_empty() {
                println!();
                println!("{} Also missing:", "MISSING".yellow().bold());
                print_items(&report.missing, "-".yellow().to_string());
            }
            println!();
            println!("Run {} to repair.", "leadsync sync".cyan());
        }
        CheckStatus::Broken => {
            println!("{} Identity mapping is broken:", "BROKEN".red().bold());
            for msg in &report.messages {
                println!("   {} {}", "!".red(), msg);
            }
            println!();
            println!("Manual intervention is required.");
        }
    }

    Ok(())
}

fn print_items(items: &[DriftItem], bullet: String) {
    for item in items {
        let lead = item.lead_id.as_deref().unwrap_or("-");
        let card = item.card_id.as_deref().unwrap_or("-");
        println!(
            "   {} lead {} / card {}: {}",
            bullet,
            lead.cyan(),
            card.cyan(),
            item.description
        );
    }
}

/// Mapping and tracker statistics
#[derive(Debug, Serialize)]
struct StatusView {
    mapping: String,
    pairs: usize,
    sync_count: u64,
    last_sync: Option<String>,
    leads: usize,
    cards: usize,
    archived_cards: usize,
}

/// Run the status command
pub fn run_status(ws: &Workspace, json: bool) -> Result<()> {
    let store = ws.driver(false).load_store()?;
    let leads = ws.lead_tracker().list_leads()?;
    let cards = ws.work_tracker().list_cards()?;
    let archived = cards.iter().filter(|card| !card.is_live()).count();

    let view = StatusView {
        mapping: store.path().to_string(),
        pairs: store.len(),
        sync_count: store.mapping().sync_count(),
        last_sync: store.mapping().last_sync().map(|at| at.to_rfc3339()),
        leads: leads.len(),
        cards: cards.len() - archived,
        archived_cards: archived,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{} {}", "Mapping:".bold(), view.mapping);
    println!("   {} linked pair(s)", view.pairs);
    println!(
        "   {} pass(es) completed, last at {}",
        view.sync_count,
        view.last_sync.as_deref().unwrap_or("never")
    );
    println!("{} {}", "Leads:".bold(), view.leads);
    println!(
        "{} {} ({} archived)",
        "Cards:".bold(),
        view.cards,
        view.archived_cards
    );

    Ok(())
}
