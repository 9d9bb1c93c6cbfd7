//! Lead and card record commands

use colored::Colorize;

use leadsync_core::{LeadTracker, NewLead, WorkTracker};

use crate::context::Workspace;
use crate::error::Result;

/// Run the lead add command
///
/// The status is validated and stored in its canonical spelling.
pub fn run_lead_add(ws: &Workspace, mut new: NewLead) -> Result<()> {
    let status = new.validate()?;
    new.status = status.as_str().to_string();

    let lead = ws.lead_tracker().create_lead(new)?;
    println!(
        "{} Created lead {} ({}, {})",
        "OK".green().bold(),
        lead.id.to_string().cyan(),
        lead.name,
        lead.status
    );
    println!("Run {} to create its card.", "leadsync sync".cyan());
    Ok(())
}

/// Run the lead list command
pub fn run_lead_list(ws: &Workspace, json: bool) -> Result<()> {
    let leads = ws.lead_tracker().list_leads()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&leads)?);
        return Ok(());
    }

    if leads.is_empty() {
        println!("No leads.");
        return Ok(());
    }
    for lead in &leads {
        let card = lead
            .linked_card_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<10} {:<30} {}",
            lead.id.to_string().cyan(),
            lead.status,
            lead.name,
            card.dimmed()
        );
    }
    Ok(())
}

/// Run the card list command
pub fn run_card_list(ws: &Workspace, all: bool, json: bool) -> Result<()> {
    let cards: Vec<_> = ws
        .work_tracker()
        .list_cards()?
        .into_iter()
        .filter(|card| all || card.is_live())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("No cards.");
        return Ok(());
    }
    for card in &cards {
        let lead = card
            .lead_ref()
            .map(|id| format!("lead {}", id))
            .unwrap_or_default();
        let archived = if card.is_live() { "" } else { " [archived]" };
        println!(
            "{}  {:<12} {}{} {}",
            card.id.to_string().cyan(),
            card.list,
            card.title,
            archived.yellow(),
            lead.dimmed()
        );
    }
    Ok(())
}
