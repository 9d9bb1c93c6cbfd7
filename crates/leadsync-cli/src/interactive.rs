//! Interactive menu
//!
//! Uses dialoguer for terminal-based selection over the same actions the
//! subcommands expose.

use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use leadsync_core::{LeadStatus, NewLead, SyncMode};

use crate::commands;
use crate::context::Workspace;
use crate::error::Result;

const ACTIONS: &[&str] = &[
    "Full sync",
    "Preview full sync (dry run)",
    "Push leads to cards",
    "Pull cards into leads",
    "Prune deleted leads and cards",
    "Check drift",
    "Show status",
    "Add a lead",
    "List leads",
    "List cards",
    "Quit",
];

/// Run the menu until the user quits
///
/// A failing action is reported and the menu continues.
pub fn run_menu(ws: &Workspace) -> Result<()> {
    loop {
        println!();
        let choice = Select::new()
            .with_prompt("leadsync")
            .items(ACTIONS)
            .default(0)
            .interact()?;

        let result = match choice {
            0 => commands::run_sync(ws, SyncMode::Full, false, false),
            1 => commands::run_sync(ws, SyncMode::Full, true, false),
            2 => commands::run_sync(ws, SyncMode::LeadsToCards, false, false),
            3 => commands::run_sync(ws, SyncMode::CardsToLeads, false, false),
            4 => {
                let confirmed = Confirm::new()
                    .with_prompt("Pruning deletes leads whose card is gone. Continue?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    continue;
                }
                commands::run_sync(ws, SyncMode::Prune, false, false)
            }
            5 => commands::run_check(ws, false),
            6 => commands::run_status(ws, false),
            7 => prompt_lead().and_then(|lead| commands::run_lead_add(ws, lead)),
            8 => commands::run_lead_list(ws, false),
            9 => commands::run_card_list(ws, false, false),
            _ => return Ok(()),
        };

        if let Err(e) = result {
            println!("{}: {}", "error".red().bold(), e);
        }
    }
}

fn prompt_lead() -> Result<NewLead> {
    let name: String = Input::new().with_prompt("Name").interact_text()?;
    let email: String = Input::new().with_prompt("Email").interact_text()?;

    let statuses: Vec<&str> = LeadStatus::ALL.iter().map(LeadStatus::as_str).collect();
    let status_idx = Select::new()
        .with_prompt("Status")
        .items(&statuses)
        .default(0)
        .interact()?;

    let source: String = Input::new()
        .with_prompt("Source")
        .allow_empty(true)
        .interact_text()?;

    Ok(NewLead {
        name,
        email,
        status: statuses[status_idx].to_string(),
        source,
    })
}
