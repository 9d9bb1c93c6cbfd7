//! leadsync CLI
//!
//! Command-line front end for the reconciliation engine, running against the
//! file-backed trackers of a workspace.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;
mod logging;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use leadsync_core::{NewLead, SyncMode};

use cli::{CardAction, Cli, Commands, LeadAction};
use context::Workspace;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let Some(command) = cli.command else {
        println!("{} Lead and work tracker sync", "leadsync".green().bold());
        println!();
        println!("Run {} for available commands.", "leadsync --help".cyan());
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "leadsync", &mut io::stdout());
        return Ok(());
    }

    let ws = Workspace::resolve(cli.root.as_deref(), cli.config.as_deref())?;
    execute_command(&ws, command)
}

fn execute_command(ws: &Workspace, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync { dry_run, json } => commands::run_sync(ws, SyncMode::Full, dry_run, json),
        Commands::Push { dry_run, json } => {
            commands::run_sync(ws, SyncMode::LeadsToCards, dry_run, json)
        }
        Commands::Pull { dry_run, json } => {
            commands::run_sync(ws, SyncMode::CardsToLeads, dry_run, json)
        }
        Commands::Prune { dry_run, json } => commands::run_sync(ws, SyncMode::Prune, dry_run, json),
        Commands::Item {
            id,
            direction,
            lead,
            card,
            dry_run,
            json,
        } => {
            let mode = commands::item_mode(&id, direction.into(), lead, card);
            commands::run_sync(ws, mode, dry_run, json)
        }
        Commands::Check { json } => commands::run_check(ws, json),
        Commands::Status { json } => commands::run_status(ws, json),
        Commands::Lead { action } => match action {
            LeadAction::Add {
                name,
                email,
                status,
                source,
            } => commands::run_lead_add(
                ws,
                NewLead {
                    name,
                    email,
                    status,
                    source,
                },
            ),
            LeadAction::List { json } => commands::run_lead_list(ws, json),
        },
        Commands::Card { action } => match action {
            CardAction::List { all, json } => commands::run_card_list(ws, all, json),
        },
        Commands::Menu => interactive::run_menu(ws),
        Commands::Completions { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadsync_core::{LeadTracker, WorkTracker};
    use std::fs;
    use tempfile::TempDir;

    fn workspace(temp: &TempDir) -> Workspace {
        fs::create_dir_all(temp.path().join(".leadsync")).unwrap();
        Workspace::resolve(Some(temp.path()), None).unwrap()
    }

    fn add_lead(ws: &Workspace, name: &str, status: &str) {
        execute_command(
            ws,
            Commands::Lead {
                action: LeadAction::Add {
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    status: status.to_string(),
                    source: String::new(),
                },
            },
        )
        .unwrap();
    }

    #[test]
    fn test_sync_creates_cards_for_new_leads() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        add_lead(&ws, "Ada", "new");
        add_lead(&ws, "Grace", "lost");

        execute_command(
            &ws,
            Commands::Sync {
                dry_run: false,
                json: false,
            },
        )
        .unwrap();

        let cards = ws.work_tracker().list_cards().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].list, "TODO");
        let ada = &ws.lead_tracker().list_leads().unwrap()[0];
        assert_eq!(ada.status, "NEW");
        assert_eq!(ada.linked_card_id.as_ref(), Some(&cards[0].id));
    }

    #[test]
    fn test_lead_add_rejects_unknown_status() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);

        let result = execute_command(
            &ws,
            Commands::Lead {
                action: LeadAction::Add {
                    name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                    status: "WARM".to_string(),
                    source: String::new(),
                },
            },
        );

        assert!(result.is_err());
        assert!(ws.lead_tracker().list_leads().unwrap().is_empty());
    }

    #[test]
    fn test_item_for_unlinked_lead_fails() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        add_lead(&ws, "Ada", "NEW");

        let result = execute_command(
            &ws,
            Commands::Item {
                id: "1".to_string(),
                direction: cli::DirectionArg::Push,
                lead: false,
                card: false,
                dry_run: false,
                json: false,
            },
        );

        assert!(result.unwrap_err().to_string().contains("No linked counterpart"));
    }

    #[test]
    fn test_check_and_status_are_read_only() {
        let temp = TempDir::new().unwrap();
        let ws = workspace(&temp);
        add_lead(&ws, "Ada", "NEW");

        execute_command(&ws, Commands::Check { json: false }).unwrap();
        execute_command(&ws, Commands::Status { json: true }).unwrap();

        assert!(!temp.path().join(".leadsync/mapping.json").exists());
        assert!(!temp.path().join(".leadsync/cards.json").exists());
    }
}
