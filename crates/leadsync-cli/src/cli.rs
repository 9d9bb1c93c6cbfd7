//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use leadsync_core::Direction;

/// leadsync - Keep a lead tracker and a work board in sync
#[derive(Parser, Debug)]
#[command(name = "leadsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true, env = "LEADSYNC_ROOT")]
    pub root: Option<PathBuf>,

    /// Extra config file applied on top of the global and workspace layers
    #[arg(long, global = true, env = "LEADSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run a full bidirectional sync
    ///
    /// Creates missing cards, prunes deleted leads and cards, then
    /// reconciles status. Lead status wins when both sides changed.
    Sync {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Leads to cards: create missing cards and move cards to match leads
    Push {
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },

    /// Cards to leads: copy card lists into lead status
    Pull {
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },

    /// Delete leads whose card is gone and archive cards whose lead is gone
    Prune {
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },

    /// Sync a single lead or card
    ///
    /// Numeric ids are treated as lead ids unless --card is given.
    ///
    /// Examples:
    ///   leadsync item 12                   # push lead 12 to its card
    ///   leadsync item 12 --direction pull  # pull lead 12 from its card
    ///   leadsync item 5f3a9c --direction pull
    Item {
        /// Lead or card id
        id: String,

        /// Which side is the source
        #[arg(short, long, value_enum, default_value = "push")]
        direction: DirectionArg,

        /// Treat the id as a lead id
        #[arg(long, conflicts_with = "card")]
        lead: bool,

        /// Treat the id as a card id
        #[arg(long)]
        card: bool,

        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },

    /// Check how far the trackers have drifted
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show identity mapping statistics
    Status {
        #[arg(long)]
        json: bool,
    },

    /// Manage leads in the local lead tracker
    Lead {
        #[command(subcommand)]
        action: LeadAction,
    },

    /// Inspect cards in the local work tracker
    Card {
        #[command(subcommand)]
        action: CardAction,
    },

    /// Interactive menu
    Menu,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Lead subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum LeadAction {
    /// Add a lead
    Add {
        /// Contact name
        name: String,

        #[arg(short, long)]
        email: String,

        /// NEW, CONTACTED, QUALIFIED or LOST
        #[arg(short, long, default_value = "NEW")]
        status: String,

        /// Where the lead came from
        #[arg(long, default_value = "")]
        source: String,
    },

    /// List leads
    List {
        #[arg(long)]
        json: bool,
    },
}

/// Card subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// List cards
    List {
        /// Include archived cards
        #[arg(long)]
        all: bool,

        #[arg(long)]
        json: bool,
    },
}

/// `--direction` values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    /// Lead status to card list
    Push,
    /// Card list to lead status
    Pull,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Push => Direction::Push,
            DirectionArg::Pull => Direction::Pull,
        }
    }
}
