//! Command implementations for leadsync-cli

pub mod check;
pub mod records;
pub mod sync;

pub use check::{run_check, run_status};
pub use records::{run_card_list, run_lead_add, run_lead_list};
pub use sync::{item_mode, run_sync};
