//! Terse record constructors.

use leadsync_core::{Card, CardId, Lead, LeadId};

/// A lead named after its id, with the given raw status.
pub fn lead(id: &str, status: &str) -> Lead {
    Lead {
        id: LeadId::new(id),
        name: format!("Lead {id} Name"),
        email: format!("lead{id}@example.com"),
        status: status.to_string(),
        source: "test".to_string(),
        linked_card_id: None,
    }
}

/// A lead whose backup field already points at `card_id`.
pub fn linked_lead(id: &str, status: &str, card_id: &str) -> Lead {
    Lead {
        linked_card_id: Some(CardId::new(card_id)),
        ..lead(id, status)
    }
}

/// A live card in `list`. With `lead_id` set, the description carries the
/// `Lead ID:` back-reference the engine writes.
pub fn card(id: &str, list: &str, lead_id: Option<&str>) -> Card {
    Card {
        id: CardId::new(id),
        title: format!("Card {id}"),
        description: lead_id.map(|l| format!("Lead ID: {l}")).unwrap_or_default(),
        list: list.to_string(),
        archived: false,
    }
}
