//! Capability traits for the two trackers
//!
//! The engine only ever talks to the trackers through these traits. Real
//! clients, the local file-backed trackers and the in-memory test fakes are
//! interchangeable implementations.

use crate::model::{Card, CardId, EntityKind, Lead, LeadId, NewCard, NewLead};
use crate::status::{LeadStatus, WorkList};

/// Result type for tracker calls
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

/// Failure reported by a tracker
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// The entity does not exist in its tracker. A normal outcome that
    /// drives pruning.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// The tracker could not be reached or rejected the call. Never evidence
    /// that an entity was deleted.
    #[error("{tracker} unavailable: {message}")]
    Unavailable {
        tracker: &'static str,
        message: String,
    },
}

impl TrackerError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn unavailable(tracker: &'static str, message: impl ToString) -> Self {
        Self::Unavailable {
            tracker,
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Operations the engine needs from the lead tracker
pub trait LeadTracker {
    /// Snapshot of every lead
    fn list_leads(&self) -> TrackerResult<Vec<Lead>>;

    /// A single lead, `None` when it does not exist
    fn get_lead(&self, id: &LeadId) -> TrackerResult<Option<Lead>>;

    /// Append a lead; the tracker assigns the id
    fn create_lead(&mut self, lead: NewLead) -> TrackerResult<Lead>;

    fn update_status(&mut self, id: &LeadId, status: LeadStatus) -> TrackerResult<()>;

    /// Store the counterpart card id in the lead's backup field
    fn update_linked_card(&mut self, id: &LeadId, card: &CardId) -> TrackerResult<()>;

    /// Delete a lead; `TrackerError::NotFound` when already gone
    fn delete_lead(&mut self, id: &LeadId) -> TrackerResult<()>;
}

/// Operations the engine needs from the work tracker
pub trait WorkTracker {
    /// Snapshot of every card, archived ones included
    fn list_cards(&self) -> TrackerResult<Vec<Card>>;

    /// A single card, `None` when it does not exist
    fn get_card(&self, id: &CardId) -> TrackerResult<Option<Card>>;

    fn create_card(&mut self, card: NewCard) -> TrackerResult<Card>;

    /// Move a card to another list; `TrackerError::NotFound` when gone
    fn move_card(&mut self, id: &CardId, list: WorkList) -> TrackerResult<()>;

    /// Archive a card; `TrackerError::NotFound` when gone
    fn archive_card(&mut self, id: &CardId) -> TrackerResult<()>;
}

impl<T: LeadTracker + ?Sized> LeadTracker for &mut T {
    fn list_leads(&self) -> TrackerResult<Vec<Lead>> {
        (**self).list_leads()
    }

    fn get_lead(&self, id: &LeadId) -> TrackerResult<Option<Lead>> {
        (**self).get_lead(id)
    }

    fn create_lead(&mut self, lead: NewLead) -> TrackerResult<Lead> {
        (**self).create_lead(lead)
    }

    fn update_status(&mut self, id: &LeadId, status: LeadStatus) -> TrackerResult<()> {
        (**self).update_status(id, status)
    }

    fn update_linked_card(&mut self, id: &LeadId, card: &CardId) -> TrackerResult<()> {
        (**self).update_linked_card(id, card)
    }

    fn delete_lead(&mut self, id: &LeadId) -> TrackerResult<()> {
        (**self).delete_lead(id)
    }
}

impl<T: WorkTracker + ?Sized> WorkTracker for &mut T {
    fn list_cards(&self) -> TrackerResult<Vec<Card>> {
        (**self).list_cards()
    }

    fn get_card(&self, id: &CardId) -> TrackerResult<Option<Card>> {
        (**self).get_card(id)
    }

    fn create_card(&mut self, card: NewCard) -> TrackerResult<Card> {
        (**self).create_card(card)
    }

    fn move_card(&mut self, id: &CardId, list: WorkList) -> TrackerResult<()> {
        (**self).move_card(id, list)
    }

    fn archive_card(&mut self, id: &CardId) -> TrackerResult<()> {
        (**self).archive_card(id)
    }
}
