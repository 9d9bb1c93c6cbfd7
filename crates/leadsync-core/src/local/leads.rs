use leadsync_fs::NormalizedPath;

use super::{read_existing_records, read_records, write_records};
use crate::model::{CardId, EntityKind, Lead, LeadId, NewLead};
use crate::ports::{LeadTracker, TrackerError, TrackerResult};
use crate::status::LeadStatus;

const TRACKER: &str = "lead tracker";

/// Lead tracker stored as a JSON array of leads
#[derive(Debug, Clone)]
pub struct LocalLeadTracker {
    path: NormalizedPath,
}

impl LocalLeadTracker {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn read(&self) -> TrackerResult<Vec<Lead>> {
        read_records(TRACKER, &self.path)
    }

    fn write(&self, leads: &[Lead]) -> TrackerResult<()> {
        write_records(TRACKER, &self.path, leads)
    }

    /// Apply `edit` to the lead with `id` and write the file back.
    fn modify(&mut self, id: &LeadId, edit: impl FnOnce(&mut Lead)) -> TrackerResult<()> {
        let mut leads = self.read()?;
        let lead = leads
            .iter_mut()
            .find(|lead| &lead.id == id)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Lead, id))?;
        edit(lead);
        self.write(&leads)
    }
}

impl LeadTracker for LocalLeadTracker {
    fn list_leads(&self) -> TrackerResult<Vec<Lead>> {
        self.read()
    }

    fn get_lead(&self, id: &LeadId) -> TrackerResult<Option<Lead>> {
        let leads: Vec<Lead> = read_existing_records(TRACKER, &self.path)?;
        Ok(leads.into_iter().find(|lead| &lead.id == id))
    }

    /// Ids are sequential numbers, starting after the current row count.
    fn create_lead(&mut self, new: NewLead) -> TrackerResult<Lead> {
        let mut leads = self.read()?;

        let mut next = leads.len() + 1;
        while leads.iter().any(|lead| lead.id.as_str() == next.to_string()) {
            next += 1;
        }

        let lead = Lead {
            id: LeadId::new(next.to_string()),
            name: new.name,
            email: new.email,
            status: new.status.trim().to_ascii_uppercase(),
            source: new.source,
            linked_card_id: None,
        };
        leads.push(lead.clone());
        self.write(&leads)?;

        tracing::info!(lead = %lead.id, name = %lead.name, "Created lead");
        Ok(lead)
    }

    fn update_status(&mut self, id: &LeadId, status: LeadStatus) -> TrackerResult<()> {
        self.modify(id, |lead| lead.status = status.as_str().to_string())
    }

    fn update_linked_card(&mut self, id: &LeadId, card: &CardId) -> TrackerResult<()> {
        self.modify(id, |lead| lead.linked_card_id = Some(card.clone()))
    }

    fn delete_lead(&mut self, id: &LeadId) -> TrackerResult<()> {
        let mut leads = self.read()?;
        let before = leads.len();
        leads.retain(|lead| &lead.id != id);
        if leads.len() == before {
            return Err(TrackerError::not_found(EntityKind::Lead, id));
        }
        self.write(&leads)
    }
}
