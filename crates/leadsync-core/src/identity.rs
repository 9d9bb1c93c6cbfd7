//! Persistent lead ↔ card identity mapping
//!
//! The mapping is the only state the engine owns. It is persisted as a JSON
//! document whose two maps must be exact inverses of each other; a file that
//! breaks this is treated as corrupt and is never repaired silently.

use crate::model::{CardId, LeadId};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use leadsync_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bidirectional lead ↔ card index plus sync bookkeeping
///
/// Both directions are always updated together; see [`IdentityMapping::verify`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMapping {
    lead_to_card: BTreeMap<LeadId, CardId>,
    card_to_lead: BTreeMap<CardId, LeadId>,
    /// Completion time of the last successful pass
    last_sync: Option<DateTime<Utc>>,
    /// Number of successfully completed passes
    sync_count: u64,
}

impl IdentityMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card_for(&self, lead: &LeadId) -> Option<&CardId> {
        self.lead_to_card.get(lead)
    }

    pub fn lead_for(&self, card: &CardId) -> Option<&LeadId> {
        self.card_to_lead.get(card)
    }

    /// Insert or replace a pair in both directions.
    ///
    /// If either id was linked to a different counterpart, that stale link is
    /// removed first so no half-entry survives.
    pub fn put(&mut self, lead: LeadId, card: CardId) {
        if let Some(old_card) = self.lead_to_card.remove(&lead) {
            self.card_to_lead.remove(&old_card);
        }
        if let Some(old_lead) = self.card_to_lead.remove(&card) {
            self.lead_to_card.remove(&old_lead);
        }
        self.lead_to_card.insert(lead.clone(), card.clone());
        self.card_to_lead.insert(card, lead);
    }

    /// Remove the pair containing `lead`. Returns the card it was linked to.
    pub fn remove_by_lead(&mut self, lead: &LeadId) -> Option<CardId> {
        let card = self.lead_to_card.remove(lead)?;
        self.card_to_lead.remove(&card);
        Some(card)
    }

    /// Remove the pair containing `card`. Returns the lead it was linked to.
    pub fn remove_by_card(&mut self, card: &CardId) -> Option<LeadId> {
        let lead = self.card_to_lead.remove(card)?;
        self.lead_to_card.remove(&lead);
        Some(lead)
    }

    /// Mark a pass as completed at `at`.
    pub fn record_sync_at(&mut self, at: DateTime<Utc>) {
        self.last_sync = Some(at);
        self.sync_count += 1;
    }

    /// Snapshot of all pairs, ordered by lead id.
    pub fn pairs(&self) -> Vec<(LeadId, CardId)> {
        self.lead_to_card
            .iter()
            .map(|(lead, card)| (lead.clone(), card.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lead_to_card.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lead_to_card.is_empty()
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    pub fn sync_count(&self) -> u64 {
        self.sync_count
    }

    /// Check that the two maps are exact inverses.
    ///
    /// # Errors
    ///
    /// `Error::MappingInconsistency` naming the first offending entry.
    pub fn verify(&self) -> Result<()> {
        if self.lead_to_card.len() != self.card_to_lead.len() {
            return Err(Error::inconsistent(format!(
                "lead_to_card has {} entries but card_to_lead has {}",
                self.lead_to_card.len(),
                self.card_to_lead.len()
            )));
        }
        for (lead, card) in &self.lead_to_card {
            match self.card_to_lead.get(card) {
                Some(back) if back == lead => {}
                Some(back) => {
                    return Err(Error::inconsistent(format!(
                        "lead {} maps to card {} but card {} maps to lead {}",
                        lead, card, card, back
                    )));
                }
                None => {
                    return Err(Error::inconsistent(format!(
                        "lead {} maps to card {} which has no reverse entry",
                        lead, card
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Identity mapping bound to its backing file
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: NormalizedPath,
    mapping: IdentityMapping,
}

impl IdentityStore {
    /// An empty store that will persist to `path`.
    pub fn empty(path: NormalizedPath) -> Self {
        Self {
            path,
            mapping: IdentityMapping::new(),
        }
    }

    /// Load the mapping from `path` under a shared lock.
    ///
    /// An absent file yields an empty mapping with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the file cannot be read or parsed, and
    /// `Error::MappingInconsistency` if its two maps are not inverses.
    pub fn load(path: NormalizedPath) -> Result<Self> {
        let content = match io::read_text_locked(&path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                tracing::debug!(%path, "No identity mapping yet - starting empty");
                return Ok(Self::empty(path));
            }
            Err(e) => return Err(e.into()),
        };

        let mapping: IdentityMapping =
            serde_json::from_str(&content).map_err(|e| leadsync_fs::Error::Parse {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            })?;
        mapping.verify()?;

        tracing::debug!(%path, pairs = mapping.len(), "Loaded identity mapping");
        Ok(Self { path, mapping })
    }

    /// Persist the mapping with write-temp-then-rename.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.mapping).map_err(|e| leadsync_fs::Error::Serialize {
                path: self.path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            })?;
        io::write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn mapping(&self) -> &IdentityMapping {
        &self.mapping
    }

    pub fn card_for(&self, lead: &LeadId) -> Option<&CardId> {
        self.mapping.card_for(lead)
    }

    pub fn lead_for(&self, card: &CardId) -> Option<&LeadId> {
        self.mapping.lead_for(card)
    }

    pub fn put(&mut self, lead: LeadId, card: CardId) {
        self.mapping.put(lead, card);
    }

    pub fn remove_by_lead(&mut self, lead: &LeadId) -> Option<CardId> {
        self.mapping.remove_by_lead(lead)
    }

    pub fn remove_by_card(&mut self, card: &CardId) -> Option<LeadId> {
        self.mapping.remove_by_card(card)
    }

    /// Advance `last_sync` to now and bump `sync_count`. Once per completed pass.
    pub fn record_sync(&mut self) {
        self.mapping.record_sync_at(Utc::now());
    }

    pub fn pairs(&self) -> Vec<(LeadId, CardId)> {
        self.mapping.pairs()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
