//! ReconciliationEngine implementation
//!
//! The engine converges the lead tracker and the work tracker through five
//! independently invocable passes. Every pass processes items one at a time;
//! an item-scoped failure is recorded in the pass summary and the pass moves
//! on, while persistence and mapping-integrity failures abort the pass.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::identity::IdentityStore;
use crate::model::{Card, CardId, EntityKind, Lead, LeadId, NewCard};
use crate::ports::{LeadTracker, TrackerError, WorkTracker};
use crate::status::{LeadStatus, StatusMap};
use crate::{Error, Result};

use super::check::{CheckReport, DriftItem};
use super::report::{Outcome, Pass, PassSummary};

/// Options for passes
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// If true, count what would change without touching either tracker or
    /// the identity mapping. Actions are prefixed with "[dry-run] Would ...".
    pub dry_run: bool,
}

/// Which tracker is the source for a single-item sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Lead status → card list
    Push,
    /// Card list → lead status
    Pull,
}

/// How pull-status treats a pair whose lead holds a valid, different status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Overwrite the lead with the status derived from the card
    #[default]
    ApplyCard,
    /// Leave the lead alone; push-status runs later in the same run and wins.
    /// Leads with an unreadable status are still repaired from the card.
    DeferToPush,
}

/// Engine coordinating the two trackers through the identity mapping
pub struct ReconciliationEngine<L, W> {
    leads: L,
    work: W,
    options: SyncOptions,
}

impl<L: LeadTracker, W: WorkTracker> ReconciliationEngine<L, W> {
    pub fn new(leads: L, work: W, options: SyncOptions) -> Self {
        Self {
            leads,
            work,
            options,
        }
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn leads(&self) -> &L {
        &self.leads
    }

    pub fn work(&self) -> &W {
        &self.work
    }

    /// Give back the two trackers
    pub fn into_parts(self) -> (L, W) {
        (self.leads, self.work)
    }

    /// Run `pass` with its default behaviour.
    pub fn run_pass(&mut self, store: &mut IdentityStore, pass: Pass) -> Result<PassSummary> {
        match pass {
            Pass::CreateMissing => self.create_missing(store),
            Pass::PruneDeletedCards => self.prune_deleted_cards(store),
            Pass::PruneDeletedLeads => self.prune_deleted_leads(store),
            Pass::PullStatus => self.pull_status(store),
            Pass::PushStatus => self.push_status(store),
        }
    }

    /// Create a card for every unmapped lead that is not LOST.
    ///
    /// A lead whose mapping is missing but whose `linked_card_id` points at a
    /// live card gets its mapping repaired instead. Each new mapping is saved
    /// before the next lead is looked at.
    ///
    /// # Errors
    ///
    /// Fails if the leads cannot be listed or the mapping cannot be saved.
    pub fn create_missing(&mut self, store: &mut IdentityStore) -> Result<PassSummary> {
        let mut summary = PassSummary::new(Pass::CreateMissing);
        let leads = self.leads.list_leads()?;
        debug!(count = leads.len(), "create-missing: scanning leads");

        for lead in &leads {
            match self.create_for_lead(store, lead) {
                Ok(outcome) => summary.record(outcome),
                Err(e) if e.is_item_scoped() => {
                    warn!(lead = %lead.id, error = %e, "create-missing: lead failed");
                    summary.record_failure(lead.id.as_str(), &e);
                }
                Err(e) => return Err(e),
            }
        }

        self.finish_pass(store, summary)
    }

    /// Delete every mapped lead whose card is gone or archived.
    pub fn prune_deleted_cards(&mut self, store: &mut IdentityStore) -> Result<PassSummary> {
        let mut summary = PassSummary::new(Pass::PruneDeletedCards);

        for (lead_id, card_id) in store.pairs() {
            match self.prune_lead_of_missing_card(store, &lead_id, &card_id) {
                Ok(outcome) => summary.record(outcome),
                Err(e) if e.is_item_scoped() => {
                    warn!(lead = %lead_id, card = %card_id, error = %e, "prune-deleted-cards: pair failed");
                    summary.record_failure(pair_label(&lead_id, &card_id), &e);
                }
                Err(e) => return Err(e),
            }
        }

        self.finish_pass(store, summary)
    }

    /// Archive every mapped card whose lead is gone.
    pub fn prune_deleted_leads(&mut self, store: &mut IdentityStore) -> Result<PassSummary> {
        let mut summary = PassSummary::new(Pass::PruneDeletedLeads);

        for (lead_id, card_id) in store.pairs() {
            match self.archive_card_of_missing_lead(store, &lead_id, &card_id) {
                Ok(outcome) => summary.record(outcome),
                Err(e) if e.is_item_scoped() => {
                    warn!(lead = %lead_id, card = %card_id, error = %e, "prune-deleted-leads: pair failed");
                    summary.record_failure(pair_label(&lead_id, &card_id), &e);
                }
                Err(e) => return Err(e),
            }
        }

        self.finish_pass(store, summary)
    }

    /// Copy each mapped card's list into its lead's status.
    pub fn pull_status(&mut self, store: &mut IdentityStore) -> Result<PassSummary> {
        self.pull_status_with(store, ConflictPolicy::ApplyCard)
    }

    /// Pull-status with an explicit conflict policy.
    pub fn pull_status_with(
        &mut self,
        store: &mut IdentityStore,
        policy: ConflictPolicy,
    ) -> Result<PassSummary> {
        let mut summary = PassSummary::new(Pass::PullStatus);

        for (lead_id, card_id) in store.pairs() {
            match self.pull_pair(&lead_id, &card_id, policy) {
                Ok(outcome) => summary.record(outcome),
                Err(e) if e.is_item_scoped() => {
                    warn!(lead = %lead_id, card = %card_id, error = %e, "pull-status: pair failed");
                    summary.record_failure(pair_label(&lead_id, &card_id), &e);
                }
                Err(e) => return Err(e),
            }
        }

        self.finish_pass(store, summary)
    }

    /// Move each mapped card to the list matching its lead's status.
    ///
    /// A card sitting in a list outside the known four is moved like any
    /// other drifted card. Pull-status cannot translate such a list and
    /// records it as a failure, so in a full run the same pair shows up as a
    /// pull failure followed by a push move that puts the card back on the
    /// board.
    pub fn push_status(&mut self, store: &mut IdentityStore) -> Result<PassSummary> {
        let mut summary = PassSummary::new(Pass::PushStatus);

        for (lead_id, card_id) in store.pairs() {
            match self.push_pair(&lead_id, &card_id) {
                Ok(outcome) => summary.record(outcome),
                Err(e) if e.is_item_scoped() => {
                    warn!(lead = %lead_id, card = %card_id, error = %e, "push-status: pair failed");
                    summary.record_failure(pair_label(&lead_id, &card_id), &e);
                }
                Err(e) => return Err(e),
            }
        }

        self.finish_pass(store, summary)
    }

    /// Sync the pair containing `lead_id` in one direction.
    ///
    /// # Errors
    ///
    /// Unlike the bulk passes every failure is returned, including
    /// `Error::NotMapped` when no counterpart can be found or repaired.
    pub fn sync_lead(
        &mut self,
        store: &mut IdentityStore,
        lead_id: &LeadId,
        direction: Direction,
    ) -> Result<PassSummary> {
        let mut summary = PassSummary::new(direction_pass(direction));
        let card_id = match store.card_for(lead_id).cloned() {
            Some(card_id) => card_id,
            None => {
                let lead = self
                    .leads
                    .get_lead(lead_id)?
                    .ok_or_else(|| TrackerError::not_found(EntityKind::Lead, lead_id))?;
                let card_id = self.repairable_card(store, &lead)?.ok_or_else(|| Error::NotMapped {
                    kind: EntityKind::Lead,
                    id: lead_id.to_string(),
                })?;
                summary.record(self.adopt(store, lead_id, &card_id)?);
                card_id
            }
        };

        summary.record(self.sync_pair(lead_id, &card_id, direction)?);
        self.finish_pass(store, summary)
    }

    /// Sync the pair containing `card_id` in one direction.
    ///
    /// An unmapped card is repaired from the `Lead ID:` reference in its
    /// description, then from any lead whose `linked_card_id` points at it.
    pub fn sync_card(
        &mut self,
        store: &mut IdentityStore,
        card_id: &CardId,
        direction: Direction,
    ) -> Result<PassSummary> {
        let mut summary = PassSummary::new(direction_pass(direction));
        let lead_id = match store.lead_for(card_id).cloned() {
            Some(lead_id) => lead_id,
            None => {
                let lead_id = self.repairable_lead(store, card_id)?.ok_or_else(|| Error::NotMapped {
                    kind: EntityKind::Card,
                    id: card_id.to_string(),
                })?;
                summary.record(self.adopt(store, &lead_id, card_id)?);
                lead_id
            }
        };

        summary.record(self.sync_pair(&lead_id, card_id, direction)?);
        self.finish_pass(store, summary)
    }

    /// Read-only comparison of the mapping against both trackers.
    ///
    /// # Errors
    ///
    /// Fails only if a tracker cannot be listed.
    pub fn check(&self, store: &IdentityStore) -> Result<CheckReport> {
        let leads: HashMap<LeadId, Lead> = self
            .leads
            .list_leads()?
            .into_iter()
            .map(|lead| (lead.id.clone(), lead))
            .collect();
        let cards: HashMap<CardId, Card> = self
            .work
            .list_cards()?
            .into_iter()
            .filter(Card::is_live)
            .map(|card| (card.id.clone(), card))
            .collect();

        let mut drifted = Vec::new();
        let mut missing = Vec::new();

        for (lead_id, card_id) in store.pairs() {
            let item = |description: String| DriftItem {
                lead_id: Some(lead_id.to_string()),
                card_id: Some(card_id.to_string()),
                description,
            };
            match (leads.get(&lead_id), cards.get(&card_id)) {
                (None, _) => missing.push(item("Lead not found".to_string())),
                (_, None) => missing.push(item("Card not found or archived".to_string())),
                (Some(lead), Some(card)) => {
                    match (lead.parsed_status(), card.parsed_list()) {
                        (Ok(status), Ok(list)) if StatusMap::list_for(status) == list => {}
                        (Ok(status), Ok(list)) => drifted.push(item(format!(
                            "Lead status {} but card is in {} (expected {})",
                            status,
                            list,
                            StatusMap::list_for(status)
                        ))),
                        (Err(e), _) | (_, Err(e)) => drifted.push(item(e.to_string())),
                    }
                }
            }
        }

        let mut unmapped: Vec<&Lead> = leads
            .values()
            .filter(|lead| store.card_for(&lead.id).is_none())
            .filter(|lead| matches!(lead.parsed_status(), Ok(s) if s != LeadStatus::Lost))
            .collect();
        unmapped.sort_by(|a, b| a.id.cmp(&b.id));
        for lead in unmapped {
            missing.push(DriftItem {
                lead_id: Some(lead.id.to_string()),
                card_id: None,
                description: "No linked card".to_string(),
            });
        }

        Ok(CheckReport::from_items(drifted, missing))
    }

    fn create_for_lead(&mut self, store: &mut IdentityStore, lead: &Lead) -> Result<Outcome> {
        if store.card_for(&lead.id).is_some() {
            debug!(lead = %lead.id, "create-missing: already mapped");
            return Ok(Outcome::Skipped);
        }

        let status = lead.parsed_status()?;
        if status == LeadStatus::Lost {
            debug!(lead = %lead.id, "create-missing: lead is LOST, no card");
            return Ok(Outcome::Skipped);
        }

        if let Some(card_id) = self.repairable_card(store, lead)? {
            return self.adopt(store, &lead.id, &card_id);
        }

        let list = StatusMap::list_for(status);
        if self.options.dry_run {
            return Ok(Outcome::Created(self.describe(
                "Created",
                "create",
                format_args!("card in {} for lead {}", list, lead.id),
            )));
        }

        let card = self.work.create_card(NewCard::for_lead(lead, list))?;
        store.put(lead.id.clone(), card.id.clone());
        store.save()?;
        info!(lead = %lead.id, card = %card.id, %list, "Created card for lead");

        if let Err(e) = self.leads.update_linked_card(&lead.id, &card.id) {
            warn!(lead = %lead.id, card = %card.id, error = %e, "Could not write card id back to lead");
        }

        Ok(Outcome::Created(self.describe(
            "Created",
            "create",
            format_args!("card {} in {} for lead {}", card.id, list, lead.id),
        )))
    }

    fn prune_lead_of_missing_card(
        &mut self,
        store: &mut IdentityStore,
        lead_id: &LeadId,
        card_id: &CardId,
    ) -> Result<Outcome> {
        match self.work.get_card(card_id)? {
            Some(card) if card.is_live() => return Ok(Outcome::Skipped),
            Some(_) => debug!(card = %card_id, "Card is archived"),
            None => debug!(card = %card_id, "Card not found"),
        }

        if !self.options.dry_run {
            match self.leads.delete_lead(lead_id) {
                Ok(()) => info!(lead = %lead_id, card = %card_id, "Deleted lead of removed card"),
                Err(e) if e.is_not_found() => debug!(lead = %lead_id, "Lead already gone"),
                Err(e) => return Err(e.into()),
            }
            store.remove_by_lead(lead_id);
            store.save()?;
        }

        Ok(Outcome::Deleted(self.describe(
            "Deleted",
            "delete",
            format_args!("lead {} (card {} removed)", lead_id, card_id),
        )))
    }

    fn archive_card_of_missing_lead(
        &mut self,
        store: &mut IdentityStore,
        lead_id: &LeadId,
        card_id: &CardId,
    ) -> Result<Outcome> {
        if self.leads.get_lead(lead_id)?.is_some() {
            return Ok(Outcome::Skipped);
        }
        debug!(lead = %lead_id, "Lead not found");

        if !self.options.dry_run {
            match self.work.archive_card(card_id) {
                Ok(()) => info!(lead = %lead_id, card = %card_id, "Archived card of removed lead"),
                Err(e) if e.is_not_found() => debug!(card = %card_id, "Card already gone"),
                Err(e) => return Err(e.into()),
            }
            store.remove_by_card(card_id);
            store.save()?;
        }

        Ok(Outcome::Deleted(self.describe(
            "Archived",
            "archive",
            format_args!("card {} (lead {} removed)", card_id, lead_id),
        )))
    }

    fn sync_pair(&mut self, lead_id: &LeadId, card_id: &CardId, direction: Direction) -> Result<Outcome> {
        match direction {
            Direction::Push => self.push_pair(lead_id, card_id),
            Direction::Pull => self.pull_pair(lead_id, card_id, ConflictPolicy::ApplyCard),
        }
    }

    fn pull_pair(
        &mut self,
        lead_id: &LeadId,
        card_id: &CardId,
        policy: ConflictPolicy,
    ) -> Result<Outcome> {
        let Some(card) = self.work.get_card(card_id)?.filter(Card::is_live) else {
            debug!(card = %card_id, "pull-status: card gone, left to pruning");
            return Ok(Outcome::Skipped);
        };
        let target = StatusMap::status_for(card.parsed_list()?);

        let Some(lead) = self.leads.get_lead(lead_id)? else {
            debug!(lead = %lead_id, "pull-status: lead gone, left to pruning");
            return Ok(Outcome::Skipped);
        };

        let current = lead.parsed_status().ok();
        if current == Some(target) {
            return Ok(Outcome::Skipped);
        }
        if current.is_some() && policy == ConflictPolicy::DeferToPush {
            debug!(lead = %lead_id, card = %card_id, "pull-status: conflict deferred to push-status");
            return Ok(Outcome::Skipped);
        }

        if !self.options.dry_run {
            self.leads.update_status(lead_id, target)?;
            info!(lead = %lead_id, from = %lead.status, to = %target, "Updated lead status");
        }

        Ok(Outcome::Updated(self.describe(
            "Updated",
            "update",
            format_args!("lead {} status {} -> {}", lead_id, lead.status, target),
        )))
    }

    fn push_pair(&mut self, lead_id: &LeadId, card_id: &CardId) -> Result<Outcome> {
        let Some(lead) = self.leads.get_lead(lead_id)? else {
            debug!(lead = %lead_id, "push-status: lead gone, left to pruning");
            return Ok(Outcome::Skipped);
        };
        let target = StatusMap::list_for(lead.parsed_status()?);

        let Some(card) = self.work.get_card(card_id)?.filter(Card::is_live) else {
            debug!(card = %card_id, "push-status: card gone, left to pruning");
            return Ok(Outcome::Skipped);
        };

        if card.parsed_list().ok() == Some(target) {
            return Ok(Outcome::Skipped);
        }

        if !self.options.dry_run {
            match self.work.move_card(card_id, target) {
                Ok(()) => info!(card = %card_id, from = %card.list, to = %target, "Moved card"),
                Err(e) if e.is_not_found() => {
                    debug!(card = %card_id, "push-status: card vanished before move");
                    return Ok(Outcome::Skipped);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Outcome::Updated(self.describe(
            "Moved",
            "move",
            format_args!("card {} {} -> {}", card_id, card.list, target),
        )))
    }

    /// Card named by the lead's backup field, if it can take over the mapping.
    fn repairable_card(&self, store: &IdentityStore, lead: &Lead) -> Result<Option<CardId>> {
        let Some(linked) = &lead.linked_card_id else {
            return Ok(None);
        };

        if let Some(owner) = store.lead_for(linked)
            && owner != &lead.id
        {
            warn!(lead = %lead.id, card = %linked, owner = %owner, "Linked card belongs to another lead");
            return Ok(None);
        }

        match self.work.get_card(linked)? {
            Some(card) if card.is_live() => Ok(Some(card.id)),
            _ => {
                debug!(lead = %lead.id, card = %linked, "Linked card no longer exists");
                Ok(None)
            }
        }
    }

    /// Lead that can take over the mapping for an unmapped card.
    fn repairable_lead(&self, store: &IdentityStore, card_id: &CardId) -> Result<Option<LeadId>> {
        let card = self
            .work
            .get_card(card_id)?
            .filter(Card::is_live)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Card, card_id))?;

        if let Some(lead_id) = card.lead_ref()
            && store.card_for(&lead_id).is_none()
            && self.leads.get_lead(&lead_id)?.is_some()
        {
            return Ok(Some(lead_id));
        }

        let owner = self.leads.list_leads()?.into_iter().find(|lead| {
            lead.linked_card_id.as_ref() == Some(card_id) && store.card_for(&lead.id).is_none()
        });
        Ok(owner.map(|lead| lead.id))
    }

    /// Record a repaired pair and persist it.
    fn adopt(&self, store: &mut IdentityStore, lead_id: &LeadId, card_id: &CardId) -> Result<Outcome> {
        if !self.options.dry_run {
            store.put(lead_id.clone(), card_id.clone());
            store.save()?;
            info!(lead = %lead_id, card = %card_id, "Repaired mapping from back-reference");
        }
        Ok(Outcome::Repaired(self.describe(
            "Repaired",
            "repair",
            format_args!("mapping lead {} -> card {}", lead_id, card_id),
        )))
    }

    fn finish_pass(&self, store: &mut IdentityStore, summary: PassSummary) -> Result<PassSummary> {
        if !self.options.dry_run {
            store.record_sync();
            store.save()?;
        }
        info!(
            pass = %summary.pass,
            created = summary.created,
            updated = summary.updated,
            deleted = summary.deleted,
            repaired = summary.repaired,
            skipped = summary.skipped,
            failed = summary.failed,
            dry_run = self.options.dry_run,
            "Pass complete"
        );
        Ok(summary)
    }

    fn describe(&self, past: &str, infinitive: &str, detail: fmt::Arguments<'_>) -> String {
        if self.options.dry_run {
            format!("[dry-run] Would {} {}", infinitive, detail)
        } else {
            format!("{} {}", past, detail)
        }
    }
}

fn direction_pass(direction: Direction) -> Pass {
    match direction {
        Direction::Push => Pass::PushStatus,
        Direction::Pull => Pass::PullStatus,
    }
}

fn pair_label(lead_id: &LeadId, card_id: &CardId) -> String {
    format!("{}/{}", lead_id, card_id)
}
