//! In-memory trackers for engine tests.
//!
//! Both fakes count every mutating call so tests can assert that a second
//! run was a no-op, and both can be told to fail for specific ids to
//! simulate a tracker outage.

use std::collections::{BTreeMap, BTreeSet};

use leadsync_core::{
    Card, CardId, EntityKind, Lead, LeadId, LeadStatus, LeadTracker, NewCard, NewLead,
    TrackerError, TrackerResult, WorkList, WorkTracker,
};

const LEADS: &str = "fake lead tracker";
const CARDS: &str = "fake work tracker";

/// Lead tracker backed by a map
#[derive(Debug, Default)]
pub struct FakeLeadTracker {
    leads: BTreeMap<LeadId, Lead>,
    failing: BTreeSet<LeadId>,
    fail_listing: bool,
    fail_link_writes: bool,
    mutations: usize,
}

impl FakeLeadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FakeLeadTracker::insert`].
    pub fn with(mut self, lead: Lead) -> Self {
        self.insert(lead);
        self
    }

    /// Add or replace a lead without counting a mutation.
    pub fn insert(&mut self, lead: Lead) {
        self.leads.insert(lead.id.clone(), lead);
    }

    /// Delete a lead behind the engine's back.
    pub fn remove(&mut self, id: &str) -> Option<Lead> {
        self.leads.remove(&LeadId::new(id))
    }

    /// Edit a lead's raw status behind the engine's back.
    pub fn set_status(&mut self, id: &str, status: &str) {
        if let Some(lead) = self.leads.get_mut(&LeadId::new(id)) {
            lead.status = status.to_string();
        }
    }

    pub fn lead(&self, id: &str) -> Option<&Lead> {
        self.leads.get(&LeadId::new(id))
    }

    pub fn status_of(&self, id: &str) -> Option<&str> {
        self.lead(id).map(|lead| lead.status.as_str())
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Every call touching `id` fails as unavailable until [`recover`](Self::recover).
    pub fn fail_on(&mut self, id: &str) {
        self.failing.insert(LeadId::new(id));
    }

    pub fn recover(&mut self, id: &str) {
        self.failing.remove(&LeadId::new(id));
    }

    pub fn fail_listing(&mut self, fail: bool) {
        self.fail_listing = fail;
    }

    /// Make `update_linked_card` fail for every lead.
    pub fn fail_link_writes(&mut self, fail: bool) {
        self.fail_link_writes = fail;
    }

    /// Number of successful mutating calls so far
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn check(&self, id: &LeadId) -> TrackerResult<()> {
        if self.failing.contains(id) {
            return Err(TrackerError::unavailable(LEADS, format!("lead {id} timed out")));
        }
        Ok(())
    }

    fn existing(&mut self, id: &LeadId) -> TrackerResult<&mut Lead> {
        self.check(id)?;
        self.leads
            .get_mut(id)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Lead, id))
    }
}

impl LeadTracker for FakeLeadTracker {
    fn list_leads(&self) -> TrackerResult<Vec<Lead>> {
        if self.fail_listing {
            return Err(TrackerError::unavailable(LEADS, "listing timed out"));
        }
        Ok(self.leads.values().cloned().collect())
    }

    fn get_lead(&self, id: &LeadId) -> TrackerResult<Option<Lead>> {
        self.check(id)?;
        Ok(self.leads.get(id).cloned())
    }

    fn create_lead(&mut self, new: NewLead) -> TrackerResult<Lead> {
        let mut next = self.leads.len() + 1;
        while self.leads.contains_key(&LeadId::new(next.to_string())) {
            next += 1;
        }
        let lead = Lead {
            id: LeadId::new(next.to_string()),
            name: new.name,
            email: new.email,
            status: new.status,
            source: new.source,
            linked_card_id: None,
        };
        self.leads.insert(lead.id.clone(), lead.clone());
        self.mutations += 1;
        Ok(lead)
    }

    fn update_status(&mut self, id: &LeadId, status: LeadStatus) -> TrackerResult<()> {
        self.existing(id)?.status = status.as_str().to_string();
        self.mutations += 1;
        Ok(())
    }

    fn update_linked_card(&mut self, id: &LeadId, card: &CardId) -> TrackerResult<()> {
        if self.fail_link_writes {
            return Err(TrackerError::unavailable(LEADS, "write rejected"));
        }
        self.existing(id)?.linked_card_id = Some(card.clone());
        self.mutations += 1;
        Ok(())
    }

    fn delete_lead(&mut self, id: &LeadId) -> TrackerResult<()> {
        self.check(id)?;
        self.leads
            .remove(id)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Lead, id))?;
        self.mutations += 1;
        Ok(())
    }
}

/// Work tracker backed by a map; new cards get ids `card-1`, `card-2`, ...
#[derive(Debug, Default)]
pub struct FakeWorkTracker {
    cards: BTreeMap<CardId, Card>,
    failing: BTreeSet<CardId>,
    failing_creates: BTreeSet<usize>,
    create_calls: usize,
    next_id: usize,
    mutations: usize,
}

impl FakeWorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, card: Card) -> Self {
        self.insert(card);
        self
    }

    /// Add or replace a card without counting a mutation.
    pub fn insert(&mut self, card: Card) {
        self.cards.insert(card.id.clone(), card);
    }

    /// Delete a card behind the engine's back.
    pub fn remove(&mut self, id: &str) -> Option<Card> {
        self.cards.remove(&CardId::new(id))
    }

    /// Archive a card behind the engine's back.
    pub fn archive(&mut self, id: &str) {
        if let Some(card) = self.cards.get_mut(&CardId::new(id)) {
            card.archived = true;
        }
    }

    /// Drag a card to another list behind the engine's back.
    pub fn set_list(&mut self, id: &str, list: &str) {
        if let Some(card) = self.cards.get_mut(&CardId::new(id)) {
            card.list = list.to_string();
        }
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.get(&CardId::new(id))
    }

    pub fn list_of(&self, id: &str) -> Option<&str> {
        self.card(id).map(|card| card.list.as_str())
    }

    /// All cards, archived ones included
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn live_count(&self) -> usize {
        self.cards.values().filter(|card| card.is_live()).count()
    }

    pub fn fail_on(&mut self, id: &str) {
        self.failing.insert(CardId::new(id));
    }

    pub fn recover(&mut self, id: &str) {
        self.failing.remove(&CardId::new(id));
    }

    /// Make the `n`th call to `create_card` (1-based) fail as unavailable.
    pub fn fail_create_call(&mut self, n: usize) {
        self.failing_creates.insert(n);
    }

    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn check(&self, id: &CardId) -> TrackerResult<()> {
        if self.failing.contains(id) {
            return Err(TrackerError::unavailable(CARDS, format!("card {id} timed out")));
        }
        Ok(())
    }

    fn existing(&mut self, id: &CardId) -> TrackerResult<&mut Card> {
        self.check(id)?;
        self.cards
            .get_mut(id)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Card, id))
    }
}

impl WorkTracker for FakeWorkTracker {
    fn list_cards(&self) -> TrackerResult<Vec<Card>> {
        Ok(self.cards.values().cloned().collect())
    }

    fn get_card(&self, id: &CardId) -> TrackerResult<Option<Card>> {
        self.check(id)?;
        Ok(self.cards.get(id).cloned())
    }

    fn create_card(&mut self, new: NewCard) -> TrackerResult<Card> {
        self.create_calls += 1;
        if self.failing_creates.contains(&self.create_calls) {
            return Err(TrackerError::unavailable(CARDS, "create rejected"));
        }

        self.next_id += 1;
        let card = Card {
            id: CardId::new(format!("card-{}", self.next_id)),
            title: new.title,
            description: new.description,
            list: new.list.as_str().to_string(),
            archived: false,
        };
        self.cards.insert(card.id.clone(), card.clone());
        self.mutations += 1;
        Ok(card)
    }

    fn move_card(&mut self, id: &CardId, list: WorkList) -> TrackerResult<()> {
        self.existing(id)?.list = list.as_str().to_string();
        self.mutations += 1;
        Ok(())
    }

    fn archive_card(&mut self, id: &CardId) -> TrackerResult<()> {
        self.existing(id)?.archived = true;
        self.mutations += 1;
        Ok(())
    }
}
