use leadsync_fs::NormalizedPath;
use uuid::Uuid;

use super::{read_existing_records, read_records, write_records};
use crate::model::{Card, CardId, EntityKind, NewCard};
use crate::ports::{TrackerError, TrackerResult, WorkTracker};
use crate::status::WorkList;

const TRACKER: &str = "work tracker";

/// Work tracker stored as a JSON array of cards
#[derive(Debug, Clone)]
pub struct LocalWorkTracker {
    path: NormalizedPath,
}

impl LocalWorkTracker {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn read(&self) -> TrackerResult<Vec<Card>> {
        read_records(TRACKER, &self.path)
    }

    fn write(&self, cards: &[Card]) -> TrackerResult<()> {
        write_records(TRACKER, &self.path, cards)
    }

    fn modify(&mut self, id: &CardId, edit: impl FnOnce(&mut Card)) -> TrackerResult<()> {
        let mut cards = self.read()?;
        let card = cards
            .iter_mut()
            .find(|card| &card.id == id)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Card, id))?;
        edit(card);
        self.write(&cards)
    }
}

impl WorkTracker for LocalWorkTracker {
    fn list_cards(&self) -> TrackerResult<Vec<Card>> {
        self.read()
    }

    fn get_card(&self, id: &CardId) -> TrackerResult<Option<Card>> {
        let cards: Vec<Card> = read_existing_records(TRACKER, &self.path)?;
        Ok(cards.into_iter().find(|card| &card.id == id))
    }

    fn create_card(&mut self, new: NewCard) -> TrackerResult<Card> {
        let mut cards = self.read()?;
        let card = Card {
            id: CardId::new(Uuid::new_v4().simple().to_string()),
            title: new.title,
            description: new.description,
            list: new.list.as_str().to_string(),
            archived: false,
        };
        cards.push(card.clone());
        self.write(&cards)?;
        Ok(card)
    }

    fn move_card(&mut self, id: &CardId, list: WorkList) -> TrackerResult<()> {
        self.modify(id, |card| card.list = list.as_str().to_string())
    }

    /// Archiving an already archived card succeeds.
    fn archive_card(&mut self, id: &CardId) -> TrackerResult<()> {
        self.modify(id, |card| card.archived = true)
    }
}
