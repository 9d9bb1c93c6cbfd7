//! Tests for SyncDriver run modes

use std::fs;

use leadsync_core::{
    CardId, CheckStatus, Direction, Error, IdentityStore, LeadId, Pass, ReconciliationEngine,
    SyncDriver, SyncMode, SyncOptions,
};
use leadsync_fs::NormalizedPath;
use leadsync_test_utils::{FakeLeadTracker, FakeWorkTracker, card, lead};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

type Driver<'a> = SyncDriver<&'a mut FakeLeadTracker, &'a mut FakeWorkTracker>;

fn driver<'a>(
    dir: &TempDir,
    leads: &'a mut FakeLeadTracker,
    work: &'a mut FakeWorkTracker,
    dry_run: bool,
) -> Driver<'a> {
    let engine = ReconciliationEngine::new(leads, work, SyncOptions { dry_run });
    SyncDriver::new(engine, mapping_path(dir))
}

fn mapping_path(dir: &TempDir) -> NormalizedPath {
    NormalizedPath::new(dir.path().join("mapping.json"))
}

fn seed_mapping(dir: &TempDir, pairs: &[(&str, &str)]) {
    let mut store = IdentityStore::empty(mapping_path(dir));
    for (lead_id, card_id) in pairs {
        store.put(LeadId::new(*lead_id), CardId::new(*card_id));
    }
    store.save().unwrap();
}

#[test]
fn test_full_run_reports_every_pass_in_order() {
    let dir = TempDir::new().unwrap();
    let mut leads = FakeLeadTracker::new().with(lead("1", "NEW"));
    let mut work = FakeWorkTracker::new();

    let report = driver(&dir, &mut leads, &mut work, false)
        .run(SyncMode::Full)
        .unwrap();

    let passes: Vec<Pass> = report.passes.iter().map(|s| s.pass).collect();
    assert_eq!(passes, leadsync_core::FULL_SYNC_ORDER.to_vec());
    assert_eq!(report.created(), 1);
    assert!(report.success());

    let store = IdentityStore::load(mapping_path(&dir)).unwrap();
    assert_eq!(store.mapping().sync_count(), 5);
}

#[test]
fn test_second_full_run_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let mut leads = FakeLeadTracker::new()
        .with(lead("1", "NEW"))
        .with(lead("2", "CONTACTED"))
        .with(lead("3", "LOST"));
    let mut work = FakeWorkTracker::new();

    let first = driver(&dir, &mut leads, &mut work, false)
        .run(SyncMode::Full)
        .unwrap();
    assert_eq!(first.created(), 2);
    let before = (leads.mutations(), work.mutations());

    let second = driver(&dir, &mut leads, &mut work, false)
        .run(SyncMode::Full)
        .unwrap();

    assert_eq!(second.mutations(), 0);
    assert_eq!((leads.mutations(), work.mutations()), before);
}

#[test]
fn test_full_run_lets_lead_status_win_conflicts() {
    let dir = TempDir::new().unwrap();
    seed_mapping(&dir, &[("1", "c1")]);
    let mut leads = FakeLeadTracker::new().with(lead("1", "QUALIFIED"));
    let mut work = FakeWorkTracker::new().with(card("c1", "TODO", Some("1")));

    let report = driver(&dir, &mut leads, &mut work, false)
        .run(SyncMode::Full)
        .unwrap();

    assert_eq!(work.list_of("c1"), Some("DONE"));
    assert_eq!(leads.status_of("1"), Some("QUALIFIED"));
    assert_eq!(report.pass(Pass::PullStatus).unwrap().updated, 0);
    assert_eq!(report.pass(Pass::PushStatus).unwrap().updated, 1);
}

#[test]
fn test_cards_to_leads_lets_card_win() {
    let dir = TempDir::new().unwrap();
    seed_mapping(&dir, &[("1", "c1")]);
    let mut leads = FakeLeadTracker::new().with(lead("1", "QUALIFIED"));
    let mut work = FakeWorkTracker::new().with(card("c1", "TODO", Some("1")));

    let report = driver(&dir, &mut leads, &mut work, false)
        .run(SyncMode::CardsToLeads)
        .unwrap();

    assert_eq!(report.passes.len(), 1);
    assert_eq!(leads.status_of("1"), Some("NEW"));
    assert_eq!(work.list_of("c1"), Some("TODO"));
}

#[test]
fn test_leads_to_cards_never_pulls() {
    let dir = TempDir::new().unwrap();
    let mut leads = FakeLeadTracker::new().with(lead("1", "CONTACTED"));
    let mut work = FakeWorkTracker::new();

    let report = driver(&dir, &mut leads, &mut work, false)
        .run(SyncMode::LeadsToCards)
        .unwrap();

    assert!(report.pass(Pass::PullStatus).is_none());
    assert_eq!(report.pass(Pass::CreateMissing).unwrap().created, 1);
    assert_eq!(work.list_of("card-1"), Some("IN_PROGRESS"));
}

#[test]
fn test_prune_mode_runs_both_deletion_passes() {
    let dir = TempDir::new().unwrap();
    seed_mapping(&dir, &[("1", "c1"), ("2", "c2")]);
    let mut leads = FakeLeadTracker::new().with(lead("1", "NEW"));
    let mut work = FakeWorkTracker::new().with(card("c2", "TODO", Some("2")));

    let report = driver(&dir, &mut leads, &mut work, false)
        .run(SyncMode::Prune)
        .unwrap();

    assert_eq!(report.deleted(), 2);
    assert!(leads.is_empty());
    assert!(work.card("c2").unwrap().archived);
    assert!(IdentityStore::load(mapping_path(&dir)).unwrap().is_empty());
}

#[test]
fn test_single_item_mode_runs_one_pair() {
    let dir = TempDir::new().unwrap();
    seed_mapping(&dir, &[("1", "c1"), ("2", "c2")]);
    let mut leads = FakeLeadTracker::new()
        .with(lead("1", "NEW"))
        .with(lead("2", "NEW"));
    let mut work = FakeWorkTracker::new()
        .with(card("c1", "DONE", Some("1")))
        .with(card("c2", "DONE", Some("2")));

    let report = driver(&dir, &mut leads, &mut work, false)
        .run(SyncMode::Card {
            id: CardId::new("c2"),
            direction: Direction::Pull,
        })
        .unwrap();

    assert_eq!(report.updated(), 1);
    assert_eq!(leads.status_of("1"), Some("NEW"));
    assert_eq!(leads.status_of("2"), Some("QUALIFIED"));
}

#[test]
fn test_dry_run_full_leaves_everything_untouched() {
    let dir = TempDir::new().unwrap();
    seed_mapping(&dir, &[("1", "c1")]);
    let before = fs::read_to_string(dir.path().join("mapping.json")).unwrap();
    let mut leads = FakeLeadTracker::new()
        .with(lead("1", "CONTACTED"))
        .with(lead("2", "NEW"));
    let mut work = FakeWorkTracker::new().with(card("c1", "TODO", Some("1")));

    let report = driver(&dir, &mut leads, &mut work, true)
        .run(SyncMode::Full)
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.mutations(), 2);
    assert!(report.actions().all(|a| a.starts_with("[dry-run] Would ")));
    assert_eq!(leads.mutations() + work.mutations(), 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("mapping.json")).unwrap(),
        before
    );
}

#[test]
fn test_corrupt_mapping_aborts_run_and_breaks_check() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("mapping.json"),
        r#"{"lead_to_card": {"1": "c1"}, "card_to_lead": {}, "last_sync": null, "sync_count": 0}"#,
    )
    .unwrap();
    let mut leads = FakeLeadTracker::new().with(lead("1", "NEW"));
    let mut work = FakeWorkTracker::new();

    let mut sync = driver(&dir, &mut leads, &mut work, false);
    let result = sync.run(SyncMode::Full);
    assert!(matches!(result, Err(Error::MappingInconsistency { .. })));

    let report = sync.check().unwrap();
    assert_eq!(report.status, CheckStatus::Broken);
    assert!(report.messages[0].contains("inconsistent"));
    drop(sync);

    assert_eq!(work.mutations(), 0);
}
