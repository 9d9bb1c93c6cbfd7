//! End-to-end scenarios over the file-backed trackers
//!
//! Each scenario edits the snapshot files the way a person working in either
//! tracker would, then runs the driver and inspects what is on disk.

use std::fs;

use leadsync_core::{
    CheckStatus, ConfigResolver, LeadTracker, LocalLeadTracker, LocalWorkTracker, NewLead,
    ReconciliationEngine, SyncConfig, SyncDriver, SyncMode, SyncOptions, SyncReport,
};
use leadsync_fs::NormalizedPath;
use leadsync_test_utils::{TestWorkspace, card, lead, linked_lead};
use pretty_assertions::assert_eq;

fn driver(config: &SyncConfig, dry_run: bool) -> SyncDriver<LocalLeadTracker, LocalWorkTracker> {
    let engine = ReconciliationEngine::new(
        LocalLeadTracker::new(config.leads.clone()),
        LocalWorkTracker::new(config.cards.clone()),
        SyncOptions { dry_run },
    );
    SyncDriver::new(engine, config.mapping.clone())
}

fn sync(ws: &TestWorkspace, mode: SyncMode) -> SyncReport {
    driver(&ws.config(), false).run(mode).unwrap()
}

fn card_for(ws: &TestWorkspace, lead_id: &str) -> leadsync_core::Card {
    let card_id = ws.lead(lead_id).unwrap().linked_card_id.unwrap();
    ws.read_cards()
        .into_iter()
        .find(|card| card.id == card_id)
        .unwrap()
}

fn set_card_list(ws: &TestWorkspace, lead_id: &str, list: &str) {
    let target = card_for(ws, lead_id).id;
    let mut cards = ws.read_cards();
    for card in cards.iter_mut().filter(|card| card.id == target) {
        card.list = list.to_string();
    }
    ws.write_cards(&cards);
}

fn set_lead_status(ws: &TestWorkspace, lead_id: &str, status: &str) {
    let mut leads = ws.read_leads();
    for lead in leads.iter_mut().filter(|lead| lead.id.as_str() == lead_id) {
        lead.status = status.to_string();
    }
    ws.write_leads(&leads);
}

#[test]
fn test_lead_lifecycle() {
    let ws = TestWorkspace::new();
    let mut leads = LocalLeadTracker::new(ws.config().leads);
    for name in ["Ada", "Grace"] {
        leads
            .create_lead(NewLead {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                status: "NEW".to_string(),
                source: "referral".to_string(),
            })
            .unwrap();
    }

    // New leads get cards in TODO.
    let report = sync(&ws, SyncMode::Full);
    assert_eq!(report.created(), 2);
    assert_eq!(card_for(&ws, "1").list, "TODO");
    assert!(card_for(&ws, "1").description.starts_with("Lead ID: 1"));

    // Someone drags Ada's card to IN_PROGRESS on the board.
    set_card_list(&ws, "1", "IN_PROGRESS");
    sync(&ws, SyncMode::CardsToLeads);
    assert_eq!(ws.lead("1").unwrap().status, "CONTACTED");

    // Sales marks Grace as lost in the sheet.
    set_lead_status(&ws, "2", "LOST");
    sync(&ws, SyncMode::Full);
    assert_eq!(card_for(&ws, "2").list, "LOST");

    // Grace's row is removed from the sheet.
    let grace_card = card_for(&ws, "2").id;
    let remaining: Vec<_> = ws
        .read_leads()
        .into_iter()
        .filter(|lead| lead.id.as_str() != "2")
        .collect();
    ws.write_leads(&remaining);
    let report = sync(&ws, SyncMode::Full);
    assert_eq!(report.deleted(), 1);

    let archived = ws
        .read_cards()
        .into_iter()
        .find(|card| card.id == grace_card)
        .unwrap();
    assert!(archived.archived);
    assert_eq!(ws.mapping().len(), 1);

    let check = driver(&ws.config(), false).check().unwrap();
    assert_eq!(check.status, CheckStatus::Healthy);
}

#[test]
fn test_conflicting_edits_resolve_to_lead_status() {
    let ws = TestWorkspace::new().with_leads(&[lead("1", "NEW")]);
    sync(&ws, SyncMode::Full);

    // Both sides changed since the last run.
    set_card_list(&ws, "1", "IN_PROGRESS");
    set_lead_status(&ws, "1", "QUALIFIED");
    sync(&ws, SyncMode::Full);

    assert_eq!(ws.lead("1").unwrap().status, "QUALIFIED");
    assert_eq!(card_for(&ws, "1").list, "DONE");
}

#[test]
fn test_lost_mapping_file_is_rebuilt_without_duplicates() {
    let ws = TestWorkspace::new().with_leads(&[lead("1", "NEW"), lead("2", "CONTACTED")]);
    sync(&ws, SyncMode::Full);
    assert_eq!(ws.read_cards().len(), 2);

    fs::remove_file(ws.config().mapping.to_native()).unwrap();

    let report = sync(&ws, SyncMode::Full);
    assert_eq!(report.created(), 0);
    assert_eq!(report.repaired(), 2);
    assert_eq!(ws.read_cards().len(), 2);
    assert_eq!(ws.mapping().len(), 2);
}

#[test]
fn test_archived_card_removes_its_lead() {
    let ws = TestWorkspace::new()
        .with_leads(&[linked_lead("1", "NEW", "c1"), linked_lead("2", "NEW", "c2")])
        .with_cards(&[card("c1", "TODO", Some("1")), card("c2", "TODO", Some("2"))]);
    // The first run adopts both existing pairs.
    let report = sync(&ws, SyncMode::Full);
    assert_eq!(report.repaired(), 2);

    let mut cards = ws.read_cards();
    cards[0].archived = true;
    ws.write_cards(&cards);

    sync(&ws, SyncMode::Prune);

    assert!(ws.lead("1").is_none());
    assert!(ws.lead("2").is_some());
}

#[test]
fn test_dry_run_leaves_files_untouched() {
    let ws = TestWorkspace::new().with_leads(&[lead("1", "NEW")]);
    sync(&ws, SyncMode::Full);
    set_lead_status(&ws, "1", "QUALIFIED");
    ws.write_leads(&[ws.lead("1").unwrap(), lead("2", "CONTACTED")]);

    let config = ws.config();
    let snapshot = |path: &NormalizedPath| fs::read_to_string(path.to_native()).unwrap();
    let before = (
        snapshot(&config.leads),
        snapshot(&config.cards),
        snapshot(&config.mapping),
    );

    let report = driver(&config, true).run(SyncMode::Full).unwrap();

    assert_eq!(report.created(), 1);
    assert_eq!(report.updated(), 1);
    assert_eq!(
        (
            snapshot(&config.leads),
            snapshot(&config.cards),
            snapshot(&config.mapping),
        ),
        before
    );
}

#[test]
fn test_yaml_lead_snapshot_via_config() {
    let ws = TestWorkspace::new().with_config("[paths]\nleads = \"crm/leads.yaml\"\n");
    fs::create_dir_all(ws.root().join("crm")).unwrap();
    fs::write(
        ws.root().join("crm/leads.yaml"),
        "- id: \"10\"\n  name: Linus\n  email: linus@example.com\n  status: qualified\n",
    )
    .unwrap();

    let config = ConfigResolver::new(NormalizedPath::new(ws.root()))
        .with_global_config_dir(ws.root().join("no-global"))
        .resolve()
        .unwrap();
    let report = driver(&config, false).run(SyncMode::Full).unwrap();

    assert_eq!(report.created(), 1);
    let cards = ws.read_cards();
    assert_eq!(cards[0].list, "DONE");
    assert_eq!(cards[0].title, "Linus");

    let written = fs::read_to_string(ws.root().join("crm/leads.yaml")).unwrap();
    assert!(written.contains("linked_card_id"));
    assert!(written.contains(cards[0].id.as_str()));
}

#[test]
fn test_missing_cards_file_never_prunes_leads() {
    let ws = TestWorkspace::new().with_leads(&[
        lead("1", "NEW"),
        lead("2", "CONTACTED"),
        lead("3", "QUALIFIED"),
    ]);
    sync(&ws, SyncMode::Full);
    assert_eq!(ws.mapping().len(), 3);

    // The board file is moved away, e.g. a typo in the configured path.
    fs::remove_file(ws.config().cards.to_native()).unwrap();

    let report = sync(&ws, SyncMode::Prune);

    assert_eq!(report.deleted(), 0);
    assert_eq!(report.failed(), 3);
    assert_eq!(ws.read_leads().len(), 3);
    assert_eq!(ws.mapping().len(), 3);
}

#[test]
fn test_missing_leads_file_never_archives_cards() {
    let ws = TestWorkspace::new().with_leads(&[lead("1", "NEW"), lead("2", "NEW")]);
    sync(&ws, SyncMode::Full);

    fs::remove_file(ws.config().leads.to_native()).unwrap();

    let report = sync(&ws, SyncMode::Prune);

    assert_eq!(report.deleted(), 0);
    assert_eq!(report.failed(), 2);
    assert!(ws.read_cards().iter().all(|card| !card.archived));
    assert_eq!(ws.mapping().len(), 2);
}
