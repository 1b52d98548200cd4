use geofence_core::db::open_db_in_memory;
use geofence_core::{
    GeoPoint, RepoError, RepoResult, ReminderDraft, ReminderStore, ReminderValidationError,
    SlotRepository, SqliteSlotRepository, StoreError, DEFAULT_SLOT_KEY,
};
use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

const PHARMACY: (f64, f64) = (14.6349, -90.5069);

/// In-memory slot that counts writes and can be told to fail them.
#[derive(Default)]
struct MemorySlot {
    values: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

#[derive(Clone, Default)]
struct SharedSlot(Rc<MemorySlot>);

impl SlotRepository for SharedSlot {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.0.values.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.0.fail_writes.get() {
            return Err(RepoError::MissingRequiredTable("kv_slots"));
        }
        self.0.writes.set(self.0.writes.get() + 1);
        self.0
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn seeded_slot(raw: &str) -> SharedSlot {
    let slot = SharedSlot::default();
    slot.0
        .values
        .borrow_mut()
        .insert(DEFAULT_SLOT_KEY.to_string(), raw.to_string());
    slot
}

fn persisted_triggered(slot: &SharedSlot, id: i64) -> bool {
    ReminderStore::open(slot.clone())
        .get(id)
        .expect("reminder should be persisted")
        .triggered
}

#[test]
fn load_on_absent_slot_returns_empty_collection() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let store = ReminderStore::open(SqliteSlotRepository::try_new(&conn).expect("slot repo"));

    assert!(store.reminders().is_empty());
    assert!(store.load().is_empty());
}

#[test]
fn load_recovers_from_unparsable_slot() {
    for raw in ["not json", "{\"id\": 1}", ""] {
        let store = ReminderStore::open(seeded_slot(raw));
        assert!(store.reminders().is_empty(), "raw={raw:?}");
    }
}

#[test]
fn load_skips_invalid_and_duplicate_records() {
    let raw = r#"[
        {"id": 1, "title": "Pharmacy", "radius": 100, "lat": 14.6349, "lng": -90.5069, "triggered": false},
        {"id": 2, "title": "Broken", "radius": 0, "lat": 0.0, "lng": 0.0, "triggered": false},
        {"id": 1, "title": "Duplicate", "radius": 10, "lat": 0.0, "lng": 0.0, "triggered": false},
        {"id": 3, "title": "Bakery", "radius": 50, "lat": 1.0, "lng": 2.0, "triggered": true}
    ]"#;
    let store = ReminderStore::open(seeded_slot(raw));

    let titles: Vec<&str> = store
        .reminders()
        .iter()
        .map(|reminder| reminder.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Pharmacy", "Bakery"]);
    assert!(store.get(3).expect("reminder should exist").triggered);
}

#[test]
fn add_appends_pending_reminder_and_persists_it() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let mut store = ReminderStore::open(SqliteSlotRepository::try_new(&conn).expect("slot repo"));

    let created = store
        .add_at("Pharmacy", 100, PHARMACY.0, PHARMACY.1)
        .expect("add reminder");
    assert!(!created.triggered);
    assert_eq!(store.reminders(), &[created.clone()]);

    let reopened = ReminderStore::open(SqliteSlotRepository::try_new(&conn).expect("slot repo"));
    assert_eq!(reopened.reminders(), &[created]);
}

#[test]
fn persisted_slot_holds_json_array_of_records() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let mut store = ReminderStore::open(SqliteSlotRepository::try_new(&conn).expect("slot repo"));
    let created = store.add_at("Pharmacy", 100, 1.5, -2.5).expect("add reminder");

    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_slots WHERE key = ?1;",
            [DEFAULT_SLOT_KEY],
            |row| row.get(0),
        )
        .expect("slot row should exist");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("slot holds json");
    assert_eq!(
        value,
        serde_json::json!([{
            "id": created.id,
            "title": "Pharmacy",
            "radius": 100,
            "lat": 1.5,
            "lng": -2.5,
            "triggered": false
        }])
    );
}

#[test]
fn add_with_empty_title_is_rejected_and_collection_unchanged() {
    let slot = SharedSlot::default();
    let mut store = ReminderStore::open(slot.clone());
    store.add_at("Existing", 10, 0.0, 0.0).expect("add reminder");
    let writes_before = slot.0.writes.get();

    let err = store.add_at("", 100, 0.0, 0.0).expect_err("invalid reminder");

    assert!(matches!(
        err,
        StoreError::Validation(ReminderValidationError::EmptyTitle)
    ));
    assert_eq!(store.reminders().len(), 1);
    assert_eq!(slot.0.writes.get(), writes_before);
}

#[test]
fn add_without_location_or_with_bad_radius_is_rejected() {
    let mut store = ReminderStore::open(SharedSlot::default());

    let missing = store
        .add(&ReminderDraft::new("Bank", 100, None))
        .expect_err("missing location");
    assert!(matches!(
        missing,
        StoreError::Validation(ReminderValidationError::MissingLocation)
    ));

    let bad_radius = store.add_at("Bank", -1, 0.0, 0.0).expect_err("invalid reminder");
    assert!(matches!(
        bad_radius,
        StoreError::Validation(ReminderValidationError::InvalidRadius { .. })
    ));
    assert!(store.reminders().is_empty());
}

#[test]
fn ids_are_unique_and_increase_in_insertion_order() {
    let mut store = ReminderStore::open(SharedSlot::default());
    for index in 0..20 {
        store
            .add_at(&format!("reminder {index}"), 10, 0.0, 0.0)
            .expect("add reminder");
    }

    let ids: Vec<i64> = store.reminders().iter().map(|reminder| reminder.id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "{ids:?}");
}

#[test]
fn ids_continue_past_largest_loaded_id() {
    let far_future = i64::MAX / 2;
    let raw = format!(
        r#"[{{"id": {far_future}, "title": "Future", "radius": 10, "lat": 0.0, "lng": 0.0, "triggered": false}}]"#
    );
    let mut store = ReminderStore::open(seeded_slot(&raw));

    let created = store.add_at("Next", 10, 0.0, 0.0).expect("add reminder");
    assert_eq!(created.id, far_future + 1);
}

#[test]
fn delete_removes_record_and_ignores_unknown_ids() {
    let slot = SharedSlot::default();
    let mut store = ReminderStore::open(slot.clone());
    let first = store.add_at("First", 10, 0.0, 0.0).expect("add reminder");
    let second = store.add_at("Second", 10, 0.0, 0.0).expect("add reminder");
    let writes_before = slot.0.writes.get();

    assert!(!store.delete(-1).expect("delete"));
    assert_eq!(slot.0.writes.get(), writes_before);

    assert!(store.delete(first.id).expect("delete"));
    assert_eq!(store.reminders(), &[second]);
    assert_eq!(ReminderStore::open(slot).reminders().len(), 1);
}

#[test]
fn mark_and_reset_trigger_persist_state() {
    let slot = SharedSlot::default();
    let mut store = ReminderStore::open(slot.clone());
    let created = store.add_at("Bank", 10, 0.0, 0.0).expect("add reminder");

    assert!(store.mark_triggered(created.id).expect("mark triggered"));
    assert!(persisted_triggered(&slot, created.id));

    assert!(store.reset_trigger(created.id).expect("reset trigger"));
    assert!(!persisted_triggered(&slot, created.id));

    assert!(!store.reset_trigger(created.id + 1000).expect("reset trigger"));
}

#[test]
fn save_then_load_round_trips_collection() {
    let slot = SharedSlot::default();
    let mut store = ReminderStore::open(slot.clone());
    store.add_at("Pharmacy", 100, 14.6349, -90.5069).expect("add reminder");
    store.add_at("Bakery", 35, -33.8688, 151.2093).expect("add reminder");
    let bakery_id = store.reminders()[1].id;
    store.mark_triggered(bakery_id).expect("mark triggered");

    let loaded = store.load();
    store.save(&loaded).expect("save collection");

    assert_eq!(store.load(), loaded);
    assert_eq!(loaded, store.reminders());
}

proptest! {
    #[test]
    fn reopened_store_matches_memory_for_arbitrary_coordinates(
        lat in -90.0f64..=90.0,
        lng in -180.0f64..=180.0,
        radius in 1i64..=100_000,
    ) {
        let slot = SharedSlot::default();
        let mut store = ReminderStore::open(slot.clone());
        store
            .add_at("Pharmacy", radius, lat, lng)
            .expect("valid reminder should be saved");

        let reopened = ReminderStore::open(slot);
        prop_assert_eq!(reopened.reminders(), store.reminders());
        prop_assert_eq!(reopened.reminders()[0].lat.to_bits(), lat.to_bits());
        prop_assert_eq!(reopened.reminders()[0].lng.to_bits(), lng.to_bits());
    }
}

#[test]
fn reopened_store_keeps_full_precision_coordinates() {
    let slot = SharedSlot::default();
    let mut store = ReminderStore::open(slot.clone());
    store
        .add_at("Pharmacy", 100, 65.85838639744097, 113.50033222571619)
        .expect("valid reminder should be saved");

    let reopened = ReminderStore::open(slot);
    assert_eq!(reopened.reminders(), store.reminders());
    assert_eq!(reopened.reminders()[0].lng, 113.50033222571619);
}

#[test]
fn failed_write_leaves_memory_unchanged() {
    let slot = SharedSlot::default();
    let mut store = ReminderStore::open(slot.clone());
    let created = store.add_at("Bank", 10, 0.0, 0.0).expect("add reminder");
    slot.0.fail_writes.set(true);

    assert!(matches!(
        store.add_at("Other", 10, 0.0, 0.0),
        Err(StoreError::Persistence(_))
    ));
    assert!(matches!(
        store.mark_triggered(created.id),
        Err(StoreError::Persistence(_))
    ));
    assert!(matches!(
        store.apply_position(GeoPoint::new(0.0, 0.0)),
        Err(StoreError::Persistence(_))
    ));

    assert_eq!(store.reminders(), &[created]);
}

#[test]
fn apply_position_writes_only_when_something_triggers() {
    let slot = SharedSlot::default();
    let mut store = ReminderStore::open(slot.clone());
    let created = store
        .add_at("Pharmacy", 100, PHARMACY.0, PHARMACY.1)
        .expect("add reminder");
    let writes_after_add = slot.0.writes.get();

    assert!(store.apply_position(GeoPoint::new(0.0, 0.0)).expect("apply position").is_empty());
    assert_eq!(slot.0.writes.get(), writes_after_add);

    let triggers = store
        .apply_position(GeoPoint::new(PHARMACY.0, PHARMACY.1))
        .expect("apply position");
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].reminder.id, created.id);
    assert_eq!(slot.0.writes.get(), writes_after_add + 1);
    assert!(persisted_triggered(&slot, created.id));

    assert!(store
        .apply_position(GeoPoint::new(PHARMACY.0, PHARMACY.1))
        .expect("apply position")
        .is_empty());
    assert_eq!(slot.0.writes.get(), writes_after_add + 1);
}

#[test]
fn custom_slot_key_is_isolated_from_default() {
    let slot = SharedSlot::default();
    let mut custom = ReminderStore::open_with_key(slot.clone(), "work");
    custom.add_at("Office", 20, 0.0, 0.0).expect("add reminder");

    assert_eq!(custom.slot_key(), "work");
    assert!(ReminderStore::open(slot).reminders().is_empty());
}
