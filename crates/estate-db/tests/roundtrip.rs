//! Integration tests for the save-file codec and transport.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use estate_db::{DbError, SaveFile, Snapshot, decode, encode};
use estate_types::{
    ActorDefaults, ActorId, ActorState, CropKind, Pen, PenKind, ResourceKind, ToolKind, ToolStack,
};

fn busy_actor() -> ActorState {
    let mut state = ActorState::default();
    state.balance = 123_456;
    state.unlocked_plots = 7;
    state.plots[0].plant(CropKind::Wheat);
    state.plots[0].growth_progress = 320;
    state.plots[0].harvest_count = 4;
    state.plots[6].plant(CropKind::NetherWart);
    state.plots[2].harvest_count = 9;

    let mut zombie = Pen::new(PenKind::Zombie);
    zombie.fodder = 140;
    zombie.total_produced = 88;
    zombie.tool = Some(ToolStack {
        kind: ToolKind::DiamondSword,
        durability_used: 17,
    });
    state.pens.insert(PenKind::Zombie, zombie);

    let mut golem = Pen::new(PenKind::IronGolem);
    golem.invested_units = 2;
    state.pens.insert(PenKind::IronGolem, golem);

    state.output_buffer.add(ResourceKind::RottenFlesh, 130);
    state.output_buffer.add(ResourceKind::IronIngot, 3);
    state.crop_output_buffer.add(ResourceKind::Wheat, 25);
    state.crop_output_buffer.add(ResourceKind::Egg, 20);

    state.compost.resource_units = 12;
    state.compost.progress = 55;
    state.compost.stored_boost = 2;
    state.auto_harvest = true;
    state.auto_feed = true;
    state.stats.total_harvested = 40;
    state.stats.total_boost_earned = 200;
    state.stats.total_currency_earned = 9_000;
    state
}

#[test]
fn every_field_survives_a_round_trip() {
    let mut snapshot = Snapshot::new();
    snapshot.insert(ActorId::new(), busy_actor());
    snapshot.insert(ActorId::new(), ActorState::default());

    let bytes = encode(&snapshot).unwrap();
    let restored = decode(&bytes, &ActorDefaults::default()).unwrap();
    assert_eq!(restored, snapshot);
}

#[test]
fn unknown_kinds_drop_only_the_unknown_entry() {
    let actor = ActorId::new();
    let json = format!(
        r#"{{
            "version": 1,
            "players": {{
                "{actor}": {{
                    "balance": 500,
                    "unlockedCropSlots": 4,
                    "cropPlots": [
                        {{"planted": true, "growthProgress": 10, "harvestCount": 1, "cropType": "COCOA"}},
                        {{"planted": true, "growthProgress": 10, "harvestCount": 0, "cropType": "CARROT"}}
                    ],
                    "mobPens": {{
                        "DRAGON": {{"penType": "DRAGON", "fodder": 5}},
                        "SHEEP": {{"penType": "SHEEP", "fodder": 50, "tool": {{"id": "shears", "damage": 3}}}}
                    }},
                    "outputBuffer": [
                        {{"id": "diamond", "count": 4}},
                        {{"id": "white_wool", "count": 6}}
                    ],
                    "totalMoneyEarned": 77
                }}
            }}
        }}"#
    );

    let snapshot = decode(json.as_bytes(), &ActorDefaults::default()).unwrap();
    let state = snapshot.get(&actor).unwrap();

    assert_eq!(state.balance, 500);
    assert_eq!(state.unlocked_plots, 4);
    assert!(state.plots[0].is_empty());
    assert_eq!(state.plots[1].crop, Some(CropKind::Carrot));
    assert_eq!(state.pens.len(), 1);
    let sheep = state.pens.get(&PenKind::Sheep).unwrap();
    assert_eq!(sheep.fodder, 50);
    assert_eq!(sheep.tool.map(|t| t.durability_used), Some(3));
    assert_eq!(state.output_buffer.total_units(), 6);
    assert_eq!(state.stats.total_currency_earned, 77);
}

#[test]
fn a_malformed_actor_does_not_block_the_rest() {
    let good = ActorId::new();
    let bad = ActorId::new();
    let json = format!(
        r#"{{"players": {{
            "{good}": {{"balance": 10}},
            "{bad}": {{"balance": "lots"}},
            "not-a-uuid": {{"balance": 1}}
        }}}}"#
    );
    let snapshot = decode(json.as_bytes(), &ActorDefaults::default()).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(&good).map(|s| s.balance), Some(10));
}

#[test]
fn corrupt_root_is_an_error() {
    let result = decode(&[0x1f, 0x8b, 0x00, 0x01, 0x02], &ActorDefaults::default());
    assert!(matches!(result, Err(DbError::Corrupt(_))));
}

#[test]
fn save_file_missing_then_written_then_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let file = SaveFile::in_dir(dir.path().join("world"));
    assert!(file.path().ends_with("pocketestate_data.dat"));
    assert!(file.read().unwrap().is_none());

    file.write(b"first").unwrap();
    assert_eq!(file.read().unwrap().as_deref(), Some(&b"first"[..]));

    file.write(b"second").unwrap();
    assert_eq!(file.read().unwrap().as_deref(), Some(&b"second"[..]));

    let leftovers: Vec<_> = std::fs::read_dir(file.path().parent().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn snapshot_round_trips_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = SaveFile::in_dir(dir.path());
    let mut snapshot = Snapshot::new();
    snapshot.insert(ActorId::new(), busy_actor());

    file.write(&encode(&snapshot).unwrap()).unwrap();
    let bytes = file.read().unwrap().unwrap();
    assert_eq!(decode(&bytes, &ActorDefaults::default()).unwrap(), snapshot);
}
