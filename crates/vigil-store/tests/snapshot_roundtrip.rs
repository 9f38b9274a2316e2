//! Integration test: a snapshot directory loaded from disk is streamed and
//! resolved the same way as a store built in memory.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use vigil_core::entities::{Entity, Kind};
use vigil_store::jsonl::{dump_dir, load_dir};
use vigil_store::{
    DocumentStore, EntityStream, IdRange, MemoryStore, ReferenceResolver, ScanFilter,
};

fn seeded() -> MemoryStore {
    let ts = Utc.with_ymd_and_hms(2026, 4, 2, 9, 30, 0).unwrap();
    let store = MemoryStore::with_kinds(["ExplorationModel", "ClassifierTrainingJobModel"]);
    for id in ["0", "1"] {
        store
            .put(Entity::new("ExplorationModel", id, ts, ts).with_field("version", 1))
            .unwrap();
    }
    for (id, exp) in [("job_a", "0"), ("job_b", "1")] {
        store
            .put(
                Entity::new("ClassifierTrainingJobModel", id, ts, ts)
                    .with_field("exp_id", exp)
                    .with_field("exp_version", 1),
            )
            .unwrap();
    }
    store
}

#[test]
fn loaded_snapshot_streams_and_resolves() {
    let dir = tempfile::tempdir().unwrap();
    dump_dir(&seeded(), dir.path()).unwrap();

    let store = MemoryStore::new();
    load_dir(&store, dir.path()).unwrap();
    store
        .delete(&Kind::new("ExplorationModel"), "1")
        .unwrap();

    let resolver = ReferenceResolver::new(&store);
    let jobs = Kind::new("ClassifierTrainingJobModel");
    let exps = Kind::new("ExplorationModel");

    let mut dangling = Vec::new();
    for entity in EntityStream::open(&store, &jobs, &ScanFilter::all()).unwrap() {
        let entity = entity.unwrap();
        dangling.extend(resolver.missing(&exps, entity.id_values("exp_id").as_slice()).unwrap());
    }
    assert_eq!(dangling, vec!["1"]);
}

#[test]
fn shard_ranges_partition_a_kind() {
    let store = seeded();
    let kind = Kind::new("ClassifierTrainingJobModel");
    let ranges = [
        IdRange::new(None, Some("job_b".into())),
        IdRange::new(Some("job_b".into()), None),
    ];
    let ids: Vec<String> = ranges
        .iter()
        .flat_map(|range| {
            EntityStream::open(&store, &kind, &ScanFilter::all().with_range(range.clone()))
                .unwrap()
                .map(|e| e.unwrap().id)
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(ids, store.ids(&kind).unwrap());
}
