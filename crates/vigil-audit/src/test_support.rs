//! Shared fixtures for vigil-audit unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{DateTime, TimeZone, Utc};
    use vigil_core::entities::Entity;
    use vigil_store::{DocumentStore, MemoryStore, ReferenceResolver};

    use crate::check::CheckContext;

    pub const KINDS: &[&str] = &[
        "ExplorationModel",
        "ExplorationSnapshotMetadataModel",
        "ExpSummaryModel",
        "CompletedActivitiesModel",
        "IncompleteActivitiesModel",
        "UserSettingsModel",
    ];

    /// A memory store with the test kinds registered and a fixed run start.
    pub struct TestStore {
        pub store: MemoryStore,
        pub run_started_at: DateTime<Utc>,
    }

    impl TestStore {
        pub fn new() -> Self {
            Self {
                store: MemoryStore::with_kinds(KINDS.iter().copied()),
                run_started_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
            }
        }

        pub fn put(&self, entity: Entity) {
            self.store.put(entity).unwrap();
        }

        pub fn resolver(&self) -> ReferenceResolver<'_> {
            ReferenceResolver::new(&self.store)
        }

        pub fn ctx<'a>(&self, resolver: &'a ReferenceResolver<'a>) -> CheckContext<'a> {
            CheckContext {
                resolver,
                run_started_at: self.run_started_at,
            }
        }
    }

    /// An entity last updated well before the fixed run start.
    pub fn entity(kind: &str, id: &str) -> Entity {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Entity::new(kind, id, ts, ts)
    }

    pub fn entity_at(
        kind: &str,
        id: &str,
        created_on: DateTime<Utc>,
        last_updated: DateTime<Utc>,
    ) -> Entity {
        Entity::new(kind, id, created_on, last_updated)
    }
}
