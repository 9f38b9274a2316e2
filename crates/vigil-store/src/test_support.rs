//! Shared test fixtures for vigil-store unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{TimeZone, Utc};
    use vigil_core::entities::Entity;

    use crate::memory::MemoryStore;
    use crate::store::DocumentStore;

    /// An entity with fixed timestamps and no fields.
    pub fn entity(kind: &str, id: &str) -> Entity {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        Entity::new(kind, id, ts, ts)
    }

    /// Three kinds, six entities: explorations `0..=3`, one user, one
    /// rights record.
    pub fn populated_store() -> MemoryStore {
        let store = MemoryStore::with_kinds([
            "ExplorationModel",
            "ExplorationRightsModel",
            "UserSettingsModel",
        ]);
        for id in ["3", "1", "0", "2"] {
            store
                .put(entity("ExplorationModel", id).with_field("version", 1))
                .unwrap();
        }
        store.put(entity("UserSettingsModel", "uid_a")).unwrap();
        store
            .put(entity("ExplorationRightsModel", "0").with_field("owner_ids", vec!["uid_a"]))
            .unwrap();
        store
    }
}
