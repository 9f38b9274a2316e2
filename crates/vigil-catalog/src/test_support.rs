//! A small, fully consistent platform snapshot for catalog tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};
    use vigil_audit::{AuditJobs, AuditSettings, JobSpec, KindRegistry};
    use vigil_core::entities::{Entity, Kind};
    use vigil_core::report::AuditReport;
    use vigil_store::{DocumentStore, MemoryStore};

    use crate::kinds::*;

    pub fn entity(kind: &str, id: &str) -> Entity {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Entity::new(kind, id, ts, ts)
    }

    fn create_cmds(title: &str) -> Value {
        json!([{"cmd": "create_new", "title": title, "category": "Mathematics"}])
    }

    /// Two explorations ("0" and "1", both at version 1) with everything
    /// that hangs off them, two users, and one bulk email.
    pub fn platform_entities() -> Vec<Entity> {
        let mut out = vec![
            entity(USER_SETTINGS, "uid_owner")
                .with_field("email", "owner@example.com")
                .with_field("role", "EXPLORATION_EDITOR")
                .with_field("username", "owner"),
            entity(USER_SETTINGS, "uid_learner")
                .with_field("email", "learner@example.com")
                .with_field("role", "LEARNER")
                .with_field("username", "learner"),
        ];

        for (id, title) in [("0", "Fractions"), ("1", "Algebra")] {
            out.push(
                entity(EXPLORATION, id)
                    .with_field("title", title)
                    .with_field("category", "Mathematics")
                    .with_field("objective", "Learn")
                    .with_field("language_code", "en")
                    .with_field("version", 1)
                    .with_field("init_state_name", "Introduction")
                    .with_field("states", json!({"Introduction": {}, "End": {}})),
            );
            out.push(
                entity(EXP_SUMMARY, id)
                    .with_field("title", title)
                    .with_field("category", "Mathematics")
                    .with_field("objective", "Learn")
                    .with_field("language_code", "en")
                    .with_field("version", 1)
                    .with_field("owner_ids", json!(["uid_owner"]))
                    .with_field("contributor_ids", json!(["uid_owner"]))
                    .with_field("ratings", json!({"1": 0, "2": 0, "3": 0, "4": 1, "5": 0})),
            );
            out.push(
                entity(EXPLORATION_RIGHTS, id)
                    .with_field("owner_ids", json!(["uid_owner"]))
                    .with_field("editor_ids", json!([]))
                    .with_field("viewer_ids", json!([]))
                    .with_field("status", "public")
                    .with_field("cloned_from", Value::Null),
            );
            out.push(
                entity(EXPLORATION_SNAPSHOT_METADATA, &format!("{id}-1"))
                    .with_field("committer_id", "uid_owner")
                    .with_field("commit_type", "create")
                    .with_field("commit_message", "New exploration created")
                    .with_field("commit_cmds", create_cmds(title)),
            );
            out.push(
                entity(EXPLORATION_SNAPSHOT_CONTENT, &format!("{id}-1"))
                    .with_field("content", json!({"title": title})),
            );
            out.push(
                entity(EXPLORATION_COMMIT_LOG_ENTRY, &format!("exploration-{id}-1"))
                    .with_field("exploration_id", id)
                    .with_field("user_id", "uid_owner")
                    .with_field("version", 1)
                    .with_field("commit_type", "create")
                    .with_field("commit_cmds", create_cmds(title))
                    .with_field("post_commit_status", "public"),
            );
            out.push(
                entity(CLASSIFIER_TRAINING_JOB, &format!("job{id}"))
                    .with_field("exp_id", id)
                    .with_field("exp_version", 1)
                    .with_field("state_name", "Introduction")
                    .with_field("algorithm_id", "TextClassifier")
                    .with_field("status", "NEW")
                    .with_field("training_data", json!([])),
            );
        }

        out.extend([
            entity(COMPLETED_ACTIVITIES, "uid_learner").with_field("exploration_ids", json!(["0"])),
            entity(INCOMPLETE_ACTIVITIES, "uid_learner")
                .with_field("exploration_ids", json!(["1"])),
            entity(EXPLORATION_USER_DATA, "uid_learner.1")
                .with_field("user_id", "uid_learner")
                .with_field("exploration_id", "1")
                .with_field("rating", 4)
                .with_field(
                    "draft_change_list",
                    json!([{"cmd": "add_state", "state_name": "Review"}]),
                )
                .with_field("draft_change_list_exp_version", 1),
            entity(BULK_EMAIL, "email0")
                .with_field("sender_id", "uid_owner")
                .with_field("recipient_ids", json!(["uid_learner"]))
                .with_field("subject", "New lessons")
                .with_field("html_body", "<p>Hello</p>")
                .with_field("sent_datetime", "2026-01-01T00:00:00Z"),
            entity(USER_BULK_EMAILS, "uid_learner")
                .with_field("sent_email_model_ids", json!(["email0"])),
        ]);
        out
    }

    /// The platform snapshot in a store, with the catalog registry.
    pub struct World {
        pub store: Arc<MemoryStore>,
        registry: Arc<KindRegistry>,
    }

    impl World {
        pub fn new() -> Self {
            let store = MemoryStore::with_kinds(ALL.iter().copied());
            for e in platform_entities() {
                store.put(e).unwrap();
            }
            Self {
                store: Arc::new(store),
                registry: Arc::new(crate::build_registry().unwrap()),
            }
        }

        pub fn put(&self, entity: Entity) {
            self.store.put(entity).unwrap();
        }

        /// A copy of a stored entity.
        pub fn template(&self, kind: &str, id: &str) -> Entity {
            self.store.get(&Kind::new(kind), id).unwrap().unwrap()
        }

        pub fn update(&self, kind: &str, id: &str, edit: impl FnOnce(&mut Entity)) {
            let mut entity = self.template(kind, id);
            edit(&mut entity);
            self.put(entity);
        }

        pub fn audit(&self, kinds: &[&str]) -> AuditReport {
            let store: Arc<dyn DocumentStore> = self.store.clone();
            let mut jobs = AuditJobs::new(store, Arc::clone(&self.registry), AuditSettings::default());
            jobs.run(JobSpec::for_kinds(kinds.iter().copied())).unwrap()
        }
    }
}
