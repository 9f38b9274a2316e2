//! Kind names and id patterns of the platform's datastore.

pub const EXPLORATION: &str = "ExplorationModel";
pub const EXPLORATION_SNAPSHOT_METADATA: &str = "ExplorationSnapshotMetadataModel";
pub const EXPLORATION_SNAPSHOT_CONTENT: &str = "ExplorationSnapshotContentModel";
pub const EXPLORATION_COMMIT_LOG_ENTRY: &str = "ExplorationCommitLogEntryModel";
pub const EXPLORATION_RIGHTS: &str = "ExplorationRightsModel";
pub const EXP_SUMMARY: &str = "ExpSummaryModel";
pub const CLASSIFIER_TRAINING_JOB: &str = "ClassifierTrainingJobModel";
pub const USER_SETTINGS: &str = "UserSettingsModel";
pub const COMPLETED_ACTIVITIES: &str = "CompletedActivitiesModel";
pub const INCOMPLETE_ACTIVITIES: &str = "IncompleteActivitiesModel";
pub const EXPLORATION_USER_DATA: &str = "ExplorationUserDataModel";
pub const BULK_EMAIL: &str = "BulkEmailModel";
pub const USER_BULK_EMAILS: &str = "UserBulkEmailsModel";

/// Every kind the catalog registers, in name order.
pub const ALL: &[&str] = &[
    BULK_EMAIL,
    CLASSIFIER_TRAINING_JOB,
    COMPLETED_ACTIVITIES,
    EXP_SUMMARY,
    EXPLORATION_COMMIT_LOG_ENTRY,
    EXPLORATION,
    EXPLORATION_RIGHTS,
    EXPLORATION_SNAPSHOT_CONTENT,
    EXPLORATION_SNAPSHOT_METADATA,
    EXPLORATION_USER_DATA,
    INCOMPLETE_ACTIVITIES,
    USER_BULK_EMAILS,
    USER_SETTINGS,
];

// ---------------------------------------------------------------------------
// Id patterns
// ---------------------------------------------------------------------------

/// Explorations and the models keyed by exploration id.
pub const EXPLORATION_ID: &str = r"^[A-Za-z0-9_-]{1,12}$";

/// Snapshot models: `{exploration_id}-{version}`.
pub const VERSIONED_ID: &str = r"^[A-Za-z0-9_-]{1,12}-\d+$";

/// Commit log entries: `exploration-{exploration_id}-{version}`.
pub const COMMIT_LOG_ID: &str = r"^exploration-[A-Za-z0-9_-]{1,12}-\d+$";

/// Users and the models keyed by user id.
pub const USER_ID: &str = r"^uid_[a-z0-9]{1,32}$";

/// Per-user exploration data: `{user_id}.{exploration_id}`.
pub const USER_DATA_ID: &str = r"^uid_[a-z0-9]{1,32}\.[A-Za-z0-9_-]{1,12}$";

/// Generated ids of jobs and emails.
pub const GENERATED_ID: &str = r"^[A-Za-z0-9_-]{1,24}$";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted_and_unique() {
        let mut sorted = ALL.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, ALL);
    }
}
