//! Shard planning and execution.
//!
//! A shard is a contiguous id range of one kind. Shards run in parallel on a
//! rayon pool; within a shard entities are validated one after another.
//! Outputs are merged in shard index order, so the report does not depend
//! on which shard finishes first.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use vigil_core::entities::Kind;
use vigil_store::{DocumentStore, EntityStream, IdRange, ReferenceResolver, ScanFilter, TimeWindow};

use crate::aggregate::ResultAggregator;
use crate::check::CheckContext;
use crate::error::AuditError;
use crate::registry::KindRegistry;
use crate::settings::AuditSettings;
use crate::validator::Validator;

/// One independently retryable unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Position in the job's shard list; fixes merge order.
    pub index: usize,
    pub kind: Kind,
    pub range: IdRange,
}

/// Split `ids` (ascending) into at most `max_shards` contiguous ranges of
/// near-equal size. The first range is open below and the last open above.
/// No ids yields a single unbounded range.
#[must_use]
pub fn split_ids(ids: &[String], max_shards: usize) -> Vec<IdRange> {
    if ids.is_empty() {
        return vec![IdRange::all()];
    }
    let shards = max_shards.clamp(1, ids.len());
    let base = ids.len() / shards;
    let extra = ids.len() % shards;

    let mut starts = Vec::with_capacity(shards);
    let mut offset = 0;
    for i in 0..shards {
        starts.push(offset);
        offset += base + usize::from(i < extra);
    }

    (0..shards)
        .map(|i| {
            let start = (i > 0).then(|| ids[starts[i]].clone());
            let end = starts.get(i + 1).map(|&next| ids[next].clone());
            IdRange::new(start, end)
        })
        .collect()
}

/// Plan shards for `kinds`, in the given kind order.
///
/// # Errors
///
/// Returns `AuditError::Store` if the ids of a kind cannot be listed.
pub fn plan(
    store: &dyn DocumentStore,
    kinds: &[Kind],
    shards_per_kind: usize,
) -> Result<Vec<Shard>, AuditError> {
    let mut shards = Vec::new();
    for kind in kinds {
        let ids = store.ids(kind)?;
        for range in split_ids(&ids, shards_per_kind) {
            shards.push(Shard {
                index: shards.len(),
                kind: kind.clone(),
                range,
            });
        }
    }
    Ok(shards)
}

/// Runs shards against a store with a kind registry.
pub struct ShardExecutor<'a> {
    pub store: &'a dyn DocumentStore,
    pub registry: &'a KindRegistry,
    pub settings: &'a AuditSettings,
    pub window: TimeWindow,
    pub run_started_at: DateTime<Utc>,
}

impl ShardExecutor<'_> {
    /// Validate every entity of one shard.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::UnknownKind` for an unregistered kind, or any
    /// store or check error raised while scanning.
    pub fn run_shard(&self, shard: &Shard) -> Result<ResultAggregator, AuditError> {
        let spec = self.registry.get(&shard.kind)?;
        let resolver = ReferenceResolver::new(self.store);
        let ctx = CheckContext {
            resolver: &resolver,
            run_started_at: self.run_started_at,
        };
        let filter = ScanFilter::all()
            .with_range(shard.range.clone())
            .with_window(self.window);

        let mut output = ResultAggregator::new(self.settings.max_errors_per_check);
        let mut stream = EntityStream::open(self.store, &shard.kind, &filter)?;
        for entity in stream.by_ref() {
            let verdict = Validator::validate(spec, &entity?, &ctx)?;
            output.record(&verdict);
        }

        let (hits, reads) = resolver.stats();
        tracing::debug!(
            shard = shard.index,
            kind = %shard.kind,
            entities = stream.yielded(),
            cache_hits = hits,
            store_reads = reads,
            "shard finished"
        );
        Ok(output)
    }

    /// Run one shard, re-running it from the top on transient failures.
    /// Only the successful attempt's output is returned.
    ///
    /// # Errors
    ///
    /// Returns the last error once attempts are exhausted, or the first
    /// non-transient error.
    pub fn run_with_retry(&self, shard: &Shard) -> Result<ResultAggregator, AuditError> {
        self.settings.retry.run(
            |attempt| {
                tracing::debug!(shard = shard.index, kind = %shard.kind, attempt, "shard started");
                self.run_shard(shard)
            },
            AuditError::is_transient,
        )
    }

    /// Run all shards in parallel and merge their outputs in index order.
    ///
    /// # Errors
    ///
    /// Returns the error of the lowest-indexed failing shard.
    pub fn run_all(&self, shards: &[Shard]) -> Result<ResultAggregator, AuditError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.workers)
            .build()
            .map_err(|e| AuditError::Other(anyhow::Error::new(e)))?;

        let outputs: Vec<Result<ResultAggregator, AuditError>> =
            pool.install(|| shards.par_iter().map(|s| self.run_with_retry(s)).collect());

        let mut merged = ResultAggregator::new(self.settings.max_errors_per_check);
        for (shard, output) in shards.iter().zip(outputs) {
            match output {
                Ok(output) => merged.merge(output),
                Err(e) => {
                    tracing::error!(shard = shard.index, kind = %shard.kind, error = %e, "shard failed");
                    return Err(e);
                }
            }
        }
        if merged.dropped() > 0 {
            tracing::debug!(dropped = merged.dropped(), "messages dropped by per-check cap");
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use vigil_core::entities::Entity;
    use vigil_store::{EntityIter, MemoryStore, RetryConfig, StoreError};

    use super::*;
    use crate::registry::KindSpec;
    use crate::rules::ExternalKey;
    use crate::test_support::helpers::{TestStore, entity};

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{i:02}")).collect()
    }

    #[rstest]
    #[case(10, 4, vec![3, 3, 2, 2])]
    #[case(3, 4, vec![1, 1, 1])]
    #[case(5, 1, vec![5])]
    #[case(4, 0, vec![4])]
    fn split_sizes(#[case] n: usize, #[case] max: usize, #[case] sizes: Vec<usize>) {
        let ids = ids(n);
        let ranges = split_ids(&ids, max);
        let counted: Vec<usize> = ranges
            .iter()
            .map(|r| ids.iter().filter(|id| r.contains(id)).count())
            .collect();
        assert_eq!(counted, sizes);
        assert_eq!(ranges.first().unwrap().start, None);
        assert_eq!(ranges.last().unwrap().end, None);
    }

    #[test]
    fn empty_kind_gets_one_unbounded_shard() {
        assert_eq!(split_ids(&[], 4), vec![IdRange::all()]);
    }

    #[test]
    fn plan_numbers_shards_across_kinds() {
        let store = TestStore::new();
        for id in ["0", "1", "2"] {
            store.put(entity("ExplorationModel", id));
        }
        let shards = plan(
            &store.store,
            &[Kind::new("ExplorationModel"), Kind::new("UserSettingsModel")],
            2,
        )
        .unwrap();
        let summary: Vec<(usize, &str)> =
            shards.iter().map(|s| (s.index, s.kind.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (0, "ExplorationModel"),
                (1, "ExplorationModel"),
                (2, "UserSettingsModel")
            ]
        );
        assert_eq!(shards[1].range, IdRange::new(Some("2".into()), None));
    }

    fn registry() -> KindRegistry {
        let mut registry = KindRegistry::new();
        registry
            .register(
                KindSpec::builder("ExplorationSnapshotMetadataModel", r"^\d+-\d+$")
                    .check(ExternalKey::derived(
                        "exploration_ids",
                        "ExplorationModel",
                        |e| e.id.split('-').next().map(String::from).into_iter().collect(),
                    ))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    fn seeded(store: &MemoryStore) {
        store.put(entity("ExplorationModel", "1")).unwrap();
        for v in 1..=12 {
            store
                .put(entity("ExplorationSnapshotMetadataModel", &format!("0-{v}")))
                .unwrap();
        }
        store
            .put(entity("ExplorationSnapshotMetadataModel", "1-1"))
            .unwrap();
    }

    fn run(store: &dyn DocumentStore, shards_per_kind: usize, retry: RetryConfig) -> Result<Vec<String>, AuditError> {
        let registry = registry();
        let settings = AuditSettings {
            shard_count: shards_per_kind,
            workers: 3,
            retry,
            ..AuditSettings::default()
        };
        let kinds = [Kind::new("ExplorationSnapshotMetadataModel")];
        let shards = plan(store, &kinds, settings.shard_count)?;
        let executor = ShardExecutor {
            store,
            registry: &registry,
            settings: &settings,
            window: TimeWindow::unbounded(),
            run_started_at: TestStore::new().run_started_at,
        };
        Ok(executor.run_all(&shards)?.into_report(true).encoded())
    }

    #[test]
    fn shard_count_does_not_change_the_report() {
        let store = TestStore::new();
        seeded(&store.store);
        let single = run(&store.store, 1, RetryConfig::no_retry()).unwrap();
        let many = run(&store.store, 5, RetryConfig::no_retry()).unwrap();
        assert_eq!(single, many);
        assert_eq!(single.len(), 2);
        assert_eq!(
            single[1],
            "[u'fully-validated ExplorationSnapshotMetadataModel', 1]"
        );
    }

    #[test]
    fn multi_shard_cap_follows_shard_order() {
        let store = TestStore::new();
        seeded(&store.store);
        let report = run(&store.store, 4, RetryConfig::no_retry()).unwrap();
        // Ids sort as 0-1, 0-10, 0-11, 0-12, 0-2, ... so 0-8 and 0-9 are
        // the two dropped by the cap.
        assert!(report[0].contains("Entity id 0-1: "));
        assert!(report[0].contains("Entity id 0-7: "));
        assert!(!report[0].contains("Entity id 0-8: "));
        assert!(!report[0].contains("Entity id 0-9: "));
    }

    /// Fails the first `failures` scans with a transient error.
    struct FlakyStore {
        inner: MemoryStore,
        failures: AtomicU32,
        transient: bool,
    }

    impl DocumentStore for FlakyStore {
        fn kinds(&self) -> Result<Vec<Kind>, StoreError> {
            self.inner.kinds()
        }
        fn has_kind(&self, kind: &Kind) -> Result<bool, StoreError> {
            self.inner.has_kind(kind)
        }
        fn get(&self, kind: &Kind, id: &str) -> Result<Option<Entity>, StoreError> {
            self.inner.get(kind, id)
        }
        fn put(&self, entity: Entity) -> Result<(), StoreError> {
            self.inner.put(entity)
        }
        fn delete(&self, kind: &Kind, id: &str) -> Result<bool, StoreError> {
            self.inner.delete(kind, id)
        }
        fn ids(&self, kind: &Kind) -> Result<Vec<String>, StoreError> {
            self.inner.ids(kind)
        }
        fn scan(&self, kind: &Kind, filter: &ScanFilter) -> Result<EntityIter<'_>, StoreError> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(if self.transient {
                    StoreError::Transient("node recycled".into())
                } else {
                    StoreError::Other(anyhow::anyhow!("disk on fire"))
                });
            }
            self.inner.scan(kind, filter)
        }
    }

    fn flaky(failures: u32, transient: bool) -> FlakyStore {
        let store = FlakyStore {
            inner: MemoryStore::with_kinds(crate::test_support::helpers::KINDS.iter().copied()),
            failures: AtomicU32::new(failures),
            transient,
        };
        seeded(&store.inner);
        store
    }

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay: std::time::Duration::from_millis(1),
            max_delay: std::time::Duration::from_millis(1),
        }
    }

    #[test]
    fn transient_failure_is_retried_without_double_counting() {
        let baseline = run(&flaky(0, true), 1, RetryConfig::no_retry()).unwrap();
        let retried = run(&flaky(2, true), 1, fast_retry(3)).unwrap();
        assert_eq!(retried, baseline);
    }

    #[test]
    fn exhausted_retries_fail_the_run() {
        let err = run(&flaky(5, true), 1, fast_retry(2)).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn permanent_failure_is_not_retried() {
        let store = flaky(1, false);
        let err = run(&store, 1, fast_retry(3)).unwrap_err();
        assert!(matches!(err, AuditError::Store(StoreError::Other(_))));
    }
}
