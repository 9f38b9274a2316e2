//! Audit jobs: create, enqueue, process, read back.
//!
//! A job is one audit run over a set of kinds. Jobs move through
//! `new → queued → running → completed | failed`; every transition is
//! checked against [`JobStatus::allowed_next_states`]. Processing drains the
//! queue in enqueue order. Output is only readable once a job has completed.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use vigil_core::entities::Kind;
use vigil_core::enums::JobStatus;
use vigil_core::errors::CoreError;
use vigil_core::ids::JobId;
use vigil_core::report::AuditReport;
use vigil_store::{DocumentStore, TimeWindow};

use crate::error::AuditError;
use crate::registry::KindRegistry;
use crate::settings::AuditSettings;
use crate::shard::{ShardExecutor, plan};

/// What one job audits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSpec {
    /// Kinds to audit; empty means every registered kind.
    pub kinds: Vec<Kind>,
    /// Only entities whose `last_updated` falls in this window.
    pub window: TimeWindow,
    /// Overrides the configured output sorting.
    pub sort: Option<bool>,
}

impl JobSpec {
    /// Every registered kind, unbounded window.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_kinds<I, K>(kinds: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Kind>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub const fn sorted(mut self, sort: bool) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[derive(Debug)]
struct JobRecord {
    spec: JobSpec,
    status: JobStatus,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    report: Option<AuditReport>,
    error: Option<String>,
}

/// In-process job table over one store and kind registry.
pub struct AuditJobs {
    store: Arc<dyn DocumentStore>,
    registry: Arc<KindRegistry>,
    settings: AuditSettings,
    jobs: BTreeMap<JobId, JobRecord>,
    queue: VecDeque<JobId>,
}

impl AuditJobs {
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        registry: Arc<KindRegistry>,
        settings: AuditSettings,
    ) -> Self {
        Self {
            store,
            registry,
            settings,
            jobs: BTreeMap::new(),
            queue: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &AuditSettings {
        &self.settings
    }

    /// Register a new job in state `new`.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Core` if no job id can be generated.
    pub fn create_new(&mut self, spec: JobSpec) -> Result<JobId, AuditError> {
        let id = JobId::generate()?;
        tracing::info!(job = %id, kinds = spec.kinds.len(), "audit job created");
        self.jobs.insert(
            id.clone(),
            JobRecord {
                spec,
                status: JobStatus::New,
                started_at: None,
                finished_at: None,
                report: None,
                error: None,
            },
        );
        Ok(id)
    }

    /// Move a job to `queued`.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::JobNotFound` for an unknown id, or
    /// `AuditError::Core` if the job is not in state `new`.
    pub fn enqueue(&mut self, id: &JobId) -> Result<(), AuditError> {
        let record = self.record_mut(id)?;
        transition(id, record, JobStatus::Queued)?;
        self.queue.push_back(id.clone());
        Ok(())
    }

    /// Run every queued job in enqueue order. Returns how many ran.
    ///
    /// A job whose audit fails is marked `failed` and does not stop the
    /// remaining jobs.
    ///
    /// # Errors
    ///
    /// Returns an error only if the job table is inconsistent.
    pub fn process_pending(&mut self) -> Result<usize, AuditError> {
        let mut processed = 0;
        while let Some(id) = self.queue.pop_front() {
            let record = self.record_mut(&id)?;
            transition(&id, record, JobStatus::Running)?;
            let started_at = Utc::now();
            record.started_at = Some(started_at);
            let spec = record.spec.clone();

            tracing::info!(job = %id, "audit job started");
            let outcome = self.execute(&spec, started_at);

            let record = self.record_mut(&id)?;
            record.finished_at = Some(Utc::now());
            match outcome {
                Ok(report) => {
                    transition(&id, record, JobStatus::Completed)?;
                    tracing::info!(
                        job = %id,
                        lines = report.lines.len(),
                        failures = report.failure_count(),
                        "audit job completed"
                    );
                    record.report = Some(report);
                }
                Err(e) => {
                    transition(&id, record, JobStatus::Failed)?;
                    tracing::error!(job = %id, error = %e, "audit job failed");
                    record.error = Some(e.to_string());
                }
            }
            processed += 1;
        }
        Ok(processed)
    }

    /// # Errors
    ///
    /// Returns `AuditError::JobNotFound` for an unknown id.
    pub fn status(&self, id: &JobId) -> Result<JobStatus, AuditError> {
        Ok(self.record(id)?.status)
    }

    /// Encoded report lines of a completed job.
    ///
    /// # Errors
    ///
    /// See [`AuditJobs::get_report`].
    pub fn get_output(&self, id: &JobId) -> Result<Vec<String>, AuditError> {
        Ok(self.get_report(id)?.encoded())
    }

    /// The report of a completed job.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::JobNotFound` for an unknown id,
    /// `AuditError::JobFailed` for a failed job, and
    /// `AuditError::JobNotComplete` for a job that has not finished.
    pub fn get_report(&self, id: &JobId) -> Result<&AuditReport, AuditError> {
        let record = self.record(id)?;
        match (record.status, &record.report) {
            (JobStatus::Completed, Some(report)) => Ok(report),
            (JobStatus::Failed, _) => Err(AuditError::JobFailed {
                id: id.to_string(),
                reason: record.error.clone().unwrap_or_default(),
            }),
            (status, _) => Err(AuditError::JobNotComplete {
                id: id.to_string(),
                status: status.as_str().to_string(),
            }),
        }
    }

    /// Wall-clock start and end of a job's run, once known.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::JobNotFound` for an unknown id.
    pub fn timings(
        &self,
        id: &JobId,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), AuditError> {
        let record = self.record(id)?;
        Ok((record.started_at, record.finished_at))
    }

    /// Create, enqueue and process one job, returning its report.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::JobFailed` if the audit fails.
    pub fn run(&mut self, spec: JobSpec) -> Result<AuditReport, AuditError> {
        let id = self.create_new(spec)?;
        self.enqueue(&id)?;
        self.process_pending()?;
        self.get_report(&id).cloned()
    }

    fn execute(&self, spec: &JobSpec, started_at: DateTime<Utc>) -> Result<AuditReport, AuditError> {
        let kinds = if spec.kinds.is_empty() {
            self.registry.kinds()
        } else {
            let mut kinds: Vec<Kind> = Vec::with_capacity(spec.kinds.len());
            for kind in &spec.kinds {
                self.registry.get(kind)?;
                if !kinds.contains(kind) {
                    kinds.push(kind.clone());
                }
            }
            kinds
        };

        let store = self.store.as_ref();
        let shards = plan(store, &kinds, self.settings.shard_count)?;
        tracing::debug!(kinds = kinds.len(), shards = shards.len(), "shards planned");

        let executor = ShardExecutor {
            store,
            registry: &self.registry,
            settings: &self.settings,
            window: spec.window,
            run_started_at: started_at,
        };
        let output = executor.run_all(&shards)?;
        Ok(output.into_report(spec.sort.unwrap_or(self.settings.sort_output)))
    }

    fn record(&self, id: &JobId) -> Result<&JobRecord, AuditError> {
        self.jobs
            .get(id)
            .ok_or_else(|| AuditError::JobNotFound(id.to_string()))
    }

    fn record_mut(&mut self, id: &JobId) -> Result<&mut JobRecord, AuditError> {
        self.jobs
            .get_mut(id)
            .ok_or_else(|| AuditError::JobNotFound(id.to_string()))
    }
}

fn transition(id: &JobId, record: &mut JobRecord, next: JobStatus) -> Result<(), AuditError> {
    if !record.status.can_transition_to(next) {
        return Err(CoreError::InvalidTransition {
            entity_type: "audit_job".to_string(),
            id: id.to_string(),
            from: record.status.as_str().to_string(),
            to: next.as_str().to_string(),
        }
        .into());
    }
    record.status = next;
    Ok(())
}
