//! Per-kind JSONL snapshot files.
//!
//! A snapshot directory holds one `{Kind}.jsonl` file per kind, one entity
//! per line. Loading registers every kind found, so an empty file still
//! yields an (empty) table.

use std::path::{Path, PathBuf};

use vigil_core::entities::{Entity, Kind};

use crate::error::StoreError;
use crate::filter::ScanFilter;
use crate::memory::MemoryStore;
use crate::store::DocumentStore;

/// Counts reported by [`load_dir`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub kinds: usize,
    pub entities: usize,
}

/// Load every `*.jsonl` file in `dir` into `store`.
///
/// Files are read in name order. The file stem names the kind; every record
/// must carry that same kind.
///
/// # Errors
///
/// Returns `StoreError::Io` if the directory or a file cannot be read, and
/// `StoreError::Malformed` if a line does not decode to an entity of the
/// file's kind.
pub fn load_dir(store: &MemoryStore, dir: &Path) -> Result<LoadSummary, StoreError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_error(dir, e))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
            files.push(path);
        }
    }
    files.sort();

    let mut summary = LoadSummary::default();
    for path in &files {
        summary.entities += load_file(store, path)?;
        summary.kinds += 1;
    }

    tracing::debug!(
        dir = %dir.display(),
        kinds = summary.kinds,
        entities = summary.entities,
        "loaded snapshot directory"
    );
    Ok(summary)
}

/// Load one `{Kind}.jsonl` file into `store`. Returns the number of entities.
///
/// # Errors
///
/// See [`load_dir`].
pub fn load_file(store: &MemoryStore, path: &Path) -> Result<usize, StoreError> {
    let kind = kind_from_path(path)?;
    store.register_kind(kind.clone())?;

    let records = serde_jsonlines::json_lines::<Entity, _>(path).map_err(|e| io_error(path, e))?;

    let mut count = 0;
    for (line, record) in records.enumerate() {
        let entity = record.map_err(|e| StoreError::Malformed {
            path: path.display().to_string(),
            reason: format!("line {}: {e}", line + 1),
        })?;
        if entity.kind != kind {
            return Err(StoreError::Malformed {
                path: path.display().to_string(),
                reason: format!(
                    "line {}: entity {} has kind {}, expected {kind}",
                    line + 1,
                    entity.id,
                    entity.kind
                ),
            });
        }
        store.put(entity)?;
        count += 1;
    }
    Ok(count)
}

/// Write every kind of `store` to `{dir}/{Kind}.jsonl`, replacing existing
/// files. Returns the number of entities written.
///
/// # Errors
///
/// Returns `StoreError::Io` if the directory or a file cannot be written,
/// or any error raised while scanning the store.
pub fn dump_dir(store: &dyn DocumentStore, dir: &Path) -> Result<usize, StoreError> {
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let mut total = 0;
    for kind in store.kinds()? {
        let entities = store
            .scan(&kind, &ScanFilter::all())?
            .collect::<Result<Vec<_>, _>>()?;
        let path = dir.join(format!("{kind}.jsonl"));
        serde_jsonlines::write_json_lines(&path, &entities).map_err(|e| io_error(&path, e))?;
        total += entities.len();
    }
    Ok(total)
}

fn kind_from_path(path: &Path) -> Result<Kind, StoreError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(Kind::from)
        .ok_or_else(|| StoreError::Malformed {
            path: path.display().to_string(),
            reason: "file name does not name a kind".to_string(),
        })
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
