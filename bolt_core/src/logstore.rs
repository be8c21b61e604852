//! # Iteration Log Store
//!
//! Durable, append-only audit trail of every evaluated candidate,
//! backed by SQLite. One row per evaluation, keyed by
//! `(run_id, iteration_no)`; rows are never updated after insertion.
//!
//! ## Lifecycle
//!
//! A store handle is attached to one backing file; a process-wide
//! registry keyed by path guarantees at most one live connection per
//! file - attaching an already-attached path returns a handle to the
//! existing instance. Handles are reference counted; [`IterationLog::detach`]
//! releases one and, once the last is gone, optionally deletes the
//! backing file and its WAL artifacts.
//!
//! ## Write discipline
//!
//! WAL journal mode with `synchronous=NORMAL` lets concurrent readers
//! observe committed rows while the single writer appends. Each
//! [`IterationLog::log`] call is one committed INSERT. Write failures
//! are reported via `tracing::warn!` and remembered on the handle -
//! logging is best-effort and must never abort a design-search step.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rusqlite::{params, Connection};
use tracing::warn;

use crate::errors::{JointError, JointResult};
use crate::joint::{Candidate, SafetyFactorResult};

/// Process-wide registry of live stores, keyed by backing-file path.
/// Weak entries let fully-detached stores disappear without a sweep.
static REGISTRY: Lazy<Mutex<HashMap<PathBuf, Weak<StoreInner>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// One row of the iteration log.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub run_id: String,
    pub agent_id: String,
    pub iteration_no: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// The candidate that was evaluated (the "tool call")
    pub candidate: Candidate,
    /// Evaluation result; `None` when the step failed
    pub result: Option<SafetyFactorResult>,
    /// Failure reason when the step errored
    pub error_message: Option<String>,
    /// Raw evaluator output (human-readable summary line)
    pub raw_output: Option<String>,
}

struct StoreInner {
    path: PathBuf,
    conn: Mutex<Connection>,
    last_write_error: Mutex<Option<String>>,
}

/// Reference-counted handle to an attached iteration log.
#[derive(Clone)]
pub struct IterationLog {
    inner: Arc<StoreInner>,
}

impl IterationLog {
    /// Attach to a backing file, creating the schema if absent.
    ///
    /// If the path is already attached in this process, the existing
    /// instance is returned instead of opening a second connection.
    pub fn attach(path: impl AsRef<Path>) -> JointResult<IterationLog> {
        let path = path.as_ref().to_path_buf();
        let mut registry = REGISTRY
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = registry.get(&path).and_then(Weak::upgrade) {
            return Ok(IterationLog { inner: existing });
        }

        let conn = open_connection(&path)?;
        let inner = Arc::new(StoreInner {
            path: path.clone(),
            conn: Mutex::new(conn),
            last_write_error: Mutex::new(None),
        });
        registry.insert(path, Arc::downgrade(&inner));
        Ok(IterationLog { inner })
    }

    /// True when two handles share the same underlying connection.
    pub fn shares_connection(&self, other: &IterationLog) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Append one iteration row and commit.
    ///
    /// Best-effort: a write failure (file locked, disk full) is reported
    /// through `tracing` and remembered, but never surfaced as an error -
    /// a failed log write must not abort the search step it records.
    pub fn log(&self, record: &IterationRecord) {
        if let Err(e) = self.try_log(record) {
            warn!(
                path = %self.inner.path.display(),
                run_id = %record.run_id,
                iteration_no = record.iteration_no,
                error = %e,
                "iteration log write failed; continuing"
            );
            *self
                .inner
                .last_write_error
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(e.to_string());
        }
    }

    /// Most recent write failure, if any. Cleared by the next successful
    /// write.
    pub fn last_write_error(&self) -> Option<String> {
        self.inner
            .last_write_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn try_log(&self, record: &IterationRecord) -> JointResult<()> {
        let candidate_json =
            serde_json::to_string(&record.candidate).map_err(|e| JointError::Serialization {
                reason: e.to_string(),
            })?;
        let result_json = record
            .result
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| JointError::Serialization {
                reason: e.to_string(),
            })?;

        let conn = self
            .inner
            .conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.execute(
            "INSERT INTO iterations \
             (run_id, agent_id, iteration_no, start_time, end_time, \
              candidate, result, error_message, raw_output) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.run_id,
                record.agent_id,
                record.iteration_no,
                record.start_time.to_rfc3339(),
                record.end_time.to_rfc3339(),
                candidate_json,
                result_json,
                record.error_message,
                record.raw_output,
            ],
        )
        .map_err(|e| store_error("insert", &self.inner.path, e))?;

        *self
            .inner
            .last_write_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }

    /// Release this handle. When it was the last one, the connection is
    /// disposed and, if requested, the backing file and any WAL
    /// artifacts are deleted.
    pub fn detach(self, delete_backing_file: bool) -> JointResult<()> {
        let IterationLog { inner } = self;
        let path = inner.path.clone();
        drop(inner);

        let mut registry = REGISTRY
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let still_live = registry.get(&path).and_then(Weak::upgrade).is_some();
        if still_live {
            return Ok(());
        }
        registry.remove(&path);

        if delete_backing_file {
            for suffix in ["", "-wal", "-shm"] {
                let artifact = PathBuf::from(format!("{}{}", path.display(), suffix));
                if artifact.exists() {
                    std::fs::remove_file(&artifact)
                        .map_err(|e| store_error("delete", &artifact, e))?;
                }
            }
        }
        Ok(())
    }

    /// Read every row for a run from a fresh connection, ordered by
    /// iteration number. WAL mode tolerates this alongside a live
    /// writer.
    pub fn read_run(path: impl AsRef<Path>, run_id: &str) -> JointResult<Vec<IterationRecord>> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| store_error("open", path, e))?;
        let mut statement = conn
            .prepare(
                "SELECT run_id, agent_id, iteration_no, start_time, end_time, \
                 candidate, result, error_message, raw_output \
                 FROM iterations WHERE run_id = ?1 ORDER BY iteration_no",
            )
            .map_err(|e| store_error("prepare", path, e))?;

        let rows = statement
            .query_map(params![run_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, Option<String>>(8)?,
                ))
            })
            .map_err(|e| store_error("query", path, e))?;

        let mut records = Vec::new();
        for row in rows {
            let (run_id, agent_id, iteration_no, start, end, candidate, result, error, raw) =
                row.map_err(|e| store_error("read", path, e))?;
            records.push(IterationRecord {
                run_id,
                agent_id,
                iteration_no,
                start_time: parse_timestamp(path, &start)?,
                end_time: parse_timestamp(path, &end)?,
                candidate: serde_json::from_str(&candidate).map_err(|e| {
                    JointError::Serialization {
                        reason: e.to_string(),
                    }
                })?,
                result: result
                    .as_deref()
                    .map(serde_json::from_str)
                    .transpose()
                    .map_err(|e| JointError::Serialization {
                        reason: e.to_string(),
                    })?,
                error_message: error,
                raw_output: raw,
            });
        }
        Ok(records)
    }
}

fn open_connection(path: &Path) -> JointResult<Connection> {
    let conn = Connection::open(path).map_err(|e| store_error("open", path, e))?;

    // WAL with relaxed synchronous commit: concurrent readers are fine,
    // and a single committed INSERT per log call is durable enough for
    // an audit trail. journal_mode returns a row, so query it.
    let _mode: String = conn
        .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
        .map_err(|e| store_error("pragma", path, e))?;
    conn.execute_batch("PRAGMA synchronous=NORMAL;")
        .map_err(|e| store_error("pragma", path, e))?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS iterations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id TEXT NOT NULL,
            agent_id TEXT NOT NULL,
            iteration_no INTEGER NOT NULL,
            start_time TEXT,
            end_time TEXT,
            candidate TEXT NOT NULL,
            result TEXT,
            error_message TEXT,
            raw_output TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_iterations_run
            ON iterations(run_id, iteration_no);",
    )
    .map_err(|e| store_error("create schema", path, e))?;

    Ok(conn)
}

fn store_error(operation: &str, path: &Path, e: impl std::fmt::Display) -> JointError {
    JointError::log_store(operation, path.display().to_string(), e.to_string())
}

fn parse_timestamp(path: &Path, raw: &str) -> JointResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| store_error("parse timestamp", path, e))
}
