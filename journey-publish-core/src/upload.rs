//! Upload coordinator: fans out independent per-object upload tasks against the
//! storage contract, waits for every task at a barrier, and aggregates failures.
//!
//! # Responsibilities
//! - One task per object: resolve the source, read it, derive a content type, put it.
//! - Bounded fan-out: at most `max_in_flight` uploads are in flight at once; the
//!   limit is configurable per invocation and defaults to [`DEFAULT_MAX_IN_FLIGHT`].
//! - Best-effort, not transactional: a failed task never cancels its siblings; every
//!   task runs to completion or failure and the caller gets the full picture at once.
//!
//! # Error Handling
//! Per-task failures (path resolution, open/read, transfer) are collected into an
//! [`AggregateUploadError`] naming every failed destination key. There is no retry
//! and no rollback of objects that did upload.

use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{error, info};

use crate::contract::ObjectStore;

/// Default cap on simultaneous in-flight uploads.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Where a task's bytes come from.
#[derive(Debug, Clone)]
pub enum TaskSource {
    /// A file under the build tree. An empty path marks an optional asset slot that
    /// is absent; the task is skipped and counts as success.
    File(PathBuf),
    /// Bytes already in memory (the serialized URL manifest).
    Bytes { data: Vec<u8>, content_type: String },
}

/// Ephemeral unit of work: one object to upload. Not retried, not persisted.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub key: String,
    pub source: TaskSource,
}

impl UploadTask {
    pub fn from_file(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        UploadTask {
            key: key.into(),
            source: TaskSource::File(path.into()),
        }
    }

    pub fn from_bytes(
        key: impl Into<String>,
        data: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        UploadTask {
            key: key.into(),
            source: TaskSource::Bytes {
                data,
                content_type: content_type.into(),
            },
        }
    }
}

/// One task's failure, naming the destination key so an operator can tell exactly
/// which objects are missing from the target version.
#[derive(Debug, Error)]
#[error("upload of {key} failed: {message}")]
pub struct TaskFailure {
    pub key: String,
    pub message: String,
}

/// Combined report of every task that failed within one fan-out.
#[derive(Debug, Error)]
#[error("{} upload task(s) failed: {}", .failures.len(), summarise(.failures))]
pub struct AggregateUploadError {
    pub failures: Vec<TaskFailure>,
}

fn summarise(failures: &[TaskFailure]) -> String {
    failures
        .iter()
        .map(|f| f.key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Upload every task to `bucket`, running at most `max_in_flight` tasks
/// concurrently, and wait for all of them to finish before returning.
///
/// Returns the number of launched tasks on success (skipped tasks included). If any
/// task failed, returns the aggregate of all failures; the remaining tasks still ran
/// to completion behind the barrier.
pub async fn upload_all<S>(
    bucket: &str,
    tasks: Vec<UploadTask>,
    store: &S,
    max_in_flight: usize,
) -> Result<usize, AggregateUploadError>
where
    S: ObjectStore,
{
    let total = tasks.len();
    info!(count = total, bucket = %bucket, "Getting ready to upload files");

    let results: Vec<Result<(), TaskFailure>> = stream::iter(tasks)
        .map(|task| upload_task(bucket, task, store))
        .buffer_unordered(max_in_flight.max(1))
        .collect()
        .await;

    let failures: Vec<TaskFailure> = results.into_iter().filter_map(Result::err).collect();
    if failures.is_empty() {
        Ok(total)
    } else {
        Err(AggregateUploadError { failures })
    }
}

/// Take one task and upload it, reporting any failure against its key.
async fn upload_task<S>(bucket: &str, task: UploadTask, store: &S) -> Result<(), TaskFailure>
where
    S: ObjectStore,
{
    let key = task.key;
    match task.source {
        TaskSource::File(path) => {
            if path.as_os_str().is_empty() {
                info!(key = %key, "Key does not have a path and will not be uploaded");
                return Ok(());
            }

            info!(key = %key, path = %path.display(), bucket = %bucket, "Starting upload");

            let abs = tokio::fs::canonicalize(&path).await.map_err(|e| {
                error!(key = %key, path = %path.display(), error = %e, "Could not resolve source path");
                TaskFailure {
                    key: key.clone(),
                    message: format!("could not resolve {}: {e}", path.display()),
                }
            })?;

            let data = tokio::fs::read(&abs).await.map_err(|e| {
                error!(key = %key, path = %abs.display(), error = %e, "Could not read source file");
                TaskFailure {
                    key: key.clone(),
                    message: format!("could not read {}: {e}", abs.display()),
                }
            })?;

            let content_type = content_type_for(&abs);
            store
                .put(bucket, &key, data, content_type)
                .await
                .map_err(|e| {
                    error!(key = %key, bucket = %bucket, error = %e, "Upload failed");
                    TaskFailure {
                        key: key.clone(),
                        message: e.to_string(),
                    }
                })
        }
        TaskSource::Bytes { data, content_type } => {
            info!(key = %key, bucket = %bucket, size = data.len(), "Starting upload from memory");
            store
                .put(bucket, &key, data, &content_type)
                .await
                .map_err(|e| {
                    error!(key = %key, bucket = %bucket, error = %e, "Upload failed");
                    TaskFailure {
                        key,
                        message: e.to_string(),
                    }
                })
        }
    }
}

/// Content type for a file path, by extension. Unknown extensions fall back to a
/// generic binary type.
pub fn content_type_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("map") => "application/json",
        Some("html") => "text/html",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
