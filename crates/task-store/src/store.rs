use a2a_contract::{Task, TaskId, TaskUpdate};
use async_trait::async_trait;

use crate::error::TaskStoreError;

/// Task records owned by one agent process.
///
/// Backends must serialize access per record and must never let a status
/// change bypass the transition table.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert or replace a record. Replacement is last-writer-wins.
    async fn put(&self, task: Task) -> Result<(), TaskStoreError>;

    async fn get(&self, id: &TaskId) -> Result<Option<Task>, TaskStoreError>;

    /// Apply `update` to an existing record through the transition table.
    /// Returns the record as stored after the update.
    async fn transition(&self, id: &TaskId, update: TaskUpdate) -> Result<Task, TaskStoreError>;

    /// Atomically bind an idempotency key to `task_id`, unless it is bound already.
    ///
    /// `fingerprint` identifies the request content; a reused key whose
    /// fingerprint differs is reported as [`Reservation::Conflict`].
    async fn reserve_idempotency_key(
        &self,
        key: &str,
        fingerprint: &str,
        task_id: &TaskId,
    ) -> Result<Reservation, TaskStoreError>;

    /// Unbind `key` if it is still bound to `task_id`, so a retry executes
    /// again. Unknown keys and keys bound to other tasks are left alone.
    async fn release_idempotency_key(
        &self,
        key: &str,
        task_id: &TaskId,
    ) -> Result<(), TaskStoreError>;
}

/// Outcome of [`TaskStore::reserve_idempotency_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// Key was free and is now bound to the caller's task id.
    Reserved,
    /// Same key, same request: the task created by the first submission.
    Existing(TaskId),
    /// Same key, different request.
    Conflict(TaskId),
}
