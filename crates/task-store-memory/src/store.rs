use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use a2a_contract::{Task, TaskId, TaskUpdate};
use a2a_task_store::{Reservation, TaskStore, TaskStoreError};

struct Records {
    tasks: HashMap<TaskId, Task>,
    /// idempotency key -> (task id, request fingerprint)
    idempotency: HashMap<String, (TaskId, String)>,
}

/// Process-local task store. One lock covers the whole map; every operation
/// is O(1) and never awaits anything but the lock.
pub struct MemoryTaskStore {
    records: Mutex<Records>,
}

impl MemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Records {
                tasks: HashMap::new(),
                idempotency: HashMap::new(),
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn put(&self, task: Task) -> Result<(), TaskStoreError> {
        let mut records = self.records.lock().await;
        records.tasks.insert(task.task_id.clone(), task);
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> Result<Option<Task>, TaskStoreError> {
        let records = self.records.lock().await;
        Ok(records.tasks.get(id).cloned())
    }

    async fn transition(&self, id: &TaskId, update: TaskUpdate) -> Result<Task, TaskStoreError> {
        let mut records = self.records.lock().await;
        let Some(task) = records.tasks.get_mut(id) else {
            return Err(TaskStoreError::NotFound(id.to_string()));
        };
        let from = task.status;
        task.apply(update)?;
        tracing::debug!(task_id = %id, from = %from, to = %task.status, "task transitioned");
        Ok(task.clone())
    }

    async fn reserve_idempotency_key(
        &self,
        key: &str,
        fingerprint: &str,
        task_id: &TaskId,
    ) -> Result<Reservation, TaskStoreError> {
        let mut records = self.records.lock().await;
        if let Some((existing, existing_fp)) = records.idempotency.get(key) {
            return Ok(if existing_fp == fingerprint {
                Reservation::Existing(existing.clone())
            } else {
                Reservation::Conflict(existing.clone())
            });
        }
        records
            .idempotency
            .insert(key.to_string(), (task_id.clone(), fingerprint.to_string()));
        Ok(Reservation::Reserved)
    }

    async fn release_idempotency_key(
        &self,
        key: &str,
        task_id: &TaskId,
    ) -> Result<(), TaskStoreError> {
        let mut records = self.records.lock().await;
        if records
            .idempotency
            .get(key)
            .is_some_and(|(bound, _)| bound == task_id)
        {
            records.idempotency.remove(key);
            tracing::debug!(idempotency_key = key, task_id = %task_id, "idempotency key released");
        }
        Ok(())
    }
}
