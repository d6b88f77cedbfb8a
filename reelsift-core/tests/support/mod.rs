#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use reelsift_core::api::{BackendError, DedupeBackend};
use reelsift_model::{
    BatchOutcome, DuplicateTask, ItemType, LibraryId, LibrarySummary,
    RawPolicy, ScanAck, TaskId, TaskType, VersionId, VersionInfo,
};

pub fn task(id: &str, item_type: &str, name: &str) -> DuplicateTask {
    DuplicateTask {
        id: TaskId::new(id).unwrap(),
        item_name: name.to_string(),
        item_type: ItemType::new(item_type),
        task_type: TaskType::MultiVersion,
        versions: Vec::new(),
        best_version_id: None,
    }
}

/// Task with two versions of the given sizes; the first one is best.
pub fn sized_task(id: &str, item_type: &str, name: &str, sizes: [u64; 2]) -> DuplicateTask {
    let versions: Vec<VersionInfo> = sizes
        .iter()
        .enumerate()
        .map(|(idx, size)| {
            let mut version = VersionInfo::new(
                VersionId::new(format!("{id}-v{idx}")).unwrap(),
                format!("/media/{name}/{idx}.mkv"),
            );
            version.filesize = Some(*size);
            version
        })
        .collect();
    DuplicateTask {
        best_version_id: Some(versions[0].id.clone()),
        versions,
        ..task(id, item_type, name)
    }
}

pub fn ids(values: &[TaskId]) -> Vec<String> {
    values.iter().map(|id| id.as_str().to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute(Vec<TaskId>),
    Ignore(Vec<TaskId>),
    Remove(Vec<TaskId>),
}

/// In-memory backend recording every batch request. Batch calls drop the
/// affected tasks from the listing like the real executor does.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    tasks: Mutex<Vec<DuplicateTask>>,
    policy: Mutex<RawPolicy>,
    calls: Mutex<Vec<Call>>,
    fetches: AtomicUsize,
    fail_batches: AtomicBool,
    fail_fetches: AtomicBool,
    scan_busy: AtomicBool,
}

impl RecordingBackend {
    pub fn with_tasks(tasks: Vec<DuplicateTask>) -> Self {
        let backend = Self::default();
        *backend.tasks.lock().unwrap() = tasks;
        backend
    }

    pub fn set_tasks(&self, tasks: Vec<DuplicateTask>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn stored_policy(&self) -> RawPolicy {
        self.policy.lock().unwrap().clone()
    }

    pub fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn scan_busy(&self, busy: bool) {
        self.scan_busy.store(busy, Ordering::SeqCst);
    }

    fn unavailable(endpoint: &'static str) -> BackendError {
        BackendError::Status {
            endpoint,
            status: 503,
            reason: "backend unavailable".to_string(),
        }
    }

    fn record(
        &self,
        endpoint: &'static str,
        call: Call,
        task_ids: &[TaskId],
    ) -> Result<BatchOutcome, BackendError> {
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(Self::unavailable(endpoint));
        }
        self.calls.lock().unwrap().push(call);
        self.tasks
            .lock()
            .unwrap()
            .retain(|task| !task_ids.contains(&task.id));
        Ok(BatchOutcome {
            message: format!("{} tasks queued", task_ids.len()),
        })
    }
}

#[async_trait]
impl DedupeBackend for RecordingBackend {
    async fn fetch_policy(&self) -> Result<RawPolicy, BackendError> {
        Ok(self.stored_policy())
    }

    async fn save_policy(&self, policy: &RawPolicy) -> Result<(), BackendError> {
        *self.policy.lock().unwrap() = policy.clone();
        Ok(())
    }

    async fn fetch_tasks(&self) -> Result<Vec<DuplicateTask>, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(Self::unavailable("/dedupe/tasks"));
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn trigger_scan(&self) -> Result<ScanAck, BackendError> {
        if self.scan_busy.load(Ordering::SeqCst) {
            Ok(ScanAck::Busy {
                reason: Some("scan already running".to_string()),
            })
        } else {
            Ok(ScanAck::Accepted)
        }
    }

    async fn execute(&self, task_ids: &[TaskId]) -> Result<BatchOutcome, BackendError> {
        self.record("/dedupe/tasks/execute", Call::Execute(task_ids.to_vec()), task_ids)
    }

    async fn ignore(&self, task_ids: &[TaskId]) -> Result<BatchOutcome, BackendError> {
        self.record("/dedupe/tasks/ignore", Call::Ignore(task_ids.to_vec()), task_ids)
    }

    async fn remove(&self, task_ids: &[TaskId]) -> Result<BatchOutcome, BackendError> {
        self.record("/dedupe/tasks/remove", Call::Remove(task_ids.to_vec()), task_ids)
    }

    async fn fetch_libraries(&self) -> Result<Vec<LibrarySummary>, BackendError> {
        Ok(vec![LibrarySummary {
            id: LibraryId::new("lib-movies").unwrap(),
            display_name: "Movies".to_string(),
        }])
    }
}
