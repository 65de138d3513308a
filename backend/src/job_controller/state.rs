//! Tracks background jobs that outlive their HTTP request.
//!
//! The only such job today is the lead CSV import started by
//! `POST /api/leads/import`:
//! - `JobsState` is the clonable, shared view of every job's status. It is
//!   registered as `web::Data` in `main.rs` and read by the status endpoint.
//! - Workers never write the map directly. They push `JobUpdate` messages
//!   into `JobsState::tx`, and `start_job_updater` applies them in order.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

#[derive(Clone)]
pub struct JobsState {
    /// Current status per job id; the single source of truth for pollers.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    /// Producer side of the update channel handed to workers.
    pub tx: mpsc::Sender<JobUpdate>,
}

#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobsState {
    /// Creates the state and the receiver to hand to `start_job_updater`.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    /// Registers a new job as `Pending` and returns its id.
    pub async fn register(&self) -> String {
        let job_id = Uuid::new_v4().to_string();
        self.jobs
            .write()
            .await
            .insert(job_id.clone(), JobStatus::Pending);
        job_id
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }
}

/// Applies `JobUpdate`s to the shared map until every sender is dropped.
/// Spawned once from `main.rs`.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id, update.status);
    }
}
