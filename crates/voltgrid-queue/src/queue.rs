//! Priority job queue with VRAM-fit admission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::QueueError;

/// A deadline closer than this is considered urgent (30 minutes).
pub const DEADLINE_URGENT_WINDOW_SECS: i64 = 1800;

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Deferred,
    Failed,
}

/// A single compute job awaiting a scheduling decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique within the queue.
    pub task_id: String,
    /// 1 (highest urgency) to 10 (lowest).
    pub priority: u8,
    /// Required VRAM in GB.
    pub vram_req_gb: f64,
    /// Absolute deadline, RFC 3339. Kept as supplied; an unparseable
    /// deadline is treated as not urgent.
    pub deadline: String,
    pub status: JobStatus,
}

impl Job {
    pub fn new(
        task_id: impl Into<String>,
        priority: u8,
        vram_req_gb: f64,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            priority,
            vram_req_gb,
            deadline: deadline.into(),
            status: JobStatus::Queued,
        }
    }
}

/// Priority-ordered job queue. The queue exclusively owns its jobs;
/// status changes go through [`JobQueue::update_status`].
#[derive(Debug)]
pub struct JobQueue {
    jobs: Vec<Job>,
    /// Rated VRAM capacity of the device, in GB.
    vram_capacity_gb: f64,
}

impl JobQueue {
    pub fn new(vram_capacity_gb: f64) -> Self {
        Self {
            jobs: Vec::new(),
            vram_capacity_gb,
        }
    }

    /// All jobs, stable-sorted by ascending priority number. Ties keep
    /// insertion order.
    pub fn jobs(&self) -> Vec<&Job> {
        let mut sorted: Vec<&Job> = self.jobs.iter().collect();
        sorted.sort_by_key(|j| j.priority);
        sorted
    }

    /// Queued jobs only, in priority order.
    pub fn queued_jobs(&self) -> Vec<&Job> {
        self.jobs()
            .into_iter()
            .filter(|j| j.status == JobStatus::Queued)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Admit a job. Rejects jobs whose requirement exceeds the rated
    /// VRAM capacity — currently-free VRAM is deliberately not checked
    /// here.
    pub fn add(&mut self, job: Job) -> Result<(), QueueError> {
        if job.vram_req_gb > self.vram_capacity_gb {
            warn!(
                task_id = %job.task_id,
                need_gb = job.vram_req_gb,
                capacity_gb = self.vram_capacity_gb,
                "job rejected at admission"
            );
            return Err(QueueError::CapacityExceeded {
                need_gb: job.vram_req_gb,
                capacity_gb: self.vram_capacity_gb,
            });
        }
        debug!(task_id = %job.task_id, priority = job.priority, "job admitted");
        self.jobs.push(job);
        Ok(())
    }

    /// Remove the first job matching `task_id`. Returns whether one
    /// was found.
    pub fn remove(&mut self, task_id: &str) -> bool {
        match self.jobs.iter().position(|j| j.task_id == task_id) {
            Some(i) => {
                self.jobs.remove(i);
                debug!(%task_id, "job removed");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, task_id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.task_id == task_id)
    }

    /// Update a job's status. Returns whether the job was found.
    pub fn update_status(&mut self, task_id: &str, status: JobStatus) -> bool {
        match self.jobs.iter_mut().find(|j| j.task_id == task_id) {
            Some(job) => {
                job.status = status;
                true
            }
            None => false,
        }
    }

    /// First-fit-by-priority selection: the first queued job, in
    /// priority order, whose requirement fits `available_vram_gb`.
    pub fn next_job(&self, available_vram_gb: f64) -> Option<&Job> {
        self.queued_jobs()
            .into_iter()
            .find(|j| j.vram_req_gb <= available_vram_gb)
    }

    /// True iff less than 30 minutes remain until the job's deadline.
    /// Malformed deadlines are not urgent — fail open toward deferral.
    pub fn is_deadline_urgent(&self, job: &Job) -> bool {
        match DateTime::parse_from_rfc3339(&job.deadline) {
            Ok(deadline) => {
                let remaining = deadline.with_timezone(&Utc) - Utc::now();
                remaining.num_seconds() < DEADLINE_URGENT_WINDOW_SECS
            }
            Err(_) => false,
        }
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}
