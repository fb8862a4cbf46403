//! voltgrid-queue — the candidate job queue.
//!
//! Holds jobs awaiting a scheduling decision, ordered by ascending
//! priority number (1 is most urgent). Admission rejects jobs that can
//! never fit the device's rated VRAM; whether a job fits the VRAM
//! currently free is checked later, at selection and decision time.
//!
//! Selection is first-fit-by-priority: `next_job` returns the first
//! queued job, in priority order, whose requirement fits the available
//! VRAM. A high-priority job that does not fit is skipped; a fitting
//! job is never passed over for a better-fitting one.

pub mod error;
pub mod queue;

pub use error::QueueError;
pub use queue::{DEADLINE_URGENT_WINDOW_SECS, Job, JobQueue, JobStatus};
