//! Engine status summary for external callers.

use serde::{Deserialize, Serialize};

use voltgrid_carbon::Classification;
use voltgrid_queue::Job;
use voltgrid_telemetry::TelemetryReport;

use crate::decision::SchedulerDecision;

/// Condensed view of the current carbon situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonSummary {
    pub current_intensity: f64,
    pub classification: Classification,
    pub forecast_min: f64,
    pub forecast_avg: f64,
    pub delta: f64,
}

/// Condensed view of the job queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSummary {
    pub total_jobs: usize,
    pub queued: usize,
    /// All jobs in priority order.
    pub jobs: Vec<Job>,
}

/// Everything an external caller can observe about the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub engine: String,
    pub carbon: CarbonSummary,
    pub telemetry: TelemetryReport,
    pub queue: QueueSummary,
    pub last_decision: Option<SchedulerDecision>,
    pub decisions_made: usize,
}
