//! The immutable per-cycle decision record.
//!
//! The serialized shape is a fixed contract consumed by external
//! callers:
//!
//! ```json
//! {
//!   "timestamp": "2026-01-01T00:00:00Z",
//!   "decision": {
//!     "task_id": "...",
//!     "action": "EXECUTE | DEFER | SCALE_DOWN",
//!     "amd_tuning": {
//!       "target_tdp_watts": 300,
//!       "core_affinity": [0, 1, ...],
//!       "p_state": 1
//!     }
//!   },
//!   "metrics": {
//!     "carbon_saved_est_grams": 0.0,
//!     "confidence_score": 0.8
//!   },
//!   "error_flags": null
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the engine decided to do with the job this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionAction {
    /// Run the job now at the mapped power preset.
    Execute,
    /// Hold the job for a better window.
    Defer,
    /// Run the job now at reduced power.
    ScaleDown,
}

impl DecisionAction {
    pub fn label(&self) -> &'static str {
        match self {
            DecisionAction::Execute => "EXECUTE",
            DecisionAction::Defer => "DEFER",
            DecisionAction::ScaleDown => "SCALE_DOWN",
        }
    }
}

/// Hardware tuning parameters attached to a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuTuning {
    /// Target power cap in whole watts, already clamped to the
    /// physical ceiling.
    pub target_tdp_watts: u32,
    /// Cores the job should be pinned to.
    pub core_affinity: Vec<u32>,
    /// Power state index. Lower = higher performance.
    pub p_state: u8,
}

/// The `decision` sub-record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionBody {
    pub task_id: String,
    pub action: DecisionAction,
    pub amd_tuning: GpuTuning,
}

/// The `metrics` sub-record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMetrics {
    /// Estimated grams of CO2 saved over a one-hour window, rounded to
    /// 2 decimals, never negative.
    pub carbon_saved_est_grams: f64,
    /// Heuristic data-quality score, rounded to 2 decimals, in [0,1].
    pub confidence_score: f64,
}

/// One immutable decision record, appended to history every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerDecision {
    /// Creation time, UTC.
    pub timestamp: DateTime<Utc>,
    pub decision: DecisionBody,
    pub metrics: DecisionMetrics,
    pub error_flags: Option<String>,
}

impl SchedulerDecision {
    /// Build a record, applying the output contract: carbon saved and
    /// confidence rounded to 2 decimals, confidence clamped to [0,1].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task_id: impl Into<String>,
        action: DecisionAction,
        target_tdp_watts: u32,
        core_affinity: Vec<u32>,
        p_state: u8,
        carbon_saved_est_grams: f64,
        confidence_score: f64,
        error_flags: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            decision: DecisionBody {
                task_id: task_id.into(),
                action,
                amd_tuning: GpuTuning {
                    target_tdp_watts,
                    core_affinity,
                    p_state,
                },
            },
            metrics: DecisionMetrics {
                carbon_saved_est_grams: round2(carbon_saved_est_grams),
                confidence_score: round2(confidence_score.clamp(0.0, 1.0)),
            },
            error_flags,
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped_and_rounded() {
        let d = SchedulerDecision::new(
            "T1",
            DecisionAction::Execute,
            300,
            vec![0, 1],
            0,
            0.0,
            1.375,
            None,
        );
        assert_eq!(d.metrics.confidence_score, 1.0);

        let d = SchedulerDecision::new(
            "T1",
            DecisionAction::Execute,
            300,
            vec![0, 1],
            0,
            0.0,
            -0.2,
            None,
        );
        assert_eq!(d.metrics.confidence_score, 0.0);

        let d = SchedulerDecision::new(
            "T1",
            DecisionAction::Execute,
            300,
            vec![0, 1],
            0,
            0.0,
            0.777,
            None,
        );
        assert_eq!(d.metrics.confidence_score, 0.78);
    }

    #[test]
    fn carbon_saved_rounds_to_two_decimals() {
        let d = SchedulerDecision::new(
            "T1",
            DecisionAction::ScaleDown,
            200,
            vec![0],
            3,
            69.004999,
            0.8,
            None,
        );
        assert_eq!(d.metrics.carbon_saved_est_grams, 69.0);
    }

    #[test]
    fn serialized_shape_matches_contract() {
        let d = SchedulerDecision::new(
            "LLM-TRAIN-7B",
            DecisionAction::ScaleDown,
            200,
            vec![0, 1, 2, 3],
            3,
            69.0,
            0.9,
            None,
        );
        let json = serde_json::to_value(&d).unwrap();

        assert!(json["timestamp"].is_string());
        assert_eq!(json["decision"]["task_id"], "LLM-TRAIN-7B");
        assert_eq!(json["decision"]["action"], "SCALE_DOWN");
        assert_eq!(json["decision"]["amd_tuning"]["target_tdp_watts"], 200);
        assert_eq!(json["decision"]["amd_tuning"]["p_state"], 3);
        assert!(json["decision"]["amd_tuning"]["core_affinity"].is_array());
        assert_eq!(json["metrics"]["carbon_saved_est_grams"], 69.0);
        assert_eq!(json["metrics"]["confidence_score"], 0.9);
        assert!(json["error_flags"].is_null());
    }

    #[test]
    fn action_labels() {
        assert_eq!(DecisionAction::Execute.label(), "EXECUTE");
        assert_eq!(DecisionAction::Defer.label(), "DEFER");
        assert_eq!(DecisionAction::ScaleDown.label(), "SCALE_DOWN");
    }
}
