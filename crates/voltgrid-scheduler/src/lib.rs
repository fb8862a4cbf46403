//! voltgrid-scheduler — the decision engine.
//!
//! One call to [`Scheduler::decide`] runs a single decision cycle:
//! pick a job (first-fit-by-priority, or an explicit task id), analyze
//! grid carbon intensity against the forecast, validate VRAM fit, map
//! the carbon band onto a hardware tuning preset, and emit one
//! immutable [`SchedulerDecision`]. Every cycle appends exactly one
//! record to the in-memory history, including the early-exit terminal
//! states.
//!
//! # Decision pipeline
//!
//! ```text
//! select job ── none ──────────────→ DEFER  (NO_ELIGIBLE_TASK)
//!     │
//! carbon analysis
//!     │
//! anti-hang checkpoint ── late ────→ DEFER  (ANTI_HANG_TIMEOUT_250MS)
//!     │
//! VRAM validation ── overflow ─────→ DEFER  (VRAM_OVERFLOW: ...)
//!     │
//! mode mapping:   HIGH → SCALE_DOWN @ 50% cap
//!                 LOW  → EXECUTE    @ 100% cap
//!                 MOD  → DEFER or EXECUTE @ 75% cap
//!     │
//! anti-hang checkpoint ── late ────→ DEFER  (ANTI_HANG_TIMEOUT_250MS)
//!     │
//! confidence + carbon-saved estimate → decision record
//! ```
//!
//! `decide` never returns an error: soft failures ride in the record's
//! `error_flags`, and the anti-hang timeout degrades to a safe DEFER.

pub mod decision;
pub mod engine;
pub mod status;

pub use decision::{DecisionAction, DecisionBody, DecisionMetrics, GpuTuning, SchedulerDecision};
pub use engine::Scheduler;
pub use status::{CarbonSummary, EngineStatus, QueueSummary};
