//! The scheduler engine — runs one decision cycle per call.

use std::time::Instant;

use tracing::{debug, info, warn};

use volt_core::EngineConfig;
use voltgrid_carbon::{CarbonAnalysis, CarbonForecast, CarbonReading, Classification, analyze};
use voltgrid_queue::{Job, JobQueue, JobStatus};
use voltgrid_telemetry::{GpuTelemetry, RawTelemetry, clamp_tdp};

use crate::decision::{DecisionAction, SchedulerDecision};
use crate::status::{CarbonSummary, EngineStatus, QueueSummary};

/// The decision engine.
///
/// Owns the job queue, the current telemetry snapshot, the carbon
/// state, and the append-only decision history. Explicitly constructed
/// and passed by reference — there is no global instance. Evaluation
/// is single-threaded and synchronous; callers that trigger cycles
/// concurrently must serialize access, since job selection and status
/// mutation are not atomic with respect to each other.
pub struct Scheduler {
    config: EngineConfig,
    queue: JobQueue,
    telemetry: GpuTelemetry,
    current_intensity: f64,
    forecast: CarbonForecast,
    history: Vec<SchedulerDecision>,
}

impl Scheduler {
    pub fn new(config: EngineConfig) -> Self {
        let queue = JobQueue::new(config.limits.vram_total_gb);
        let telemetry = GpuTelemetry::failsafe(&config);
        Self {
            config,
            queue,
            telemetry,
            current_intensity: 200.0,
            forecast: CarbonForecast::default(),
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut JobQueue {
        &mut self.queue
    }

    pub fn telemetry(&self) -> &GpuTelemetry {
        &self.telemetry
    }

    /// Replace the telemetry snapshot via the normalizer.
    pub fn set_telemetry(&mut self, raw: &RawTelemetry) {
        self.telemetry = GpuTelemetry::normalize(raw, &self.config);
        debug!(
            current_watts = self.telemetry.current_watts,
            vram_free_gb = self.telemetry.vram_free_gb(),
            failsafe = self.telemetry.is_failsafe(&self.config.failsafe),
            "telemetry updated"
        );
    }

    /// Replace the current intensity and, if readings are supplied,
    /// the forecast. An absent or empty forecast keeps the previous
    /// one.
    pub fn set_carbon(&mut self, current: f64, forecast_readings: Option<Vec<CarbonReading>>) {
        self.current_intensity = current;
        if let Some(readings) = forecast_readings
            && !readings.is_empty()
        {
            self.forecast = CarbonForecast::new(readings);
        }
        debug!(
            intensity = self.current_intensity,
            forecast_len = self.forecast.readings.len(),
            "carbon state updated"
        );
    }

    /// Run one decision cycle.
    ///
    /// With an explicit `task_id` the job is looked up directly,
    /// bypassing VRAM pre-filtering; otherwise the queue picks
    /// first-fit-by-priority against currently free VRAM. Always
    /// returns a well-formed record and appends exactly one history
    /// entry — soft failures ride in `error_flags`, and a cycle that
    /// overruns the wall-clock budget degrades to a safe DEFER.
    pub fn decide(&mut self, task_id: Option<&str>) -> SchedulerDecision {
        let started = Instant::now();

        let job: Option<Job> = match task_id {
            Some(id) => self.queue.get(id).cloned(),
            None => self.queue.next_job(self.telemetry.vram_free_gb()).cloned(),
        };

        let Some(job) = job else {
            let decision = SchedulerDecision::new(
                "NONE",
                DecisionAction::Defer,
                clamp_tdp(self.config.failsafe.tdp_watts, &self.config.limits) as u32,
                self.config.core_affinity(),
                self.config.presets.balanced.p_state,
                0.0,
                0.5,
                Some("NO_ELIGIBLE_TASK".to_string()),
            );
            return self.record(decision);
        };

        // Step 1: carbon analysis.
        let analysis = analyze(self.current_intensity, &self.forecast, &self.config.carbon);

        // Anti-hang checkpoint.
        if self.over_budget(started) {
            return self.timeout_defer(&job.task_id);
        }

        // Step 2: VRAM validation against currently free VRAM.
        let vram_free = self.telemetry.vram_free_gb();
        if job.vram_req_gb > vram_free {
            warn!(
                task_id = %job.task_id,
                need_gb = job.vram_req_gb,
                have_gb = vram_free,
                "vram overflow, deferring"
            );
            let decision = SchedulerDecision::new(
                &job.task_id,
                DecisionAction::Defer,
                clamp_tdp(self.telemetry.tdp_cap_watts, &self.config.limits) as u32,
                self.config.core_affinity(),
                self.config.presets.balanced.p_state,
                0.0,
                0.9,
                Some(format!(
                    "VRAM_OVERFLOW: need {}GB, have {}GB",
                    job.vram_req_gb, vram_free
                )),
            );
            self.queue.update_status(&job.task_id, JobStatus::Deferred);
            return self.record(decision);
        }

        // Step 3: map the carbon band onto a tuning preset.
        let presets = &self.config.presets;
        let (preset, action) = match analysis.classification {
            Classification::High => (&presets.efficiency, DecisionAction::ScaleDown),
            Classification::Low => (&presets.performance, DecisionAction::Execute),
            Classification::Moderate => {
                if analysis.should_defer && !self.queue.is_deadline_urgent(&job) {
                    (&presets.balanced, DecisionAction::Defer)
                } else {
                    (&presets.balanced, DecisionAction::Execute)
                }
            }
        };
        let target_tdp = clamp_tdp(
            self.telemetry.tdp_cap_watts * preset.tdp_cap_pct,
            &self.config.limits,
        ) as u32;

        // Step 4: efficiency diagnostic and carbon-saved estimate.
        if let Some(ratio) = self.efficiency_ratio() {
            debug!(efficiency_ratio = ratio, preset = %preset.label, "mode mapped");
        }
        let carbon_saved = estimate_carbon_saved(
            action,
            self.telemetry.tdp_cap_watts,
            target_tdp as f64,
            self.current_intensity,
        );

        // Anti-hang final checkpoint.
        if self.over_budget(started) {
            return self.timeout_defer(&job.task_id);
        }

        let confidence = self.confidence(&analysis, &job);

        let decision = SchedulerDecision::new(
            &job.task_id,
            action,
            target_tdp,
            self.config.core_affinity(),
            preset.p_state,
            carbon_saved,
            confidence,
            None,
        );

        // Execute and ScaleDown both mean "proceed, possibly throttled".
        let status = match action {
            DecisionAction::Execute | DecisionAction::ScaleDown => JobStatus::Running,
            DecisionAction::Defer => JobStatus::Deferred,
        };
        self.queue.update_status(&job.task_id, status);

        self.record(decision)
    }

    /// Current engine state summary.
    pub fn status(&self) -> EngineStatus {
        let analysis = analyze(self.current_intensity, &self.forecast, &self.config.carbon);
        EngineStatus {
            engine: format!("VoltGrid v{}", env!("CARGO_PKG_VERSION")),
            carbon: CarbonSummary {
                current_intensity: self.current_intensity,
                classification: analysis.classification,
                forecast_min: analysis.forecast_min,
                forecast_avg: analysis.forecast_avg,
                delta: analysis.delta,
            },
            telemetry: self.telemetry.report(&self.config.failsafe),
            queue: QueueSummary {
                total_jobs: self.queue.len(),
                queued: self.queue.queued_jobs().len(),
                jobs: self.queue.jobs().into_iter().cloned().collect(),
            },
            last_decision: self.history.last().cloned(),
            decisions_made: self.history.len(),
        }
    }

    /// The most recent `limit` decisions, oldest first.
    pub fn history(&self, limit: usize) -> &[SchedulerDecision] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }

    /// Reference throughput per gram of CO2, rounded to 4 decimals.
    /// `None` when intensity is not positive. Diagnostic only.
    pub fn efficiency_ratio(&self) -> Option<f64> {
        if self.current_intensity <= 0.0 {
            return None;
        }
        let ratio = self.config.reference_tflops_fp16 / self.current_intensity;
        Some((ratio * 10_000.0).round() / 10_000.0)
    }

    fn over_budget(&self, started: Instant) -> bool {
        started.elapsed().as_secs_f64() * 1000.0 > self.config.decision_timeout_ms as f64
    }

    /// Anti-hang fallback: the cycle overran its budget, so emit a
    /// safe DEFER at fail-safe power instead of blocking the caller.
    fn timeout_defer(&mut self, task_id: &str) -> SchedulerDecision {
        warn!(
            %task_id,
            budget_ms = self.config.decision_timeout_ms,
            "decision cycle over budget, deferring"
        );
        let decision = SchedulerDecision::new(
            task_id,
            DecisionAction::Defer,
            clamp_tdp(self.config.failsafe.tdp_watts, &self.config.limits) as u32,
            self.config.core_affinity(),
            self.config.presets.balanced.p_state,
            0.0,
            0.3,
            Some(format!(
                "ANTI_HANG_TIMEOUT_{}MS",
                self.config.decision_timeout_ms
            )),
        );
        self.record(decision)
    }

    /// Heuristic data-quality score: 0.7 base, +0.1 for a real
    /// forecast, +0.1 for real telemetry, -0.1 when the job needs more
    /// than 80% of free VRAM.
    fn confidence(&self, analysis: &CarbonAnalysis, job: &Job) -> f64 {
        let mut score = 0.7;
        if analysis.forecast_min != analysis.current {
            score += 0.1;
        }
        if !self.telemetry.is_failsafe(&self.config.failsafe) {
            score += 0.1;
        }
        if job.vram_req_gb > self.telemetry.vram_free_gb() * 0.8 {
            score -= 0.1;
        }
        score
    }

    fn record(&mut self, decision: SchedulerDecision) -> SchedulerDecision {
        info!(
            task_id = %decision.decision.task_id,
            action = decision.decision.action.label(),
            target_tdp_watts = decision.decision.amd_tuning.target_tdp_watts,
            confidence = decision.metrics.confidence_score,
            error_flags = decision.error_flags.as_deref().unwrap_or("-"),
            "decision recorded"
        );
        self.history.push(decision.clone());
        decision
    }
}

/// Grams of CO2 saved by the power reduction over a one-hour window at
/// the current intensity. Zero for EXECUTE; negative reductions floor
/// to zero.
fn estimate_carbon_saved(
    action: DecisionAction,
    original_tdp: f64,
    target_tdp: f64,
    intensity: f64,
) -> f64 {
    if action == DecisionAction::Execute {
        return 0.0;
    }
    let watt_reduction = (original_tdp - target_tdp).max(0.0);
    (watt_reduction / 1000.0) * intensity
}
