//! Telemetry snapshot types and clamping.

use serde::{Deserialize, Serialize};

use volt_core::{EngineConfig, FailsafeDefaults, HardwareLimits};

/// Raw telemetry input as supplied by the caller. Every field is
/// optional; missing fields are filled with fail-safe defaults during
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTelemetry {
    pub current_watts: Option<f64>,
    pub core_temp_c: Option<f64>,
    pub tdp_cap_watts: Option<f64>,
    pub clock_mhz: Option<f64>,
    pub vram_used_gb: Option<f64>,
    pub vram_total_gb: Option<f64>,
}

/// A complete, physically-clamped telemetry snapshot.
///
/// Derived values (`vram_free_gb`, `is_failsafe`, utilization) are
/// computed accessors, recomputed from current fields on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuTelemetry {
    /// Current power draw in watts.
    pub current_watts: f64,
    /// Core temperature in °C.
    pub core_temp_c: f64,
    /// Configured power cap in watts.
    pub tdp_cap_watts: f64,
    /// Core clock in MHz.
    pub clock_mhz: f64,
    /// VRAM in use in GB.
    pub vram_used_gb: f64,
    /// Rated VRAM capacity in GB.
    pub vram_total_gb: f64,
}

/// Clamp a clock value to `[0, max_clock_mhz]`.
pub fn clamp_clock(clock_mhz: f64, limits: &HardwareLimits) -> f64 {
    clock_mhz.clamp(0.0, limits.max_clock_mhz)
}

/// Clamp a power value to `[0, max_tdp_watts]`.
pub fn clamp_tdp(tdp_watts: f64, limits: &HardwareLimits) -> f64 {
    tdp_watts.clamp(0.0, limits.max_tdp_watts)
}

impl GpuTelemetry {
    /// Build a complete snapshot from a raw reading.
    ///
    /// Missing power and clock fields take the fail-safe constants;
    /// missing VRAM fields assume an idle device at rated capacity.
    /// Supplied power and clock values are clamped to the physical
    /// ceilings; clamping is idempotent.
    pub fn normalize(raw: &RawTelemetry, config: &EngineConfig) -> Self {
        let limits = &config.limits;
        let failsafe = &config.failsafe;

        Self {
            current_watts: raw
                .current_watts
                .map_or(failsafe.tdp_watts, |w| clamp_tdp(w, limits)),
            core_temp_c: raw.core_temp_c.unwrap_or(config.default_core_temp_c),
            tdp_cap_watts: raw
                .tdp_cap_watts
                .map_or(failsafe.tdp_watts, |w| clamp_tdp(w, limits)),
            clock_mhz: raw
                .clock_mhz
                .map_or(failsafe.clock_mhz(), |c| clamp_clock(c, limits)),
            vram_used_gb: raw.vram_used_gb.unwrap_or(0.0),
            vram_total_gb: raw.vram_total_gb.unwrap_or(limits.vram_total_gb),
        }
    }

    /// A fully fail-safe snapshot, as if no telemetry was supplied.
    pub fn failsafe(config: &EngineConfig) -> Self {
        Self::normalize(&RawTelemetry::default(), config)
    }

    /// Free VRAM in GB, never negative.
    pub fn vram_free_gb(&self) -> f64 {
        (self.vram_total_gb - self.vram_used_gb).max(0.0)
    }

    /// Power draw as a percentage of the cap, rounded to 1 decimal.
    /// 0.0 when the cap is not positive.
    pub fn tdp_utilization_pct(&self) -> f64 {
        if self.tdp_cap_watts <= 0.0 {
            return 0.0;
        }
        ((self.current_watts / self.tdp_cap_watts) * 1000.0).round() / 10.0
    }

    /// True iff power draw and clock both equal the fail-safe
    /// constants exactly, meaning no real telemetry was supplied for
    /// those fields. A confidence signal downstream, not an error.
    pub fn is_failsafe(&self, failsafe: &FailsafeDefaults) -> bool {
        self.current_watts == failsafe.tdp_watts && self.clock_mhz == failsafe.clock_mhz()
    }

    /// Serializable view including the derived fields.
    pub fn report(&self, failsafe: &FailsafeDefaults) -> TelemetryReport {
        TelemetryReport {
            current_watts: self.current_watts,
            core_temp_c: self.core_temp_c,
            tdp_cap_watts: self.tdp_cap_watts,
            clock_mhz: self.clock_mhz,
            vram_used_gb: round1(self.vram_used_gb),
            vram_total_gb: self.vram_total_gb,
            vram_free_gb: round1(self.vram_free_gb()),
            tdp_utilization_pct: self.tdp_utilization_pct(),
            is_failsafe: self.is_failsafe(failsafe),
        }
    }
}

/// Snapshot plus derived fields, for status output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReport {
    pub current_watts: f64,
    pub core_temp_c: f64,
    pub tdp_cap_watts: f64,
    pub clock_mhz: f64,
    pub vram_used_gb: f64,
    pub vram_total_gb: f64,
    pub vram_free_gb: f64,
    pub tdp_utilization_pct: f64,
    pub is_failsafe: bool,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
