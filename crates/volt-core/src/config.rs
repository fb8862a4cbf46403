//! voltgrid.toml configuration parser.
//!
//! All values carry defaults matching the reference hardware (AMD
//! Zen 4 fail-safe envelope, Instinct clock/TDP ceilings, MI300X
//! VRAM), so a config file only needs to name the fields it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fail-safe telemetry defaults, substituted when real hardware
/// readings are unavailable. Running on these values is a data-quality
/// signal, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailsafeDefaults {
    /// Substitute power draw and power cap, in watts.
    pub tdp_watts: f64,
    /// Substitute core clock, in GHz.
    pub freq_ghz: f64,
}

impl FailsafeDefaults {
    /// Fail-safe clock expressed in MHz, as telemetry stores it.
    pub fn clock_mhz(&self) -> f64 {
        self.freq_ghz * 1000.0
    }
}

impl Default for FailsafeDefaults {
    fn default() -> Self {
        Self {
            tdp_watts: 120.0,
            freq_ghz: 2.0,
        }
    }
}

/// Hard physical ceilings. Telemetry values and tuning targets are
/// clamped against these and never exceed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareLimits {
    /// Maximum core clock in MHz.
    pub max_clock_mhz: f64,
    /// Maximum TDP in watts.
    pub max_tdp_watts: f64,
    /// Rated VRAM capacity in GB.
    pub vram_total_gb: f64,
}

impl Default for HardwareLimits {
    fn default() -> Self {
        Self {
            max_clock_mhz: 2100.0,
            max_tdp_watts: 400.0,
            vram_total_gb: 192.0,
        }
    }
}

/// Grid carbon intensity thresholds in gCO2/kWh.
///
/// Above `high` the engine runs in Efficiency mode; below `low` it
/// runs in Performance mode; both boundary values fall in the
/// Moderate band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonThresholds {
    pub high: f64,
    pub low: f64,
}

impl Default for CarbonThresholds {
    fn default() -> Self {
        Self {
            high: 400.0,
            low: 100.0,
        }
    }
}

/// A named hardware tuning preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningPreset {
    /// Fraction of the rated TDP cap to target (0.0–1.0).
    pub tdp_cap_pct: f64,
    /// Power state index. Lower = higher performance.
    pub p_state: u8,
    /// Human-readable label for logs and status output.
    pub label: String,
}

/// The three operating presets the scheduler maps carbon bands onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningPresets {
    pub efficiency: TuningPreset,
    pub performance: TuningPreset,
    pub balanced: TuningPreset,
}

impl Default for TuningPresets {
    fn default() -> Self {
        Self {
            efficiency: TuningPreset {
                tdp_cap_pct: 0.50,
                p_state: 3,
                label: "Efficiency Mode".to_string(),
            },
            performance: TuningPreset {
                tdp_cap_pct: 1.00,
                p_state: 0,
                label: "Performance Mode (PBO)".to_string(),
            },
            balanced: TuningPreset {
                tdp_cap_pct: 0.75,
                p_state: 1,
                label: "Balanced Mode".to_string(),
            },
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock budget for one decision cycle, in milliseconds.
    pub decision_timeout_ms: u64,
    /// Default core temperature when no reading is supplied, in °C.
    pub default_core_temp_c: f64,
    /// Peak FP16 throughput of the reference accelerator, used only
    /// for the efficiency-ratio diagnostic.
    pub reference_tflops_fp16: f64,
    /// Number of cores in the default affinity set.
    pub core_count: u32,
    pub failsafe: FailsafeDefaults,
    pub limits: HardwareLimits,
    pub carbon: CarbonThresholds,
    pub presets: TuningPresets,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decision_timeout_ms: 250,
            default_core_temp_c: 65.0,
            reference_tflops_fp16: 1307.4,
            core_count: 16,
            failsafe: FailsafeDefaults::default(),
            limits: HardwareLimits::default(),
            carbon: CarbonThresholds::default(),
            presets: TuningPresets::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The default core affinity set: cores `0..core_count`.
    pub fn core_affinity(&self) -> Vec<u32> {
        (0..self.core_count).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_hardware() {
        let config = EngineConfig::default();
        assert_eq!(config.failsafe.tdp_watts, 120.0);
        assert_eq!(config.failsafe.clock_mhz(), 2000.0);
        assert_eq!(config.limits.max_clock_mhz, 2100.0);
        assert_eq!(config.limits.max_tdp_watts, 400.0);
        assert_eq!(config.limits.vram_total_gb, 192.0);
        assert_eq!(config.carbon.high, 400.0);
        assert_eq!(config.carbon.low, 100.0);
        assert_eq!(config.decision_timeout_ms, 250);
    }

    #[test]
    fn preset_table() {
        let presets = TuningPresets::default();
        assert_eq!(presets.efficiency.tdp_cap_pct, 0.50);
        assert_eq!(presets.efficiency.p_state, 3);
        assert_eq!(presets.performance.tdp_cap_pct, 1.00);
        assert_eq!(presets.performance.p_state, 0);
        assert_eq!(presets.balanced.tdp_cap_pct, 0.75);
        assert_eq!(presets.balanced.p_state, 1);
    }

    #[test]
    fn partial_toml_overlays_defaults() {
        let toml_str = r#"
decision_timeout_ms = 100

[carbon]
high = 350.0
low = 80.0
"#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.decision_timeout_ms, 100);
        assert_eq!(config.carbon.high, 350.0);
        assert_eq!(config.carbon.low, 80.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.limits.vram_total_gb, 192.0);
        assert_eq!(config.presets.balanced.p_state, 1);
    }

    #[test]
    fn toml_round_trip() {
        let config = EngineConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn core_affinity_covers_all_cores() {
        let config = EngineConfig::default();
        assert_eq!(config.core_affinity(), (0..16).collect::<Vec<u32>>());
    }
}
