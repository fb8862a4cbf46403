//! volt-core — shared configuration for the VoltGrid engine.
//!
//! Every tunable the decision pipeline consumes lives here: fail-safe
//! telemetry defaults, hard physical ceilings, carbon intensity
//! thresholds, the anti-hang budget, and the three named tuning
//! presets. Defaults target a single accelerator family (AMD EPYC
//! host + Instinct MI300X) and can be overridden from a TOML file.

pub mod config;

pub use config::{
    CarbonThresholds, EngineConfig, FailsafeDefaults, HardwareLimits, TuningPreset,
    TuningPresets,
};
