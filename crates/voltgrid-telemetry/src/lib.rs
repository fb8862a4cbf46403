//! voltgrid-telemetry — hardware telemetry normalization.
//!
//! Converts raw, possibly partial hardware readings into a complete,
//! physically-clamped snapshot. Omitted fields take fail-safe
//! defaults; power and clock values are clamped to the configured
//! ceilings at construction time. There is no failure mode — this
//! crate only fills gaps and clamps ranges.

pub mod snapshot;

pub use snapshot::{GpuTelemetry, RawTelemetry, TelemetryReport, clamp_clock, clamp_tdp};
