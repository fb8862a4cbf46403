//! voltgrid-carbon — grid carbon intensity analysis.
//!
//! Classifies the current grid carbon intensity into an operating band
//! and compares it against a supplied forecast to decide whether
//! deferring a job is worth it.
//!
//! # Deferral rule
//!
//! ```text
//! forecast_min = min(forecast)            (current itself if empty)
//! delta        = current - forecast_min
//!
//! should_defer = delta > 0
//!                and delta / max(current, 1.0) > 0.20
//! ```
//!
//! A forecast dip only justifies deferral when it is at least a 20 %
//! relative improvement. The 1.0 floor in the denominator keeps the
//! ratio finite near zero intensity.

pub mod analyzer;
pub mod forecast;

pub use analyzer::{CarbonAnalysis, Classification, analyze, classify};
pub use forecast::{CarbonForecast, CarbonReading};
