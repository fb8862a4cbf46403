//! Carbon intensity readings and forecast sequences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single grid carbon intensity reading.
///
/// Intensity is in grams of CO2 per kWh and is non-negative by
/// contract; no upper bound is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonReading {
    pub timestamp: DateTime<Utc>,
    /// Grid carbon intensity in gCO2/kWh.
    #[serde(rename = "intensity")]
    pub intensity_gco2: f64,
}

/// An ordered sequence of readings covering a future window,
/// nominally six hours at 30-minute granularity. The engine imposes
/// no fixed count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarbonForecast {
    pub readings: Vec<CarbonReading>,
}

impl CarbonForecast {
    pub fn new(readings: Vec<CarbonReading>) -> Self {
        Self { readings }
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// The reading with the lowest intensity, or `None` when empty.
    pub fn minimum(&self) -> Option<&CarbonReading> {
        self.readings
            .iter()
            .min_by(|a, b| a.intensity_gco2.total_cmp(&b.intensity_gco2))
    }

    /// The reading with the highest intensity, or `None` when empty.
    pub fn maximum(&self) -> Option<&CarbonReading> {
        self.readings
            .iter()
            .max_by(|a, b| a.intensity_gco2.total_cmp(&b.intensity_gco2))
    }

    /// Arithmetic mean intensity, 0.0 when empty.
    pub fn average(&self) -> f64 {
        if self.readings.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.readings.iter().map(|r| r.intensity_gco2).sum();
        sum / self.readings.len() as f64
    }
}
