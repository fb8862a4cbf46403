//! Carbon intensity classification and deferral analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use volt_core::CarbonThresholds;

use crate::forecast::CarbonForecast;

/// Operating band for a grid carbon intensity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Above the high threshold — run in Efficiency mode.
    High,
    /// Between the thresholds, boundaries included — Balanced mode.
    Moderate,
    /// Below the low threshold — Performance mode.
    Low,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::High => "HIGH",
            Classification::Moderate => "MODERATE",
            Classification::Low => "LOW",
        }
    }
}

/// Result of comparing current intensity against the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonAnalysis {
    pub classification: Classification,
    /// Current intensity in gCO2/kWh.
    pub current: f64,
    /// Lowest forecasted intensity, or `current` when no forecast was
    /// supplied — an empty forecast never suggests deferral.
    pub forecast_min: f64,
    /// When the forecast minimum occurs, if a forecast was supplied.
    pub forecast_min_time: Option<DateTime<Utc>>,
    /// `current - forecast_min`, rounded to 2 decimals.
    pub delta: f64,
    /// Whether deferring would save significant carbon (>= 20 %
    /// relative improvement).
    pub should_defer: bool,
    /// Mean forecast intensity, rounded to 2 decimals, 0.0 when empty.
    pub forecast_avg: f64,
}

/// Classify an intensity into an operating band.
///
/// Strictly above `high` is High, strictly below `low` is Low, and
/// both threshold values themselves fall in Moderate.
pub fn classify(intensity_gco2: f64, thresholds: &CarbonThresholds) -> Classification {
    if intensity_gco2 > thresholds.high {
        Classification::High
    } else if intensity_gco2 < thresholds.low {
        Classification::Low
    } else {
        Classification::Moderate
    }
}

/// Compare current intensity against the forecast minimum.
pub fn analyze(
    current: f64,
    forecast: &CarbonForecast,
    thresholds: &CarbonThresholds,
) -> CarbonAnalysis {
    let classification = classify(current, thresholds);
    let minimum = forecast.minimum();
    let forecast_min = minimum.map_or(current, |r| r.intensity_gco2);

    let delta = round2(current - forecast_min);
    let should_defer = delta > 0.0 && delta / current.max(1.0) > 0.20;

    debug!(
        classification = classification.label(),
        current,
        forecast_min,
        delta,
        should_defer,
        "carbon analysis"
    );

    CarbonAnalysis {
        classification,
        current,
        forecast_min,
        forecast_min_time: minimum.map(|r| r.timestamp),
        delta,
        should_defer,
        forecast_avg: round2(forecast.average()),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::CarbonReading;
    use chrono::TimeZone;

    fn thresholds() -> CarbonThresholds {
        CarbonThresholds::default()
    }

    fn forecast_of(values: &[f64]) -> CarbonForecast {
        CarbonForecast::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| CarbonReading {
                    timestamp: Utc.with_ymd_and_hms(2026, 1, 1, i as u32, 0, 0).unwrap(),
                    intensity_gco2: v,
                })
                .collect(),
        )
    }

    #[test]
    fn classify_high() {
        assert_eq!(classify(450.0, &thresholds()), Classification::High);
        assert_eq!(classify(401.0, &thresholds()), Classification::High);
    }

    #[test]
    fn classify_low() {
        assert_eq!(classify(50.0, &thresholds()), Classification::Low);
        assert_eq!(classify(99.0, &thresholds()), Classification::Low);
    }

    #[test]
    fn classify_moderate_includes_boundaries() {
        assert_eq!(classify(100.0, &thresholds()), Classification::Moderate);
        assert_eq!(classify(250.0, &thresholds()), Classification::Moderate);
        assert_eq!(classify(400.0, &thresholds()), Classification::Moderate);
    }

    #[test]
    fn analysis_against_forecast() {
        let analysis = analyze(350.0, &forecast_of(&[300.0, 100.0, 200.0]), &thresholds());
        assert_eq!(analysis.classification, Classification::Moderate);
        assert_eq!(analysis.forecast_min, 100.0);
        assert_eq!(analysis.delta, 250.0);
        assert!(analysis.should_defer);
        assert_eq!(analysis.forecast_avg, 200.0);
        assert!(analysis.forecast_min_time.is_some());
    }

    #[test]
    fn empty_forecast_never_defers() {
        let analysis = analyze(200.0, &CarbonForecast::default(), &thresholds());
        assert_eq!(analysis.forecast_min, 200.0);
        assert_eq!(analysis.delta, 0.0);
        assert!(!analysis.should_defer);
        assert!(analysis.forecast_min_time.is_none());
        assert_eq!(analysis.forecast_avg, 0.0);
    }

    #[test]
    fn small_improvement_does_not_defer() {
        // 10% below current — under the 20% bar.
        let analysis = analyze(200.0, &forecast_of(&[180.0]), &thresholds());
        assert_eq!(analysis.delta, 20.0);
        assert!(!analysis.should_defer);
    }

    #[test]
    fn near_zero_intensity_uses_unit_floor() {
        // delta/max(current, 1.0) keeps the ratio finite; 0.5 - 0.1 =
        // 0.4 over a floor of 1.0 is a 40% "improvement".
        let analysis = analyze(0.5, &forecast_of(&[0.1]), &thresholds());
        assert!(analysis.should_defer);
    }

    #[test]
    fn classification_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&Classification::High).unwrap(),
            "\"HIGH\""
        );
        assert_eq!(
            serde_json::to_string(&Classification::Moderate).unwrap(),
            "\"MODERATE\""
        );
    }
}
