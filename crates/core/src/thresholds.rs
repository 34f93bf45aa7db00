//! Threshold evaluation for survey readings.
//!
//! Pure logic, no database access. The caller loads the survey and the
//! owner's preferences and passes them in.

use serde::Serialize;

use crate::parameters::{Bound, ParameterKind};
use crate::preferences::{AlertSettings, ThresholdRange};

/// The six scalar readings of one survey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyReadings {
    pub water_level: f64,
    pub ph: f64,
    pub temperature: f64,
    pub dissolved_oxygen: f64,
    pub conductivity: f64,
    pub turbidity: f64,
}

/// A single threshold breach.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdAlert {
    #[serde(rename = "type")]
    pub parameter: ParameterKind,
    #[serde(rename = "threshold")]
    pub bound: Bound,
    pub message: String,
}

/// Evaluate readings against alert settings.
///
/// Checks run in a fixed order: water level, pH, dissolved oxygen. A
/// parameter whose toggle is off never alerts. Comparisons are strict, so a
/// reading equal to a bound is in range, and at most one alert is produced
/// per parameter.
pub fn evaluate(readings: &SurveyReadings, settings: &AlertSettings) -> Vec<ThresholdAlert> {
    let types = &settings.notification_types;
    let thresholds = &settings.thresholds;

    let checks = [
        (
            ParameterKind::WaterLevel,
            types.water_level,
            readings.water_level,
            thresholds.water_level,
        ),
        (ParameterKind::Ph, types.ph, readings.ph, thresholds.ph),
        (
            ParameterKind::DissolvedOxygen,
            types.dissolved_oxygen,
            readings.dissolved_oxygen,
            thresholds.dissolved_oxygen,
        ),
    ];

    checks
        .into_iter()
        .filter(|(_, enabled, _, _)| *enabled)
        .filter_map(|(parameter, _, value, range)| check_range(parameter, value, range))
        .collect()
}

/// Compare one reading to its range; `None` when within bounds.
fn check_range(parameter: ParameterKind, value: f64, range: ThresholdRange) -> Option<ThresholdAlert> {
    let (bound, level) = if value < range.min {
        (Bound::Min, "Low")
    } else if value > range.max {
        (Bound::Max, "High")
    } else {
        return None;
    };

    Some(ThresholdAlert {
        parameter,
        bound,
        message: format!("{level} {} alert", parameter.label()),
    })
}

/// Join alert messages into the single text sent over every channel.
pub fn join_messages(alerts: &[ThresholdAlert]) -> String {
    alerts
        .iter()
        .map(|a| a.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
