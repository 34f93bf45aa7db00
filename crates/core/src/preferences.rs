//! Alert settings: per-parameter toggles and threshold ranges.
//!
//! Defaults here must stay in sync with the column defaults in the
//! `notification_preferences` migration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Valid range for pH thresholds.
const PH_SCALE: std::ops::RangeInclusive<f64> = 0.0..=14.0;

/// An inclusive `{min, max}` band. Readings strictly outside it alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub min: f64,
    pub max: f64,
}

impl ThresholdRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Threshold ranges for the three parameters that are compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub water_level: ThresholdRange,
    pub ph: ThresholdRange,
    pub dissolved_oxygen: ThresholdRange,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            water_level: ThresholdRange::new(2.0, 5.0),
            ph: ThresholdRange::new(6.5, 8.5),
            dissolved_oxygen: ThresholdRange::new(5.0, 12.0),
        }
    }
}

/// Per-parameter alerting toggles.
///
/// `temperature` and `pollution` are stored and returned but no threshold
/// comparison exists for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTypes {
    pub water_level: bool,
    pub ph: bool,
    pub dissolved_oxygen: bool,
    pub temperature: bool,
    pub pollution: bool,
}

impl Default for NotificationTypes {
    fn default() -> Self {
        Self {
            water_level: true,
            ph: true,
            dissolved_oxygen: true,
            temperature: true,
            pollution: true,
        }
    }
}

/// Everything the threshold evaluator needs from a preference record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AlertSettings {
    pub notification_types: NotificationTypes,
    pub thresholds: Thresholds,
}

/// Which delivery channels a user has switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    pub email: bool,
    pub sms: bool,
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// Partial update for [`NotificationTypes`]; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationTypesPatch {
    pub water_level: Option<bool>,
    pub ph: Option<bool>,
    pub dissolved_oxygen: Option<bool>,
    pub temperature: Option<bool>,
    pub pollution: Option<bool>,
}

/// Partial update for one [`ThresholdRange`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ThresholdRangePatch {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Partial update for [`Thresholds`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdsPatch {
    pub water_level: Option<ThresholdRangePatch>,
    pub ph: Option<ThresholdRangePatch>,
    pub dissolved_oxygen: Option<ThresholdRangePatch>,
}

impl ThresholdRangePatch {
    fn validate(&self, name: &str) -> Result<(), CoreError> {
        for (bound, value) in [("min", self.min), ("max", self.max)] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(CoreError::Validation(format!(
                        "thresholds.{name}.{bound} must be a finite number"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "thresholds.{name}.min ({min}) must not exceed max ({max})"
                )));
            }
        }
        Ok(())
    }
}

impl ThresholdsPatch {
    /// Check the values supplied in this patch.
    ///
    /// Only fields present in the patch are inspected; `min <= max` across
    /// a patched and a stored value is enforced by the database on write.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(range) = &self.water_level {
            range.validate("water_level")?;
        }
        if let Some(range) = &self.dissolved_oxygen {
            range.validate("dissolved_oxygen")?;
        }
        if let Some(range) = &self.ph {
            range.validate("ph")?;
            for (bound, value) in [("min", range.min), ("max", range.max)] {
                if let Some(v) = value {
                    if !PH_SCALE.contains(&v) {
                        return Err(CoreError::Validation(format!(
                            "thresholds.ph.{bound} must be between 0 and 14, got {v}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let t = Thresholds::default();
        assert_eq!(t.water_level, ThresholdRange::new(2.0, 5.0));
        assert_eq!(t.ph, ThresholdRange::new(6.5, 8.5));
        assert_eq!(t.dissolved_oxygen, ThresholdRange::new(5.0, 12.0));

        let n = NotificationTypes::default();
        assert!(n.water_level && n.ph && n.dissolved_oxygen && n.temperature && n.pollution);
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(ThresholdsPatch::default().validate().is_ok());
    }

    #[test]
    fn inverted_range_in_same_patch_is_rejected() {
        let patch = ThresholdsPatch {
            water_level: Some(ThresholdRangePatch {
                min: Some(6.0),
                max: Some(3.0),
            }),
            ..Default::default()
        };
        assert_matches!(patch.validate(), Err(CoreError::Validation(msg)) if msg.contains("water_level"));
    }

    #[test]
    fn ph_outside_scale_is_rejected() {
        let patch = ThresholdsPatch {
            ph: Some(ThresholdRangePatch {
                min: None,
                max: Some(15.0),
            }),
            ..Default::default()
        };
        assert_matches!(patch.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let patch = ThresholdsPatch {
            dissolved_oxygen: Some(ThresholdRangePatch {
                min: Some(f64::NAN),
                max: None,
            }),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: ThresholdsPatch =
            serde_json::from_str(r#"{"ph":{"min":6.0}}"#).expect("valid patch");
        let ph = patch.ph.expect("ph present");
        assert_eq!(ph.min, Some(6.0));
        assert_eq!(ph.max, None);
        assert!(patch.water_level.is_none());
    }
}
