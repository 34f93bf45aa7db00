//! Monitored water-quality parameter kinds and threshold bounds.
//!
//! The string forms are what gets stored in `notification_history` metadata
//! columns and sent over the wire.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A parameter a user can toggle alerting for.
///
/// Only the first three carry a `{min,max}` threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    WaterLevel,
    Ph,
    DissolvedOxygen,
    Temperature,
    Pollution,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::WaterLevel => "water_level",
            ParameterKind::Ph => "ph",
            ParameterKind::DissolvedOxygen => "dissolved_oxygen",
            ParameterKind::Temperature => "temperature",
            ParameterKind::Pollution => "pollution",
        }
    }

    /// Human-readable label used in alert messages.
    pub fn label(&self) -> &'static str {
        match self {
            ParameterKind::WaterLevel => "water level",
            ParameterKind::Ph => "pH",
            ParameterKind::DissolvedOxygen => "dissolved oxygen",
            ParameterKind::Temperature => "temperature",
            ParameterKind::Pollution => "pollution",
        }
    }
}

impl FromStr for ParameterKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "water_level" => Ok(ParameterKind::WaterLevel),
            "ph" => Ok(ParameterKind::Ph),
            "dissolved_oxygen" => Ok(ParameterKind::DissolvedOxygen),
            "temperature" => Ok(ParameterKind::Temperature),
            "pollution" => Ok(ParameterKind::Pollution),
            other => Err(CoreError::Validation(format!(
                "unknown parameter kind '{other}'"
            ))),
        }
    }
}

/// Which side of a threshold range was breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

impl Bound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bound::Min => "min",
            Bound::Max => "max",
        }
    }
}

impl FromStr for Bound {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(Bound::Min),
            "max" => Ok(Bound::Max),
            other => Err(CoreError::Validation(format!("unknown bound '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_matches_serde_name() {
        for kind in [
            ParameterKind::WaterLevel,
            ParameterKind::Ph,
            ParameterKind::DissolvedOxygen,
            ParameterKind::Temperature,
            ParameterKind::Pollution,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
            assert_eq!(kind.as_str().parse::<ParameterKind>().unwrap(), kind);
        }
    }

    #[test]
    fn bound_parses() {
        assert_eq!("min".parse::<Bound>().unwrap(), Bound::Min);
        assert_eq!("max".parse::<Bound>().unwrap(), Bound::Max);
        assert!("mid".parse::<Bound>().is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("salinity".parse::<ParameterKind>().is_err());
    }
}
