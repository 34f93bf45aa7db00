//! Domain core for the AquaSurveyor backend.
//!
//! Pure types and logic with no I/O: error taxonomy, geo points, alert
//! settings, and the threshold evaluator.

pub mod channels;
pub mod error;
pub mod geo;
pub mod parameters;
pub mod preferences;
pub mod thresholds;
pub mod types;
pub mod validation;
