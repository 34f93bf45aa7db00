//! Survey entity model and DTOs.

use aquasurveyor_core::geo::GeoPoint;
use aquasurveyor_core::thresholds::SurveyReadings;
use aquasurveyor_core::types::{DbId, Timestamp};
use aquasurveyor_core::validation::validate_location;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Maximum length of the free-text notes field.
pub const MAX_NOTES_LEN: u64 = 2000;

/// A row from the `surveys` table, optionally joined with its creator.
///
/// The creator columns are only present in queries that join `users`.
#[derive(Debug, Clone, FromRow)]
pub struct SurveyRow {
    pub id: DbId,
    pub longitude: f64,
    pub latitude: f64,
    pub water_level: f64,
    pub ph: f64,
    pub temperature: f64,
    pub dissolved_oxygen: f64,
    pub conductivity: f64,
    pub turbidity: f64,
    pub notes: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(default)]
    pub creator_name: Option<String>,
    #[sqlx(default)]
    pub creator_email: Option<String>,
}

/// Public creator summary embedded in survey responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyCreator {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// API representation of a survey.
#[derive(Debug, Clone, Serialize)]
pub struct Survey {
    pub id: DbId,
    pub location: GeoPoint,
    pub water_level: f64,
    pub ph: f64,
    pub temperature: f64,
    pub dissolved_oxygen: f64,
    pub conductivity: f64,
    pub turbidity: f64,
    pub notes: Option<String>,
    pub created_by: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<SurveyCreator>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Survey {
    /// The scalar readings fed to the threshold evaluator.
    pub fn readings(&self) -> SurveyReadings {
        SurveyReadings {
            water_level: self.water_level,
            ph: self.ph,
            temperature: self.temperature,
            dissolved_oxygen: self.dissolved_oxygen,
            conductivity: self.conductivity,
            turbidity: self.turbidity,
        }
    }
}

impl From<SurveyRow> for Survey {
    fn from(row: SurveyRow) -> Self {
        let creator = match (row.creator_name, row.creator_email) {
            (Some(name), Some(email)) => Some(SurveyCreator {
                id: row.created_by,
                name,
                email,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            location: GeoPoint::new(row.longitude, row.latitude),
            water_level: row.water_level,
            ph: row.ph,
            temperature: row.temperature,
            dissolved_oxygen: row.dissolved_oxygen,
            conductivity: row.conductivity,
            turbidity: row.turbidity,
            notes: row.notes,
            created_by: row.created_by,
            creator,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for creating a survey. `created_by` comes from the caller's token.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSurvey {
    #[validate(custom(function = "validate_location"))]
    pub location: GeoPoint,
    pub water_level: f64,
    #[validate(range(min = 0.0, max = 14.0, message = "pH must be between 0 and 14"))]
    pub ph: f64,
    pub temperature: f64,
    pub dissolved_oxygen: f64,
    pub conductivity: f64,
    pub turbidity: f64,
    #[validate(length(max = MAX_NOTES_LEN, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// DTO for a partial survey update. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSurvey {
    #[validate(custom(function = "validate_location"))]
    pub location: Option<GeoPoint>,
    pub water_level: Option<f64>,
    #[validate(range(min = 0.0, max = 14.0, message = "pH must be between 0 and 14"))]
    pub ph: Option<f64>,
    pub temperature: Option<f64>,
    pub dissolved_oxygen: Option<f64>,
    pub conductivity: Option<f64>,
    pub turbidity: Option<f64>,
    #[validate(length(max = MAX_NOTES_LEN, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}
