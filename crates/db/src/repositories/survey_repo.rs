//! Repository for the `surveys` table.

use aquasurveyor_core::geo::EARTH_RADIUS_METERS;
use aquasurveyor_core::types::DbId;
use sqlx::PgPool;

use crate::models::survey::{CreateSurvey, Survey, SurveyRow, UpdateSurvey};

/// Column list shared across single-table queries.
const COLUMNS: &str = "id, longitude, latitude, water_level, ph, temperature, \
    dissolved_oxygen, conductivity, turbidity, notes, created_by, created_at, updated_at";

/// Column list for queries joining `surveys s` with `users u`.
const JOINED_COLUMNS: &str = "s.id, s.longitude, s.latitude, s.water_level, s.ph, \
    s.temperature, s.dissolved_oxygen, s.conductivity, s.turbidity, s.notes, s.created_by, \
    s.created_at, s.updated_at, u.name AS creator_name, u.email AS creator_email";

/// Provides CRUD and proximity queries for surveys.
pub struct SurveyRepo;

impl SurveyRepo {
    /// Insert a new survey owned by `created_by`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateSurvey,
    ) -> Result<Survey, sqlx::Error> {
        let query = format!(
            "INSERT INTO surveys (longitude, latitude, water_level, ph, temperature,
                dissolved_oxygen, conductivity, turbidity, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, BTRIM($9), $10)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(input.location.longitude())
            .bind(input.location.latitude())
            .bind(input.water_level)
            .bind(input.ph)
            .bind(input.temperature)
            .bind(input.dissolved_oxygen)
            .bind(input.conductivity)
            .bind(input.turbidity)
            .bind(&input.notes)
            .bind(created_by)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Find a survey by ID without creator details.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Survey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM surveys WHERE id = $1");
        let row = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Survey::from))
    }

    /// Find a survey by ID including the creator's name and email.
    pub async fn find_with_creator(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Survey>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM surveys s JOIN users u ON u.id = s.created_by
             WHERE s.id = $1"
        );
        let row = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Survey::from))
    }

    /// List all surveys with creators, most recently created first.
    pub async fn list_with_creators(pool: &PgPool) -> Result<Vec<Survey>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM surveys s JOIN users u ON u.id = s.created_by
             ORDER BY s.created_at DESC, s.id DESC"
        );
        let rows = sqlx::query_as::<_, SurveyRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Survey::from).collect())
    }

    /// List surveys within `radius_meters` of a point, nearest first.
    ///
    /// Distance is the haversine great-circle distance; the `LEAST` guards
    /// `ASIN` against rounding just above 1.
    pub async fn list_within_radius(
        pool: &PgPool,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Vec<Survey>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM (
                SELECT surveys.*,
                    2 * $4::float8 * ASIN(LEAST(1.0, SQRT(
                        POWER(SIN(RADIANS(latitude - $1::float8) / 2), 2)
                        + COS(RADIANS($1::float8)) * COS(RADIANS(latitude))
                          * POWER(SIN(RADIANS(longitude - $2::float8) / 2), 2)
                    ))) AS distance_m
                FROM surveys
             ) s
             JOIN users u ON u.id = s.created_by
             WHERE s.distance_m <= $3::float8
             ORDER BY s.distance_m ASC, s.id ASC"
        );
        let rows = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(latitude)
            .bind(longitude)
            .bind(radius_meters)
            .bind(EARTH_RADIUS_METERS)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Survey::from).collect())
    }

    /// Update a survey. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSurvey,
    ) -> Result<Option<Survey>, sqlx::Error> {
        let query = format!(
            "UPDATE surveys SET
                longitude = COALESCE($2, longitude),
                latitude = COALESCE($3, latitude),
                water_level = COALESCE($4, water_level),
                ph = COALESCE($5, ph),
                temperature = COALESCE($6, temperature),
                dissolved_oxygen = COALESCE($7, dissolved_oxygen),
                conductivity = COALESCE($8, conductivity),
                turbidity = COALESCE($9, turbidity),
                notes = COALESCE(BTRIM($10), notes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .bind(input.location.map(|p| p.longitude()))
            .bind(input.location.map(|p| p.latitude()))
            .bind(input.water_level)
            .bind(input.ph)
            .bind(input.temperature)
            .bind(input.dissolved_oxygen)
            .bind(input.conductivity)
            .bind(input.turbidity)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Survey::from))
    }

    /// Permanently delete a survey by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM surveys WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
