//! Primitive aliases shared by every crate in the workspace.

/// Primary keys are PostgreSQL `BIGSERIAL`.
pub type DbId = i64;

/// UTC timestamp used for `created_at` / `updated_at` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
