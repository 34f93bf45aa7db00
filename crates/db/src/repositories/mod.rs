//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod notification_history_repo;
pub mod notification_preferences_repo;
pub mod survey_repo;
pub mod user_repo;

pub use notification_history_repo::NotificationHistoryRepo;
pub use notification_preferences_repo::NotificationPreferencesRepo;
pub use survey_repo::SurveyRepo;
pub use user_repo::UserRepo;
