//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` struct matching the database row
//! - A `Serialize` shape for API output where it differs from the row
//! - `Deserialize` create/update DTOs (update DTOs have all-`Option` fields)

pub mod notification_history;
pub mod notification_preferences;
pub mod survey;
pub mod user;
