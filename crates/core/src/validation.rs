//! Custom field validators plugged into `#[validate(custom(...))]`.

use validator::ValidationError;

use crate::geo::{validate_coordinates, GeoPoint};

/// Minimum number of digits in a phone number.
const PHONE_MIN_DIGITS: usize = 7;
/// Maximum number of digits in a phone number (E.164 limit).
const PHONE_MAX_DIGITS: usize = 15;

/// Accept an optional leading `+` followed by 7 to 15 digits.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let ok = (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("phone_number").with_message("Invalid phone number".into()))
    }
}

/// Require a password with at least one letter and one digit.
///
/// Length is checked separately with `#[validate(length(min = ...))]`.
pub fn validate_password_composition(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("password")
            .with_message("Password must contain at least one number".into()));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new("password")
            .with_message("Password must contain at least one letter".into()));
    }
    Ok(())
}

/// Validate a survey location's coordinate ranges.
pub fn validate_location(point: &GeoPoint) -> Result<(), ValidationError> {
    validate_coordinates(point.latitude(), point.longitude()).map_err(|e| {
        ValidationError::new("location").with_message(e.to_string().into())
    })
}
