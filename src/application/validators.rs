use validator::ValidateLength;

use crate::app_error::{AppError, AppResult};

pub const MAX_KEY_LEN: u64 = 255;

/// Validates a key component (user id or service name).
/// Rules:
/// - Not blank
/// - At most 255 characters
/// - No leading or trailing whitespace (keys are matched exactly)
pub fn validate_key_part(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    if !value.validate_length(None, Some(MAX_KEY_LEN), None) {
        return Err(AppError::InvalidInput(format!(
            "{field} must be at most {MAX_KEY_LEN} characters"
        )));
    }
    if value.trim() != value {
        return Err(AppError::InvalidInput(format!(
            "{field} must not have surrounding whitespace"
        )));
    }
    Ok(())
}

pub fn validate_price(price: i32) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::InvalidInput("price must not be negative".into()));
    }
    Ok(())
}
