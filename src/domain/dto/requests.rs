//! Inbound request payloads, validated with `validator` before any
//! business logic runs.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::user::SUPPORTED_CURRENCIES;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(min = 1, max = 50, message = "Display name must be 1-50 characters"))]
    pub display_name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "Display name must be 1-50 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 20, message = "Phone number must be at most 20 characters"))]
    pub phone_number: Option<String>,

    #[validate(custom(function = "validate_iso_date"))]
    pub date_of_birth: Option<String>,

    #[validate(custom(function = "validate_currency"))]
    pub currency_preference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::new("invalid_username")
            .with_message("Username may only contain letters, digits and underscores".into()));
    }
    Ok(())
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_uppercase && has_lowercase && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("Password must contain upper case, lower case and a digit".into()));
    }

    Ok(())
}

fn validate_iso_date(date: &str) -> Result<(), ValidationError> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        ValidationError::new("invalid_date")
            .with_message("Date of birth must be an ISO date (YYYY-MM-DD)".into())
    })?;
    Ok(())
}

fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if !SUPPORTED_CURRENCIES.contains(&currency) {
        return Err(ValidationError::new("unsupported_currency")
            .with_message("Unsupported currency preference".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "alice@example.com".to_string(),
            username: "alice_01".to_string(),
            display_name: "Alice".to_string(),
            password: "Sup3rSecret".to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register_request().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let mut req = register_request();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_username() {
        let mut req = register_request();
        req.username = "ab".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_username_with_symbols() {
        let mut req = register_request();
        req.username = "alice!".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_weak_password() {
        let mut req = register_request();
        req.password = "alllowercase".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_profile_date_validation() {
        let req = UpdateProfileRequest {
            display_name: None,
            phone_number: None,
            date_of_birth: Some("1990-02-30".to_string()),
            currency_preference: None,
        };
        assert!(req.validate().is_err());

        let req = UpdateProfileRequest {
            date_of_birth: Some("1990-02-28".to_string()),
            ..req
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_profile_currency_validation() {
        let req = UpdateProfileRequest {
            display_name: None,
            phone_number: None,
            date_of_birth: None,
            currency_preference: Some("BTC".to_string()),
        };
        assert!(req.validate().is_err());

        let req = UpdateProfileRequest {
            currency_preference: Some("EUR".to_string()),
            ..req
        };
        assert!(req.validate().is_ok());
    }
}
