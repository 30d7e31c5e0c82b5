//! Credential validation
//!
//! Pure functions checking registration submissions against fixed rules.
//! The required-fields check runs first as a single batch failure; the
//! remaining per-field rules run only when all fields are present and
//! accumulate their errors in rule order.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    /// Brazilian mobile format: (XX) 9XXXX-XXXX
    static ref PHONE_REGEX: Regex = Regex::new(r"^\(\d{2}\) 9\d{4}-\d{4}$").unwrap();
}

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate a registration submission
///
/// Returns Ok on success or a non-empty ordered list of human-readable
/// violations.
pub fn validate_registration(
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<(), Vec<String>> {
    if name.trim().is_empty() || email.is_empty() || phone.is_empty() || password.is_empty() {
        return Err(vec![
            "Name, email, phone, and password are required".to_string(),
        ]);
    }

    let mut errors = Vec::new();

    if !is_valid_email(email) {
        errors.push("Invalid email format".to_string());
    }

    if !is_valid_phone(phone) {
        errors.push("Invalid phone format. Use (XX) 9XXXX-XXXX".to_string());
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push("Password must be at least 8 characters long".to_string());
    }

    if !has_required_complexity(password) {
        errors.push(
            "Password must contain at least one uppercase letter, one lowercase letter, \
             and one number"
                .to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check an email against the standard local@domain.tld shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check a phone number against the regional mobile pattern
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

fn has_required_complexity(password: &str) -> bool {
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    has_uppercase && has_lowercase && has_digit
}
