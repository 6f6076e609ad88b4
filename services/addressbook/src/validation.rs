//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::ContactFields;

/// Column width of every text field in the schema
pub const MAX_FIELD_LENGTH: usize = 255;

/// Upper bound on accepted passwords, keeps hashing cost bounded
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() > MAX_FIELD_LENGTH {
        return Err(format!(
            "Username must be at most {} characters long",
            MAX_FIELD_LENGTH
        ));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.chars().count() > MAX_FIELD_LENGTH {
        return Err(format!(
            "Email must be at most {} characters long",
            MAX_FIELD_LENGTH
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
///
/// No composition rules are enforced; the hash does the heavy lifting.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at most {} characters long",
            MAX_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Validate the owner-supplied contact fields
pub fn validate_contact(fields: &ContactFields) -> Result<(), String> {
    for (label, value) in [
        ("Name", &fields.name),
        ("Email", &fields.email),
        ("Phone", &fields.phone),
        ("Address", &fields.address),
    ] {
        if value.trim().is_empty() {
            return Err(format!("{} is required", label));
        }

        if value.chars().count() > MAX_FIELD_LENGTH {
            return Err(format!(
                "{} must be at most {} characters long",
                label, MAX_FIELD_LENGTH
            ));
        }
    }

    Ok(())
}
