//! Client-side validation of login and registration forms.
//!
//! Runs before any network call. Failures are reported per field and never
//! reach a slice's fetch state machine.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Username
    Username,
    /// Email address
    Email,
    /// Password
    Password,
    /// Password confirmation
    ConfirmPassword,
}

/// A field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field
    pub field: Field,
    /// Message shown next to the field
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Registration form as entered by the user.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    /// Desired username
    pub username: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Password repeated
    pub confirm_password: String,
    /// Optional first name
    pub first_name: Option<String>,
    /// Optional last name
    pub last_name: Option<String>,
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// Validate an email address.
///
/// # Errors
///
/// Returns a message if the address is empty or malformed.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if !email_regex().is_match(email.trim()) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate a registration password: at least 6 characters with an
/// uppercase letter, a lowercase letter and a digit.
///
/// # Errors
///
/// Returns a message describing the first rule that is not met.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    if !password.chars().any(char::is_uppercase) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(char::is_lowercase) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number".to_string());
    }
    Ok(())
}

/// Validate a registration username: 3 to 20 characters.
///
/// # Errors
///
/// Returns a message if the username is empty or out of range.
pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.trim().chars().count();
    if len == 0 {
        return Err("Username is required".to_string());
    }
    if len < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if len > 20 {
        return Err("Username must be less than 20 characters".to_string());
    }
    Ok(())
}

/// Validate a login attempt: username of at least 3 characters, password of
/// at least 6. Registration password rules do not apply here.
#[must_use]
pub fn validate_login(username: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let username_len = username.trim().chars().count();
    if username_len == 0 {
        errors.push(FieldError::new(Field::Username, "Username is required"));
    } else if username_len < 3 {
        errors.push(FieldError::new(Field::Username, "Username must be at least 3 characters"));
    }

    if password.is_empty() {
        errors.push(FieldError::new(Field::Password, "Password is required"));
    } else if password.chars().count() < 6 {
        errors.push(FieldError::new(Field::Password, "Password must be at least 6 characters"));
    }

    errors
}

/// Validate a registration form.
#[must_use]
pub fn validate_registration(form: &RegisterForm) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Err(message) = validate_username(&form.username) {
        errors.push(FieldError { field: Field::Username, message });
    }
    if let Err(message) = validate_email(&form.email) {
        errors.push(FieldError { field: Field::Email, message });
    }
    if let Err(message) = validate_password(&form.password) {
        errors.push(FieldError { field: Field::Password, message });
    }
    if form.confirm_password.is_empty() {
        errors.push(FieldError::new(Field::ConfirmPassword, "Please confirm your password"));
    } else if form.confirm_password != form.password {
        errors.push(FieldError::new(Field::ConfirmPassword, "Passwords do not match"));
    }

    errors
}
