//! Validation utilities for clinic forms
//!
//! Pure validators shared by the auth forms and the consultation wizard.
//! Each returns `Result<_, String>` where the error is user-facing copy, and
//! [`FieldErrors`] collects them per field so views can render inline
//! messages without knowing the rules.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Field-scoped validation messages keyed by the field's wire name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field, replacing any previous one
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Record the outcome of a validator for a field
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => {
                self.errors.remove(field);
                Some(value)
            }
            Err(message) => {
                self.errors.insert(field, message);
                None
            }
        }
    }

    pub fn remove(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Drop every error whose field is in `fields`
    pub fn clear_fields(&mut self, fields: &[&str]) {
        self.errors.retain(|field, _| !fields.contains(field));
    }

    /// Merge `other` into `self`, `other` wins on conflicts
    pub fn extend(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when empty, otherwise the errors themselves
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Validate a required free-text field
pub fn validate_required(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Validate a minimum character count (trimmed)
pub fn validate_min_len(value: &str, min: usize, message: &str) -> Result<(), String> {
    if value.trim().chars().count() >= min {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email_regex().is_match(email.trim()) {
        Ok(())
    } else {
        Err("Please enter a valid email address".to_string())
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() >= 8 {
        Ok(())
    } else {
        Err("Password must be at least 8 characters".to_string())
    }
}

/// Validate that the confirmation matches the password
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if password == confirmation {
        Ok(())
    } else {
        Err("Passwords do not match".to_string())
    }
}

/// Validate a phone number (digits and separators, at least 10 characters)
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.trim().chars().count() >= 10 {
        Ok(())
    } else {
        Err("Phone number must be at least 10 digits".to_string())
    }
}

/// Coerce a text field into an integer within `min..=max`
///
/// Blank input is an error rather than a silent default.
pub fn validate_integer_in_range(
    value: &str,
    min: i64,
    max: i64,
    below_min: &str,
    above_max: &str,
) -> Result<i64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(below_min.to_string());
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n < min => Err(below_min.to_string()),
        Ok(n) if n > max => Err(above_max.to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err("Please enter a whole number".to_string()),
    }
}
