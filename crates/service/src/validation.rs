//! Field validation pipeline: each field maps to a pure check, all checks
//! run, and every failure is collected so callers see the full error set
//! rather than the first violation.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Key used for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Ordered multimap of field name to error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    pub fn extend_field(&mut self, field: &str, messages: Vec<String>) {
        if messages.is_empty() {
            return;
        }
        self.0.entry(field.to_string()).or_default().extend(messages);
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }
}

/// Trim a required text field; blank input is an error.
pub fn require_trimmed(value: &str, label: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be blank.", label));
    }
    Ok(trimmed.to_string())
}

/// Lowercase and shape-check an email address.
pub fn normalize_email(value: &str) -> Result<String, String> {
    let email = value.trim().to_lowercase();
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err("Enter a valid email address.".to_string());
    }
    Ok(email)
}

/// Phone numbers: 7-15 digits once common formatting characters are stripped.
pub fn check_phone(value: &str) -> Result<(), String> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number must contain only digits and common formatting characters.".to_string());
    }
    if cleaned.len() < 7 || cleaned.len() > 15 {
        return Err("Phone number must be between 7 and 15 digits.".to_string());
    }
    Ok(())
}

pub fn check_not_future(value: NaiveDate) -> Result<(), String> {
    if value > Utc::now().date_naive() {
        return Err("Date of birth cannot be in the future.".to_string());
    }
    Ok(())
}

pub fn check_choice(value: &str, is_valid: impl Fn(&str) -> bool) -> Result<(), String> {
    if !is_valid(value) {
        return Err(format!("\"{}\" is not a valid choice.", value));
    }
    Ok(())
}

pub fn check_years_of_experience(value: i32) -> Result<(), String> {
    if value < 0 {
        return Err("Years of experience cannot be negative.".to_string());
    }
    if value > 70 {
        return Err("Years of experience seems invalid (max 70).".to_string());
    }
    Ok(())
}

pub fn check_consultation_fee(value: Decimal) -> Result<(), String> {
    if value < Decimal::ZERO {
        return Err("Consultation fee cannot be negative.".to_string());
    }
    Ok(())
}

/// Trim an optional text field, treating whitespace-only input as absent.
pub fn clean_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn collects_multiple_errors_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("password", "too short");
        errors.add("password", "too common");
        errors.add("email", "taken");
        assert_eq!(errors.get("password").map(Vec::len), Some(2));
        assert_eq!(errors.get("email").map(Vec::len), Some(1));
        assert!(!errors.is_empty());
    }

    #[test]
    fn merge_keeps_both_sides() {
        let mut a = FieldErrors::new();
        a.add("email", "invalid");
        let mut b = FieldErrors::new();
        b.add("email", "taken");
        b.add("license_number", "taken");
        a.merge(b);
        assert_eq!(a.get("email").map(Vec::len), Some(2));
        assert!(a.get("license_number").is_some());
    }

    #[test]
    fn phone_accepts_formatted_numbers() {
        assert!(check_phone("123-456-7890").is_ok());
        assert!(check_phone("+1 (212) 555 0100").is_ok());
    }

    #[test]
    fn phone_rejects_short_and_non_digit() {
        assert_eq!(
            check_phone("12345").unwrap_err(),
            "Phone number must be between 7 and 15 digits."
        );
        assert_eq!(
            check_phone("abc1234567").unwrap_err(),
            "Phone number must contain only digits and common formatting characters."
        );
    }

    #[test]
    fn dob_today_ok_tomorrow_rejected() {
        let today = Utc::now().date_naive();
        assert!(check_not_future(today).is_ok());
        assert!(check_not_future(today + Duration::days(1)).is_err());
    }

    #[test]
    fn email_is_lowercased() {
        assert_eq!(normalize_email("Jane.Doe@Example.COM").unwrap(), "jane.doe@example.com");
        assert!(normalize_email("not-an-email").is_err());
    }

    #[test]
    fn experience_bounds() {
        assert!(check_years_of_experience(0).is_ok());
        assert!(check_years_of_experience(70).is_ok());
        assert!(check_years_of_experience(-1).is_err());
        assert!(check_years_of_experience(71).is_err());
    }

    #[test]
    fn fee_must_be_non_negative() {
        assert!(check_consultation_fee(Decimal::ZERO).is_ok());
        assert!(check_consultation_fee(Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn clean_optional_drops_blank() {
        assert_eq!(clean_optional(&Some("  ".into())), None);
        assert_eq!(clean_optional(&Some(" x ".into())), Some("x".into()));
        assert_eq!(clean_optional(&None), None);
    }
}
