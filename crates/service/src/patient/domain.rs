use chrono::NaiveDate;
use serde::Deserialize;

use crate::validation::{self, FieldErrors};

/// Wire-level patient payload; everything optional so the same shape
/// serves create, full update and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientFilters {
    pub search: Option<String>,
    pub gender: Option<String>,
}

/// Fully validated patient payload, ready to persist.
#[derive(Debug, Clone)]
pub struct ValidPatient {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

const REQUIRED: &str = "This field is required.";

/// Validate a complete payload (create and PUT). All failures are collected.
pub fn validate_full(input: &PatientInput) -> Result<ValidPatient, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = required_name(&input.first_name, "First name", "first_name", &mut errors);
    let last_name = required_name(&input.last_name, "Last name", "last_name", &mut errors);

    let date_of_birth = match input.date_of_birth {
        Some(dob) => {
            if let Err(msg) = validation::check_not_future(dob) {
                errors.add("date_of_birth", msg);
            }
            Some(dob)
        }
        None => {
            errors.add("date_of_birth", REQUIRED);
            None
        }
    };

    let gender = match &input.gender {
        Some(code) => {
            if let Err(msg) = validation::check_choice(code, models::patient::is_valid_gender) {
                errors.add("gender", msg);
            }
            Some(code.clone())
        }
        None => {
            errors.add("gender", REQUIRED);
            None
        }
    };

    let email = optional_email(&input.email, &mut errors);
    let phone = optional_phone(&input.phone, &mut errors);

    let blood_group = validation::clean_optional(&input.blood_group);
    if let Some(code) = &blood_group {
        if let Err(msg) = validation::check_choice(code, models::patient::is_valid_blood_group) {
            errors.add("blood_group", msg);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidPatient {
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        email,
        phone,
        date_of_birth: date_of_birth.unwrap_or_default(),
        gender: gender.unwrap_or_default(),
        blood_group,
        allergies: validation::clean_optional(&input.allergies),
        medical_history: validation::clean_optional(&input.medical_history),
        current_medications: validation::clean_optional(&input.current_medications),
        emergency_contact_name: validation::clean_optional(&input.emergency_contact_name),
        emergency_contact_phone: validation::clean_optional(&input.emergency_contact_phone),
        address: validation::clean_optional(&input.address),
        city: validation::clean_optional(&input.city),
        state: validation::clean_optional(&input.state),
        country: validation::clean_optional(&input.country),
        postal_code: validation::clean_optional(&input.postal_code),
    })
}

/// Validate only the supplied fields (PATCH) and return a normalized copy.
pub fn validate_partial(input: &PatientInput) -> Result<PatientInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut normalized = input.clone();

    if let Some(value) = &input.first_name {
        match validation::require_trimmed(value, "First name") {
            Ok(v) => normalized.first_name = Some(v),
            Err(msg) => errors.add("first_name", msg),
        }
    }
    if let Some(value) = &input.last_name {
        match validation::require_trimmed(value, "Last name") {
            Ok(v) => normalized.last_name = Some(v),
            Err(msg) => errors.add("last_name", msg),
        }
    }
    if let Some(dob) = input.date_of_birth {
        if let Err(msg) = validation::check_not_future(dob) {
            errors.add("date_of_birth", msg);
        }
    }
    if let Some(code) = &input.gender {
        if let Err(msg) = validation::check_choice(code, models::patient::is_valid_gender) {
            errors.add("gender", msg);
        }
    }
    normalized.email = optional_email(&input.email, &mut errors);
    normalized.phone = optional_phone(&input.phone, &mut errors);
    normalized.blood_group = validation::clean_optional(&input.blood_group);
    if let Some(code) = &normalized.blood_group {
        if let Err(msg) = validation::check_choice(code, models::patient::is_valid_blood_group) {
            errors.add("blood_group", msg);
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

fn required_name(
    value: &Option<String>,
    label: &str,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match value {
        Some(v) => match validation::require_trimmed(v, label) {
            Ok(trimmed) => Some(trimmed),
            Err(msg) => {
                errors.add(field, msg);
                None
            }
        },
        None => {
            errors.add(field, REQUIRED);
            None
        }
    }
}

fn optional_email(value: &Option<String>, errors: &mut FieldErrors) -> Option<String> {
    match validation::clean_optional(value) {
        Some(raw) => match validation::normalize_email(&raw) {
            Ok(email) => Some(email),
            Err(msg) => {
                errors.add("email", msg);
                None
            }
        },
        None => None,
    }
}

fn optional_phone(value: &Option<String>, errors: &mut FieldErrors) -> Option<String> {
    match validation::clean_optional(value) {
        Some(raw) => {
            if let Err(msg) = validation::check_phone(&raw) {
                errors.add("phone", msg);
            }
            Some(raw)
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn minimal() -> PatientInput {
        PatientInput {
            first_name: Some("Jane".into()),
            last_name: Some("Doe".into()),
            date_of_birth: Some(NaiveDate::from_ymd_opt(1990, 1, 15).unwrap()),
            gender: Some("F".into()),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_payload_validates() {
        let valid = validate_full(&minimal()).unwrap();
        assert_eq!(valid.first_name, "Jane");
        assert_eq!(valid.gender, "F");
    }

    #[test]
    fn full_mode_reports_every_missing_field() {
        let err = validate_full(&PatientInput::default()).unwrap_err();
        for field in ["first_name", "last_name", "date_of_birth", "gender"] {
            assert!(err.get(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn bad_phone_and_future_dob_collected_together() {
        let mut input = minimal();
        input.phone = Some("12345".into());
        input.date_of_birth = Some(Utc::now().date_naive() + Duration::days(1));
        let err = validate_full(&input).unwrap_err();
        assert!(err.get("phone").is_some());
        assert!(err.get("date_of_birth").is_some());
    }

    #[test]
    fn dob_today_is_accepted() {
        let mut input = minimal();
        input.date_of_birth = Some(Utc::now().date_naive());
        assert!(validate_full(&input).is_ok());
    }

    #[test]
    fn email_is_lowercased_on_the_way_in() {
        let mut input = minimal();
        input.email = Some("Jane@Example.COM".into());
        let valid = validate_full(&input).unwrap();
        assert_eq!(valid.email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn partial_mode_skips_absent_fields() {
        let input = PatientInput { phone: Some("123-456-7890".into()), ..Default::default() };
        assert!(validate_partial(&input).is_ok());

        let input = PatientInput { gender: Some("X".into()), ..Default::default() };
        let err = validate_partial(&input).unwrap_err();
        assert!(err.get("gender").is_some());
    }

    #[test]
    fn blank_names_rejected_in_both_modes() {
        let mut input = minimal();
        input.first_name = Some("   ".into());
        assert!(validate_full(&input).unwrap_err().get("first_name").is_some());

        let patch = PatientInput { last_name: Some("".into()), ..Default::default() };
        assert!(validate_partial(&patch).unwrap_err().get("last_name").is_some());
    }
}
