use rust_decimal::Decimal;
use serde::Deserialize;

use crate::validation::{self, FieldErrors};

/// Wire-level doctor payload; serves create, full update and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub years_of_experience: Option<i32>,
    pub qualification: Option<String>,
    pub bio: Option<String>,
    pub consultation_fee: Option<Decimal>,
    pub is_available: Option<bool>,
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorFilters {
    pub specialization: Option<String>,
    pub is_available: Option<String>,
    pub search: Option<String>,
    pub city: Option<String>,
}

/// Fully validated doctor payload, ready to persist. Uniqueness checks run
/// separately in the service, against the store.
#[derive(Debug, Clone)]
pub struct ValidDoctor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: String,
    pub license_number: String,
    pub years_of_experience: i32,
    pub qualification: Option<String>,
    pub bio: Option<String>,
    pub consultation_fee: Option<Decimal>,
    pub is_available: bool,
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// A doctor row with its creator's display name resolved.
#[derive(Debug, Clone)]
pub struct DoctorRecord {
    pub doctor: models::doctor::Model,
    pub created_by_name: Option<String>,
}

const REQUIRED: &str = "This field is required.";

pub fn validate_full(input: &DoctorInput) -> Result<ValidDoctor, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = required_trimmed(&input.first_name, "First name", "first_name", &mut errors);
    let last_name = required_trimmed(&input.last_name, "Last name", "last_name", &mut errors);

    let email = match &input.email {
        Some(raw) => match validation::normalize_email(raw) {
            Ok(email) => Some(email),
            Err(msg) => {
                errors.add("email", msg);
                None
            }
        },
        None => {
            errors.add("email", REQUIRED);
            None
        }
    };

    let specialization = match &input.specialization {
        Some(code) => {
            if let Err(msg) = validation::check_choice(code, models::doctor::is_valid_specialization) {
                errors.add("specialization", msg);
            }
            Some(code.clone())
        }
        None => {
            errors.add("specialization", REQUIRED);
            None
        }
    };

    let license_number = required_trimmed(&input.license_number, "License number", "license_number", &mut errors);

    let years_of_experience = input.years_of_experience.unwrap_or(0);
    if let Err(msg) = validation::check_years_of_experience(years_of_experience) {
        errors.add("years_of_experience", msg);
    }

    if let Some(fee) = input.consultation_fee {
        if let Err(msg) = validation::check_consultation_fee(fee) {
            errors.add("consultation_fee", msg);
        }
    }

    let phone = match validation::clean_optional(&input.phone) {
        Some(raw) => {
            if let Err(msg) = validation::check_phone(&raw) {
                errors.add("phone", msg);
            }
            Some(raw)
        }
        None => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidDoctor {
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        phone,
        specialization: specialization.unwrap_or_default(),
        license_number: license_number.unwrap_or_default(),
        years_of_experience,
        qualification: validation::clean_optional(&input.qualification),
        bio: validation::clean_optional(&input.bio),
        consultation_fee: input.consultation_fee,
        is_available: input.is_available.unwrap_or(true),
        hospital_name: validation::clean_optional(&input.hospital_name),
        address: validation::clean_optional(&input.address),
        city: validation::clean_optional(&input.city),
        state: validation::clean_optional(&input.state),
        country: validation::clean_optional(&input.country),
    })
}

/// Validate only the supplied fields (PATCH) and return a normalized copy.
pub fn validate_partial(input: &DoctorInput) -> Result<DoctorInput, FieldErrors> {
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
    if let Some(raw) = &input.email {
        match validation::normalize_email(raw) {
            Ok(email) => normalized.email = Some(email),
            Err(msg) => errors.add("email", msg),
        }
    }
    if let Some(code) = &input.specialization {
        if let Err(msg) = validation::check_choice(code, models::doctor::is_valid_specialization) {
            errors.add("specialization", msg);
        }
    }
    if let Some(value) = &input.license_number {
        match validation::require_trimmed(value, "License number") {
            Ok(v) => normalized.license_number = Some(v),
            Err(msg) => errors.add("license_number", msg),
        }
    }
    if let Some(years) = input.years_of_experience {
        if let Err(msg) = validation::check_years_of_experience(years) {
            errors.add("years_of_experience", msg);
        }
    }
    if let Some(fee) = input.consultation_fee {
        if let Err(msg) = validation::check_consultation_fee(fee) {
            errors.add("consultation_fee", msg);
        }
    }
    normalized.phone = validation::clean_optional(&input.phone);
    if let Some(raw) = &normalized.phone {
        if let Err(msg) = validation::check_phone(raw) {
            errors.add("phone", msg);
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

fn required_trimmed(
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

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> DoctorInput {
        DoctorInput {
            first_name: Some("Gregory".into()),
            last_name: Some("House".into()),
            email: Some("g.house@pph.example".into()),
            specialization: Some("nephrology".into()),
            license_number: Some("NJ-12345".into()),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_payload_validates_with_defaults() {
        let valid = validate_full(&minimal()).unwrap();
        assert_eq!(valid.years_of_experience, 0);
        assert!(valid.is_available);
    }

    #[test]
    fn unknown_specialization_rejected() {
        let mut input = minimal();
        input.specialization = Some("alchemy".into());
        let err = validate_full(&input).unwrap_err();
        assert!(err.get("specialization").is_some());
    }

    #[test]
    fn experience_over_70_rejected() {
        let mut input = minimal();
        input.years_of_experience = Some(80);
        let err = validate_full(&input).unwrap_err();
        assert_eq!(
            err.get("years_of_experience").unwrap()[0],
            "Years of experience seems invalid (max 70)."
        );
    }

    #[test]
    fn negative_fee_rejected() {
        let mut input = minimal();
        input.consultation_fee = Some(Decimal::new(-5000, 2));
        assert!(validate_full(&input).unwrap_err().get("consultation_fee").is_some());
    }

    #[test]
    fn partial_update_of_single_field_validates() {
        let patch = DoctorInput { city: Some("Princeton".into()), ..Default::default() };
        assert!(validate_partial(&patch).is_ok());
    }
}
