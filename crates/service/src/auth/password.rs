//! Password strength policy: minimum length plus the standard heuristics
//! (not entirely numeric, not a known common password, not too similar to
//! the user's own attributes).

const MIN_LENGTH: usize = 8;

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "11111111",
    "abc12345",
    "iloveyou",
    "letmein1",
    "admin123",
    "welcome1",
    "sunshine",
    "football",
    "1q2w3e4r",
];

/// Run every check and return all failures.
/// `user_inputs` carries the user's own attributes (email, name) for the
/// similarity check.
pub fn validate(password: &str, user_inputs: &[&str]) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_LENGTH {
        errors.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_LENGTH
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("This password is entirely numeric.".to_string());
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        errors.push("This password is too common.".to_string());
    }

    if is_similar_to_inputs(&lowered, user_inputs) {
        errors.push("The password is too similar to your other personal information.".to_string());
    }

    errors
}

fn is_similar_to_inputs(lowered_password: &str, user_inputs: &[&str]) -> bool {
    for input in user_inputs {
        for part in input.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
            if part.len() >= 4 && lowered_password.contains(part) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_reasonable_password() {
        assert!(validate("Str0ng-Entropy!", &["jane@example.com", "Jane"]).is_empty());
    }

    #[test]
    fn short_and_numeric_both_reported() {
        let errors = validate("1234", &[]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejects_common_passwords() {
        let errors = validate("Password123", &[]);
        assert!(errors.iter().any(|e| e.contains("too common")));
    }

    #[test]
    fn rejects_password_matching_email() {
        let errors = validate("jane.doe42", &["jane.doe@example.com", "Jane Doe"]);
        assert!(errors.iter().any(|e| e.contains("too similar")));
    }
}
