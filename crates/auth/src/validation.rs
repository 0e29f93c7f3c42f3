//! Signup field validation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Youngest age allowed to register.
pub const MIN_AGE: u32 = 18;

/// Oldest age allowed to register.
pub const MAX_AGE: u32 = 65;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*@gmail\.com$").expect("regex pattern is valid"));

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("regex pattern is valid"));

/// Field name → message for every rejected signup field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, replacing any earlier one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether no field was rejected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Accepts lowercase `@gmail.com` addresses whose local part starts with a
/// letter and continues with letters or digits.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks password strength, returning the first rule that fails.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number");
    }
    Ok(())
}

/// Names are letters and spaces, not blank.
pub fn validate_name(name: &str) -> bool {
    NAME_RE.is_match(name.trim())
}

/// Whether `age` is within the registration range.
pub fn validate_age(age: u32) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&age)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("priya99@gmail.com"));
        assert!(!validate_email("9priya@gmail.com"));
        assert!(!validate_email("priya.s@gmail.com"));
        assert!(!validate_email("priya@yahoo.com"));
        assert!(!validate_email("Priya@gmail.com"));
    }

    #[test]
    fn test_validate_password() {
        assert_eq!(validate_password("Secret123"), Ok(()));
        assert_eq!(
            validate_password("Sh0rt"),
            Err("Password must be at least 8 characters long")
        );
        assert_eq!(
            validate_password("ALLUPPER123"),
            Err("Password must contain at least one lowercase letter")
        );
        assert_eq!(
            validate_password("alllower123"),
            Err("Password must contain at least one uppercase letter")
        );
        assert_eq!(
            validate_password("NoDigitsHere"),
            Err("Password must contain at least one number")
        );
    }

    #[test]
    fn test_validate_name_and_age() {
        assert!(validate_name(" Asha Rao "));
        assert!(!validate_name("   "));
        assert!(!validate_name("R2D2"));
        assert!(validate_age(18));
        assert!(validate_age(65));
        assert!(!validate_age(17));
        assert!(!validate_age(66));
    }

    #[test]
    fn test_errors_display() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());
        errors.add("name", "Name is required");
        errors.add("age", "Too young");
        errors.add("age", "Age must be between 18 and 65 years");

        assert_eq!(errors.get("age"), Some("Age must be between 18 and 65 years"));
        assert_eq!(
            errors.to_string(),
            "age: Age must be between 18 and 65 years; name: Name is required"
        );
    }
}
