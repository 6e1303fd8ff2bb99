//! Registration, login, profile-update and security-update forms. Field
//! rules run first and aggregate; cross-field rules (confirmation equality)
//! run only when the fields they depend on passed. Checks that need
//! request-time context (email uniqueness, current-password verification,
//! location resolution) live at the handler boundary.

use serde::Deserialize;

use super::{fields, FormErrors};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterSubmission {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    #[serde(default)]
    pub terms_accepted: bool,
}

#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_register(raw: &RegisterSubmission) -> Result<ValidRegistration, FormErrors> {
    let mut errors = FormErrors::new();

    let full_name = errors.collect(fields::required_text(
        "full_name",
        raw.full_name.as_deref(),
        100,
        "Full name is required.",
        "Full name length exceeded.",
    ));
    let email = errors.collect(fields::email("email", raw.email.as_deref()));

    let password = match fields::password("password", raw.password.as_deref()) {
        Ok(password) => Some(password),
        Err(failures) => {
            for failure in failures {
                errors.push(failure);
            }
            None
        }
    };

    let confirm_password = match raw.confirm_password.as_deref().filter(|v| !v.is_empty()) {
        Some(value) => Some(value.to_string()),
        None => {
            errors.add("confirm_password", "Confirm password is required.");
            None
        }
    };

    if let Err(e) = fields::accepted(
        "terms_accepted",
        raw.terms_accepted,
        "Please accept the Terms and Conditions.",
    ) {
        errors.push(e);
    }

    // Confirmation equality runs only when both password fields passed; the
    // mismatch attaches to the confirmation field.
    if let (Some(password), Some(confirm_password)) = (&password, &confirm_password) {
        if password != confirm_password {
            errors.add("confirm_password", "Passwords do not match.");
        }
    }

    match (full_name, email, password) {
        (Some(full_name), Some(email), Some(password)) if errors.is_empty() => Ok(ValidRegistration {
            full_name,
            email,
            password,
        }),
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginSubmission {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ValidLogin {
    pub email: String,
    pub password: String,
}

pub fn validate_login(raw: &LoginSubmission) -> Result<ValidLogin, FormErrors> {
    let mut errors = FormErrors::new();

    let email = errors.collect(fields::email("email", raw.email.as_deref()));
    let password = match raw.password.as_deref().filter(|v| !v.is_empty()) {
        Some(value) => Some(value.to_string()),
        None => {
            errors.add("password", "Password is required.");
            None
        }
    };

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(ValidLogin { email, password }),
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdateSubmission {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// `location` is still the raw query here; the handler resolves it to the
/// provider's canonical display name once the fields pass.
#[derive(Debug, Clone)]
pub struct ValidProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
}

pub fn validate_profile_update(
    raw: &ProfileUpdateSubmission,
) -> Result<ValidProfileUpdate, FormErrors> {
    let mut errors = FormErrors::new();

    let full_name = errors.collect(fields::required_text(
        "full_name",
        raw.full_name.as_deref(),
        100,
        "Full name is required.",
        "Full name length exceeded.",
    ));
    let email = errors.collect(fields::email("email", raw.email.as_deref()));
    let phone = errors.collect(fields::phone("phone", raw.phone.as_deref()));
    let location = errors.collect(fields::optional_text(
        "location",
        raw.location.as_deref(),
        255,
        "Location length exceeded.",
    ));

    match (full_name, email, phone, location) {
        (Some(full_name), Some(email), Some(phone), Some(location)) if errors.is_empty() => {
            Ok(ValidProfileUpdate {
                full_name,
                email,
                phone,
                location,
            })
        }
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityUpdateSubmission {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug)]
pub struct ValidSecurityUpdate {
    pub current_password: String,
    pub new_password: String,
}

pub fn validate_security_update(
    raw: &SecurityUpdateSubmission,
) -> Result<ValidSecurityUpdate, FormErrors> {
    let mut errors = FormErrors::new();

    let current_password = match raw.current_password.as_deref().filter(|v| !v.is_empty()) {
        Some(value) => Some(value.to_string()),
        None => {
            errors.add("current_password", "Current password is required.");
            None
        }
    };

    let new_password = match fields::password("new_password", raw.new_password.as_deref()) {
        Ok(password) => Some(password),
        Err(failures) => {
            for failure in failures {
                errors.push(failure);
            }
            None
        }
    };

    let confirm_password = match raw.confirm_password.as_deref().filter(|v| !v.is_empty()) {
        Some(value) => Some(value.to_string()),
        None => {
            errors.add("confirm_password", "Confirm password is required.");
            None
        }
    };

    if let (Some(new_password), Some(confirm_password)) = (&new_password, &confirm_password) {
        if new_password != confirm_password {
            errors.add("confirm_password", "Passwords do not match.");
        }
    }

    match (current_password, new_password) {
        (Some(current_password), Some(new_password)) if errors.is_empty() => {
            Ok(ValidSecurityUpdate {
                current_password,
                new_password,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_of(errors: &FormErrors) -> Vec<&str> {
        errors.errors().iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_register_aggregates_all_failures() {
        let raw = RegisterSubmission {
            full_name: None,
            email: Some("not-an-email".to_string()),
            password: Some("weak".to_string()),
            confirm_password: None,
            terms_accepted: false,
        };

        let errors = validate_register(&raw).unwrap_err();
        let fields = fields_of(&errors);
        assert!(fields.contains(&"full_name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
        assert!(fields.contains(&"confirm_password"));
        assert!(fields.contains(&"terms_accepted"));
        // every failing password rule is present, not just the first
        assert!(fields.iter().filter(|f| **f == "password").count() > 1);
    }

    #[test]
    fn test_register_confirmation_mismatch_attaches_to_confirmation() {
        let raw = RegisterSubmission {
            full_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            password: Some("Str0ng!pass".to_string()),
            confirm_password: Some("Str0ng!pass2".to_string()),
            terms_accepted: true,
        };

        let errors = validate_register(&raw).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].field, "confirm_password");
        assert_eq!(errors.errors()[0].message, "Passwords do not match.");
    }

    #[test]
    fn test_register_success_normalizes_email() {
        let raw = RegisterSubmission {
            full_name: Some("  Ada Lovelace ".to_string()),
            email: Some("Ada@Example.com".to_string()),
            password: Some("Str0ng!pass".to_string()),
            confirm_password: Some("Str0ng!pass".to_string()),
            terms_accepted: true,
        };

        let valid = validate_register(&raw).unwrap();
        assert_eq!(valid.full_name, "Ada Lovelace");
        assert_eq!(valid.email, "ada@example.com");
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = validate_login(&LoginSubmission::default()).unwrap_err();
        let fields = fields_of(&errors);
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn test_profile_update_normalizes_phone() {
        let raw = ProfileUpdateSubmission {
            full_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+1 (555) 123-4567".to_string()),
            location: None,
        };

        let valid = validate_profile_update(&raw).unwrap();
        assert_eq!(valid.phone.as_deref(), Some("+15551234567"));
        assert_eq!(valid.location, None);
    }

    #[test]
    fn test_profile_update_rejects_unprefixed_phone() {
        let raw = ProfileUpdateSubmission {
            full_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("5551234".to_string()),
            location: None,
        };

        let errors = validate_profile_update(&raw).unwrap_err();
        assert_eq!(errors.errors()[0].field, "phone");
        assert_eq!(
            errors.errors()[0].message,
            "Phone number must start with +."
        );
    }

    #[test]
    fn test_security_update_checks_confirmation() {
        let raw = SecurityUpdateSubmission {
            current_password: Some("Old!pass1".to_string()),
            new_password: Some("NewStr0ng!".to_string()),
            confirm_password: Some("Different1!".to_string()),
        };

        let errors = validate_security_update(&raw).unwrap_err();
        assert_eq!(fields_of(&errors), vec!["confirm_password"]);
    }

    #[test]
    fn test_security_update_reports_new_password_rules() {
        let raw = SecurityUpdateSubmission {
            current_password: Some("Old!pass1".to_string()),
            new_password: Some("alllowercase".to_string()),
            confirm_password: Some("alllowercase".to_string()),
        };

        let errors = validate_security_update(&raw).unwrap_err();
        assert!(errors
            .errors()
            .iter()
            .all(|e| e.field == "new_password"));
        assert_eq!(errors.errors().len(), 3);
    }
}
