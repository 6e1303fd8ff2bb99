//! Per-field validators: pure functions from a raw submitted value to a
//! normalized value or a `FieldError` carrying the user-facing message.
//! Error messages are supplied by the call site for the generic rules and
//! fixed here for the rules whose wording never varies between forms.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::FieldError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

const PASSWORD_SPECIAL_CHARS: &str = "@$!%*?&";

/// Trims the raw value; an absent or all-whitespace submission counts as
/// missing.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn required_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
    required_msg: &str,
    max_len_msg: &str,
) -> Result<String, FieldError> {
    let value = present(value).ok_or_else(|| FieldError::new(field, required_msg))?;
    if value.chars().count() > max_len {
        return Err(FieldError::new(field, max_len_msg));
    }
    Ok(value.to_string())
}

pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
    max_len_msg: &str,
) -> Result<Option<String>, FieldError> {
    match present(value) {
        None => Ok(None),
        Some(value) if value.chars().count() > max_len => Err(FieldError::new(field, max_len_msg)),
        Some(value) => Ok(Some(value.to_string())),
    }
}

/// RFC-shaped address, normalized to lowercase for the uniqueness check.
pub fn email(field: &str, value: Option<&str>) -> Result<String, FieldError> {
    let value = present(value).ok_or_else(|| FieldError::new(field, "Email is required."))?;
    if !EMAIL_RE.is_match(value) {
        return Err(FieldError::new(field, "Enter a valid email address."));
    }
    Ok(value.to_lowercase())
}

/// Password complexity rules. Every failing rule is reported, each with its
/// own message.
pub fn password(field: &str, value: Option<&str>) -> Result<String, Vec<FieldError>> {
    let value = match value.filter(|v| !v.is_empty()) {
        Some(value) => value,
        None => return Err(vec![FieldError::new(field, "Password is required.")]),
    };

    let mut failures = Vec::new();
    if value.chars().count() < 8 {
        failures.push(FieldError::new(
            field,
            "Password must be at least 8 characters long.",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        failures.push(FieldError::new(
            field,
            "Password must contain at least one uppercase letter.",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        failures.push(FieldError::new(
            field,
            "Password must contain at least one lowercase letter.",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        failures.push(FieldError::new(
            field,
            "Password must contain at least one digit.",
        ));
    }
    if !value.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        failures.push(FieldError::new(
            field,
            "Password must contain at least one special character (@, $, !, %, *, ?, &).",
        ));
    }

    if failures.is_empty() {
        Ok(value.to_string())
    } else {
        Err(failures)
    }
}

/// Event dates are `%Y-%m-%d` and must not be in the past. `today` is
/// injected by the caller.
pub fn event_date(
    field: &str,
    value: Option<&str>,
    today: NaiveDate,
) -> Result<NaiveDate, FieldError> {
    let value = present(value).ok_or_else(|| FieldError::new(field, "Event date is required."))?;
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| FieldError::new(field, "Enter a valid date."))?;
    if date < today {
        return Err(FieldError::new(field, "Event date cannot be in the past."));
    }
    Ok(date)
}

pub fn time_of_day(field: &str, value: Option<&str>) -> Result<NaiveTime, FieldError> {
    let value = present(value).ok_or_else(|| FieldError::new(field, "Event time is required."))?;
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| FieldError::new(field, "Enter a valid time."))
}

/// Closed-set choice field. An unknown value is an "invalid choice" error,
/// distinct from a missing one.
pub fn choice<T: FromStr>(
    field: &str,
    value: Option<&str>,
    required_msg: &str,
    invalid_msg: &str,
) -> Result<T, FieldError> {
    let value = present(value).ok_or_else(|| FieldError::new(field, required_msg))?;
    value
        .parse()
        .map_err(|_| FieldError::new(field, invalid_msg))
}

/// Zone price: decimal, not negative, at most 2 fractional digits.
pub fn price(field: &str, value: Option<&str>) -> Result<Decimal, FieldError> {
    let value = present(value).ok_or_else(|| FieldError::new(field, "Zone price is required."))?;
    let price =
        Decimal::from_str(value).map_err(|_| FieldError::new(field, "Enter a valid price."))?;
    if price.is_sign_negative() {
        return Err(FieldError::new(field, "Price cannot be negative."));
    }
    if price.scale() > 2 {
        return Err(FieldError::new(
            field,
            "Price can have at most 2 decimal places.",
        ));
    }
    Ok(price)
}

pub fn seats(field: &str, value: Option<&str>) -> Result<i32, FieldError> {
    let value = present(value).ok_or_else(|| FieldError::new(field, "Zone seats are required."))?;
    let seats: i32 = value
        .parse()
        .map_err(|_| FieldError::new(field, "Enter a valid seat count."))?;
    if seats < 1 {
        return Err(FieldError::new(
            field,
            "Each zone must have at least 1 seat.",
        ));
    }
    Ok(seats)
}

/// Optional phone number. Formatting characters `(`, `)`, `-` and whitespace
/// are stripped; the result must be `+` followed by 6 to 15 ASCII digits.
pub fn phone(field: &str, value: Option<&str>) -> Result<Option<String>, FieldError> {
    let value = match present(value) {
        Some(value) => value,
        None => return Ok(None),
    };

    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '-') && !c.is_whitespace())
        .collect();

    let digits = match stripped.strip_prefix('+') {
        Some(digits) => digits,
        None => {
            return Err(FieldError::new(
                field,
                "Phone number must start with +.",
            ))
        }
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::new(
            field,
            "Phone number must contain digits only.",
        ));
    }
    if digits.len() < 6 || digits.len() > 15 {
        return Err(FieldError::new(
            field,
            "Phone number must be between 6 and 15 digits.",
        ));
    }

    Ok(Some(format!("+{digits}")))
}

/// Required checkbox (terms acceptance).
pub fn accepted(field: &str, value: bool, required_msg: &str) -> Result<(), FieldError> {
    if value {
        Ok(())
    } else {
        Err(FieldError::new(field, required_msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(result: Result<String, Vec<FieldError>>) -> Vec<String> {
        result
            .unwrap_err()
            .into_iter()
            .map(|e| e.message)
            .collect()
    }

    #[test]
    fn test_required_text_trims_and_bounds() {
        let ok = required_text("full_name", Some("  Ada Lovelace "), 100, "req", "max");
        assert_eq!(ok.unwrap(), "Ada Lovelace");

        let missing = required_text("full_name", Some("   "), 100, "Full name is required.", "max");
        assert_eq!(missing.unwrap_err().message, "Full name is required.");

        let long = "x".repeat(101);
        let too_long = required_text("full_name", Some(&long), 100, "req", "Full name length exceeded.");
        assert_eq!(too_long.unwrap_err().message, "Full name length exceeded.");
    }

    #[test]
    fn test_email_shape_and_normalization() {
        assert_eq!(
            email("email", Some("Ada@Example.COM")).unwrap(),
            "ada@example.com"
        );
        assert!(email("email", Some("not-an-email")).is_err());
        assert!(email("email", Some("a b@example.com")).is_err());
        assert_eq!(
            email("email", None).unwrap_err().message,
            "Email is required."
        );
    }

    #[test]
    fn test_password_reports_every_failing_rule() {
        let failures = messages(password("password", Some("short")));
        assert!(failures.contains(&"Password must be at least 8 characters long.".to_string()));
        assert!(failures.contains(&"Password must contain at least one uppercase letter.".to_string()));
        assert!(failures.contains(&"Password must contain at least one digit.".to_string()));
        assert!(failures.iter().any(|m| m.contains("special character")));
    }

    #[test]
    fn test_password_single_missing_rule() {
        let failures = messages(password("password", Some("Passw0rdd")));
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("special character"));

        let failures = messages(password("password", Some("passw0rd!")));
        assert_eq!(
            failures,
            vec!["Password must contain at least one uppercase letter.".to_string()]
        );
    }

    #[test]
    fn test_password_accepts_compliant_value() {
        assert_eq!(
            password("password", Some("Str0ng!pass")).unwrap(),
            "Str0ng!pass"
        );
    }

    #[test]
    fn test_event_date_rejects_past() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert!(event_date("event_date", Some("2026-08-05"), today).is_err());
        assert_eq!(
            event_date("event_date", Some("2026-08-06"), today).unwrap(),
            today
        );
        assert_eq!(
            event_date("event_date", Some("06/08/2026"), today)
                .unwrap_err()
                .message,
            "Enter a valid date."
        );
    }

    #[test]
    fn test_time_of_day_accepts_both_precisions() {
        assert!(time_of_day("event_time", Some("18:30")).is_ok());
        assert!(time_of_day("event_time", Some("18:30:15")).is_ok());
        assert!(time_of_day("event_time", Some("6pm")).is_err());
    }

    #[test]
    fn test_price_rules() {
        assert_eq!(
            price("zone_price", Some("25.00")).unwrap(),
            Decimal::from_str("25.00").unwrap()
        );
        assert_eq!(
            price("zone_price", Some("25.001")).unwrap_err().message,
            "Price can have at most 2 decimal places."
        );
        assert_eq!(
            price("zone_price", Some("-1")).unwrap_err().message,
            "Price cannot be negative."
        );
        assert!(price("zone_price", Some("abc")).is_err());
    }

    #[test]
    fn test_seats_rules() {
        assert_eq!(seats("zone_seats", Some("100")).unwrap(), 100);
        assert!(seats("zone_seats", Some("0")).is_err());
        assert!(seats("zone_seats", Some("2.5")).is_err());
    }

    #[test]
    fn test_phone_normalization() {
        assert_eq!(
            phone("phone", Some("+1 (555) 123-4567")).unwrap(),
            Some("+15551234567".to_string())
        );
        assert_eq!(phone("phone", Some("  ")).unwrap(), None);
        assert_eq!(phone("phone", None).unwrap(), None);
        assert_eq!(
            phone("phone", Some("5551234")).unwrap_err().message,
            "Phone number must start with +."
        );
        assert_eq!(
            phone("phone", Some("+555x1234")).unwrap_err().message,
            "Phone number must contain digits only."
        );
        // 5 digits is one short of the minimum
        assert!(phone("phone", Some("+12345")).is_err());
        assert!(phone("phone", Some("+1234567890123456")).is_err());
    }
}
