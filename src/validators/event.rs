//! Event info form: field rules plus the date/time cross-check. The
//! validation instant is injected so "today" and "now" are never read inside
//! the validators.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{fields, FormErrors};
use crate::models::{EventCategory, SeatingType};

#[derive(Debug, Clone, Default)]
pub struct EventSubmission {
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub seating_type: Option<String>,
    pub description: Option<String>,
}

/// `location` is still the raw query; the handler resolves it to the
/// provider's canonical display name once the fields pass.
#[derive(Debug, Clone)]
pub struct ValidEventInfo {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub category: EventCategory,
    pub seating_type: SeatingType,
    pub description: Option<String>,
}

pub fn validate_event_info(
    raw: &EventSubmission,
    now: NaiveDateTime,
) -> Result<ValidEventInfo, FormErrors> {
    let mut errors = FormErrors::new();

    let name = errors.collect(fields::required_text(
        "name",
        raw.name.as_deref(),
        100,
        "Event name is required.",
        "Event name cannot exceed 100 characters.",
    ));
    let date = errors.collect(fields::event_date("date", raw.date.as_deref(), now.date()));
    let time = errors.collect(fields::time_of_day("time", raw.time.as_deref()));
    let location = errors.collect(fields::required_text(
        "location",
        raw.location.as_deref(),
        255,
        "Event location is required.",
        "Location length exceeded.",
    ));
    let category = errors.collect(fields::choice::<EventCategory>(
        "category",
        raw.category.as_deref(),
        "Event category is required.",
        "Select a valid event category.",
    ));
    let seating_type = errors.collect(fields::choice::<SeatingType>(
        "seating_type",
        raw.seating_type.as_deref(),
        "Seating type is required.",
        "Select a valid seating type.",
    ));
    let description = errors.collect(fields::optional_text(
        "description",
        raw.description.as_deref(),
        5000,
        "Description cannot exceed 5000 characters.",
    ));

    // Same-day events cannot start before the validation instant.
    if let (Some(date), Some(time)) = (&date, &time) {
        if *date == now.date() && *time < now.time() {
            errors.add("time", "Event time cannot be in the past.");
        }
    }

    match (name, date, time, location, category, seating_type, description) {
        (
            Some(name),
            Some(date),
            Some(time),
            Some(location),
            Some(category),
            Some(seating_type),
            Some(description),
        ) if errors.is_empty() => Ok(ValidEventInfo {
            name,
            date,
            time,
            location,
            category,
            seating_type,
            description,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_submission() -> EventSubmission {
        EventSubmission {
            name: Some("Summer Jazz Night".to_string()),
            date: Some("2026-08-20".to_string()),
            time: Some("19:30".to_string()),
            location: Some("Berlin".to_string()),
            category: Some("music".to_string()),
            seating_type: Some("general".to_string()),
            description: None,
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        )
    }

    #[test]
    fn test_valid_submission_passes() {
        let valid = validate_event_info(&base_submission(), at("2026-08-06", "12:00")).unwrap();
        assert_eq!(valid.name, "Summer Jazz Night");
        assert_eq!(valid.category, EventCategory::Music);
        assert_eq!(valid.seating_type, SeatingType::General);
        assert_eq!(valid.description, None);
    }

    #[test]
    fn test_past_date_fails_on_date_field() {
        let mut raw = base_submission();
        raw.date = Some("2026-08-01".to_string());

        let errors = validate_event_info(&raw, at("2026-08-06", "12:00")).unwrap_err();
        assert_eq!(errors.errors()[0].field, "date");
        assert_eq!(errors.errors()[0].message, "Event date cannot be in the past.");
    }

    #[test]
    fn test_same_day_earlier_time_fails_on_time_field() {
        let mut raw = base_submission();
        raw.date = Some("2026-08-06".to_string());
        raw.time = Some("09:00".to_string());

        let errors = validate_event_info(&raw, at("2026-08-06", "12:00")).unwrap_err();
        assert_eq!(errors.errors()[0].field, "time");
        assert_eq!(errors.errors()[0].message, "Event time cannot be in the past.");
    }

    #[test]
    fn test_same_day_later_time_passes() {
        let mut raw = base_submission();
        raw.date = Some("2026-08-06".to_string());
        raw.time = Some("18:00".to_string());

        assert!(validate_event_info(&raw, at("2026-08-06", "12:00")).is_ok());
    }

    #[test]
    fn test_earlier_time_on_future_date_passes() {
        let mut raw = base_submission();
        raw.time = Some("06:00".to_string());

        assert!(validate_event_info(&raw, at("2026-08-06", "12:00")).is_ok());
    }

    #[test]
    fn test_unknown_category_is_invalid_choice() {
        let mut raw = base_submission();
        raw.category = Some("karaoke".to_string());

        let errors = validate_event_info(&raw, at("2026-08-06", "12:00")).unwrap_err();
        assert_eq!(errors.errors()[0].field, "category");
        assert_eq!(errors.errors()[0].message, "Select a valid event category.");

        raw.category = None;
        let errors = validate_event_info(&raw, at("2026-08-06", "12:00")).unwrap_err();
        assert_eq!(errors.errors()[0].message, "Event category is required.");
    }

    #[test]
    fn test_all_failures_are_aggregated() {
        let raw = EventSubmission::default();
        let errors = validate_event_info(&raw, at("2026-08-06", "12:00")).unwrap_err();
        // name, date, time, location, category, seating_type all missing
        assert_eq!(errors.errors().len(), 6);
    }
}
