//! Price-zone formset. Rows arrive as a repeatable group
//! (`zones-{i}-zone_name` / `zone_price` / `zone_seats`); fully-empty rows
//! are skipped, and at least one non-empty row must survive — an empty
//! submission fails at the collection level, not per-row.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::{fields, FormErrors};

#[derive(Debug, Clone, Default)]
pub struct RawZone {
    pub zone_name: Option<String>,
    pub zone_price: Option<String>,
    pub zone_seats: Option<String>,
}

impl RawZone {
    fn is_blank(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.zone_name) && blank(&self.zone_price) && blank(&self.zone_seats)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidZone {
    pub zone_name: String,
    pub zone_price: Decimal,
    pub zone_seats: i32,
}

pub fn validate_zones(rows: &BTreeMap<usize, RawZone>) -> Result<Vec<ValidZone>, FormErrors> {
    let mut errors = FormErrors::new();
    let mut zones = Vec::new();

    for (index, row) in rows {
        if row.is_blank() {
            continue;
        }

        let name = errors.collect(fields::required_text(
            &format!("zones-{index}-zone_name"),
            row.zone_name.as_deref(),
            50,
            "Zone name is required.",
            "Zone name cannot exceed 50 characters.",
        ));
        let price = errors.collect(fields::price(
            &format!("zones-{index}-zone_price"),
            row.zone_price.as_deref(),
        ));
        let seats = errors.collect(fields::seats(
            &format!("zones-{index}-zone_seats"),
            row.zone_seats.as_deref(),
        ));

        if let (Some(zone_name), Some(zone_price), Some(zone_seats)) = (name, price, seats) {
            zones.push(ValidZone {
                zone_name,
                zone_price,
                zone_seats,
            });
        }
    }

    if zones.is_empty() && errors.is_empty() {
        errors.add("zones", "At least one price zone is required.");
    }

    errors.into_result(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(name: &str, price: &str, seats: &str) -> RawZone {
        RawZone {
            zone_name: Some(name.to_string()),
            zone_price: Some(price.to_string()),
            zone_seats: Some(seats.to_string()),
        }
    }

    #[test]
    fn test_empty_submission_fails_at_collection_level() {
        let errors = validate_zones(&BTreeMap::new()).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].field, "zones");
        assert_eq!(
            errors.errors()[0].message,
            "At least one price zone is required."
        );
    }

    #[test]
    fn test_all_blank_rows_fail_at_collection_level() {
        let mut rows = BTreeMap::new();
        rows.insert(0, RawZone::default());
        rows.insert(1, RawZone::default());

        let errors = validate_zones(&rows).unwrap_err();
        assert_eq!(errors.errors()[0].field, "zones");
    }

    #[test]
    fn test_single_valid_zone_passes() {
        let mut rows = BTreeMap::new();
        rows.insert(0, row("GA", "25.00", "100"));

        let zones = validate_zones(&rows).unwrap();
        assert_eq!(
            zones,
            vec![ValidZone {
                zone_name: "GA".to_string(),
                zone_price: Decimal::from_str("25.00").unwrap(),
                zone_seats: 100,
            }]
        );
    }

    #[test]
    fn test_blank_rows_are_skipped_around_valid_ones() {
        let mut rows = BTreeMap::new();
        rows.insert(0, RawZone::default());
        rows.insert(1, row("VIP", "120", "20"));

        let zones = validate_zones(&rows).unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].zone_name, "VIP");
    }

    #[test]
    fn test_row_errors_carry_the_row_index() {
        let mut rows = BTreeMap::new();
        rows.insert(0, row("GA", "25.00", "100"));
        rows.insert(1, row("", "-5", "0"));

        let errors = validate_zones(&rows).unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"zones-1-zone_name"));
        assert!(fields.contains(&"zones-1-zone_price"));
        assert!(fields.contains(&"zones-1-zone_seats"));
    }
}
