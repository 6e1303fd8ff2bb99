use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Raised when a submitted value is not a member of a closed choice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid choice")]
pub struct InvalidChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Arts,
    Business,
    Family,
    Food,
    Music,
    Social,
    Sports,
    Tech,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Arts => "arts",
            EventCategory::Business => "business",
            EventCategory::Family => "family",
            EventCategory::Food => "food",
            EventCategory::Music => "music",
            EventCategory::Social => "social",
            EventCategory::Sports => "sports",
            EventCategory::Tech => "tech",
        }
    }
}

impl FromStr for EventCategory {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arts" => Ok(EventCategory::Arts),
            "business" => Ok(EventCategory::Business),
            "family" => Ok(EventCategory::Family),
            "food" => Ok(EventCategory::Food),
            "music" => Ok(EventCategory::Music),
            "social" => Ok(EventCategory::Social),
            "sports" => Ok(EventCategory::Sports),
            "tech" => Ok(EventCategory::Tech),
            _ => Err(InvalidChoice),
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "seating_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeatingType {
    General,
    Reserved,
}

impl SeatingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatingType::General => "general",
            SeatingType::Reserved => "reserved",
        }
    }
}

impl FromStr for SeatingType {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(SeatingType::General),
            "reserved" => Ok(SeatingType::Reserved),
            _ => Err(InvalidChoice),
        }
    }
}

impl fmt::Display for SeatingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event created by a profile. Owns its price zones and images; deleting
/// the event cascades to both.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Canonical display name from the geocoder.
    pub location: String,
    pub category: EventCategory,
    pub description: Option<String>,
    pub seating_type: SeatingType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One uploaded image, held only as its external store URL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventImage {
    pub id: Uuid,
    pub event_id: Uuid,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A named block of tickets sharing one price and seat capacity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventPriceZone {
    pub id: Uuid,
    pub event_id: Uuid,
    pub zone_name: String,
    pub zone_price: Decimal,
    pub zone_seats: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in [
            EventCategory::Arts,
            EventCategory::Business,
            EventCategory::Family,
            EventCategory::Food,
            EventCategory::Music,
            EventCategory::Social,
            EventCategory::Sports,
            EventCategory::Tech,
        ] {
            assert_eq!(category.as_str().parse::<EventCategory>(), Ok(category));
        }
        assert_eq!("karaoke".parse::<EventCategory>(), Err(InvalidChoice));
    }

    #[test]
    fn test_seating_type_round_trip() {
        assert_eq!("general".parse::<SeatingType>(), Ok(SeatingType::General));
        assert_eq!("reserved".parse::<SeatingType>(), Ok(SeatingType::Reserved));
        assert!("standing".parse::<SeatingType>().is_err());
    }
}
