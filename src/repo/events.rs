use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::adapters::StoredImage;
use crate::models::{Event, EventImage, EventPriceZone};
use crate::validators::event::ValidEventInfo;
use crate::validators::zones::ValidZone;

/// An event together with its owned rows, as created or read back.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    pub event: Event,
    pub zones: Vec<EventPriceZone>,
    pub images: Vec<EventImage>,
}

/// Persists the event and every dependent row in one transaction: all rows
/// or none. Remote image uploads happen before this is called; compensation
/// for them on failure is the caller's job.
pub async fn create_event(
    pool: &PgPool,
    organizer_id: Uuid,
    info: &ValidEventInfo,
    zones: &[ValidZone],
    images: &[StoredImage],
) -> Result<EventDetail, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let event: Event = sqlx::query_as(
        r#"
        INSERT INTO events (id, organizer_id, name, date, time, location, category, description, seating_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(organizer_id)
    .bind(&info.name)
    .bind(info.date)
    .bind(info.time)
    .bind(&info.location)
    .bind(info.category)
    .bind(&info.description)
    .bind(info.seating_type)
    .fetch_one(&mut *tx)
    .await?;

    let mut zone_rows = Vec::with_capacity(zones.len());
    for zone in zones {
        let row: EventPriceZone = sqlx::query_as(
            r#"
            INSERT INTO event_price_zones (id, event_id, zone_name, zone_price, zone_seats)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.id)
        .bind(&zone.zone_name)
        .bind(zone.zone_price)
        .bind(zone.zone_seats)
        .fetch_one(&mut *tx)
        .await?;
        zone_rows.push(row);
    }

    let mut image_rows = Vec::with_capacity(images.len());
    for image in images {
        let row: EventImage = sqlx::query_as(
            r#"
            INSERT INTO event_images (id, event_id, image_url)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.id)
        .bind(&image.url)
        .fetch_one(&mut *tx)
        .await?;
        image_rows.push(row);
    }

    tx.commit().await?;

    Ok(EventDetail {
        event,
        zones: zone_rows,
        images: image_rows,
    })
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<EventDetail>, sqlx::Error> {
    let event: Option<Event> = sqlx::query_as("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let event = match event {
        Some(event) => event,
        None => return Ok(None),
    };

    let zones: Vec<EventPriceZone> =
        sqlx::query_as("SELECT * FROM event_price_zones WHERE event_id = $1 ORDER BY created_at")
            .bind(id)
            .fetch_all(pool)
            .await?;

    let images: Vec<EventImage> =
        sqlx::query_as("SELECT * FROM event_images WHERE event_id = $1 ORDER BY created_at")
            .bind(id)
            .fetch_all(pool)
            .await?;

    Ok(Some(EventDetail {
        event,
        zones,
        images,
    }))
}

pub async fn list_by_organizer(pool: &PgPool, organizer_id: Uuid) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM events WHERE organizer_id = $1 ORDER BY date, time")
        .bind(organizer_id)
        .fetch_all(pool)
        .await
}
