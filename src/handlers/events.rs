use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{bad_multipart, pipeline_error, resolve_location};
use crate::adapters::{ImageStore, StoredImage};
use crate::images::{pipeline, ImagePolicy, PipelineError, UploadedFile};
use crate::repo;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::validators::event::{validate_event_info, EventSubmission};
use crate::validators::zones::{validate_zones, RawZone};
use crate::validators::FormErrors;

/// One multipart submission: the info block, the repeatable zone rows and
/// the uploaded image files.
#[derive(Default)]
struct RawEventForm {
    info: EventSubmission,
    zones: BTreeMap<usize, RawZone>,
    images: Vec<UploadedFile>,
}

async fn collect_form(multipart: &mut Multipart) -> Result<RawEventForm, AppError> {
    let mut form = RawEventForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" {
            let filename = field.file_name().unwrap_or("image").to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            if !bytes.is_empty() {
                form.images.push(UploadedFile { filename, bytes });
            }
            continue;
        }

        let value = field.text().await.map_err(bad_multipart)?;
        match name.as_str() {
            "name" => form.info.name = Some(value),
            "date" => form.info.date = Some(value),
            "time" => form.info.time = Some(value),
            "location" => form.info.location = Some(value),
            "category" => form.info.category = Some(value),
            "seating_type" => form.info.seating_type = Some(value),
            "description" => form.info.description = Some(value),
            other => {
                if let Some((index, field_name)) = parse_zone_field(other) {
                    let row = form.zones.entry(index).or_default();
                    match field_name {
                        "zone_name" => row.zone_name = Some(value),
                        "zone_price" => row.zone_price = Some(value),
                        "zone_seats" => row.zone_seats = Some(value),
                        _ => {}
                    }
                }
                // unknown fields are ignored
            }
        }
    }

    Ok(form)
}

/// Zone rows arrive as `zones-{index}-{field}`.
fn parse_zone_field(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix("zones-")?;
    let (index, field_name) = rest.split_once('-')?;
    Some((index.parse().ok()?, field_name))
}

pub async fn create_event(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let organizer = repo::profiles::find(&state.pool, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile with id '{profile_id}' was not found")))?;

    let form = collect_form(&mut multipart).await?;

    // Field and formset validation aggregates before anything external runs.
    let now = Utc::now().naive_utc();
    let info_result = validate_event_info(&form.info, now);
    let zones_result = validate_zones(&form.zones);

    let (mut info, zones) = match (info_result, zones_result) {
        (Ok(info), Ok(zones)) => (info, zones),
        (info_result, zones_result) => {
            let mut errors = FormErrors::new();
            if let Err(e) = info_result {
                errors.extend(e);
            }
            if let Err(e) = zones_result {
                errors.extend(e);
            }
            return Err(errors.into());
        }
    };

    // Every file is format/size-checked before the first network call, so a
    // rejected file costs no uploads.
    let policy = ImagePolicy::event_image(state.config.event_image_max_bytes);
    let mut rejections = FormErrors::new();
    for file in &form.images {
        if let Err(PipelineError::Rejected { message, .. }) = pipeline::validate(file, &policy) {
            rejections.add("images", message);
        }
    }
    if !rejections.is_empty() {
        return Err(rejections.into());
    }

    info.location = resolve_location(&state.geocoder, "location", &info.location).await?;

    // Uploads run one at a time; any failure rolls back the ones that
    // already landed and fails the whole submission.
    let mut stored: Vec<StoredImage> = Vec::with_capacity(form.images.len());
    for file in &form.images {
        match pipeline::process_and_store(&state.image_store, &policy, file).await {
            Ok(image) => stored.push(image),
            Err(e) => {
                discard_stored(&state.image_store, &stored).await;
                return Err(pipeline_error("images", e));
            }
        }
    }

    // Event, zones and image rows commit together or not at all.
    let detail =
        match repo::events::create_event(&state.pool, organizer.id, &info, &zones, &stored).await {
            Ok(detail) => detail,
            Err(e) => {
                discard_stored(&state.image_store, &stored).await;
                return Err(AppError::DatabaseError(e));
            }
        };

    tracing::info!(event_id = %detail.event.id, organizer_id = %organizer.id, "event created");
    Ok(created(detail, "Event created").into_response())
}

pub async fn list_events(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let organizer = repo::profiles::find(&state.pool, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile with id '{profile_id}' was not found")))?;

    let events = repo::events::list_by_organizer(&state.pool, organizer.id).await?;
    Ok(success(events, "Events fetched").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let detail = repo::events::find(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{event_id}' was not found")))?;

    Ok(success(detail, "Event fetched").into_response())
}

/// Best-effort compensation for uploads that preceded a failure.
async fn discard_stored(store: &ImageStore, stored: &[StoredImage]) {
    for image in stored {
        if store.delete(&image.url).await.is_err() {
            tracing::warn!(url = %image.url, "uploaded image left orphaned after failed event creation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zone_field() {
        assert_eq!(parse_zone_field("zones-0-zone_name"), Some((0, "zone_name")));
        assert_eq!(parse_zone_field("zones-12-zone_seats"), Some((12, "zone_seats")));
        assert_eq!(parse_zone_field("zones-x-zone_name"), None);
        assert_eq!(parse_zone_field("images"), None);
        assert_eq!(parse_zone_field("zones-3"), None);
    }
}
