use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use super::{bad_multipart, pipeline_error, resolve_location};
use crate::images::{pipeline, ImagePolicy, UploadedFile};
use crate::models::Profile;
use crate::repo;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};
use crate::validators::profile::{
    validate_profile_update, validate_security_update, ProfileUpdateSubmission,
    SecurityUpdateSubmission,
};
use crate::validators::FormErrors;

async fn load_profile(state: &AppState, id: Uuid) -> Result<Profile, AppError> {
    repo::profiles::find(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile with id '{id}' was not found")))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let profile = load_profile(&state, profile_id).await?;
    Ok(success(profile, "Profile fetched").into_response())
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Json(raw): Json<ProfileUpdateSubmission>,
) -> Result<Response, AppError> {
    let profile = load_profile(&state, profile_id).await?;
    let mut valid = validate_profile_update(&raw)?;

    // Self-exclusion: re-submitting the current email passes.
    if repo::profiles::email_taken(&state.pool, &valid.email, Some(profile.id)).await? {
        return Err(FormErrors::single("email", "Email is already registered.").into());
    }

    if let Some(query) = valid.location.take() {
        valid.location = Some(resolve_location(&state.geocoder, "location", &query).await?);
    }

    let updated = repo::profiles::update_profile(&state.pool, profile.id, &valid)
        .await
        .map_err(|e| {
            if repo::is_unique_violation(&e) {
                AppError::Conflict("Email is already registered.".to_string())
            } else {
                AppError::DatabaseError(e)
            }
        })?;

    Ok(success(updated, "Profile updated").into_response())
}

pub async fn update_security(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Json(raw): Json<SecurityUpdateSubmission>,
) -> Result<Response, AppError> {
    let profile = load_profile(&state, profile_id).await?;
    let valid = validate_security_update(&raw)?;

    if !profile.verify_password(&valid.current_password) {
        return Err(
            FormErrors::single("current_password", "Current password is incorrect.").into(),
        );
    }

    let password_hash = Profile::hash_password(&valid.new_password);
    repo::profiles::update_password(&state.pool, profile.id, &password_hash).await?;

    tracing::info!(profile_id = %profile.id, "password updated");
    Ok(empty_success("Password updated").into_response())
}

/// Replaces the avatar: upload-new, persist-new, then best-effort delete of
/// the previous remote asset. A failed upload leaves the old avatar
/// authoritative; a failed delete only orphans a remote file.
pub async fn update_avatar(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let profile = load_profile(&state, profile_id).await?;

    let mut file: Option<UploadedFile> = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() != Some("avatar") {
            continue;
        }
        let filename = field.file_name().unwrap_or("avatar").to_string();
        let bytes = field.bytes().await.map_err(bad_multipart)?;
        if !bytes.is_empty() {
            file = Some(UploadedFile { filename, bytes });
        }
    }

    let file =
        file.ok_or_else(|| FormErrors::single("avatar", "Avatar image is required."))?;

    let stored = pipeline::process_and_store(&state.image_store, &ImagePolicy::avatar(), &file)
        .await
        .map_err(|e| pipeline_error("avatar", e))?;

    repo::profiles::update_avatar(&state.pool, profile.id, &stored.url).await?;

    discard_remote_avatar(&state, &profile.avatar, &stored.url).await;

    tracing::info!(profile_id = %profile.id, "avatar updated");
    Ok(success(json!({ "avatar": stored.url }), "Avatar updated").into_response())
}

pub async fn reset_avatar(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let profile = load_profile(&state, profile_id).await?;
    let default_url = state.config.default_avatar_url.clone();

    repo::profiles::update_avatar(&state.pool, profile.id, &default_url).await?;

    discard_remote_avatar(&state, &profile.avatar, &default_url).await;

    Ok(success(json!({ "avatar": default_url }), "Avatar reset").into_response())
}

/// Best-effort removal of a replaced avatar. The shared default asset is
/// never deleted.
async fn discard_remote_avatar(state: &AppState, old_url: &str, new_url: &str) {
    if old_url == new_url || old_url == state.config.default_avatar_url {
        return;
    }
    if state.image_store.delete(old_url).await.is_err() {
        tracing::warn!(url = %old_url, "replaced avatar left orphaned in the image store");
    }
}
