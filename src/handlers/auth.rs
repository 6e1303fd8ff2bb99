use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::Profile;
use crate::repo;
use crate::repo::profiles::NewProfile;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::validators::profile::{
    validate_login, validate_register, LoginSubmission, RegisterSubmission,
};
use crate::validators::FormErrors;

pub async fn register(
    State(state): State<AppState>,
    Json(raw): Json<RegisterSubmission>,
) -> Result<Response, AppError> {
    let valid = validate_register(&raw)?;

    // Uniqueness pre-check for the user-facing message; the UNIQUE
    // constraint below is what holds under concurrent registrations.
    if repo::profiles::email_taken(&state.pool, &valid.email, None).await? {
        return Err(FormErrors::single("email", "Email is already registered.").into());
    }

    let new = NewProfile {
        full_name: valid.full_name,
        email: valid.email,
        password_hash: Profile::hash_password(&valid.password),
        avatar: state.config.default_avatar_url.clone(),
    };

    let profile = repo::profiles::insert(&state.pool, new).await.map_err(|e| {
        if repo::is_unique_violation(&e) {
            AppError::Conflict("Email is already registered.".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    tracing::info!(profile_id = %profile.id, "profile registered");
    Ok(created(profile, "Registration successful").into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(raw): Json<LoginSubmission>,
) -> Result<Response, AppError> {
    let valid = validate_login(&raw)?;

    let profile = repo::profiles::find_by_email(&state.pool, &valid.email).await?;

    // One generic message whether the email is unknown, the account is
    // deactivated, or the password is wrong.
    let profile = match profile {
        Some(profile) if profile.is_active && profile.verify_password(&valid.password) => profile,
        _ => return Err(AppError::AuthError("Invalid email or password.".to_string())),
    };

    Ok(success(profile, "Login successful").into_response())
}
