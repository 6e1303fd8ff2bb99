use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::adapters::{GeocodeError, Geocoder};
use crate::images::PipelineError;
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::validators::FormErrors;

pub mod auth;
pub mod events;
pub mod profile;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "eventhub-api",
    };

    success(payload, "Health check successful").into_response()
}

/// Resolves free-text location input to the geocoder's canonical display
/// name. "Not found" is a field error the user can correct; transport
/// failures surface as a generic retry-later message.
pub(crate) async fn resolve_location(
    geocoder: &Geocoder,
    field: &str,
    query: &str,
) -> Result<String, AppError> {
    match geocoder.resolve(query).await {
        Ok(display_name) => Ok(display_name),
        Err(GeocodeError::NotFound) => Err(FormErrors::single(
            field,
            "Location not found. Please enter a valid place.",
        )
        .into()),
        Err(GeocodeError::Service) => Err(AppError::ExternalServiceError(
            "Failed to validate location. Try again later.".to_string(),
        )),
    }
}

/// Image pipeline outcomes at the request boundary: rejections carry their
/// per-file message on the owning field, everything else is generic.
pub(crate) fn pipeline_error(field: &str, error: PipelineError) -> AppError {
    match error {
        PipelineError::Rejected { message, .. } => FormErrors::single(field, message).into(),
        PipelineError::Failed => {
            AppError::ExternalServiceError("Something went wrong.".to_string())
        }
    }
}

pub(crate) fn bad_multipart(error: MultipartError) -> AppError {
    tracing::warn!(error = %error, "malformed multipart submission");
    AppError::Validation(FormErrors::single("form", "Malformed form submission."))
}
