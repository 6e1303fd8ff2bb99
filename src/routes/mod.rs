use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{auth, events, health_check, profile};
use crate::state::AppState;

/// Generous enough for a full event submission with several images; the
/// per-file caps live in the image pipeline, not here.
const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/profiles/:profile_id",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/profiles/:profile_id/security", put(profile::update_security))
        .route(
            "/profiles/:profile_id/avatar",
            put(profile::update_avatar).delete(profile::reset_avatar),
        )
        .route(
            "/profiles/:profile_id/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/events/:event_id", get(events::get_event))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
